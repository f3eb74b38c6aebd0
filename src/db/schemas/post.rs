//! Post document schema

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for posts
pub const POST_COLLECTION: &str = "post";

/// Post attached to exactly one content item
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PostDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub resources: Vec<String>,

    /// Parent content identifier (validated on creation only)
    pub content_id: String,

    #[serde(default)]
    pub description: String,
}

impl IntoIndexes for PostDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "content_id": 1 },
            Some(
                IndexOptions::builder()
                    .name("content_id_index".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for PostDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
