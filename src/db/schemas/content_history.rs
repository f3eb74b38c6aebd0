//! Content history document schema
//!
//! Append-only audit records, one per completed content mutation.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for content history
pub const CONTENT_HISTORY_COLLECTION: &str = "content_history";

/// Audit record stored in MongoDB. Never updated or deleted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ContentHistoryDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    pub content_id: String,

    /// Acting user (content author at mutation time)
    #[serde(default)]
    pub user_id: String,

    /// Action tag: create, update, assign_author, delete, change_status
    pub action: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

impl IntoIndexes for ContentHistoryDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "content_id": 1, "metadata.created_at": 1 },
            Some(
                IndexOptions::builder()
                    .name("content_id_created_index".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ContentHistoryDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
