//! Content status document schema

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for content statuses
pub const CONTENT_STATUS_COLLECTION: &str = "content_status";

/// Named lifecycle state for content
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ContentStatusDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Status name, referenced by content `status_id`
    pub name: String,

    /// Whether content in this status may be deleted
    #[serde(default)]
    pub is_removable: bool,
}

impl ContentStatusDoc {
    pub fn new(name: String, is_removable: bool) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            name,
            is_removable,
        }
    }
}

impl IntoIndexes for ContentStatusDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "name": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("name_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for ContentStatusDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
