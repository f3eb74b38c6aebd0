//! Content document schema
//!
//! Stores educational content items with their subject, microtopic,
//! status and author references.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for content
pub const CONTENT_COLLECTION: &str = "content";

/// Content document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ContentDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at, is_deleted, deleted_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Language code of the content
    #[serde(default)]
    pub locale: String,

    /// Content body text
    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub description: String,

    /// Ordered resource references (URLs or blob ids)
    #[serde(default)]
    pub resources: Vec<String>,

    /// Subject reference, resolved remotely
    pub subject_id: i64,

    /// Microtopic reference, resolved remotely
    pub microtopic_id: i64,

    /// Name of the content status record
    pub status_id: String,

    #[serde(default)]
    pub author_id: String,

    #[serde(default)]
    pub difficulty: i32,
}

impl ContentDoc {
    /// Hex form of the document ID, empty when not yet inserted
    pub fn id_hex(&self) -> String {
        self._id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

impl IntoIndexes for ContentDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            (
                doc! { "status_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("status_id_index".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "subject_id": 1, "microtopic_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("subject_microtopic_index".to_string())
                        .build(),
                ),
            ),
            (
                doc! { "author_id": 1 },
                Some(
                    IndexOptions::builder()
                        .name("author_id_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl MutMetadata for ContentDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
