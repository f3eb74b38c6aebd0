//! Post requests and read model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, to_utc};
use crate::db::schemas::{Metadata, PostDoc};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: String,
    pub category: String,
    pub resources: Vec<String>,
    pub content_id: String,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<PostDoc> for Post {
    fn from(doc: PostDoc) -> Self {
        Self {
            id: doc._id.map(|id| id.to_hex()).unwrap_or_default(),
            category: doc.category,
            resources: doc.resources,
            content_id: doc.content_id,
            description: doc.description,
            created_at: to_utc(doc.metadata.created_at),
            updated_at: to_utc(doc.metadata.updated_at),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub content_id: String,
    #[serde(default)]
    pub description: String,
}

impl CreatePostRequest {
    pub fn into_doc(self) -> PostDoc {
        PostDoc {
            _id: None,
            metadata: Metadata::new(),
            category: self.category,
            resources: self.resources,
            content_id: self.content_id,
            description: self.description,
        }
    }
}

/// Sparse post update
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub resources: Option<Vec<String>>,
}

impl UpdatePostRequest {
    pub fn normalized(self) -> Self {
        Self {
            category: non_blank(self.category),
            description: non_blank(self.description),
            resources: self.resources.filter(|r| !r.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PostFilter {
    #[serde(default)]
    pub content_id: Option<String>,
}

impl PostFilter {
    pub fn matches(&self, doc: &PostDoc) -> bool {
        match self.content_id.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(id) => doc.content_id == id,
        }
    }
}
