//! Content requests and read model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::remote::Subject;
use super::{non_blank, to_utc};
use crate::db::schemas::{ContentDoc, Metadata};

/// Content read model, enriched with its subject
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub id: String,
    pub locale: String,
    pub body: String,
    pub description: String,
    pub resources: Vec<String>,
    pub subject_id: i64,
    pub subject: Option<Subject>,
    pub microtopic_id: i64,
    pub status_id: String,
    pub author_id: String,
    pub difficulty: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<ContentDoc> for Content {
    fn from(doc: ContentDoc) -> Self {
        Self {
            id: doc.id_hex(),
            locale: doc.locale,
            body: doc.body,
            description: doc.description,
            resources: doc.resources,
            subject_id: doc.subject_id,
            subject: None,
            microtopic_id: doc.microtopic_id,
            status_id: doc.status_id,
            author_id: doc.author_id,
            difficulty: doc.difficulty,
            created_at: to_utc(doc.metadata.created_at),
            updated_at: to_utc(doc.metadata.updated_at),
        }
    }
}

/// Create request. `status_id` is accepted but always replaced by "draft".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContentRequest {
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resources: Vec<String>,
    pub subject_id: i64,
    pub microtopic_id: i64,
    #[serde(default)]
    pub status_id: Option<String>,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub difficulty: i32,
}

impl CreateContentRequest {
    /// Build the document to insert under the given status name
    pub fn into_doc(self, status: String) -> ContentDoc {
        ContentDoc {
            _id: None,
            metadata: Metadata::new(),
            locale: self.locale,
            body: self.body,
            description: self.description,
            resources: self.resources,
            subject_id: self.subject_id,
            microtopic_id: self.microtopic_id,
            status_id: status,
            author_id: self.author_id,
            difficulty: self.difficulty,
        }
    }
}

/// Sparse update of the editable content fields
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct UpdateContentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

impl UpdateContentRequest {
    /// Drop blank text fields so they leave stored values untouched
    pub fn normalized(self) -> Self {
        Self {
            body: non_blank(self.body),
            description: non_blank(self.description),
            difficulty: self.difficulty,
            resources: self.resources,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignAuthorRequest {
    #[serde(default)]
    pub author_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeStatusRequest {
    #[serde(default)]
    pub status_id: Option<String>,
}

/// Exact-match list filter. Empty strings and zero ids mean "no constraint".
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ContentFilter {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub microtopic_id: Option<i64>,
    #[serde(default)]
    pub author_id: Option<String>,
}

impl ContentFilter {
    /// Collapse empty and zero-valued constraints to `None`
    pub fn normalized(self) -> Self {
        Self {
            locale: non_blank(self.locale),
            status: non_blank(self.status),
            subject_id: self.subject_id.filter(|id| *id != 0),
            microtopic_id: self.microtopic_id.filter(|id| *id != 0),
            author_id: non_blank(self.author_id),
        }
    }

    /// Whether a stored document satisfies every constraint
    pub fn matches(&self, doc: &ContentDoc) -> bool {
        let filter = self.clone().normalized();
        filter.locale.as_ref().map_or(true, |v| *v == doc.locale)
            && filter.status.as_ref().map_or(true, |v| *v == doc.status_id)
            && filter.subject_id.map_or(true, |v| v == doc.subject_id)
            && filter.microtopic_id.map_or(true, |v| v == doc.microtopic_id)
            && filter.author_id.as_ref().map_or(true, |v| *v == doc.author_id)
    }
}
