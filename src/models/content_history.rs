//! Audit history records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::to_utc;
use crate::db::schemas::{ContentHistoryDoc, Metadata};

/// Mutation kinds recorded by the content service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Create,
    Update,
    AssignAuthor,
    Delete,
    ChangeStatus,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Create => "create",
            HistoryAction::Update => "update",
            HistoryAction::AssignAuthor => "assign_author",
            HistoryAction::Delete => "delete",
            HistoryAction::ChangeStatus => "change_status",
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record handed to the history service. The action is stored as given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewContentHistory {
    pub content_id: String,
    pub user_id: String,
    pub action: String,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
}

impl NewContentHistory {
    pub fn new(content_id: impl Into<String>, user_id: impl Into<String>, action: HistoryAction) -> Self {
        Self {
            content_id: content_id.into(),
            user_id: user_id.into(),
            action: action.as_str().to_string(),
            previous_value: None,
            new_value: None,
        }
    }

    pub fn with_values(mut self, previous: Option<String>, new: Option<String>) -> Self {
        self.previous_value = previous;
        self.new_value = new;
        self
    }

    pub fn into_doc(self) -> ContentHistoryDoc {
        ContentHistoryDoc {
            _id: None,
            metadata: Metadata::new(),
            content_id: self.content_id,
            user_id: self.user_id,
            action: self.action,
            previous_value: self.previous_value,
            new_value: self.new_value,
        }
    }
}

/// Stored audit record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentHistory {
    pub id: String,
    pub content_id: String,
    pub user_id: String,
    pub action: String,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ContentHistoryDoc> for ContentHistory {
    fn from(doc: ContentHistoryDoc) -> Self {
        Self {
            id: doc._id.map(|id| id.to_hex()).unwrap_or_default(),
            content_id: doc.content_id,
            user_id: doc.user_id,
            action: doc.action,
            previous_value: doc.previous_value,
            new_value: doc.new_value,
            created_at: to_utc(doc.metadata.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tags() {
        assert_eq!(HistoryAction::AssignAuthor.as_str(), "assign_author");
        assert_eq!(HistoryAction::ChangeStatus.to_string(), "change_status");
        assert_eq!(
            serde_json::to_string(&HistoryAction::Delete).unwrap(),
            "\"delete\""
        );
    }

    #[test]
    fn test_new_record() {
        let record = NewContentHistory::new("c1", "u1", HistoryAction::Create)
            .with_values(None, Some("draft".into()));
        assert_eq!(record.action, "create");
        let doc = record.into_doc();
        assert_eq!(doc.new_value.as_deref(), Some("draft"));
        assert!(doc.metadata.created_at.is_some());
    }
}
