//! Content status requests and read model

use serde::{Deserialize, Serialize};

use super::non_blank;
use crate::db::schemas::ContentStatusDoc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentStatus {
    pub id: String,
    pub name: String,
    pub is_removable: bool,
}

impl From<ContentStatusDoc> for ContentStatus {
    fn from(doc: ContentStatusDoc) -> Self {
        Self {
            id: doc._id.map(|id| id.to_hex()).unwrap_or_default(),
            name: doc.name,
            is_removable: doc.is_removable,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContentStatusRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_removable: bool,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UpdateContentStatusRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_removable: Option<bool>,
}

impl UpdateContentStatusRequest {
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            is_removable: self.is_removable,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_removable.is_none()
    }
}
