//! Entities owned by the remote subject service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Localized name of a remote entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(rename = "translationId", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub name: String,
}

/// Subject as returned by `subjects.GetById`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    #[serde(default)]
    pub program_id: i64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub translations: Vec<Translation>,
}

/// Microtopic as returned by `microtopics.GetById`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Microtopic {
    pub id: i64,
    #[serde(default)]
    pub subject_id: i64,
    #[serde(default)]
    pub section_id: i64,
    #[serde(default)]
    pub objective_id: i64,
    #[serde(default)]
    pub quarter: i8,
    #[serde(default)]
    pub grade_id: i64,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_from_remote_json() {
        let json = r#"{
            "id": 1,
            "program_id": 3,
            "image_url": "https://img",
            "icon_url": "",
            "createdAt": "2024-01-02T03:04:05Z",
            "updatedAt": "2024-01-02T03:04:05Z",
            "translations": [{"translationId": 9, "locale": "en", "name": "Math"}]
        }"#;
        let subject: Subject = serde_json::from_str(json).unwrap();
        assert_eq!(subject.id, 1);
        assert_eq!(subject.program_id, 3);
        assert_eq!(subject.translations[0].name, "Math");
        assert!(subject.created_at.is_some());
    }

    #[test]
    fn test_microtopic_tolerates_sparse_payload() {
        let microtopic: Microtopic = serde_json::from_str(r#"{"id": 2, "quarter": 3}"#).unwrap();
        assert_eq!(microtopic.id, 2);
        assert_eq!(microtopic.quarter, 3);
        assert!(microtopic.translations.is_empty());
    }
}
