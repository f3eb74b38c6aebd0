//! Request shapes and read models exposed by the services

pub mod content;
pub mod content_history;
pub mod content_status;
pub mod pagination;
pub mod post;
pub mod remote;

pub use content::{
    AssignAuthorRequest, ChangeStatusRequest, Content, ContentFilter, CreateContentRequest,
    UpdateContentRequest,
};
pub use content_history::{ContentHistory, HistoryAction, NewContentHistory};
pub use content_status::{ContentStatus, CreateContentStatusRequest, UpdateContentStatusRequest};
pub use pagination::{Page, PageRequest, Pagination};
pub use post::{CreatePostRequest, Post, PostFilter, UpdatePostRequest};
pub use remote::{Microtopic, Subject, Translation};

use chrono::{DateTime, Utc};

/// Convert an optional BSON timestamp to chrono
pub(crate) fn to_utc(value: Option<bson::DateTime>) -> Option<DateTime<Utc>> {
    value.map(|dt| dt.to_chrono())
}

/// Treat blank strings as "not supplied"
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
