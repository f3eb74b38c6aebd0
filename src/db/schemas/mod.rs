//! Database schemas for the content service
//!
//! Defines MongoDB document structures for content, statuses, history and posts.

mod content;
mod content_history;
mod content_status;
mod metadata;
mod post;

pub use content::{ContentDoc, CONTENT_COLLECTION};
pub use content_history::{ContentHistoryDoc, CONTENT_HISTORY_COLLECTION};
pub use content_status::{ContentStatusDoc, CONTENT_STATUS_COLLECTION};
pub use metadata::Metadata;
pub use post::{PostDoc, POST_COLLECTION};
