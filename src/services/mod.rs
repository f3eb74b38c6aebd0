//! Services layer
//!
//! Business logic coordinating the stores and the remote lookup.
//!
//! ## Services
//!
//! - **Content**: orchestrates validation, persistence and audit for content
//! - **ContentStatus**: named statuses with a removable flag
//! - **ContentHistory**: append-only audit sink
//! - **Post**: posts attached to a content item
//! - **Lookup**: remote Subject/Microtopic resolution over NATS

pub mod content;
pub mod content_history;
pub mod content_status;
pub mod lookup;
pub mod post;

pub use content::ContentService;
pub use content_history::ContentHistoryService;
pub use content_status::{ContentStatusService, DEFAULT_STATUSES, DRAFT_STATUS};
pub use lookup::{EntityLookup, NatsEntityLookup};
pub use post::PostService;
