//! HTTP routes

pub mod api;
pub mod content;
pub mod content_status;
pub mod health;
pub mod post;

pub use api::{error_response, not_found_response, preflight_response, ApiRequest};
pub use content::{handle_content_request, CONTENT_PREFIX};
pub use content_status::{handle_content_status_request, CONTENT_STATUS_PREFIX};
pub use health::{health_check, version_info};
pub use post::{handle_post_request, POST_PREFIX};
