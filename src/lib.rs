//! Content service - lifecycle orchestration for educational content
//!
//! Content items are validated against a remote subject service over NATS,
//! stored in MongoDB with soft delete, and every mutation is recorded in an
//! append-only history.
//!
//! ## Services
//!
//! - **Content**: create, read, update, assign author, change status, delete, list
//! - **ContentStatus**: named statuses with a removable flag
//! - **ContentHistory**: one audit record per completed content mutation
//! - **Post**: posts attached to a content item

pub mod config;
pub mod db;
pub mod models;
pub mod nats;
pub mod routes;
pub mod server;
pub mod services;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{ContentServiceError, Result};
