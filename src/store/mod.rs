//! Persistence seams for the services
//!
//! Each store is a trait with a MongoDB implementation and an in-memory
//! implementation. The in-memory stores back dev mode and the unit tests.

pub mod content;
pub mod content_history;
pub mod content_status;
pub mod memory;
pub mod post;

pub use content::{ContentPatch, ContentStore, InMemoryContentStore, MongoContentStore};
pub use content_history::{
    ContentHistoryStore, InMemoryContentHistoryStore, MongoContentHistoryStore,
};
pub use content_status::{
    ContentStatusStore, InMemoryContentStatusStore, MongoContentStatusStore,
};
pub use memory::{MemoryCollection, StoredDoc};
pub use post::{InMemoryPostStore, MongoPostStore, PostStore};

use std::sync::Arc;

use crate::db::MongoClient;
use crate::types::Result;

/// One store per collection, shared by the services
#[derive(Clone)]
pub struct Stores {
    pub content: Arc<dyn ContentStore>,
    pub content_status: Arc<dyn ContentStatusStore>,
    pub content_history: Arc<dyn ContentHistoryStore>,
    pub post: Arc<dyn PostStore>,
}

impl Stores {
    /// MongoDB-backed stores; creates the collection indexes
    pub async fn mongo(mongo: &MongoClient) -> Result<Self> {
        Ok(Self {
            content: Arc::new(MongoContentStore::new(mongo).await?),
            content_status: Arc::new(MongoContentStatusStore::new(mongo).await?),
            content_history: Arc::new(MongoContentHistoryStore::new(mongo).await?),
            post: Arc::new(MongoPostStore::new(mongo).await?),
        })
    }

    /// Process-local stores, lost on exit
    pub fn in_memory() -> Self {
        Self {
            content: Arc::new(InMemoryContentStore::new()),
            content_status: Arc::new(InMemoryContentStatusStore::new()),
            content_history: Arc::new(InMemoryContentHistoryStore::new()),
            post: Arc::new(InMemoryPostStore::new()),
        }
    }
}
