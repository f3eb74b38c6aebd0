//! Append-only history store

use async_trait::async_trait;
use bson::doc;

use crate::db::schemas::{ContentHistoryDoc, CONTENT_HISTORY_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::store::MemoryCollection;
use crate::types::Result;

#[async_trait]
pub trait ContentHistoryStore: Send + Sync {
    /// Persist one record as supplied
    async fn insert(&self, doc: ContentHistoryDoc) -> Result<String>;

    /// Records for one content item, oldest first
    async fn list_by_content(&self, content_id: &str) -> Result<Vec<ContentHistoryDoc>>;
}

pub struct MongoContentHistoryStore {
    collection: MongoCollection<ContentHistoryDoc>,
}

impl MongoContentHistoryStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        Ok(Self {
            collection: mongo.collection(CONTENT_HISTORY_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl ContentHistoryStore for MongoContentHistoryStore {
    async fn insert(&self, doc: ContentHistoryDoc) -> Result<String> {
        Ok(self.collection.insert_one(doc).await?.to_hex())
    }

    async fn list_by_content(&self, content_id: &str) -> Result<Vec<ContentHistoryDoc>> {
        self.collection
            .find_sorted(
                doc! { "content_id": content_id },
                doc! { "metadata.created_at": 1, "_id": 1 },
            )
            .await
    }
}

#[derive(Default)]
pub struct InMemoryContentHistoryStore {
    docs: MemoryCollection<ContentHistoryDoc>,
}

impl InMemoryContentHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn raw(&self) -> Vec<ContentHistoryDoc> {
        self.docs.all().await
    }
}

#[async_trait]
impl ContentHistoryStore for InMemoryContentHistoryStore {
    async fn insert(&self, doc: ContentHistoryDoc) -> Result<String> {
        Ok(self.docs.insert(doc).await.to_hex())
    }

    async fn list_by_content(&self, content_id: &str) -> Result<Vec<ContentHistoryDoc>> {
        Ok(self.docs.filter(|d| d.content_id == content_id).await)
    }
}
