//! Content status store. Updates and deletes are physical.

use async_trait::async_trait;
use bson::{doc, Document};

use crate::db::mongo::parse_object_id;
use crate::db::schemas::{ContentStatusDoc, CONTENT_STATUS_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::models::{PageRequest, UpdateContentStatusRequest};
use crate::store::MemoryCollection;
use crate::types::{ContentServiceError, Result};

#[async_trait]
pub trait ContentStatusStore: Send + Sync {
    async fn insert(&self, doc: ContentStatusDoc) -> Result<String>;

    async fn find_by_id(&self, id: &str) -> Result<ContentStatusDoc>;

    /// Name-keyed lookup used for "draft" and status-change targets
    async fn find_by_name(&self, name: &str) -> Result<Option<ContentStatusDoc>>;

    async fn update(&self, id: &str, patch: &UpdateContentStatusRequest) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn count(&self) -> Result<u64>;

    async fn list(&self, page: PageRequest) -> Result<Vec<ContentStatusDoc>>;
}

fn not_found() -> ContentServiceError {
    ContentServiceError::NotFound("content status".to_string())
}

fn patch_document(patch: &UpdateContentStatusRequest) -> Document {
    let mut set = Document::new();
    if let Some(ref name) = patch.name {
        set.insert("name", name.clone());
    }
    if let Some(is_removable) = patch.is_removable {
        set.insert("is_removable", is_removable);
    }
    set
}

pub struct MongoContentStatusStore {
    collection: MongoCollection<ContentStatusDoc>,
}

impl MongoContentStatusStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        Ok(Self {
            collection: mongo.collection(CONTENT_STATUS_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl ContentStatusStore for MongoContentStatusStore {
    async fn insert(&self, doc: ContentStatusDoc) -> Result<String> {
        Ok(self.collection.insert_one(doc).await?.to_hex())
    }

    async fn find_by_id(&self, id: &str) -> Result<ContentStatusDoc> {
        let oid = parse_object_id(id)?;
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .ok_or_else(not_found)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ContentStatusDoc>> {
        self.collection.find_one(doc! { "name": name }).await
    }

    async fn update(&self, id: &str, patch: &UpdateContentStatusRequest) -> Result<()> {
        let oid = parse_object_id(id)?;
        let result = self
            .collection
            .set_fields(doc! { "_id": oid }, patch_document(patch))
            .await?;
        if result.matched_count == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let oid = parse_object_id(id)?;
        let result = self.collection.delete_one(doc! { "_id": oid }).await?;
        if result.deleted_count == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        self.collection.count(doc! {}).await
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<ContentStatusDoc>> {
        self.collection
            .find_page(doc! {}, page.limit, page.offset)
            .await
    }
}

#[derive(Default)]
pub struct InMemoryContentStatusStore {
    docs: MemoryCollection<ContentStatusDoc>,
}

impl InMemoryContentStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStatusStore for InMemoryContentStatusStore {
    async fn insert(&self, doc: ContentStatusDoc) -> Result<String> {
        if self.find_by_name(&doc.name).await?.is_some() {
            return Err(ContentServiceError::Database(format!(
                "duplicate content status name: {}",
                doc.name
            )));
        }
        Ok(self.docs.insert(doc).await.to_hex())
    }

    async fn find_by_id(&self, id: &str) -> Result<ContentStatusDoc> {
        self.docs.find(id).await?.ok_or_else(not_found)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ContentStatusDoc>> {
        Ok(self.docs.find_where(|d| d.name == name).await)
    }

    async fn update(&self, id: &str, patch: &UpdateContentStatusRequest) -> Result<()> {
        let updated = self
            .docs
            .modify(id, |doc| {
                if let Some(ref name) = patch.name {
                    doc.name = name.clone();
                }
                if let Some(is_removable) = patch.is_removable {
                    doc.is_removable = is_removable;
                }
            })
            .await?;
        if updated {
            Ok(())
        } else {
            Err(not_found())
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        if self.docs.remove(id).await? {
            Ok(())
        } else {
            Err(not_found())
        }
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.docs.count(|_| true).await)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<ContentStatusDoc>> {
        Ok(self.docs.page(|_| true, page).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_document() {
        let patch = UpdateContentStatusRequest {
            name: None,
            is_removable: Some(false),
        };
        assert_eq!(patch_document(&patch), doc! { "is_removable": false });
    }

    #[tokio::test]
    async fn test_find_by_name_and_hard_delete() {
        let store = InMemoryContentStatusStore::new();
        let id = store
            .insert(ContentStatusDoc::new("draft".into(), true))
            .await
            .unwrap();

        let found = store.find_by_name("draft").await.unwrap().unwrap();
        assert!(found.is_removable);
        assert!(store.find_by_name("published").await.unwrap().is_none());

        store.delete(&id).await.unwrap();
        assert!(store.find_by_name("draft").await.unwrap().is_none());
        assert!(matches!(
            store.delete(&id).await,
            Err(ContentServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let store = InMemoryContentStatusStore::new();
        store
            .insert(ContentStatusDoc::new("draft".into(), true))
            .await
            .unwrap();
        assert!(store
            .insert(ContentStatusDoc::new("draft".into(), false))
            .await
            .is_err());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update() {
        let store = InMemoryContentStatusStore::new();
        let id = store
            .insert(ContentStatusDoc::new("review".into(), true))
            .await
            .unwrap();
        let patch = UpdateContentStatusRequest {
            name: Some("in_review".into()),
            is_removable: None,
        };
        store.update(&id, &patch).await.unwrap();

        let doc = store.find_by_id(&id).await.unwrap();
        assert_eq!(doc.name, "in_review");
        assert!(doc.is_removable);
    }
}
