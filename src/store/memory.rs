//! In-memory document collection
//!
//! Keeps documents in insertion order and applies the same soft-delete
//! visibility rules as the MongoDB collection.

use bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::db::schemas::{ContentDoc, ContentHistoryDoc, ContentStatusDoc, Metadata, PostDoc};
use crate::db::mongo::parse_object_id;
use crate::db::MutMetadata;
use crate::models::PageRequest;
use crate::types::Result;

/// Document with an object id and metadata
pub trait StoredDoc: Clone + Send + Sync + MutMetadata {
    fn object_id(&self) -> Option<ObjectId>;
    fn set_object_id(&mut self, id: ObjectId);
    fn metadata(&self) -> &Metadata;
}

macro_rules! impl_stored_doc {
    ($($ty:ty),*) => {
        $(
            impl StoredDoc for $ty {
                fn object_id(&self) -> Option<ObjectId> {
                    self._id
                }

                fn set_object_id(&mut self, id: ObjectId) {
                    self._id = Some(id);
                }

                fn metadata(&self) -> &Metadata {
                    &self.metadata
                }
            }
        )*
    };
}

impl_stored_doc!(ContentDoc, ContentStatusDoc, ContentHistoryDoc, PostDoc);

/// Insertion-ordered collection guarded by an async RwLock
pub struct MemoryCollection<T: StoredDoc> {
    docs: RwLock<Vec<T>>,
}

impl<T: StoredDoc> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }
}

impl<T: StoredDoc> MemoryCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document under a fresh id
    pub async fn insert(&self, mut doc: T) -> ObjectId {
        let id = ObjectId::new();
        doc.set_object_id(id);
        *doc.mut_metadata() = Metadata::new();
        self.docs.write().await.push(doc);
        id
    }

    /// Find a live document by hex id
    pub async fn find(&self, id: &str) -> Result<Option<T>> {
        let oid = parse_object_id(id)?;
        Ok(self
            .docs
            .read()
            .await
            .iter()
            .find(|d| d.object_id() == Some(oid) && d.metadata().is_live())
            .cloned())
    }

    /// Find the first live document matching the predicate
    pub async fn find_where(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.docs
            .read()
            .await
            .iter()
            .find(|d| d.metadata().is_live() && pred(d))
            .cloned()
    }

    /// All live documents matching the predicate, in insertion order
    pub async fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.docs
            .read()
            .await
            .iter()
            .filter(|d| d.metadata().is_live() && pred(d))
            .cloned()
            .collect()
    }

    pub async fn count(&self, pred: impl Fn(&T) -> bool) -> u64 {
        self.docs
            .read()
            .await
            .iter()
            .filter(|d| d.metadata().is_live() && pred(d))
            .count() as u64
    }

    /// One page of live documents matching the predicate
    pub async fn page(&self, pred: impl Fn(&T) -> bool, page: PageRequest) -> Vec<T> {
        self.docs
            .read()
            .await
            .iter()
            .filter(|d| d.metadata().is_live() && pred(d))
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect()
    }

    /// Mutate a live document in place, stamping `updated_at`.
    /// Returns false when no live document has the id.
    pub async fn modify(&self, id: &str, f: impl FnOnce(&mut T)) -> Result<bool> {
        let oid = parse_object_id(id)?;
        let mut docs = self.docs.write().await;
        match docs
            .iter_mut()
            .find(|d| d.object_id() == Some(oid) && d.metadata().is_live())
        {
            Some(doc) => {
                f(doc);
                doc.mut_metadata().touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Soft-delete a live document
    pub async fn soft_delete(&self, id: &str) -> Result<bool> {
        let oid = parse_object_id(id)?;
        let mut docs = self.docs.write().await;
        match docs
            .iter_mut()
            .find(|d| d.object_id() == Some(oid) && d.metadata().is_live())
        {
            Some(doc) => {
                doc.mut_metadata().mark_deleted();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Physically remove a document
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let oid = parse_object_id(id)?;
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|d| d.object_id() != Some(oid));
        Ok(docs.len() != before)
    }

    /// Raw view including soft-deleted documents
    pub async fn all(&self) -> Vec<T> {
        self.docs.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(content_id: &str) -> PostDoc {
        PostDoc {
            content_id: content_id.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let coll = MemoryCollection::new();
        let id = coll.insert(post("c1")).await;
        let found = coll.find(&id.to_hex()).await.unwrap().unwrap();
        assert_eq!(found.content_id, "c1");
        assert!(found.metadata.created_at.is_some());
    }

    #[tokio::test]
    async fn test_soft_deleted_hidden() {
        let coll = MemoryCollection::new();
        let id = coll.insert(post("c1")).await.to_hex();
        assert!(coll.soft_delete(&id).await.unwrap());
        assert!(coll.find(&id).await.unwrap().is_none());
        assert!(!coll.soft_delete(&id).await.unwrap());
        assert!(!coll.modify(&id, |_| {}).await.unwrap());
        assert_eq!(coll.count(|_| true).await, 0);
        assert_eq!(coll.all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_page_in_insertion_order() {
        let coll = MemoryCollection::new();
        for i in 0..5 {
            coll.insert(post(&format!("c{i}"))).await;
        }
        let page = coll
            .page(|_| true, PageRequest { limit: 2, offset: 1 })
            .await;
        let ids: Vec<_> = page.iter().map(|p| p.content_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let coll: MemoryCollection<PostDoc> = MemoryCollection::new();
        assert!(coll.find("xyz").await.is_err());
    }

    #[tokio::test]
    async fn test_remove() {
        let coll = MemoryCollection::new();
        let id = coll.insert(post("c1")).await.to_hex();
        assert!(coll.remove(&id).await.unwrap());
        assert!(!coll.remove(&id).await.unwrap());
        assert!(coll.all().await.is_empty());
    }
}
