//! Post store with soft delete

use async_trait::async_trait;
use bson::{doc, Bson, Document};

use crate::db::mongo::parse_object_id;
use crate::db::schemas::{PostDoc, POST_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::models::{PageRequest, PostFilter, UpdatePostRequest};
use crate::store::MemoryCollection;
use crate::types::{ContentServiceError, Result};

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, doc: PostDoc) -> Result<String>;

    async fn find_by_id(&self, id: &str) -> Result<PostDoc>;

    async fn update(&self, id: &str, patch: &UpdatePostRequest) -> Result<()>;

    async fn soft_delete(&self, id: &str) -> Result<()>;

    async fn count(&self, filter: &PostFilter) -> Result<u64>;

    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Vec<PostDoc>>;
}

fn not_found() -> ContentServiceError {
    ContentServiceError::NotFound("post".to_string())
}

fn patch_document(patch: &UpdatePostRequest) -> Document {
    let mut set = Document::new();
    if let Some(ref category) = patch.category {
        set.insert("category", category.clone());
    }
    if let Some(ref description) = patch.description {
        set.insert("description", description.clone());
    }
    if let Some(ref resources) = patch.resources {
        set.insert(
            "resources",
            resources.iter().cloned().map(Bson::String).collect::<Vec<_>>(),
        );
    }
    set
}

fn filter_document(filter: &PostFilter) -> Document {
    match filter.content_id.as_deref().map(str::trim) {
        None | Some("") => doc! {},
        Some(id) => doc! { "content_id": id },
    }
}

pub struct MongoPostStore {
    collection: MongoCollection<PostDoc>,
}

impl MongoPostStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        Ok(Self {
            collection: mongo.collection(POST_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn insert(&self, doc: PostDoc) -> Result<String> {
        Ok(self.collection.insert_one(doc).await?.to_hex())
    }

    async fn find_by_id(&self, id: &str) -> Result<PostDoc> {
        let oid = parse_object_id(id)?;
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .ok_or_else(not_found)
    }

    async fn update(&self, id: &str, patch: &UpdatePostRequest) -> Result<()> {
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

    async fn soft_delete(&self, id: &str) -> Result<()> {
        let oid = parse_object_id(id)?;
        let result = self.collection.soft_delete(doc! { "_id": oid }).await?;
        if result.modified_count == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64> {
        self.collection.count(filter_document(filter)).await
    }

    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Vec<PostDoc>> {
        self.collection
            .find_page(filter_document(filter), page.limit, page.offset)
            .await
    }
}

#[derive(Default)]
pub struct InMemoryPostStore {
    docs: MemoryCollection<PostDoc>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, doc: PostDoc) -> Result<String> {
        Ok(self.docs.insert(doc).await.to_hex())
    }

    async fn find_by_id(&self, id: &str) -> Result<PostDoc> {
        self.docs.find(id).await?.ok_or_else(not_found)
    }

    async fn update(&self, id: &str, patch: &UpdatePostRequest) -> Result<()> {
        let updated = self
            .docs
            .modify(id, |doc| {
                if let Some(ref category) = patch.category {
                    doc.category = category.clone();
                }
                if let Some(ref description) = patch.description {
                    doc.description = description.clone();
                }
                if let Some(ref resources) = patch.resources {
                    doc.resources = resources.clone();
                }
            })
            .await?;
        if updated {
            Ok(())
        } else {
            Err(not_found())
        }
    }

    async fn soft_delete(&self, id: &str) -> Result<()> {
        if self.docs.soft_delete(id).await? {
            Ok(())
        } else {
            Err(not_found())
        }
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64> {
        Ok(self.docs.count(|d| filter.matches(d)).await)
    }

    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Vec<PostDoc>> {
        Ok(self.docs.page(|d| filter.matches(d), page).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(content_id: &str) -> PostDoc {
        PostDoc {
            category: "news".into(),
            content_id: content_id.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_document() {
        assert_eq!(filter_document(&PostFilter::default()), doc! {});
        let filter = PostFilter {
            content_id: Some("c1".into()),
        };
        assert_eq!(filter_document(&filter), doc! { "content_id": "c1" });
    }

    #[tokio::test]
    async fn test_update_keeps_unsupplied_fields() {
        let store = InMemoryPostStore::new();
        let id = store.insert(post("c1")).await.unwrap();
        let patch = UpdatePostRequest {
            description: Some("updated".into()),
            ..Default::default()
        };
        store.update(&id, &patch).await.unwrap();

        let doc = store.find_by_id(&id).await.unwrap();
        assert_eq!(doc.category, "news");
        assert_eq!(doc.description, "updated");
    }

    #[tokio::test]
    async fn test_list_by_content() {
        let store = InMemoryPostStore::new();
        store.insert(post("c1")).await.unwrap();
        store.insert(post("c2")).await.unwrap();
        let gone = store.insert(post("c1")).await.unwrap();
        store.soft_delete(&gone).await.unwrap();

        let filter = PostFilter {
            content_id: Some("c1".into()),
        };
        assert_eq!(store.count(&filter).await.unwrap(), 1);
        assert_eq!(
            store.list(&filter, PageRequest::default()).await.unwrap().len(),
            1
        );
        assert_eq!(store.count(&PostFilter::default()).await.unwrap(), 2);
    }
}
