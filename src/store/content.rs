//! Content store: insert, lookup, sparse update, soft delete and filtered pages

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use tracing::debug;

use crate::db::mongo::parse_object_id;
use crate::db::schemas::{ContentDoc, CONTENT_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::models::{ContentFilter, PageRequest, UpdateContentRequest};
use crate::store::MemoryCollection;
use crate::types::{ContentServiceError, Result};

/// Fields to `$set` on a content document. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentPatch {
    pub body: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<i32>,
    pub resources: Option<Vec<String>>,
    pub author_id: Option<String>,
    pub status_id: Option<String>,
}

impl ContentPatch {
    pub fn author(author_id: Option<String>) -> Self {
        Self {
            author_id,
            ..Default::default()
        }
    }

    pub fn status(status_id: Option<String>) -> Self {
        Self {
            status_id,
            ..Default::default()
        }
    }

    /// `$set` document; the collection adds `metadata.updated_at`
    pub fn to_document(&self) -> Document {
        let mut set = Document::new();
        if let Some(ref body) = self.body {
            set.insert("body", body.clone());
        }
        if let Some(ref description) = self.description {
            set.insert("description", description.clone());
        }
        if let Some(difficulty) = self.difficulty {
            set.insert("difficulty", difficulty);
        }
        if let Some(ref resources) = self.resources {
            set.insert(
                "resources",
                resources.iter().cloned().map(Bson::String).collect::<Vec<_>>(),
            );
        }
        if let Some(ref author_id) = self.author_id {
            set.insert("author_id", author_id.clone());
        }
        if let Some(ref status_id) = self.status_id {
            set.insert("status_id", status_id.clone());
        }
        set
    }

    /// Apply the patch to an in-memory document
    pub fn apply(&self, doc: &mut ContentDoc) {
        if let Some(ref body) = self.body {
            doc.body = body.clone();
        }
        if let Some(ref description) = self.description {
            doc.description = description.clone();
        }
        if let Some(difficulty) = self.difficulty {
            doc.difficulty = difficulty;
        }
        if let Some(ref resources) = self.resources {
            doc.resources = resources.clone();
        }
        if let Some(ref author_id) = self.author_id {
            doc.author_id = author_id.clone();
        }
        if let Some(ref status_id) = self.status_id {
            doc.status_id = status_id.clone();
        }
    }
}

impl From<UpdateContentRequest> for ContentPatch {
    fn from(req: UpdateContentRequest) -> Self {
        let req = req.normalized();
        Self {
            body: req.body,
            description: req.description,
            difficulty: req.difficulty,
            resources: req.resources,
            author_id: None,
            status_id: None,
        }
    }
}

/// Exact-match filter document over the stored field names
pub fn filter_document(filter: &ContentFilter) -> Document {
    let filter = filter.clone().normalized();
    let mut query = Document::new();
    if let Some(locale) = filter.locale {
        query.insert("locale", locale);
    }
    if let Some(status) = filter.status {
        query.insert("status_id", status);
    }
    if let Some(subject_id) = filter.subject_id {
        query.insert("subject_id", subject_id);
    }
    if let Some(microtopic_id) = filter.microtopic_id {
        query.insert("microtopic_id", microtopic_id);
    }
    if let Some(author_id) = filter.author_id {
        query.insert("author_id", author_id);
    }
    query
}

/// Persistence contract consumed by the content service
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a new document, returning its identifier
    async fn insert(&self, doc: ContentDoc) -> Result<String>;

    /// Fetch a live document; missing or soft-deleted is `NotFound`
    async fn find_by_id(&self, id: &str) -> Result<ContentDoc>;

    /// Apply a sparse patch and stamp `updated_at`
    async fn update(&self, id: &str, patch: &ContentPatch) -> Result<()>;

    /// Mark the document deleted
    async fn soft_delete(&self, id: &str) -> Result<()>;

    /// Count live documents matching the filter
    async fn count(&self, filter: &ContentFilter) -> Result<u64>;

    /// One page of live documents matching the filter
    async fn list(&self, filter: &ContentFilter, page: PageRequest) -> Result<Vec<ContentDoc>>;
}

fn not_found() -> ContentServiceError {
    ContentServiceError::NotFound("content".to_string())
}

/// MongoDB-backed content store
pub struct MongoContentStore {
    collection: MongoCollection<ContentDoc>,
}

impl MongoContentStore {
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        Ok(Self {
            collection: mongo.collection(CONTENT_COLLECTION).await?,
        })
    }
}

#[async_trait]
impl ContentStore for MongoContentStore {
    async fn insert(&self, doc: ContentDoc) -> Result<String> {
        let id = self.collection.insert_one(doc).await?;
        Ok(id.to_hex())
    }

    async fn find_by_id(&self, id: &str) -> Result<ContentDoc> {
        let oid = parse_object_id(id)?;
        self.collection
            .find_one(doc! { "_id": oid })
            .await?
            .ok_or_else(not_found)
    }

    async fn update(&self, id: &str, patch: &ContentPatch) -> Result<()> {
        let oid = parse_object_id(id)?;
        let result = self
            .collection
            .set_fields(doc! { "_id": oid }, patch.to_document())
            .await?;
        if result.matched_count == 0 {
            return Err(not_found());
        }
        debug!(content_id = %id, "Content updated");
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

    async fn count(&self, filter: &ContentFilter) -> Result<u64> {
        self.collection.count(filter_document(filter)).await
    }

    async fn list(&self, filter: &ContentFilter, page: PageRequest) -> Result<Vec<ContentDoc>> {
        self.collection
            .find_page(filter_document(filter), page.limit, page.offset)
            .await
    }
}

/// In-memory content store
#[derive(Default)]
pub struct InMemoryContentStore {
    docs: MemoryCollection<ContentDoc>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored document, soft-deleted ones included
    pub async fn raw(&self) -> Vec<ContentDoc> {
        self.docs.all().await
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn insert(&self, doc: ContentDoc) -> Result<String> {
        Ok(self.docs.insert(doc).await.to_hex())
    }

    async fn find_by_id(&self, id: &str) -> Result<ContentDoc> {
        self.docs.find(id).await?.ok_or_else(not_found)
    }

    async fn update(&self, id: &str, patch: &ContentPatch) -> Result<()> {
        if self.docs.modify(id, |doc| patch.apply(doc)).await? {
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

    async fn count(&self, filter: &ContentFilter) -> Result<u64> {
        Ok(self.docs.count(|doc| filter.matches(doc)).await)
    }

    async fn list(&self, filter: &ContentFilter, page: PageRequest) -> Result<Vec<ContentDoc>> {
        Ok(self.docs.page(|doc| filter.matches(doc), page).await)
    }
}
