//! MongoDB client and collection wrapper
//!
//! Reads never return soft-deleted documents; writes stamp metadata timestamps.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::{
    options::{FindOptions, IndexOptions},
    results::{DeleteResult, UpdateResult},
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, info};

use crate::db::schemas::Metadata;
use crate::types::ContentServiceError;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Trait for schemas with mutable metadata
pub trait MutMetadata {
    fn mut_metadata(&mut self) -> &mut Metadata;
}

/// Filter fragment that excludes soft-deleted documents
pub fn live_filter(mut filter: Document) -> Document {
    filter.insert("metadata.is_deleted", doc! { "$ne": true });
    filter
}

/// Parse a hex object id, reporting malformed ids as validation failures
pub fn parse_object_id(id: &str) -> Result<ObjectId, ContentServiceError> {
    ObjectId::parse_str(id)
        .map_err(|_| ContentServiceError::Validation(format!("invalid id: {id}")))
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a new MongoDB client
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, ContentServiceError> {
        info!("Connecting to MongoDB at {}", uri);

        // Fail fast on an unreachable server instead of hanging on selection
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri).await.map_err(|e| {
            ContentServiceError::Database(format!("Failed to connect to MongoDB: {}", e))
        })?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ContentServiceError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>, ContentServiceError>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + Default + IntoIndexes + MutMetadata,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + Default + IntoIndexes + MutMetadata,
{
    /// Create a new collection and apply indexes
    pub async fn new(
        client: &Client,
        db_name: &str,
        collection_name: &str,
    ) -> Result<Self, ContentServiceError> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    /// Apply schema-defined indexes
    async fn apply_indexes(&self) -> Result<(), ContentServiceError> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| ContentServiceError::Database(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Insert a document, setting metadata timestamps
    pub async fn insert_one(&self, mut item: T) -> Result<ObjectId, ContentServiceError> {
        *item.mut_metadata() = Metadata::new();

        let result = self
            .inner
            .insert_one(item)
            .await
            .map_err(|e| ContentServiceError::Database(format!("Insert failed: {}", e)))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| ContentServiceError::Database("Failed to get inserted ID".into()))
    }

    /// Find one live document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>, ContentServiceError> {
        self.inner
            .find_one(live_filter(filter))
            .await
            .map_err(|e| ContentServiceError::Database(format!("Find failed: {}", e)))
    }

    /// Count live documents matching the filter
    pub async fn count(&self, filter: Document) -> Result<u64, ContentServiceError> {
        self.inner
            .count_documents(live_filter(filter))
            .await
            .map_err(|e| ContentServiceError::Database(format!("Count failed: {}", e)))
    }

    /// Find a page of live documents in insertion order
    pub async fn find_page(
        &self,
        filter: Document,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<T>, ContentServiceError> {
        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(offset)
            .limit(limit as i64)
            .build();

        self.find_with_options(filter, options).await
    }

    /// Find all live documents matching the filter, sorted
    pub async fn find_sorted(
        &self,
        filter: Document,
        sort: Document,
    ) -> Result<Vec<T>, ContentServiceError> {
        let options = FindOptions::builder().sort(sort).build();
        self.find_with_options(filter, options).await
    }

    async fn find_with_options(
        &self,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<T>, ContentServiceError> {
        use futures_util::TryStreamExt;

        let cursor = self
            .inner
            .find(live_filter(filter))
            .with_options(options)
            .await
            .map_err(|e| ContentServiceError::Database(format!("Find failed: {}", e)))?;

        cursor.try_collect().await.map_err(|e| {
            error!("Error reading document: {}", e);
            ContentServiceError::Database(format!("Cursor failed: {}", e))
        })
    }

    /// `$set` the given fields on one live document, stamping `metadata.updated_at`
    pub async fn set_fields(
        &self,
        filter: Document,
        mut fields: Document,
    ) -> Result<UpdateResult, ContentServiceError> {
        fields.insert("metadata.updated_at", DateTime::now());

        self.inner
            .update_one(live_filter(filter), doc! { "$set": fields })
            .await
            .map_err(|e| ContentServiceError::Database(format!("Update failed: {}", e)))
    }

    /// Soft delete a live document
    pub async fn soft_delete(&self, filter: Document) -> Result<UpdateResult, ContentServiceError> {
        let now = DateTime::now();
        let update = doc! {
            "$set": {
                "metadata.is_deleted": true,
                "metadata.deleted_at": now,
                "metadata.updated_at": now,
            }
        };

        self.inner
            .update_one(live_filter(filter), update)
            .await
            .map_err(|e| ContentServiceError::Database(format!("Soft delete failed: {}", e)))
    }

    /// Physically remove a document
    pub async fn delete_one(&self, filter: Document) -> Result<DeleteResult, ContentServiceError> {
        self.inner
            .delete_one(filter)
            .await
            .map_err(|e| ContentServiceError::Database(format!("Delete failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    // Collection round trips need a running MongoDB instance
    use super::*;

    #[test]
    fn test_live_filter_excludes_deleted() {
        let filter = live_filter(doc! { "locale": "en" });
        assert_eq!(filter.get_str("locale").unwrap(), "en");
        assert_eq!(
            filter.get_document("metadata.is_deleted").unwrap(),
            &doc! { "$ne": true }
        );
    }

    #[test]
    fn test_parse_object_id() {
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex()).unwrap(), oid);
        assert!(matches!(
            parse_object_id("not-an-id"),
            Err(ContentServiceError::Validation(_))
        ));
    }
}
