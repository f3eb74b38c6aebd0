//! Content status CRUD plus name-keyed lookup

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::db::schemas::ContentStatusDoc;
use crate::models::{
    ContentStatus, CreateContentStatusRequest, Page, PageRequest, Pagination,
    UpdateContentStatusRequest,
};
use crate::store::ContentStatusStore;
use crate::types::{ContentServiceError, Result};

/// Status every new content item starts in
pub const DRAFT_STATUS: &str = "draft";

/// Statuses ensured on startup: (name, is_removable)
pub const DEFAULT_STATUSES: &[(&str, bool)] =
    &[(DRAFT_STATUS, true), ("published", false), ("archived", true)];

pub struct ContentStatusService {
    store: Arc<dyn ContentStatusStore>,
}

impl ContentStatusService {
    pub fn new(store: Arc<dyn ContentStatusStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, req: CreateContentStatusRequest) -> Result<String> {
        let name = req.name.trim().to_string();
        if name.is_empty() {
            return Err(ContentServiceError::Validation(
                "content status name is required".to_string(),
            ));
        }
        if self.store.find_by_name(&name).await?.is_some() {
            warn!(name = %name, "Content status already exists");
            return Err(ContentServiceError::Validation(
                "content status already exists".to_string(),
            ));
        }

        let id = self
            .store
            .insert(ContentStatusDoc::new(name.clone(), req.is_removable))
            .await?;
        info!(status_id = %id, name = %name, "Content status created");
        Ok(id)
    }

    pub async fn get_one(&self, id: &str) -> Result<ContentStatus> {
        self.store.find_by_id(id).await.map(ContentStatus::from)
    }

    /// `Ok(None)` when no status carries the name
    pub async fn get_by_name(&self, name: &str) -> Result<Option<ContentStatus>> {
        Ok(self
            .store
            .find_by_name(name)
            .await?
            .map(ContentStatus::from))
    }

    pub async fn update(&self, id: &str, req: UpdateContentStatusRequest) -> Result<()> {
        let patch = req.normalized();
        if let Some(ref name) = patch.name {
            if let Some(existing) = self.store.find_by_name(name).await? {
                if existing._id.map(|oid| oid.to_hex()).as_deref() != Some(id) {
                    warn!(status_id = %id, name = %name, "Content status name taken");
                    return Err(ContentServiceError::Validation(
                        "content status already exists".to_string(),
                    ));
                }
            }
        }
        if patch.is_empty() {
            // Nothing to set; still report a missing record
            self.store.find_by_id(id).await?;
            return Ok(());
        }
        self.store.update(id, &patch).await?;
        info!(status_id = %id, "Content status updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(id).await?;
        info!(status_id = %id, "Content status deleted");
        Ok(())
    }

    pub async fn get_list(&self, page: PageRequest) -> Result<Page<ContentStatus>> {
        let total = self.store.count().await?;
        let docs = self.store.list(page).await?;
        Ok(Page {
            items: docs.into_iter().map(ContentStatus::from).collect(),
            pagination: Pagination::new(total, page),
        })
    }

    /// Insert any missing default status. Existing ones are left as they are.
    pub async fn seed_defaults(&self) -> Result<usize> {
        let mut created = 0;
        for (name, is_removable) in DEFAULT_STATUSES {
            if self.store.find_by_name(name).await?.is_some() {
                debug!(name = %name, "Default status present");
                continue;
            }
            self.store
                .insert(ContentStatusDoc::new(name.to_string(), *is_removable))
                .await?;
            created += 1;
        }
        if created > 0 {
            info!(created, "Seeded default content statuses");
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryContentStatusStore;
    use tokio_test::assert_ok;

    fn service() -> ContentStatusService {
        ContentStatusService::new(Arc::new(InMemoryContentStatusStore::new()))
    }

    fn create_req(name: &str, is_removable: bool) -> CreateContentStatusRequest {
        CreateContentStatusRequest {
            name: name.to_string(),
            is_removable,
        }
    }

    #[tokio::test]
    async fn test_create_validates_name() {
        let service = service();
        assert_ok!(service.create(create_req("draft", true)).await);
        assert!(matches!(
            service.create(create_req("  ", true)).await,
            Err(ContentServiceError::Validation(_))
        ));
        assert!(matches!(
            service.create(create_req("draft", false)).await,
            Err(ContentServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let service = service();
        service.create(create_req("published", false)).await.unwrap();
        let status = service.get_by_name("published").await.unwrap().unwrap();
        assert!(!status.is_removable);
        assert!(service.get_by_name("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let service = service();
        let id = service.create(create_req("review", true)).await.unwrap();
        service
            .update(
                &id,
                UpdateContentStatusRequest {
                    name: Some(String::new()),
                    is_removable: Some(false),
                },
            )
            .await
            .unwrap();
        let status = service.get_one(&id).await.unwrap();
        assert_eq!(status.name, "review");
        assert!(!status.is_removable);

        service.delete(&id).await.unwrap();
        assert!(matches!(
            service.get_one(&id).await,
            Err(ContentServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.update(&id, UpdateContentStatusRequest::default()).await,
            Err(ContentServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_keeps_names_unique() {
        let service = service();
        service.seed_defaults().await.unwrap();
        let id = service.create(create_req("review", true)).await.unwrap();

        let err = service
            .update(
                &id,
                UpdateContentStatusRequest {
                    name: Some("published".into()),
                    is_removable: Some(true),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContentServiceError::Validation(_)));

        let status = service.get_one(&id).await.unwrap();
        assert_eq!(status.name, "review");
        let published = service.get_by_name("published").await.unwrap().unwrap();
        assert!(!published.is_removable);
        assert_eq!(service.get_list(PageRequest::default()).await.unwrap().pagination.total, 4);

        // Renaming a status to its own name is allowed
        assert_ok!(
            service
                .update(
                    &id,
                    UpdateContentStatusRequest {
                        name: Some("review".into()),
                        is_removable: Some(false),
                    },
                )
                .await
        );
        assert!(!service.get_one(&id).await.unwrap().is_removable);
    }

    #[tokio::test]
    async fn test_seed_defaults_is_idempotent() {
        let service = service();
        assert_eq!(service.seed_defaults().await.unwrap(), DEFAULT_STATUSES.len());
        assert_eq!(service.seed_defaults().await.unwrap(), 0);

        let page = service.get_list(PageRequest::default()).await.unwrap();
        assert_eq!(page.pagination.total, 3);
        assert!(page.pagination.is_last_page);
        assert!(service.get_by_name(DRAFT_STATUS).await.unwrap().unwrap().is_removable);
    }
}
