//! Post CRUD; the parent content is validated on creation only

use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{CreatePostRequest, Page, PageRequest, Pagination, Post, PostFilter, UpdatePostRequest};
use crate::services::content::ContentService;
use crate::store::PostStore;
use crate::types::Result;

pub struct PostService {
    store: Arc<dyn PostStore>,
    contents: Arc<ContentService>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, contents: Arc<ContentService>) -> Self {
        Self { store, contents }
    }

    pub async fn create(&self, req: CreatePostRequest) -> Result<String> {
        // Includes the parent's subject lookup
        self.contents.get_one(&req.content_id).await?;

        let content_id = req.content_id.clone();
        let id = self.store.insert(req.into_doc()).await?;
        info!(post_id = %id, content_id = %content_id, "Post created");
        Ok(id)
    }

    pub async fn get_one(&self, id: &str) -> Result<Post> {
        self.store.find_by_id(id).await.map(Post::from)
    }

    pub async fn update(&self, id: &str, req: UpdatePostRequest) -> Result<()> {
        self.store.find_by_id(id).await?;
        self.store.update(id, &req.normalized()).await?;
        info!(post_id = %id, "Post updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.find_by_id(id).await?;
        self.store.soft_delete(id).await?;
        info!(post_id = %id, "Post deleted");
        Ok(())
    }

    pub async fn get_list(&self, filter: PostFilter, page: PageRequest) -> Result<Page<Post>> {
        debug!(?filter, limit = page.limit, offset = page.offset, "Listing posts");
        let total = self.store.count(&filter).await?;
        let docs = self.store.list(&filter, page).await?;
        Ok(Page {
            items: docs.into_iter().map(Post::from).collect(),
            pagination: Pagination::new(total, page),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateContentRequest, Microtopic, Subject};
    use crate::services::content_history::ContentHistoryService;
    use crate::services::content_status::ContentStatusService;
    use crate::services::lookup::EntityLookup;
    use crate::store::{
        InMemoryContentHistoryStore, InMemoryContentStatusStore, InMemoryContentStore,
        InMemoryPostStore,
    };
    use crate::types::ContentServiceError;
    use async_trait::async_trait;

    struct AnyLookup;

    #[async_trait]
    impl EntityLookup for AnyLookup {
        async fn subject(&self, id: i64) -> Result<Subject> {
            Ok(Subject {
                id,
                ..Default::default()
            })
        }

        async fn microtopic(&self, id: i64) -> Result<Microtopic> {
            Ok(Microtopic {
                id,
                ..Default::default()
            })
        }
    }

    async fn services() -> (PostService, Arc<ContentService>) {
        let statuses = Arc::new(ContentStatusService::new(Arc::new(
            InMemoryContentStatusStore::new(),
        )));
        statuses.seed_defaults().await.unwrap();
        let contents = Arc::new(ContentService::new(
            Arc::new(InMemoryContentStore::new()),
            statuses,
            Arc::new(ContentHistoryService::new(Arc::new(
                InMemoryContentHistoryStore::new(),
            ))),
            Arc::new(AnyLookup),
        ));
        let posts = PostService::new(Arc::new(InMemoryPostStore::new()), contents.clone());
        (posts, contents)
    }

    async fn content(contents: &ContentService) -> String {
        contents
            .create(CreateContentRequest {
                locale: "en".into(),
                subject_id: 1,
                microtopic_id: 2,
                author_id: "u1".into(),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_requires_live_content() {
        let (posts, contents) = services().await;
        let content_id = content(&contents).await;

        let id = posts
            .create(CreatePostRequest {
                category: "news".into(),
                content_id: content_id.clone(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(posts.get_one(&id).await.unwrap().content_id, content_id);

        contents.delete(&content_id).await.unwrap();
        assert!(matches!(
            posts
                .create(CreatePostRequest {
                    content_id,
                    ..Default::default()
                })
                .await,
            Err(ContentServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_delete_and_list() {
        let (posts, contents) = services().await;
        let content_id = content(&contents).await;
        let id = posts
            .create(CreatePostRequest {
                category: "news".into(),
                content_id: content_id.clone(),
                description: "first".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        posts
            .update(
                &id,
                UpdatePostRequest {
                    category: Some(" ".into()),
                    description: Some("second".into()),
                    resources: None,
                },
            )
            .await
            .unwrap();
        let post = posts.get_one(&id).await.unwrap();
        assert_eq!(post.category, "news");
        assert_eq!(post.description, "second");

        let filter = PostFilter {
            content_id: Some(content_id),
        };
        let page = posts.get_list(filter.clone(), PageRequest::default()).await.unwrap();
        assert_eq!(page.pagination.total, 1);

        posts.delete(&id).await.unwrap();
        assert!(matches!(
            posts.delete(&id).await,
            Err(ContentServiceError::NotFound(_))
        ));
        let page = posts.get_list(filter, PageRequest::default()).await.unwrap();
        assert!(page.items.is_empty());
    }
}
