//! Append-only audit sink

use std::sync::Arc;
use tracing::{debug, error};

use crate::models::{ContentHistory, NewContentHistory};
use crate::store::ContentHistoryStore;
use crate::types::Result;

/// Records one event per completed content mutation. Never rejects on
/// semantic grounds; only store failures surface.
pub struct ContentHistoryService {
    store: Arc<dyn ContentHistoryStore>,
}

impl ContentHistoryService {
    pub fn new(store: Arc<dyn ContentHistoryStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, record: NewContentHistory) -> Result<String> {
        let content_id = record.content_id.clone();
        let action = record.action.clone();

        match self.store.insert(record.into_doc()).await {
            Ok(id) => {
                debug!(content_id = %content_id, action = %action, history_id = %id, "History recorded");
                Ok(id)
            }
            Err(e) => {
                error!(content_id = %content_id, action = %action, error = %e, "Failed to record history");
                Err(e)
            }
        }
    }

    /// Audit trail of one content item, oldest first
    pub async fn list_for_content(&self, content_id: &str) -> Result<Vec<ContentHistory>> {
        let docs = self.store.list_by_content(content_id).await?;
        Ok(docs.into_iter().map(ContentHistory::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoryAction;
    use crate::store::InMemoryContentHistoryStore;

    #[tokio::test]
    async fn test_any_action_is_stored_verbatim() {
        let service = ContentHistoryService::new(Arc::new(InMemoryContentHistoryStore::new()));
        let mut record = NewContentHistory::new("c1", "u1", HistoryAction::Update);
        record.action = "something_else".into();
        service.create(record).await.unwrap();
        service
            .create(NewContentHistory::new("c1", "", HistoryAction::Delete))
            .await
            .unwrap();

        let trail = service.list_for_content("c1").await.unwrap();
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[0].action, "something_else");
        assert_eq!(trail[1].user_id, "");
        assert!(trail[0].created_at.is_some());
    }
}
