//! Content orchestration
//!
//! Every mutation runs validation, then the store write, then exactly one
//! history record. The store write and the history write are not atomic: if
//! the history write fails the mutation stays applied and the error is still
//! returned to the caller.

use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::models::{
    non_blank, AssignAuthorRequest, ChangeStatusRequest, Content, ContentFilter, ContentHistory,
    CreateContentRequest, HistoryAction, NewContentHistory, Page, PageRequest, Pagination,
    UpdateContentRequest,
};
use crate::services::content_history::ContentHistoryService;
use crate::services::content_status::{ContentStatusService, DRAFT_STATUS};
use crate::services::lookup::EntityLookup;
use crate::store::{ContentPatch, ContentStore};
use crate::types::{ContentServiceError, Result};

pub struct ContentService {
    store: Arc<dyn ContentStore>,
    statuses: Arc<ContentStatusService>,
    history: Arc<ContentHistoryService>,
    lookup: Arc<dyn EntityLookup>,
}

fn log_failure(operation: &str, content_id: &str, err: &ContentServiceError) {
    if err.is_client_error() {
        warn!(operation, content_id = %content_id, error = %err, "Content operation rejected");
    } else {
        error!(operation, content_id = %content_id, error = %err, "Content operation failed");
    }
}

/// Previous and new values of the patched fields, as JSON objects
fn patch_snapshot(current: &Content, patch: &ContentPatch) -> (Option<String>, Option<String>) {
    let mut previous = Map::new();
    let mut new = Map::new();

    if let Some(ref body) = patch.body {
        previous.insert("body".into(), json!(current.body));
        new.insert("body".into(), json!(body));
    }
    if let Some(ref description) = patch.description {
        previous.insert("description".into(), json!(current.description));
        new.insert("description".into(), json!(description));
    }
    if let Some(difficulty) = patch.difficulty {
        previous.insert("difficulty".into(), json!(current.difficulty));
        new.insert("difficulty".into(), json!(difficulty));
    }
    if let Some(ref resources) = patch.resources {
        previous.insert("resources".into(), json!(current.resources));
        new.insert("resources".into(), json!(resources));
    }

    if new.is_empty() {
        return (None, None);
    }
    (
        Some(JsonValue::Object(previous).to_string()),
        Some(JsonValue::Object(new).to_string()),
    )
}

impl ContentService {
    pub fn new(
        store: Arc<dyn ContentStore>,
        statuses: Arc<ContentStatusService>,
        history: Arc<ContentHistoryService>,
        lookup: Arc<dyn EntityLookup>,
    ) -> Self {
        Self {
            store,
            statuses,
            history,
            lookup,
        }
    }

    /// Validate references, insert as draft, then audit
    pub async fn create(&self, req: CreateContentRequest) -> Result<String> {
        debug!(subject_id = req.subject_id, microtopic_id = req.microtopic_id, "Creating content");
        self.create_inner(req).await.inspect_err(|e| log_failure("create", "", e))
    }

    async fn create_inner(&self, req: CreateContentRequest) -> Result<String> {
        self.lookup.subject(req.subject_id).await?;
        self.lookup.microtopic(req.microtopic_id).await?;

        let draft = self
            .statuses
            .get_by_name(DRAFT_STATUS)
            .await?
            .ok_or_else(|| ContentServiceError::NotFound(format!("{DRAFT_STATUS} content status")))?;

        let id = self.store.insert(req.into_doc(draft.name)).await?;

        // Attribute the audit record from the stored copy
        let created = self.get_one(&id).await?;
        self.history
            .create(
                NewContentHistory::new(&id, &created.author_id, HistoryAction::Create)
                    .with_values(None, Some(created.status_id.clone())),
            )
            .await?;

        info!(content_id = %id, author_id = %created.author_id, "Content created");
        Ok(id)
    }

    /// Stored record merged with its subject; a content item is never served without one
    pub async fn get_one(&self, id: &str) -> Result<Content> {
        debug!(content_id = %id, "Fetching content");
        let doc = self.store.find_by_id(id).await?;
        let subject = self.lookup.subject(doc.subject_id).await?;

        let mut content = Content::from(doc);
        content.subject = Some(subject);
        Ok(content)
    }

    pub async fn update(&self, id: &str, req: UpdateContentRequest) -> Result<()> {
        debug!(content_id = %id, "Updating content");
        self.update_inner(id, req)
            .await
            .inspect_err(|e| log_failure("update", id, e))
    }

    async fn update_inner(&self, id: &str, req: UpdateContentRequest) -> Result<()> {
        let current = self.get_one(id).await?;
        let patch = ContentPatch::from(req);
        let (previous, new) = patch_snapshot(&current, &patch);

        self.store.update(id, &patch).await?;
        self.record(id, &current.author_id, HistoryAction::Update, previous, new)
            .await?;

        info!(content_id = %id, "Content updated");
        Ok(())
    }

    pub async fn assign_author(&self, id: &str, req: AssignAuthorRequest) -> Result<()> {
        debug!(content_id = %id, "Assigning content author");
        self.assign_author_inner(id, req)
            .await
            .inspect_err(|e| log_failure("assign_author", id, e))
    }

    async fn assign_author_inner(&self, id: &str, req: AssignAuthorRequest) -> Result<()> {
        let current = self.get_one(id).await?;
        let author_id = non_blank(req.author_id);
        let patch = ContentPatch::author(author_id.clone());

        self.store.update(id, &patch).await?;
        let previous = author_id.as_ref().map(|_| current.author_id.clone());
        self.record(
            id,
            &current.author_id,
            HistoryAction::AssignAuthor,
            previous,
            author_id.clone(),
        )
        .await?;

        info!(content_id = %id, author_id = ?author_id, "Content author assigned");
        Ok(())
    }

    pub async fn change_status(&self, id: &str, req: ChangeStatusRequest) -> Result<()> {
        debug!(content_id = %id, "Changing content status");
        self.change_status_inner(id, req)
            .await
            .inspect_err(|e| log_failure("change_status", id, e))
    }

    async fn change_status_inner(&self, id: &str, req: ChangeStatusRequest) -> Result<()> {
        let current = self.get_one(id).await?;
        let status_id = non_blank(req.status_id);

        if let Some(ref name) = status_id {
            if self.statuses.get_by_name(name).await?.is_none() {
                return Err(ContentServiceError::Validation(format!(
                    "unknown content status: {name}"
                )));
            }
        }

        let patch = ContentPatch::status(status_id.clone());
        self.store.update(id, &patch).await?;

        let previous = status_id.as_ref().map(|_| current.status_id.clone());
        self.record(
            id,
            &current.author_id,
            HistoryAction::ChangeStatus,
            previous,
            status_id.clone(),
        )
        .await?;

        info!(content_id = %id, status = ?status_id, "Content status changed");
        Ok(())
    }

    /// Soft delete, allowed only while the current status is removable
    pub async fn delete(&self, id: &str) -> Result<()> {
        debug!(content_id = %id, "Deleting content");
        self.delete_inner(id)
            .await
            .inspect_err(|e| log_failure("delete", id, e))
    }

    async fn delete_inner(&self, id: &str) -> Result<()> {
        let current = self.get_one(id).await?;

        let status = self
            .statuses
            .get_by_name(&current.status_id)
            .await?
            .ok_or_else(|| ContentServiceError::NotFound("content status".to_string()))?;
        if !status.is_removable {
            return Err(ContentServiceError::NotRemovable);
        }

        self.store.soft_delete(id).await?;
        self.record(
            id,
            &current.author_id,
            HistoryAction::Delete,
            Some(current.status_id.clone()),
            None,
        )
        .await?;

        info!(content_id = %id, "Content deleted");
        Ok(())
    }

    /// Filtered page of live content, each item merged with its subject
    pub async fn get_list(&self, filter: ContentFilter, page: PageRequest) -> Result<Page<Content>> {
        let filter = filter.normalized();
        debug!(?filter, limit = page.limit, offset = page.offset, "Listing content");

        let total = self.store.count(&filter).await?;
        let docs = self.store.list(&filter, page).await?;

        let mut items = Vec::with_capacity(docs.len());
        for doc in docs {
            let subject = self.lookup.subject(doc.subject_id).await?;
            let mut content = Content::from(doc);
            content.subject = Some(subject);
            items.push(content);
        }

        Ok(Page {
            items,
            pagination: Pagination::new(total, page),
        })
    }

    /// Audit trail of one content item, oldest first
    pub async fn history(&self, id: &str) -> Result<Vec<ContentHistory>> {
        self.history.list_for_content(id).await
    }

    async fn record(
        &self,
        id: &str,
        user_id: &str,
        action: HistoryAction,
        previous: Option<String>,
        new: Option<String>,
    ) -> Result<()> {
        self.history
            .create(NewContentHistory::new(id, user_id, action).with_values(previous, new))
            .await
            .map(|_| ())
    }
}
