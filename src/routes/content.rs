//! Content routes under `/api/v1/content`
//!
//! - `POST /` create
//! - `GET /` filtered list
//! - `GET /{id}` enriched read
//! - `GET /{id}/history` audit trail
//! - `PUT /{id}` sparse update
//! - `PUT /assign/{id}` assign author
//! - `PUT /change-status/{id}` change status
//! - `DELETE /{id}` soft delete

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Response};
use serde::Deserialize;

use crate::models::{
    AssignAuthorRequest, ChangeStatusRequest, Content, ContentFilter, CreateContentRequest, Page,
    UpdateContentRequest,
};
use crate::routes::api::{
    not_found_response, parse_id_param, respond, respond_empty, ApiRequest, Created, PageQuery,
};
use crate::services::ContentService;
use crate::types::Result;

pub const CONTENT_PREFIX: &str = "/api/v1/content";

#[derive(Debug, Default, Deserialize)]
struct ContentListQuery {
    #[serde(flatten)]
    page: PageQuery,
    locale: Option<String>,
    status: Option<String>,
    author_id: Option<String>,
    subject_id: Option<String>,
    microtopic_id: Option<String>,
}

impl ContentListQuery {
    fn filter(&self) -> Result<ContentFilter> {
        Ok(ContentFilter {
            locale: self.locale.clone(),
            status: self.status.clone(),
            author_id: self.author_id.clone(),
            subject_id: parse_id_param("subject_id", self.subject_id.as_deref())?,
            microtopic_id: parse_id_param("microtopic_id", self.microtopic_id.as_deref())?,
        })
    }
}

async fn list(service: &ContentService, req: &ApiRequest) -> Result<Page<Content>> {
    let query: ContentListQuery = req.query()?;
    let page = query.page.page()?;
    service.get_list(query.filter()?, page).await
}

async fn create(service: &ContentService, req: &ApiRequest) -> Result<Created> {
    let body: CreateContentRequest = req.json()?;
    let id = service.create(body).await?;
    Ok(Created { id })
}

/// Route a request whose path is below [`CONTENT_PREFIX`]
pub async fn handle_content_request(
    service: &ContentService,
    req: ApiRequest,
) -> Response<Full<Bytes>> {
    let segments = req.segments();

    match (&req.method, segments.as_slice()) {
        (&Method::POST, []) => respond(create(service, &req).await),
        (&Method::GET, []) => respond(list(service, &req).await),
        (&Method::GET, [id]) => respond(service.get_one(id).await),
        (&Method::GET, [id, "history"]) => respond(service.history(id).await),
        (&Method::PUT, ["assign", id]) => match req.json::<AssignAuthorRequest>() {
            Ok(body) => respond_empty(service.assign_author(id, body).await),
            Err(e) => respond_empty(Err(e)),
        },
        (&Method::PUT, ["change-status", id]) => match req.json::<ChangeStatusRequest>() {
            Ok(body) => respond_empty(service.change_status(id, body).await),
            Err(e) => respond_empty(Err(e)),
        },
        (&Method::PUT, [id]) => match req.json::<UpdateContentRequest>() {
            Ok(body) => respond_empty(service.update(id, body).await),
            Err(e) => respond_empty(Err(e)),
        },
        (&Method::DELETE, [id]) => respond_empty(service.delete(id).await),
        _ => not_found_response(&format!("{CONTENT_PREFIX}{}", req.path)),
    }
}
