//! Content status routes under `/api/v1/content_status`

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Response};

use crate::models::{CreateContentStatusRequest, UpdateContentStatusRequest};
use crate::routes::api::{not_found_response, respond, respond_empty, ApiRequest, Created, PageQuery};
use crate::services::ContentStatusService;

pub const CONTENT_STATUS_PREFIX: &str = "/api/v1/content_status";

pub async fn handle_content_status_request(
    service: &ContentStatusService,
    req: ApiRequest,
) -> Response<Full<Bytes>> {
    let segments = req.segments();

    match (&req.method, segments.as_slice()) {
        (&Method::POST, []) => match req.json::<CreateContentStatusRequest>() {
            Ok(body) => respond(service.create(body).await.map(|id| Created { id })),
            Err(e) => respond_empty(Err(e)),
        },
        (&Method::GET, []) => match req.query::<PageQuery>().and_then(|q| q.page()) {
            Ok(page) => respond(service.get_list(page).await),
            Err(e) => respond_empty(Err(e)),
        },
        (&Method::GET, [id]) => respond(service.get_one(id).await),
        (&Method::PUT, [id]) => match req.json::<UpdateContentStatusRequest>() {
            Ok(body) => respond_empty(service.update(id, body).await),
            Err(e) => respond_empty(Err(e)),
        },
        (&Method::DELETE, [id]) => respond_empty(service.delete(id).await),
        _ => not_found_response(&format!("{CONTENT_STATUS_PREFIX}{}", req.path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::api::tests::body_json;
    use crate::store::InMemoryContentStatusStore;
    use hyper::StatusCode;
    use std::sync::Arc;

    fn request(method: Method, path: &str, body: &str) -> ApiRequest {
        ApiRequest::new(method, path, None, Bytes::from(body.to_string()))
    }

    #[tokio::test]
    async fn test_status_crud() {
        let service = ContentStatusService::new(Arc::new(InMemoryContentStatusStore::new()));

        let response = handle_content_status_request(
            &service,
            request(Method::POST, "/", r#"{"name":"review","is_removable":true}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let id = body_json(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let response = handle_content_status_request(
            &service,
            request(Method::POST, "", r#"{"name":"review"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = handle_content_status_request(
            &service,
            request(Method::PUT, &format!("/{id}"), r#"{"is_removable":false}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(
            handle_content_status_request(&service, request(Method::GET, &format!("/{id}"), ""))
                .await,
        )
        .await;
        assert_eq!(body["data"]["name"], "review");
        assert_eq!(body["data"]["is_removable"], false);

        let body =
            body_json(handle_content_status_request(&service, request(Method::GET, "", "")).await)
                .await;
        assert_eq!(body["data"]["pagination"]["total"], 1);

        let response = handle_content_status_request(
            &service,
            request(Method::DELETE, &format!("/{id}"), ""),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = handle_content_status_request(
            &service,
            request(Method::GET, &format!("/{id}"), ""),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
