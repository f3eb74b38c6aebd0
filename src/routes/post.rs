//! Post routes under `/api/v1/post`

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Method, Response};
use serde::Deserialize;

use crate::models::{CreatePostRequest, PostFilter, UpdatePostRequest};
use crate::routes::api::{not_found_response, respond, respond_empty, ApiRequest, Created, PageQuery};
use crate::services::PostService;

pub const POST_PREFIX: &str = "/api/v1/post";

#[derive(Debug, Default, Deserialize)]
struct PostListQuery {
    #[serde(flatten)]
    page: PageQuery,
    content_id: Option<String>,
}

pub async fn handle_post_request(service: &PostService, req: ApiRequest) -> Response<Full<Bytes>> {
    let segments = req.segments();

    match (&req.method, segments.as_slice()) {
        (&Method::POST, []) => match req.json::<CreatePostRequest>() {
            Ok(body) => respond(service.create(body).await.map(|id| Created { id })),
            Err(e) => respond_empty(Err(e)),
        },
        (&Method::GET, []) => {
            let parsed = req
                .query::<PostListQuery>()
                .and_then(|q| q.page.page().map(|page| (q.content_id, page)));
            match parsed {
                Ok((content_id, page)) => {
                    respond(service.get_list(PostFilter { content_id }, page).await)
                }
                Err(e) => respond_empty(Err(e)),
            }
        }
        (&Method::GET, [id]) => respond(service.get_one(id).await),
        (&Method::PUT, [id]) => match req.json::<UpdatePostRequest>() {
            Ok(body) => respond_empty(service.update(id, body).await),
            Err(e) => respond_empty(Err(e)),
        },
        (&Method::DELETE, [id]) => respond_empty(service.delete(id).await),
        _ => not_found_response(&format!("{POST_PREFIX}{}", req.path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::api::tests::body_json;
    use crate::routes::content::tests::content_service;
    use crate::models::CreateContentRequest;
    use crate::store::InMemoryPostStore;
    use hyper::StatusCode;
    use std::sync::Arc;

    fn request(method: Method, path: &str, query: Option<&str>, body: &str) -> ApiRequest {
        ApiRequest::new(
            method,
            path,
            query.map(str::to_string),
            Bytes::from(body.to_string()),
        )
    }

    #[tokio::test]
    async fn test_post_lifecycle() {
        let contents = Arc::new(content_service().await);
        let content_id = contents
            .create(CreateContentRequest {
                locale: "en".into(),
                subject_id: 1,
                microtopic_id: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        let service = PostService::new(Arc::new(InMemoryPostStore::new()), contents);

        let response = handle_post_request(
            &service,
            request(
                Method::POST,
                "",
                None,
                &format!(r#"{{"category":"news","content_id":"{content_id}"}}"#),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let id = body_json(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let body = body_json(
            handle_post_request(
                &service,
                request(Method::GET, "", Some(&format!("content_id={content_id}")), ""),
            )
            .await,
        )
        .await;
        assert_eq!(body["data"]["items"][0]["id"], id.as_str());

        let response = handle_post_request(
            &service,
            request(Method::DELETE, &format!("/{id}"), None, ""),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response =
            handle_post_request(&service, request(Method::GET, &format!("/{id}"), None, "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_for_missing_content() {
        let contents = Arc::new(content_service().await);
        let service = PostService::new(Arc::new(InMemoryPostStore::new()), contents);

        let response = handle_post_request(
            &service,
            request(
                Method::POST,
                "",
                None,
                r#"{"content_id":"000000000000000000000000"}"#,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
