//! HTTP server implementation
//!
//! Uses hyper http1 with TokioIo for async handling.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::config::Args;
use crate::routes::{self, ApiRequest};
use crate::services::{
    ContentHistoryService, ContentService, ContentStatusService, EntityLookup, PostService,
};
use crate::store::Stores;
use crate::types::ContentServiceError;

type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Whether the stores are MongoDB-backed (false means in-memory)
    pub mongo_connected: bool,
    pub nats_connected: bool,
    pub contents: Arc<ContentService>,
    pub statuses: Arc<ContentStatusService>,
    pub posts: Arc<PostService>,
}

impl AppState {
    /// Wire the services over the given stores and lookup
    pub fn new(
        args: Args,
        stores: Stores,
        lookup: Arc<dyn EntityLookup>,
        mongo_connected: bool,
        nats_connected: bool,
    ) -> Self {
        let statuses = Arc::new(ContentStatusService::new(stores.content_status));
        let history = Arc::new(ContentHistoryService::new(stores.content_history));
        let contents = Arc::new(ContentService::new(
            stores.content,
            Arc::clone(&statuses),
            history,
            lookup,
        ));
        let posts = Arc::new(PostService::new(stores.post, Arc::clone(&contents)));

        Self {
            args,
            mongo_connected,
            nats_connected,
            contents,
            statuses,
            posts,
        }
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<(), ContentServiceError> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Content service listening on {} as node {}",
        state.args.listen, state.args.node_id
    );

    if !state.mongo_connected {
        warn!("Serving from in-memory stores - data is lost on restart");
    }
    if !state.nats_connected {
        warn!("NATS not connected - subject and microtopic lookups will fail");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new()
                        .preserve_header_case(true)
                        .title_case_headers(true)
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Read the request and route it
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    info!("[{}] {} {}", addr, method, path);

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("Failed to read request body from {}: {}", addr, e);
            return Ok(to_boxed(routes::error_response(
                &ContentServiceError::Validation("failed to read request body".to_string()),
            )));
        }
    };

    Ok(to_boxed(dispatch(&state, method, &path, query, body).await))
}

/// Strip a resource prefix, matching whole path segments only
fn strip_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Route a fully-read request
pub async fn dispatch(
    state: &AppState,
    method: Method,
    path: &str,
    query: Option<String>,
    body: Bytes,
) -> Response<Full<Bytes>> {
    match (&method, path) {
        (&Method::OPTIONS, _) => routes::preflight_response(),
        (&Method::GET, "/health") | (&Method::GET, "/healthz") => routes::health_check(state),
        (&Method::GET, "/version") => routes::version_info(),
        _ => {
            if let Some(rest) = strip_prefix(path, routes::CONTENT_STATUS_PREFIX) {
                let req = ApiRequest::new(method, rest, query, body);
                routes::handle_content_status_request(&state.statuses, req).await
            } else if let Some(rest) = strip_prefix(path, routes::CONTENT_PREFIX) {
                let req = ApiRequest::new(method, rest, query, body);
                routes::handle_content_request(&state.contents, req).await
            } else if let Some(rest) = strip_prefix(path, routes::POST_PREFIX) {
                let req = ApiRequest::new(method, rest, query, body);
                routes::handle_post_request(&state.posts, req).await
            } else {
                routes::not_found_response(path)
            }
        }
    }
}

/// Convert a Full<Bytes> body to BoxBody
fn to_boxed(response: Response<Full<Bytes>>) -> Response<BoxBody> {
    response.map(|body| body.map_err(|never| match never {}).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::api::tests::body_json;
    use crate::server::tests::test_state;
    use hyper::StatusCode;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_prefix("/api/v1/content", "/api/v1/content"), Some(""));
        assert_eq!(strip_prefix("/api/v1/content/abc", "/api/v1/content"), Some("/abc"));
        assert_eq!(strip_prefix("/api/v1/content_status", "/api/v1/content"), None);
        assert_eq!(strip_prefix("/api/v1/post", "/api/v1/content"), None);
    }

    #[tokio::test]
    async fn test_dispatch_routes_by_prefix() {
        let state = test_state();
        state.statuses.seed_defaults().await.unwrap();

        let response = dispatch(
            &state,
            Method::GET,
            "/api/v1/content_status",
            Some("limit=2".into()),
            Bytes::new(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["pagination"]["total"], 3);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

        let response = dispatch(&state, Method::GET, "/api/v1/content", None, Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = dispatch(&state, Method::GET, "/api/v1/post", None, Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = dispatch(&state, Method::GET, "/nope", None, Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preflight() {
        let state = test_state();
        let response = dispatch(&state, Method::OPTIONS, "/api/v1/content", None, Bytes::new()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_content_without_nats_is_unavailable() {
        let state = test_state();
        state.statuses.seed_defaults().await.unwrap();

        let response = dispatch(
            &state,
            Method::POST,
            "/api/v1/content",
            None,
            Bytes::from_static(br#"{"locale":"en","subject_id":1,"microtopic_id":2}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(
            body["message"],
            "could not get a usable response from the subject service"
        );
    }
}
