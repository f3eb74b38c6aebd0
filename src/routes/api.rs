//! Request/response plumbing shared by the API routes
//!
//! Every API response is wrapped in `{success, message, data}`.

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE};
use hyper::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::models::PageRequest;
use crate::types::{ContentServiceError, Result};

/// Decoded request handed to a resource router
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the resource prefix, e.g. `/abc` or `/assign/abc`
    pub path: String,
    pub query: Option<String>,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, query: Option<String>, body: Bytes) -> Self {
        Self {
            method,
            path: path.into(),
            query,
            body,
        }
    }

    /// Non-empty path segments below the prefix
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Decode the JSON body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.body.is_empty() {
            return Err(ContentServiceError::Validation(
                "request body is required".to_string(),
            ));
        }
        serde_json::from_slice(&self.body).map_err(ContentServiceError::from)
    }

    /// Decode the query string; a missing query decodes as empty
    pub fn query<T: DeserializeOwned>(&self) -> Result<T> {
        serde_urlencoded::from_str(self.query.as_deref().unwrap_or("")).map_err(|e| {
            ContentServiceError::Validation(format!("failed to parse query: {e}"))
        })
    }
}

/// `limit`/`offset` as raw strings so bad numbers surface as validation errors
#[derive(Debug, Default, serde::Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub offset: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Result<PageRequest> {
        PageRequest::parse(self.limit.as_deref(), self.offset.as_deref())
    }
}

/// Parse an optional numeric query parameter; blank means "no constraint"
pub fn parse_id_param(name: &str, raw: Option<&str>) -> Result<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ContentServiceError::Validation(format!("{name} must be an integer"))),
    }
}

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

/// Body of every create response
#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}

fn with_json_headers(mut response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// Serialize a value as a JSON response
pub fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(value).unwrap_or_else(|_| {
        br#"{"success":false,"message":"serialization failed","data":null}"#.to_vec()
    });
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    with_json_headers(response)
}

pub fn success<T: Serialize>(data: T) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &Envelope {
            success: true,
            message: String::new(),
            data: Some(data),
        },
    )
}

/// Success with `data: null`
pub fn success_empty() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &Envelope::<()> {
            success: true,
            message: String::new(),
            data: None,
        },
    )
}

pub fn error_response(err: &ContentServiceError) -> Response<Full<Bytes>> {
    json_response(
        err.status_code(),
        &Envelope::<()> {
            success: false,
            message: err.to_string(),
            data: None,
        },
    )
}

/// Render a service result: `Ok` as success, `Err` as the error envelope
pub fn respond<T: Serialize>(result: Result<T>) -> Response<Full<Bytes>> {
    match result {
        Ok(data) => success(data),
        Err(err) => error_response(&err),
    }
}

/// Render a unit result with `data: null`
pub fn respond_empty(result: Result<()>) -> Response<Full<Bytes>> {
    match result {
        Ok(()) => success_empty(),
        Err(err) => error_response(&err),
    }
}

pub fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    warn!(path = %path, "No route");
    error_response(&ContentServiceError::NotFound(format!("route {path}")))
}

/// CORS preflight response
pub fn preflight_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    response
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value as JsonValue;

    /// Collect a response body as JSON
    pub(crate) async fn body_json(response: Response<Full<Bytes>>) -> JsonValue {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let response = error_response(&ContentServiceError::NotRemovable);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "content is not removable");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let body = body_json(success(Created { id: "abc".into() })).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "");
        assert_eq!(body["data"]["id"], "abc");
    }

    #[test]
    fn test_request_decoding() {
        let req = ApiRequest::new(
            Method::GET,
            "/assign/abc/",
            Some("limit=5&offset=x".into()),
            Bytes::new(),
        );
        assert_eq!(req.segments(), vec!["assign", "abc"]);

        let query: PageQuery = req.query().unwrap();
        assert_eq!(query.limit.as_deref(), Some("5"));
        assert!(query.page().is_err());

        assert!(matches!(
            req.json::<JsonValue>(),
            Err(ContentServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_id_param() {
        assert_eq!(parse_id_param("subject_id", None).unwrap(), None);
        assert_eq!(parse_id_param("subject_id", Some("")).unwrap(), None);
        assert_eq!(parse_id_param("subject_id", Some("7")).unwrap(), Some(7));
        assert!(parse_id_param("subject_id", Some("x")).is_err());
    }
}
