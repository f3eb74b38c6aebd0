//! Health and version endpoints
//!
//! `/health` is a liveness probe: it returns 200 whenever the process is
//! serving, and reports which backends are in use. `/version` returns the
//! build information captured by `build.rs`.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::routes::api::json_response;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    /// "online", or "degraded" when running without MongoDB or NATS
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    pub mode: &'static str,
    pub node_id: String,
    /// "mongodb" or "memory"
    pub storage: &'static str,
    pub nats: NatsHealth,
}

#[derive(Debug, Serialize)]
pub struct NatsHealth {
    pub connected: bool,
}

fn build_health_response(state: &AppState) -> HealthResponse {
    let degraded = !state.mongo_connected || !state.nats_connected;

    HealthResponse {
        healthy: true,
        status: if degraded { "degraded" } else { "online" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        mode: if state.args.dev_mode {
            "development"
        } else {
            "production"
        },
        node_id: state.args.node_id.to_string(),
        storage: if state.mongo_connected {
            "mongodb"
        } else {
            "memory"
        },
        nats: NatsHealth {
            connected: state.nats_connected,
        },
    }
}

/// Handle liveness probe (/health, /healthz)
pub fn health_check(state: &AppState) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &build_health_response(state))
}

/// Version information for deployment verification
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub commit: &'static str,
    pub commit_full: &'static str,
    pub build_time: &'static str,
    pub service: &'static str,
}

/// Handle version endpoint (/version)
pub fn version_info() -> Response<Full<Bytes>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        commit_full: option_env!("GIT_COMMIT_FULL").unwrap_or("unknown"),
        build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        service: "content-service",
    };

    json_response(StatusCode::OK, &response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::api::tests::body_json;
    use crate::server::tests::test_state;

    #[tokio::test]
    async fn test_health_reports_memory_mode() {
        let state = test_state();
        let body = body_json(health_check(&state)).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["storage"], "memory");
        assert_eq!(body["nats"]["connected"], false);
        assert_eq!(body["mode"], "development");
    }

    #[tokio::test]
    async fn test_version() {
        let body = body_json(version_info()).await;
        assert_eq!(body["service"], "content-service");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
