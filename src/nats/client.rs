//! NATS client wrapper
//!
//! Provides connection management and the request/reply pattern with a
//! per-request deadline.

use async_nats::{Client, ConnectOptions};
use bytes::Bytes;
use std::time::Duration;
use tracing::info;

use crate::config::NatsArgs;
use crate::types::ContentServiceError;

/// Default ping interval for keep-alive
const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(120);

/// NATS client wrapper
#[derive(Clone)]
pub struct NatsClient {
    /// Underlying NATS client
    client: Client,
    /// Deadline for request/reply calls
    request_timeout: Duration,
    /// Client name for logging
    name: String,
}

impl NatsClient {
    /// Create a new NATS client
    pub async fn new(args: &NatsArgs, name: &str) -> Result<Self, ContentServiceError> {
        info!("Connecting to NATS at {}", args.nats_url);

        // No retry_on_initial_connect(): startup should fail fast when NATS is absent
        let mut options = ConnectOptions::new()
            .name(name)
            .ping_interval(DEFAULT_PING_INTERVAL)
            .connection_timeout(Duration::from_secs(5));

        if let (Some(user), Some(pass)) = (&args.nats_user, &args.nats_password) {
            options = options.user_and_password(user.clone(), pass.clone());
        }

        let client = options
            .connect(&args.nats_url)
            .await
            .map_err(|e| ContentServiceError::Nats(format!("Failed to connect: {}", e)))?;

        info!("Connected to NATS at {}", args.nats_url);

        Ok(Self {
            client,
            request_timeout: args.lookup_timeout(),
            name: name.to_string(),
        })
    }

    /// Request/response pattern with timeout
    pub async fn request(
        &self,
        subject: &str,
        payload: Bytes,
    ) -> Result<async_nats::Message, ContentServiceError> {
        tokio::time::timeout(
            self.request_timeout,
            self.client.request(subject.to_string(), payload),
        )
        .await
        .map_err(|_| ContentServiceError::Nats(format!("Request to {} timed out", subject)))?
        .map_err(|e| ContentServiceError::Nats(format!("Request to {} failed: {}", subject, e)))
    }

    /// Get the client name
    pub fn name(&self) -> &str {
        &self.name
    }
}
