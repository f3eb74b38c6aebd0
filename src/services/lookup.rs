//! Remote Subject/Microtopic lookup over NATS request/reply
//!
//! Every call is a bare round trip: no caching, no retry. A reply with a
//! `null` entity means the reference does not resolve; anything else that
//! keeps us from reading an entity is reported as the remote side being
//! unavailable.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::NatsArgs;
use crate::models::{Microtopic, Subject};
use crate::nats::{decode_lookup_reply, GetByIdRequest, LookupReply, NatsClient};
use crate::types::{ContentServiceError, Result};

/// Resolves remote entities referenced by content
#[async_trait]
pub trait EntityLookup: Send + Sync {
    async fn subject(&self, id: i64) -> Result<Subject>;

    async fn microtopic(&self, id: i64) -> Result<Microtopic>;
}

/// NATS-backed lookup. Without a connection every call is `RemoteUnavailable`.
pub struct NatsEntityLookup {
    nats: Option<NatsClient>,
    subject_subject: String,
    microtopic_subject: String,
}

impl NatsEntityLookup {
    pub fn new(nats: Option<NatsClient>, args: &NatsArgs) -> Self {
        Self {
            nats,
            subject_subject: args.subject_lookup_subject.clone(),
            microtopic_subject: args.microtopic_lookup_subject.clone(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.nats.is_some()
    }

    async fn get_by_id<T: DeserializeOwned>(
        &self,
        nats_subject: &str,
        key: &str,
        id: i64,
    ) -> Result<T> {
        let service = format!("{key} service");

        let Some(ref nats) = self.nats else {
            warn!(entity = key, id, "Lookup attempted without a NATS connection");
            return Err(ContentServiceError::RemoteUnavailable(service));
        };

        let payload = GetByIdRequest::new(id).to_bytes()?;
        debug!(subject = %nats_subject, id, "Requesting {}", key);

        let message = nats.request(nats_subject, payload).await.map_err(|e| {
            error!(subject = %nats_subject, id, error = %e, "Lookup request failed");
            ContentServiceError::RemoteUnavailable(service.clone())
        })?;

        match decode_lookup_reply::<T>(&message.payload, key) {
            Ok(LookupReply::Found(entity)) => Ok(entity),
            Ok(LookupReply::Missing) => {
                warn!(entity = key, id, "Remote reference did not resolve");
                Err(ContentServiceError::Validation(format!(
                    "{key} {id} could not be resolved"
                )))
            }
            Ok(LookupReply::Failed(message)) => {
                error!(entity = key, id, error = %message, "Remote service reported an error");
                Err(ContentServiceError::RemoteUnavailable(service))
            }
            Err(e) => {
                error!(entity = key, id, error = %e, "Malformed lookup reply");
                Err(ContentServiceError::RemoteUnavailable(service))
            }
        }
    }
}

#[async_trait]
impl EntityLookup for NatsEntityLookup {
    async fn subject(&self, id: i64) -> Result<Subject> {
        self.get_by_id(&self.subject_subject, "subject", id).await
    }

    async fn microtopic(&self, id: i64) -> Result<Microtopic> {
        self.get_by_id(&self.microtopic_subject, "microtopic", id).await
    }
}
