//! Configuration for the content service
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use uuid::Uuid;

/// Content service - educational content, statuses, posts and audit history
#[derive(Parser, Debug, Clone)]
#[command(name = "content-service")]
#[command(about = "Content lifecycle service backed by MongoDB and NATS lookups")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Enable development mode (in-memory stores when MongoDB is unreachable)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// NATS configuration
    #[command(flatten)]
    pub nats: NatsArgs,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "core")]
    pub mongodb_db: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Ensure the default content statuses exist on startup
    #[arg(long, env = "SEED_STATUSES", default_value = "true")]
    pub seed_statuses: bool,
}

/// NATS connection and lookup configuration
#[derive(Parser, Debug, Clone)]
pub struct NatsArgs {
    /// NATS server URL
    #[arg(long, env = "NATS_URL", default_value = "nats://127.0.0.1:4222")]
    pub nats_url: String,

    /// NATS username (optional)
    #[arg(long, env = "NATS_USER")]
    pub nats_user: Option<String>,

    /// NATS password (optional)
    #[arg(long, env = "NATS_PASSWORD")]
    pub nats_password: Option<String>,

    /// Request subject answering "get subject by id"
    #[arg(long, env = "SUBJECT_LOOKUP_SUBJECT", default_value = "subjects.GetById")]
    pub subject_lookup_subject: String,

    /// Request subject answering "get microtopic by id"
    #[arg(long, env = "MICROTOPIC_LOOKUP_SUBJECT", default_value = "microtopics.GetById")]
    pub microtopic_lookup_subject: String,

    /// Deadline for a single remote lookup in milliseconds
    #[arg(long, env = "LOOKUP_TIMEOUT_MS", default_value = "30000")]
    pub lookup_timeout_ms: u64,
}

impl NatsArgs {
    /// Lookup deadline as a Duration
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.mongodb_db.trim().is_empty() {
            return Err("MONGODB_DB must not be empty".to_string());
        }

        if self.nats.subject_lookup_subject.trim().is_empty()
            || self.nats.microtopic_lookup_subject.trim().is_empty()
        {
            return Err("lookup subjects must not be empty".to_string());
        }

        if self.nats.lookup_timeout_ms == 0 {
            return Err("LOOKUP_TIMEOUT_MS must be greater than zero".to_string());
        }

        Ok(())
    }
}
