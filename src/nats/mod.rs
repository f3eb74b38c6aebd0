//! NATS request/reply plumbing for remote entity lookups

pub mod client;
pub mod messages;

pub use client::NatsClient;
pub use messages::{decode_lookup_reply, GetByIdRequest, LookupReply};
