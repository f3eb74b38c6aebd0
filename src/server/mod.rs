//! HTTP server

pub mod http;

pub use http::{dispatch, run, AppState};

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::Args;
    use crate::services::NatsEntityLookup;
    use crate::store::Stores;
    use clap::Parser;
    use std::sync::Arc;

    /// Dev-mode state over in-memory stores with no NATS connection
    pub(crate) fn test_state() -> AppState {
        let args = Args::parse_from(["content-service", "--dev-mode"]);
        let lookup = Arc::new(NatsEntityLookup::new(None, &args.nats));
        AppState::new(args, Stores::in_memory(), lookup, false, false)
    }
}
