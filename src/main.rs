//! Content service binary

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use content_service::{
    config::Args,
    db::MongoClient,
    nats::NatsClient,
    server,
    services::NatsEntityLookup,
    store::Stores,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("content_service={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Content Service");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("NATS: {}", args.nats.nats_url);
    info!(
        "Lookups: {} / {} (timeout {}ms)",
        args.nats.subject_lookup_subject,
        args.nats.microtopic_lookup_subject,
        args.nats.lookup_timeout_ms
    );
    info!("MongoDB: {} (db {})", args.mongodb_uri, args.mongodb_db);
    info!("======================================");

    // Connect to MongoDB and build the stores (in-memory fallback in dev mode)
    let mongo_stores = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => Stores::mongo(&client).await.map(|stores| (stores, client)),
        Err(e) => Err(e),
    };
    let (stores, mongo_connected) = match mongo_stores {
        Ok((stores, client)) => {
            info!("MongoDB connected successfully (db {})", client.db_name());
            (stores, true)
        }
        Err(e) => {
            if args.dev_mode {
                warn!("MongoDB unavailable (dev mode, using in-memory stores): {}", e);
                (Stores::in_memory(), false)
            } else {
                error!("MongoDB connection failed: {}", e);
                std::process::exit(1);
            }
        }
    };

    // Connect to NATS (optional in dev mode)
    let nats = match NatsClient::new(&args.nats, &format!("content-service-{}", args.node_id)).await {
        Ok(client) => {
            info!("NATS connected successfully as {}", client.name());
            Some(client)
        }
        Err(e) => {
            if args.dev_mode {
                warn!("NATS connection failed (dev mode, continuing without): {}", e);
                None
            } else {
                error!("NATS connection failed: {}", e);
                std::process::exit(1);
            }
        }
    };

    let lookup = NatsEntityLookup::new(nats, &args.nats);
    let nats_connected = lookup.is_connected();

    let state = Arc::new(server::AppState::new(
        args,
        stores,
        Arc::new(lookup),
        mongo_connected,
        nats_connected,
    ));

    if state.args.seed_statuses {
        state.statuses.seed_defaults().await?;
    }

    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
