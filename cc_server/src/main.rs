//! Corner CMS API server.
//!
//! Serves the editorial JSON API backed by PostgreSQL (or the in-memory
//! store when no database is configured).

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use cc_server::{api, config::ServerConfig, logging, metrics};
use corner_cms::auth::AuthManager;
use corner_cms::db::{Database, MemoryStore, PgContentStore, PgUserStore};
use ctrlc::set_handler;
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run the Corner CMS API server

USAGE:
  cc_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8001]
  --db-url     URL         Database connection string  [default: env DATABASE_URL, else in-memory store]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8001)
  DATABASE_URL             PostgreSQL connection string
  JWT_SECRET               JWT signing secret
  TOKEN_LIFETIME_HOURS     Access token lifetime          [default: 24]
  MAX_LOGIN_ATTEMPTS       Failures tolerated per email   [default: 5]
  LOCKOUT_DURATION_MINUTES Lockout window after failures  [default: 15]
  REGISTRATION_ALLOWLIST   Comma-separated emails allowed to register
  UPLOAD_DIR               Directory for uploaded images  [default: uploads]
  METRICS_BIND             Prometheus scrape address (optional)
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let db_url_override: Option<String> = pargs.opt_value_from_str("--db-url")?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let config = ServerConfig::from_env(bind_override, db_url_override)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(Error::msg)?;
        info!("Metrics exporter listening on {}", metrics_bind);
    }

    // Wire the stores: PostgreSQL when configured, in-memory otherwise.
    let (users, content, database) = match &config.database {
        Some(db_config) => {
            info!("Connecting to database");
            let database = Arc::new(
                Database::new(db_config)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?,
            );
            info!("Database connected successfully");

            let pool = Arc::new(database.pool().clone());
            (
                Arc::new(PgUserStore::new(pool.clone())) as Arc<dyn corner_cms::db::UserStore>,
                Arc::new(PgContentStore::new(pool)) as Arc<dyn corner_cms::db::ContentStore>,
                Some(database),
            )
        }
        None => {
            info!("No DATABASE_URL configured, using volatile in-memory store");
            let store = Arc::new(MemoryStore::new());
            (
                store.clone() as Arc<dyn corner_cms::db::UserStore>,
                store as Arc<dyn corner_cms::db::ContentStore>,
                None,
            )
        }
    };

    let auth = Arc::new(AuthManager::new(
        users.clone(),
        config.security.auth_config(),
    ));

    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create upload dir: {}", e))?;

    let state = api::AppState {
        auth,
        users,
        content,
        database,
        upload_dir: config.uploads.dir.clone(),
        upload_max_bytes: config.uploads.max_bytes,
    };

    let app = api::create_router(state);

    info!("Starting HTTP server on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
