//! Backend entry-point: wires configuration, migrations, and the HTTP server.

mod server;

use std::env;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use healthcare_backend::inbound::http::health::HealthState;
use healthcare_backend::outbound::persistence::{run_pending_migrations, DbPool, PoolConfig};
use server::ServerConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_JWT_SECRET_FILE: &str = "/var/run/secrets/jwt_secret";

/// Read the token signing secret, falling back to an ephemeral one in
/// development builds so local runs need no secret provisioning.
fn load_jwt_secret() -> std::io::Result<Vec<u8>> {
    let path = env::var("JWT_SECRET_FILE").unwrap_or_else(|_| DEFAULT_JWT_SECRET_FILE.into());
    match std::fs::read(&path) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            let allow_dev = env::var("JWT_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %path, error = %e, "using ephemeral token secret (dev only)");
                Ok(format!("{}{}", Uuid::new_v4(), Uuid::new_v4()).into_bytes())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read token secret at {path}: {e}"
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;
    let jwt_secret = load_jwt_secret()?;

    let db_pool = match env::var("DATABASE_URL") {
        Ok(url) => {
            let migration_url = url.clone();
            tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
                .await
                .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
                .map_err(std::io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            Some(pool)
        }
        Err(_) => {
            warn!("DATABASE_URL is not set; falling back to in-memory stores");
            None
        }
    };

    let mut config = ServerConfig::new(bind_addr, jwt_secret);
    if let Some(pool) = db_pool {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, config)?;
    info!(addr = %bind_addr, "server listening");
    server.await
}
