//! Backend entry-point: reads configuration from the environment and runs
//! the portal server.

use std::env;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{ServerConfig, create_server};

fn session_key() -> std::io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    match std::fs::read(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
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

    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let bind_addr = "0.0.0.0:8080"
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid bind address: {e}")))?;
    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
        config = config.with_db_pool(pool);
    } else {
        warn!("DATABASE_URL not set; serving fixture state");
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
