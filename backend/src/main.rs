//! Backend entry-point: reads configuration from the environment and runs
//! the HTTP server.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use tracing::warn;
use url::Url;
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::platform::PlatformClient;
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

fn platform_client() -> std::io::Result<Option<PlatformClient>> {
    let (Ok(base_url), Ok(service_key)) = (env::var("PLATFORM_URL"), env::var("PLATFORM_KEY"))
    else {
        return Ok(None);
    };
    let base_url = Url::parse(&base_url)
        .map_err(|e| std::io::Error::other(format!("invalid PLATFORM_URL: {e}")))?;
    let client = PlatformClient::new(base_url, service_key)
        .map_err(|e| std::io::Error::other(format!("platform client failed to build: {e}")))?;
    Ok(Some(client))
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
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(key, cookie_secure, SameSite::Lax, bind_addr);
    if let Some(platform) = platform_client()? {
        config = config.with_platform(platform);
    }
    if let Ok(redirect) = env::var("EMAIL_REDIRECT") {
        config = config.with_email_redirect(redirect);
    }

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
