//! Server configuration, read from command-line flags or the environment.

use std::{net::IpAddr, time::Duration};

use clap::Parser;
use url::Url;

use crate::{
    error::ServerError,
    infrastructure::connection::{ConnectionSettings, DEFAULT_MAX_CONNECTIONS},
    ui::middleware::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW},
};

#[derive(Debug, Clone, Parser)]
#[command(name = "locshare-server", version, about = "Location sharing session server")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// PostgreSQL connection string. Sessions are kept in memory when unset.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Public tunnel address, preferred over --base-url for share links
    #[arg(long, env = "NGROK_URL")]
    pub ngrok_url: Option<String>,

    /// Public address used in share links
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, env = "STORE_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    pub connect_timeout_secs: u64,

    #[arg(long, env = "STORE_IDLE_TIMEOUT_SECS", default_value_t = 45)]
    pub idle_timeout_secs: u64,

    #[arg(long, env = "STORE_RECONNECT_BACKOFF_SECS", default_value_t = 5)]
    pub reconnect_backoff_secs: u64,

    #[arg(long, env = "STORE_OPERATION_TIMEOUT_SECS", default_value_t = 5)]
    pub operation_timeout_secs: u64,

    #[arg(
        long,
        env = "STORE_HEALTH_CHECK_INTERVAL_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub health_check_interval_secs: u64,

    #[arg(long, env = "STORE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Requests allowed per client address in one window
    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = DEFAULT_MAX_REQUESTS)]
    pub rate_limit_max: u32,

    #[arg(
        long,
        env = "RATE_LIMIT_WINDOW_SECS",
        default_value_t = DEFAULT_WINDOW.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub rate_limit_window_secs: u64,
}

impl ServerConfig {
    /// Base address for share links: NGROK_URL, then BASE_URL, then localhost.
    ///
    /// Empty values count as unset. Trailing slashes are trimmed.
    pub fn public_base_url(&self) -> Result<String, ServerError> {
        let configured = [&self.ngrok_url, &self.base_url]
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .find(|value| !value.is_empty());

        let Some(value) = configured else {
            return Ok(format!("http://localhost:{}", self.port));
        };

        let url = Url::parse(value)
            .map_err(|e| ServerError::Config(format!("invalid base URL {value:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(ServerError::Config(format!(
                "base URL must be an absolute http(s) URL, got {value:?}"
            )));
        }

        Ok(value.trim_end_matches('/').to_string())
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            reconnect_backoff: Duration::from_secs(self.reconnect_backoff_secs),
            health_check_interval: Duration::from_secs(self.health_check_interval_secs),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}
