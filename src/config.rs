use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite:lobbies.db?mode=rwc";
const DEFAULT_STALE_AFTER_SECS: u64 = 60 * 60;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;

/// How often idle lobbies are reaped, and how idle they must be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    pub interval: Duration,
    pub stale_after: Duration,
}

impl Default for SweepPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            stale_after: Duration::from_secs(DEFAULT_STALE_AFTER_SECS),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set; lobbyd only serves over TLS")]
    MissingTlsSetting(&'static str),
}

/// PEM certificate chain and private key the listener is served with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsCredentials {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub stale_after_secs: u64,
    pub sweep_interval_secs: u64,
    pub log_file: Option<PathBuf>,
    pub tls_cert_path: Option<PathBuf>,
    pub tls_key_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            database_url: lookup("DATABASE_URL")
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            stale_after_secs: positive_secs(lookup("LOBBY_STALE_AFTER_SECS"))
                .unwrap_or(DEFAULT_STALE_AFTER_SECS),
            sweep_interval_secs: positive_secs(lookup("LOBBY_SWEEP_INTERVAL_SECS"))
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            log_file: non_empty_path(lookup("LOG_FILE")),
            tls_cert_path: non_empty_path(lookup("TLS_CERT_PATH")),
            tls_key_path: non_empty_path(lookup("TLS_KEY_PATH")),
        }
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn sweep_policy(&self) -> SweepPolicy {
        SweepPolicy {
            interval: Duration::from_secs(self.sweep_interval_secs),
            stale_after: Duration::from_secs(self.stale_after_secs),
        }
    }

    /// Both halves of the TLS identity; the server refuses to start without them
    pub fn tls_credentials(&self) -> Result<TlsCredentials, ConfigError> {
        let cert_path = self
            .tls_cert_path
            .clone()
            .ok_or(ConfigError::MissingTlsSetting("TLS_CERT_PATH"))?;
        let key_path = self
            .tls_key_path
            .clone()
            .ok_or(ConfigError::MissingTlsSetting("TLS_KEY_PATH"))?;
        Ok(TlsCredentials {
            cert_path,
            key_path,
        })
    }
}

fn non_empty_path(value: Option<String>) -> Option<PathBuf> {
    value.filter(|path| !path.is_empty()).map(PathBuf::from)
}

fn positive_secs(value: Option<String>) -> Option<u64> {
    value.and_then(|v| v.parse().ok()).filter(|secs| *secs > 0)
}
