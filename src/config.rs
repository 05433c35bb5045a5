use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Startup configuration shared by both assistants and the HTTP shell.
///
/// Built once in `main` and handed to constructors, so nothing below the
/// shell reads the environment itself.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` leaves the assistants unavailable instead of aborting startup.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: Url,
    pub request_timeout: Duration,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_base_raw = var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(api_base_raw.trim_end_matches('/')).map_err(|e| {
            ConfigError::InvalidValue {
                name: "GEMINI_API_BASE",
                reason: e.to_string(),
            }
        })?;

        let request_timeout = match var("GEMINI_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    name: "GEMINI_TIMEOUT_SECS",
                    reason: format!("'{}' is not a whole number of seconds", raw),
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue {
                        name: "GEMINI_TIMEOUT_SECS",
                        reason: "timeout must be at least one second".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let bind_raw = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: "BIND_ADDR",
            reason: format!("'{}' is not a socket address", bind_raw),
        })?;

        Ok(Self {
            api_key: var("GEMINI_API_KEY"),
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base,
            request_timeout,
            bind_addr,
        })
    }
}
