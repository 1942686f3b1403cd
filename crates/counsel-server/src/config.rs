//! Server configuration from `COUNSEL_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use counsel_auth::AuthConfig;
use counsel_docgen::DraftingConfig;
use counsel_template::CatalogConfig;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not valid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub catalog: CatalogConfig,
    pub auth: AuthConfig,
    pub drafting: DraftingConfig,
    /// How often expired and terminated sessions are swept.
    pub sweep_interval: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Unset or blank variables
    /// take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind = parse(
            "COUNSEL_BIND",
            get("COUNSEL_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
        )?;

        let mut catalog = CatalogConfig::default();
        if let Some(dir) = get("COUNSEL_TEMPLATE_DIR") {
            catalog.template_dir = PathBuf::from(dir);
        }

        let mut auth = AuthConfig::default();
        if let Some(raw) = get("COUNSEL_SESSION_TTL_SECS") {
            auth.session_ttl_secs = parse("COUNSEL_SESSION_TTL_SECS", raw)?;
        }

        let mut drafting = DraftingConfig::default();
        if let Some(endpoint) = get("COUNSEL_DRAFTING_ENDPOINT") {
            drafting.endpoint = endpoint;
        }
        drafting.api_key = get("COUNSEL_DRAFTING_API_KEY");
        if let Some(model) = get("COUNSEL_DRAFTING_MODEL") {
            drafting.model = model;
        }
        if let Some(raw) = get("COUNSEL_DRAFTING_TIMEOUT_SECS") {
            drafting.timeout_secs = parse("COUNSEL_DRAFTING_TIMEOUT_SECS", raw)?;
        }

        let sweep_secs = match get("COUNSEL_SWEEP_INTERVAL_SECS") {
            Some(raw) => parse("COUNSEL_SWEEP_INTERVAL_SECS", raw)?,
            None => DEFAULT_SWEEP_INTERVAL_SECS,
        };
        if sweep_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "COUNSEL_SWEEP_INTERVAL_SECS",
                reason: "must be greater than zero".into(),
            });
        }

        Ok(Self {
            bind,
            catalog,
            auth,
            drafting,
            sweep_interval: Duration::from_secs(sweep_secs),
        })
    }
}

fn parse<T>(var: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: format!("`{raw}`: {e}"),
    })
}
