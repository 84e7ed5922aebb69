use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const CLIENT_ID_VAR: &str = "SPOTIPY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIPY_CLIENT_SECRET";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // Upstream endpoints; overridable so tests can point at a mock server.
    #[serde(default = "default_auth_base")]
    pub auth_base: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Tokens this close to expiry are treated as expired.
    #[serde(default = "default_token_expiry_margin")]
    pub token_expiry_margin_secs: i64,

    /// When set, logs are also written to a daily-rotated file in this directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_bind_addr() -> String { "0.0.0.0:8000".into() }
fn default_auth_base() -> String { "https://accounts.spotify.com".into() }
fn default_api_base() -> String { "https://api.spotify.com/v1".into() }
fn default_request_timeout() -> u64 { 5 }
fn default_token_expiry_margin() -> i64 { 60 }

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            auth_base: default_auth_base(),
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout(),
            token_expiry_margin_secs: default_token_expiry_margin(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// SPOTIFY_AUTH_BASE / SPOTIFY_API_BASE win over the file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|k| env::var(k).ok());
    }

    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SPOTIFY_AUTH_BASE").filter(|v| !v.is_empty()) {
            self.auth_base = v;
        }
        if let Some(v) = lookup("SPOTIFY_API_BASE").filter(|v| !v.is_empty()) {
            self.api_base = v;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Run again after `apply_env_overrides`, which can replace the bases.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (key, value) in [("auth_base", &self.auth_base), ("api_base", &self.api_base)] {
            url::Url::parse(value)
                .map_err(|e| anyhow::anyhow!("invalid {} {:?}: {}", key, value, e))?;
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

/// Client id/secret pair used for the client-credentials grant.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Both values must be present and non-empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup(CLIENT_ID_VAR).unwrap_or_default();
        let client_secret = lookup(CLIENT_SECRET_VAR).unwrap_or_default();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(Self {
            client_id,
            client_secret,
        })
    }
}
