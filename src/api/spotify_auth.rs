use crate::config::Credentials;
use crate::error::FetchError;
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use log::debug;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;

/// A bearer token obtained through the client-credentials grant.
#[derive(Clone)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: i64, // epoch seconds
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl AccessToken {
    pub fn is_expired(&self, margin_secs: i64) -> bool {
        Utc::now().timestamp() + margin_secs >= self.expires_at
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    expires_in: i64,
}

fn default_token_type() -> String {
    "Bearer".into()
}

/// Issues and caches app tokens. The cache is the only mutable state shared
/// between requests.
pub struct TokenProvider {
    client: Client,
    credentials: Credentials,
    auth_base: String,
    expiry_margin_secs: i64,
    token: tokio::sync::Mutex<Option<AccessToken>>,
}

impl TokenProvider {
    pub fn new(
        client: Client,
        credentials: Credentials,
        auth_base: impl Into<String>,
        expiry_margin_secs: i64,
    ) -> Self {
        Self {
            client,
            credentials,
            auth_base: auth_base.into().trim_end_matches('/').to_string(),
            expiry_margin_secs,
            token: tokio::sync::Mutex::new(None),
        }
    }

    /// Return the cached token, requesting a new one when it is missing or
    /// about to expire. The lock is held across the request, so callers
    /// racing on an expired token share one refresh.
    pub async fn get_valid_token(&self) -> Result<AccessToken, FetchError> {
        let mut lock = self.token.lock().await;
        if let Some(st) = &*lock {
            if !st.is_expired(self.expiry_margin_secs) {
                return Ok(st.clone());
            }
            debug!("Spotify app token is near expiry, requesting a new one");
        }
        let fresh = self.request_token().await?;
        *lock = Some(fresh.clone());
        Ok(fresh)
    }

    async fn request_token(&self) -> Result<AccessToken, FetchError> {
        let auth_header = format!(
            "Basic {}",
            general_purpose::STANDARD.encode(format!(
                "{}:{}",
                self.credentials.client_id, self.credentials.client_secret
            ))
        );
        let url = format!("{}/api/token", self.auth_base);
        let resp = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth_header)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::internal(format!(
                "token request failed: {} => {}",
                status, body
            )));
        }
        let body = resp.text().await?;
        let tr: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| FetchError::internal(format!("parse token response: {}", e)))?;
        debug!("obtained Spotify app token valid for {}s", tr.expires_in);
        Ok(AccessToken {
            access_token: tr.access_token,
            token_type: tr.token_type,
            expires_at: Utc::now().timestamp() + tr.expires_in,
        })
    }
}
