//! OAuth 2.0 sign-in against Google.
//!
//! Identity proof is fully delegated to the provider: this service only
//! builds the authorization redirect, exchanges the callback code and returns
//! the verified email. The allow-list decision belongs to the authenticator.

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::middleware::error_handling::{AppError, Result};

const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
}

pub struct OAuthService {
    http_client: reqwest::Client,
    config: OAuthConfig,
    redirect_uri: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
}

impl OAuthService {
    pub fn new(config: OAuthConfig, base_url: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            config,
            redirect_uri: format!("{}/api/auth/oauth/callback", base_url.trim_end_matches('/')),
        }
    }

    /// Provider authorization URL carrying the anti-forgery state.
    pub fn authorize_url(&self, state: &str) -> Result<String> {
        let mut url = Url::parse(GOOGLE_AUTH_ENDPOINT)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("bad authorize endpoint: {e}")))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "openid email profile")
            .append_pair("state", state)
            .append_pair("prompt", "select_account");
        Ok(url.into())
    }

    /// Exchange the callback code and fetch the provider-verified email.
    pub async fn fetch_email(&self, code: &str) -> Result<String> {
        let response = self
            .http_client
            .post(GOOGLE_TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OAuth token exchange request failed: {}", e);
                AppError::Unauthorized
            })?;

        if !response.status().is_success() {
            tracing::warn!("OAuth token exchange rejected: {}", response.status());
            return Err(AppError::Unauthorized);
        }

        let tokens: TokenResponse = response.json().await.map_err(|e| {
            tracing::error!("OAuth token response was malformed: {}", e);
            AppError::Unauthorized
        })?;

        let user_info: UserInfo = self
            .http_client
            .get(GOOGLE_USERINFO_ENDPOINT)
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OAuth userinfo request failed: {}", e);
                AppError::Unauthorized
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::error!("OAuth userinfo response was malformed: {}", e);
                AppError::Unauthorized
            })?;

        user_info.email.ok_or_else(|| {
            tracing::warn!("OAuth provider returned no email address");
            AppError::Unauthorized
        })
    }
}
