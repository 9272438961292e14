use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::config::AppConfig;
use crate::middleware::error_handling::{AppError, Result};

pub const SESSION_COOKIE: &str = "session";

/// Session lifetime: 7 days.
const SESSION_TTL_SECS: usize = 7 * 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// The caller resolved by the gate; inserted into request extensions for
/// downstream handlers.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub id: String,
    pub email: Option<String>,
}

/// Signs and verifies the session cookie's token.
#[derive(Clone)]
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }

    pub fn issue_admin_token(
        &self,
        email: Option<String>,
    ) -> std::result::Result<String, jsonwebtoken::errors::Error> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;

        let claims = Claims {
            sub: "admin".to_string(),
            role: "admin".to_string(),
            email,
            exp: now + SESSION_TTL_SECS,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn verify(
        &self,
        token: &str,
    ) -> std::result::Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
    }
}

/// Credential-pair login issuing signed session tokens.
pub struct CredentialsAuthenticator {
    username: String,
    password: String,
    sessions: SessionService,
}

impl CredentialsAuthenticator {
    pub fn new(username: String, password: String, sessions: SessionService) -> Self {
        Self {
            username,
            password,
            sessions,
        }
    }

    /// Constant-time comparison of both parts so a mismatch reveals nothing
    /// about how far the match got.
    pub fn verify_login(&self, username: &str, password: &str) -> bool {
        let username_ok = username.as_bytes().ct_eq(self.username.as_bytes());
        let password_ok = password.as_bytes().ct_eq(self.password.as_bytes());
        bool::from(username_ok & password_ok)
    }

    pub fn issue_session(&self) -> Result<String> {
        Ok(self.sessions.issue_admin_token(None)?)
    }
}

/// Provider-delegated sign-in: identity proof comes from OAuth, the gate only
/// adds the allow-list check.
pub struct ProviderAuthenticator {
    allow_list: Vec<String>,
    sessions: SessionService,
}

impl ProviderAuthenticator {
    pub fn new(allow_list: Vec<String>, sessions: SessionService) -> Self {
        Self {
            allow_list,
            sessions,
        }
    }

    /// Case-insensitive allow-list membership. An unconfigured list rejects
    /// everyone.
    pub fn is_allowed(&self, email: &str) -> bool {
        if self.allow_list.is_empty() {
            tracing::warn!("Admin allow-list is not configured; rejecting sign-in");
            return false;
        }
        let email = email.to_lowercase();
        self.allow_list.iter().any(|allowed| *allowed == email)
    }

    pub fn issue_session(&self, email: String) -> Result<String> {
        Ok(self.sessions.issue_admin_token(Some(email))?)
    }
}

/// One authentication strategy is active per deployment.
pub enum Authenticator {
    Credentials(CredentialsAuthenticator),
    Provider(ProviderAuthenticator),
}

impl Authenticator {
    /// Resolve the caller from the session cookie. Missing cookie, bad
    /// signature, expiry and wrong role are one uniform failure.
    pub fn authenticate(&self, jar: &CookieJar) -> Result<AdminIdentity> {
        let token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(AppError::Unauthorized)?;

        let claims = self
            .sessions()
            .verify(&token)
            .map_err(|_| AppError::Unauthorized)?;

        if !claims.is_admin() {
            return Err(AppError::Unauthorized);
        }

        Ok(AdminIdentity {
            id: claims.sub,
            email: claims.email,
        })
    }

    fn sessions(&self) -> &SessionService {
        match self {
            Authenticator::Credentials(auth) => &auth.sessions,
            Authenticator::Provider(auth) => &auth.sessions,
        }
    }
}

/// Gate for every admin-prefixed route: unauthenticated browsers are sent to
/// the login page, API callers get a structured 401. The downstream handler
/// never runs on failure.
pub async fn admin_gate(
    State(config): State<AppConfig>,
    OriginalUri(uri): OriginalUri,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match config.auth.authenticator().authenticate(&jar) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(_) => {
            tracing::debug!("Admin access denied for {}", uri.path());
            if uri.path().starts_with("/api/") {
                AppError::Unauthorized.into_response()
            } else {
                Redirect::to("/login").into_response()
            }
        }
    }
}
