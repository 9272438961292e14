use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AppConfig,
    middleware::{
        auth::{Authenticator, SESSION_COOKIE},
        error_handling::{AppError, Result},
    },
    services::OAuthService,
};

const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Session cookie: http-only against XSS, SameSite=Lax against CSRF, Secure
/// in production, 7-day lifetime matching the token expiry.
fn create_session_cookie(token: String, is_production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .max_age(Duration::days(7))
        .http_only(true)
        .secure(is_production)
        .same_site(SameSite::Lax)
        .build()
}

/// Logout cookie (expires immediately). This only clears the client's copy:
/// an already-issued token stays verifiable until its natural expiry.
fn create_logout_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn create_state_cookie(state: String, is_production: bool) -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, state))
        .path("/")
        .max_age(Duration::minutes(10))
        .http_only(true)
        .secure(is_production)
        .same_site(SameSite::Lax)
        .build()
}

fn clear_state_cookie() -> Cookie<'static> {
    Cookie::build((OAUTH_STATE_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .build()
}

fn with_cookie(mut response: Response, cookie: Cookie<'static>) -> Response {
    response.headers_mut().append(
        header::SET_COOKIE,
        cookie.to_string().parse().unwrap(),
    );
    response
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

pub async fn login(
    State(config): State<AppConfig>,
    Json(request): Json<LoginRequest>,
) -> Result<Response> {
    request.validate()?;

    let Authenticator::Credentials(auth) = config.auth.authenticator() else {
        return Err(AppError::BadRequest(
            "Credential login is disabled for this deployment".to_string(),
        ));
    };

    if !auth.verify_login(&request.username, &request.password) {
        tracing::warn!("Rejected admin login attempt");
        return Err(AppError::Unauthorized);
    }

    let token = auth.issue_session()?;
    let cookie = create_session_cookie(token, config.is_production());

    Ok(with_cookie(Redirect::to("/admin").into_response(), cookie))
}

pub async fn logout() -> Response {
    with_cookie(Redirect::to("/").into_response(), create_logout_cookie())
}

/// Start provider sign-in: remember a random state in a short-lived cookie
/// and send the browser to the provider.
pub async fn oauth_start(State(config): State<AppConfig>) -> Result<Response> {
    let Some(oauth_config) = config.auth.oauth.clone() else {
        return Err(AppError::BadRequest(
            "OAuth sign-in is not configured".to_string(),
        ));
    };

    let state = Uuid::new_v4().to_string();
    let service = OAuthService::new(oauth_config, &config.base_url);
    let authorize_url = service.authorize_url(&state)?;

    Ok(with_cookie(
        Redirect::to(&authorize_url).into_response(),
        create_state_cookie(state, config.is_production()),
    ))
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: String,
    pub state: String,
}

/// Finish provider sign-in: validate state, exchange the code, check the
/// returned email against the admin allow-list, then issue our own session.
pub async fn oauth_callback(
    State(config): State<AppConfig>,
    jar: CookieJar,
    Query(params): Query<OAuthCallbackParams>,
) -> Result<Response> {
    let Authenticator::Provider(auth) = config.auth.authenticator() else {
        return Err(AppError::BadRequest(
            "OAuth sign-in is not configured".to_string(),
        ));
    };
    let Some(oauth_config) = config.auth.oauth.clone() else {
        return Err(AppError::BadRequest(
            "OAuth sign-in is not configured".to_string(),
        ));
    };

    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AppError::Unauthorized)?;
    if expected_state != params.state {
        tracing::warn!("OAuth callback with mismatched state");
        return Err(AppError::Unauthorized);
    }

    let service = OAuthService::new(oauth_config, &config.base_url);
    let email = service.fetch_email(&params.code).await?;

    if !auth.is_allowed(&email) {
        tracing::warn!("Access denied for email: {}", email);
        return Err(AppError::Unauthorized);
    }

    let token = auth.issue_session(email)?;
    let response = with_cookie(
        Redirect::to("/admin").into_response(),
        create_session_cookie(token, config.is_production()),
    );
    Ok(with_cookie(response, clear_state_cookie()))
}
