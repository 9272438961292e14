pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod store;
pub mod utils;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state, Next},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use config::AppConfig;
use middleware::auth::admin_gate;

pub fn create_app(config: AppConfig) -> Router {
    let cors_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(header_val) => Some(header_val),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(cors_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_credentials(true) // Required for httpOnly session cookies
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE]);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/login", get(handlers::pages::login_page))
        // Admin UI pages: the gate redirects unauthenticated browsers to /login
        .nest(
            "/admin",
            Router::new()
                .route("/", get(handlers::pages::admin_page))
                // Client-side admin routes all serve the same shell
                .fallback(handlers::pages::admin_page)
                .layer(from_fn_with_state(config.clone(), admin_gate)),
        )
        .nest(
            "/api",
            Router::new()
                // Public routes (no auth required)
                .route("/inquire", post(handlers::inquiries::submit_inquiry))
                .route("/templates", get(handlers::templates::list_active_templates))
                .route("/templates/:id", get(handlers::templates::get_template))
                .route("/portfolio", get(handlers::portfolio::list_active_projects))
                .route("/portfolio/:id", get(handlers::portfolio::get_project))
                // Auth endpoints (never behind the gate)
                .route("/login", post(handlers::auth::login))
                .route(
                    "/logout",
                    post(handlers::auth::logout).get(handlers::auth::logout),
                )
                .route("/auth/oauth", get(handlers::auth::oauth_start))
                .route("/auth/oauth/callback", get(handlers::auth::oauth_callback))
                // Admin API (auth required on every route)
                .nest(
                    "/admin",
                    Router::new()
                        .route(
                            "/inquiries",
                            get(handlers::admin::list_inquiries)
                                .post(handlers::admin::create_inquiry),
                        )
                        .route(
                            "/inquiries/:id",
                            get(handlers::admin::get_inquiry)
                                .patch(handlers::admin::update_inquiry)
                                .delete(handlers::admin::delete_inquiry),
                        )
                        .route(
                            "/templates",
                            get(handlers::admin::list_templates)
                                .post(handlers::admin::create_template),
                        )
                        .route(
                            "/templates/:id",
                            get(handlers::admin::get_template)
                                .patch(handlers::admin::update_template)
                                .delete(handlers::admin::delete_template),
                        )
                        .route(
                            "/portfolio",
                            get(handlers::admin::list_projects)
                                .post(handlers::admin::create_project),
                        )
                        .route(
                            "/portfolio/:id",
                            get(handlers::admin::get_project)
                                .patch(handlers::admin::update_project)
                                .delete(handlers::admin::delete_project),
                        )
                        .route("/files/*path", get(handlers::files::serve_upload))
                        .fallback(handlers::api_not_found)
                        .layer(from_fn_with_state(config.clone(), admin_gate)),
                ),
        )
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(config)
        .layer(from_fn(|req: Request, next: Next| async move {
            tracing::info!("{} {}", req.method(), req.uri());
            let response = next.run(req).await;
            tracing::info!("Response status: {}", response.status());
            response
        }))
}
