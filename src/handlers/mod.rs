pub mod admin;
pub mod auth;
pub mod files;
pub mod inquiries;
pub mod pages;
pub mod portfolio;
pub mod templates;

use axum::Json;
use serde_json::{json, Value};

use crate::middleware::error_handling::AppError;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "sheetsmith"
    }))
}

/// Fallback for unmatched admin API paths; runs behind the gate like every
/// other admin route.
pub async fn api_not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}
