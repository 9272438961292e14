use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    config::AppConfig,
    middleware::error_handling::{AppError, Result},
    models::portfolio::PortfolioProject,
    repositories::PortfolioRepository,
};

/// Public portfolio: visible projects only.
pub async fn list_active_projects(
    State(config): State<AppConfig>,
) -> Result<Json<Vec<PortfolioProject>>> {
    let repo = PortfolioRepository::new(config.store.clone());
    Ok(Json(repo.get_active().await?))
}

/// Public detail lookup; deactivated projects 404 here (unlike templates).
pub async fn get_project(
    State(config): State<AppConfig>,
    Path(id): Path<String>,
) -> Result<Json<PortfolioProject>> {
    let repo = PortfolioRepository::new(config.store.clone());
    let project = repo
        .find_by_id(&id)
        .await?
        .filter(|p| p.active)
        .ok_or_else(|| AppError::NotFound("Portfolio project not found".to_string()))?;
    Ok(Json(project))
}
