use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    config::AppConfig,
    middleware::error_handling::{AppError, Result},
    models::template::Template,
    repositories::TemplateRepository,
};

/// Public catalog: published templates only.
pub async fn list_active_templates(State(config): State<AppConfig>) -> Result<Json<Vec<Template>>> {
    let repo = TemplateRepository::new(config.store.clone());
    Ok(Json(repo.get_active().await?))
}

/// Public detail page lookup. Unpublished templates stay reachable by direct
/// id so drafts can be previewed from a shared link.
pub async fn get_template(
    State(config): State<AppConfig>,
    Path(id): Path<String>,
) -> Result<Json<Template>> {
    let repo = TemplateRepository::new(config.store.clone());
    let template = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Template not found".to_string()))?;
    Ok(Json(template))
}
