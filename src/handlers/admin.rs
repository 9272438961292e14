//! Gated admin CRUD for the three collections. The gate middleware has
//! already resolved the caller before any handler here runs.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    config::AppConfig,
    middleware::error_handling::{AppError, Result},
    models::{
        inquiry::{CreateInquiryRequest, Inquiry, InquiryStatus, UpdateInquiryRequest},
        portfolio::{CreateProjectRequest, PortfolioProject, UpdateProjectRequest},
        template::{CreateTemplateRequest, Template, UpdateTemplateRequest},
    },
    repositories::{InquiryRepository, PortfolioRepository, TemplateRepository},
};

#[derive(Debug, Deserialize)]
pub struct InquiryListQuery {
    pub q: Option<String>,
    pub status: Option<InquiryStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogListQuery {
    pub q: Option<String>,
    pub active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Inquiries
// ---------------------------------------------------------------------------

pub async fn list_inquiries(
    State(config): State<AppConfig>,
    Query(params): Query<InquiryListQuery>,
) -> Result<Json<Vec<Inquiry>>> {
    let repo = InquiryRepository::new(config.store.clone());
    Ok(Json(repo.search(params.q.as_deref(), params.status).await?))
}

/// Admin-side inquiry entry (phoned-in leads and the like).
pub async fn create_inquiry(
    State(config): State<AppConfig>,
    Json(request): Json<CreateInquiryRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    request.validate()?;

    let repo = InquiryRepository::new(config.store.clone());
    let inquiry = repo.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "id": inquiry.id, "inquiry": inquiry })),
    ))
}

pub async fn get_inquiry(
    State(config): State<AppConfig>,
    Path(id): Path<String>,
) -> Result<Json<Inquiry>> {
    let repo = InquiryRepository::new(config.store.clone());
    let inquiry = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))?;
    Ok(Json(inquiry))
}

/// Shallow-merge patch; a body of just `{"status": "checked"}` is the quick
/// accept/decline action.
pub async fn update_inquiry(
    State(config): State<AppConfig>,
    Path(id): Path<String>,
    Json(request): Json<UpdateInquiryRequest>,
) -> Result<Json<Inquiry>> {
    request.validate()?;

    let repo = InquiryRepository::new(config.store.clone());
    Ok(Json(repo.update(&id, request).await?))
}

pub async fn delete_inquiry(
    State(config): State<AppConfig>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let repo = InquiryRepository::new(config.store.clone());
    repo.delete(&id).await?;
    Ok(Json(json!({ "ok": true })))
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

pub async fn list_templates(
    State(config): State<AppConfig>,
    Query(params): Query<CatalogListQuery>,
) -> Result<Json<Vec<Template>>> {
    let repo = TemplateRepository::new(config.store.clone());
    Ok(Json(repo.search(params.q.as_deref(), params.active).await?))
}

pub async fn create_template(
    State(config): State<AppConfig>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    request.validate()?;

    let repo = TemplateRepository::new(config.store.clone());
    let template = repo.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "id": template.id, "template": template })),
    ))
}

/// Admin lookup sees unpublished records too.
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

pub async fn update_template(
    State(config): State<AppConfig>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<Template>> {
    request.validate()?;

    let repo = TemplateRepository::new(config.store.clone());
    Ok(Json(repo.update(&id, request).await?))
}

pub async fn delete_template(
    State(config): State<AppConfig>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let repo = TemplateRepository::new(config.store.clone());
    repo.delete(&id).await?;
    Ok(Json(json!({ "ok": true })))
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

pub async fn list_projects(
    State(config): State<AppConfig>,
    Query(params): Query<CatalogListQuery>,
) -> Result<Json<Vec<PortfolioProject>>> {
    let repo = PortfolioRepository::new(config.store.clone());
    Ok(Json(repo.search(params.q.as_deref(), params.active).await?))
}

pub async fn create_project(
    State(config): State<AppConfig>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    request.validate()?;

    let repo = PortfolioRepository::new(config.store.clone());
    let project = repo.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "id": project.id, "project": project })),
    ))
}

pub async fn get_project(
    State(config): State<AppConfig>,
    Path(id): Path<String>,
) -> Result<Json<PortfolioProject>> {
    let repo = PortfolioRepository::new(config.store.clone());
    let project = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Portfolio project not found".to_string()))?;
    Ok(Json(project))
}

pub async fn update_project(
    State(config): State<AppConfig>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<PortfolioProject>> {
    request.validate()?;

    let repo = PortfolioRepository::new(config.store.clone());
    Ok(Json(repo.update(&id, request).await?))
}

pub async fn delete_project(
    State(config): State<AppConfig>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let repo = PortfolioRepository::new(config.store.clone());
    repo.delete(&id).await?;
    Ok(Json(json!({ "ok": true })))
}
