use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    config::AppConfig,
    middleware::error_handling::{AppError, Result},
    models::inquiry::CreateInquiryRequest,
    repositories::InquiryRepository,
    services::NotificationService,
};

/// Public inquiry intake. Accepts JSON or multipart form data; a multipart
/// submission may carry one file attachment, saved under the uploads root.
pub async fn submit_inquiry(
    State(config): State<AppConfig>,
    request: Request,
) -> Result<Json<Value>> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    let input = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?;
        parse_multipart(&config, multipart).await?
    } else {
        let Json(input) = Json::<CreateInquiryRequest>::from_request(request, &()).await?;
        input
    };

    input.validate()?;

    let repo = InquiryRepository::new(config.store.clone());
    let inquiry = repo.create(input).await?;

    // Fire and forget - a mail failure never fails the submission
    if let Some(mail_config) = &config.mail {
        let notifier = NotificationService::new(mail_config.clone());
        if let Err(e) = notifier.send_inquiry_alert(&inquiry).await {
            tracing::warn!("Failed to send inquiry notification: {}", e);
        }
    }

    Ok(Json(json!({
        "success": true,
        "message": "Inquiry submitted successfully",
        "inquiryId": inquiry.id
    })))
}

async fn parse_multipart(
    config: &AppConfig,
    mut multipart: Multipart,
) -> Result<CreateInquiryRequest> {
    let mut input = CreateInquiryRequest::default();
    let mut services = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let Some(file_name) = field.file_name().map(ToString::to_string) else {
                    continue;
                };
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid file upload: {e}")))?;
                if !data.is_empty() {
                    let relative = config.uploads.save_attachment(&file_name, &data).await?;
                    input.file_path = Some(relative);
                }
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?;
                match name.as_str() {
                    "name" => input.name = text,
                    "email" => input.email = text,
                    "company" => input.company = non_empty(text),
                    "phone" => input.phone = non_empty(text),
                    "services" => services.push(text),
                    "description" => input.description = text,
                    "hasExistingSystem" => input.has_existing_system = text == "on",
                    "budgetLow" => input.budget_low = parse_amount("budgetLow", text)?,
                    "budgetHigh" => input.budget_high = parse_amount("budgetHigh", text)?,
                    "desiredDate" => input.desired_date = non_empty(text),
                    "templateId" => input.template_id = non_empty(text),
                    _ => {}
                }
            }
        }
    }

    input.services = services;
    Ok(input)
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn parse_amount(field: &str, text: String) -> Result<Option<rust_decimal::Decimal>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("{field} must be a number")))
}
