use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::middleware::error_handling::AppError;

// Validation functions - defined before the structs that use them
pub fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("positive_amount")
            .with_message("Amount must be a positive number".into()))
    }
}

fn validate_budget_range(request: &CreateInquiryRequest) -> Result<(), ValidationError> {
    match (request.budget_low, request.budget_high) {
        (Some(low), Some(high)) if high < low => Err(ValidationError::new("budget_range")
            .with_message("budgetHigh must be greater than or equal to budgetLow".into())),
        _ => Ok(()),
    }
}

/// Record-level budget invariant, re-checked after an update patch has been
/// merged (a patch may move one bound past the other).
pub fn check_budget_invariant(
    budget_low: Option<Decimal>,
    budget_high: Option<Decimal>,
) -> Result<(), AppError> {
    if let (Some(low), Some(high)) = (budget_low, budget_high) {
        if high < low {
            let mut errors = ValidationErrors::new();
            errors.add(
                "budgetHigh",
                ValidationError::new("budget_range")
                    .with_message("budgetHigh must be greater than or equal to budgetLow".into()),
            );
            return Err(AppError::Validation(errors));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    New,
    Checked,
    Dropped,
}

impl InquiryStatus {
    pub fn is_new(&self) -> bool {
        matches!(self, InquiryStatus::New)
    }
}

impl Default for InquiryStatus {
    fn default() -> Self {
        InquiryStatus::New
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub has_existing_system: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_low: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_high: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_date: Option<String>,
    /// Soft reference to a template id; never checked against the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Stamped once, on the first status transition away from `new`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Generate a fresh time-based inquiry id.
pub fn generate_inquiry_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!(
        "inquiry-{}-{}",
        Utc::now().timestamp_millis(),
        suffix.to_lowercase()
    )
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_budget_range))]
pub struct CreateInquiryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[serde(default)]
    pub name: String,
    #[validate(email(message = "Valid email is required"))]
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[validate(length(min = 10, message = "Phone number must be at least 10 digits"))]
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub has_existing_system: bool,
    #[serde(default)]
    pub file_path: Option<String>,
    #[validate(custom(function = validate_positive_amount))]
    #[serde(default, deserialize_with = "super::opt_decimal_flex")]
    pub budget_low: Option<Decimal>,
    #[validate(custom(function = validate_positive_amount))]
    #[serde(default, deserialize_with = "super::opt_decimal_flex")]
    pub budget_high: Option<Decimal>,
    #[serde(default)]
    pub desired_date: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInquiryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(email(message = "Valid email is required"))]
    pub email: Option<String>,
    pub company: Option<String>,
    #[validate(length(min = 10, message = "Phone number must be at least 10 digits"))]
    pub phone: Option<String>,
    pub services: Option<Vec<String>>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,
    pub has_existing_system: Option<bool>,
    pub file_path: Option<String>,
    #[validate(custom(function = validate_positive_amount))]
    #[serde(default, deserialize_with = "super::opt_decimal_flex")]
    pub budget_low: Option<Decimal>,
    #[validate(custom(function = validate_positive_amount))]
    #[serde(default, deserialize_with = "super::opt_decimal_flex")]
    pub budget_high: Option<Decimal>,
    pub desired_date: Option<String>,
    pub template_id: Option<String>,
    pub meta: Option<serde_json::Value>,
    pub status: Option<InquiryStatus>,
}
