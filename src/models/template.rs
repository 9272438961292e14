use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_positive_amount;

/// Catalog ids are url-safe slugs.
pub static KEBAB_CASE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9-]+$").expect("kebab-case id pattern is valid")
});

/// Shown until an admin uploads a real cover image.
pub const DEFAULT_COVER: &str = "https://picsum.photos/seed/template/600";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub short_desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_desc: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub cover: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_url: Option<String>,
    /// Templates stay unpublished until explicitly activated.
    #[serde(default)]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    #[validate(
        length(min = 1, message = "ID is required"),
        regex(
            path = *KEBAB_CASE_ID,
            message = "ID must be kebab-case (lowercase, numbers, hyphens only)"
        )
    )]
    pub id: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(custom(function = validate_positive_amount))]
    #[serde(deserialize_with = "super::decimal_flex")]
    pub price: Decimal,
    #[validate(length(min = 1, message = "Short description is required"))]
    pub short_desc: String,
    #[serde(default)]
    pub long_desc: Option<String>,
    #[serde(default, deserialize_with = "super::string_or_vec")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "super::string_or_vec")]
    pub use_cases: Vec<String>,
    #[serde(default, deserialize_with = "super::string_or_vec")]
    pub images: Vec<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub purchase_url: Option<String>,
    #[serde(default)]
    pub buy_url: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(custom(function = validate_positive_amount))]
    #[serde(default, deserialize_with = "super::opt_decimal_flex")]
    pub price: Option<Decimal>,
    #[validate(length(min = 1, message = "Short description is required"))]
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    #[serde(default, deserialize_with = "super::opt_string_or_vec")]
    pub features: Option<Vec<String>>,
    #[serde(default, deserialize_with = "super::opt_string_or_vec")]
    pub use_cases: Option<Vec<String>>,
    #[serde(default, deserialize_with = "super::opt_string_or_vec")]
    pub images: Option<Vec<String>>,
    pub cover: Option<String>,
    pub preview_url: Option<String>,
    pub purchase_url: Option<String>,
    pub buy_url: Option<String>,
    pub active: Option<bool>,
}
