use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::template::KEBAB_CASE_ID;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioProject {
    pub id: String,
    pub title: String,
    pub short_desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_desc: Option<String>,
    pub cover: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    /// Projects are visible unless explicitly deactivated.
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(
        length(min = 1, message = "ID is required"),
        regex(
            path = *KEBAB_CASE_ID,
            message = "ID must be kebab-case (lowercase, numbers, hyphens only)"
        )
    )]
    pub id: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Short description is required"))]
    pub short_desc: String,
    #[serde(default)]
    pub long_desc: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "super::string_or_vec")]
    pub images: Vec<String>,
    #[serde(default)]
    pub sheet_url: Option<String>,
    #[serde(default)]
    pub buy_url: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "super::string_or_vec")]
    pub use_cases: Vec<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Short description is required"))]
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
    pub cover: Option<String>,
    #[serde(default, deserialize_with = "super::opt_string_or_vec")]
    pub images: Option<Vec<String>>,
    pub sheet_url: Option<String>,
    pub buy_url: Option<String>,
    pub preview_url: Option<String>,
    #[serde(default, deserialize_with = "super::opt_string_or_vec")]
    pub use_cases: Option<Vec<String>>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_case_project_id_is_required() {
        let request: CreateProjectRequest = serde_json::from_value(serde_json::json!({
            "id": "Bakery Dashboard",
            "title": "Bakery Dashboard",
            "shortDesc": "Weekly sales dashboard for a bakery"
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn record_defaults_to_active_when_field_absent() {
        let project: PortfolioProject = serde_json::from_value(serde_json::json!({
            "id": "bakery-dashboard",
            "title": "Bakery Dashboard",
            "shortDesc": "Weekly sales dashboard",
            "cover": "https://example.com/cover.png",
            "createdAt": "2026-01-05T09:00:00Z",
            "updatedAt": "2026-01-05T09:00:00Z"
        }))
        .unwrap();
        assert!(project.active);
    }
}
