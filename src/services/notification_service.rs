//! Lead-notification mail.
//!
//! Sends a summary email when a new inquiry arrives. Delivery is best-effort:
//! callers log failures and never fail the submission over them.

use anyhow::anyhow;
use serde_json::json;
use std::time::Duration;

use crate::middleware::error_handling::{AppError, Result};
use crate::models::inquiry::Inquiry;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: String,
    pub recipient: String,
    pub sender: String,
}

pub struct NotificationService {
    http_client: reqwest::Client,
    config: MailConfig,
}

impl NotificationService {
    pub fn new(config: MailConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            config,
        }
    }

    pub async fn send_inquiry_alert(&self, inquiry: &Inquiry) -> Result<()> {
        let response = self
            .http_client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "from": self.config.sender,
                "to": self.config.recipient,
                "subject": format!("New Project Inquiry: {}", inquiry.name),
                "html": render_inquiry_alert(inquiry),
            }))
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow!("mail request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(anyhow!(
                "mail provider returned {}",
                response.status()
            )));
        }

        tracing::info!("Inquiry notification sent for {}", inquiry.id);
        Ok(())
    }
}

fn render_inquiry_alert(inquiry: &Inquiry) -> String {
    let mut html = String::from("<h2>New Project Inquiry</h2>");
    html.push_str(&format!("<p><strong>Name:</strong> {}</p>", inquiry.name));
    html.push_str(&format!("<p><strong>Email:</strong> {}</p>", inquiry.email));
    if let Some(company) = &inquiry.company {
        html.push_str(&format!("<p><strong>Company:</strong> {}</p>", company));
    }
    if let Some(phone) = &inquiry.phone {
        html.push_str(&format!("<p><strong>Phone:</strong> {}</p>", phone));
    }
    html.push_str(&format!(
        "<p><strong>Description:</strong> {}</p>",
        inquiry.description
    ));
    if inquiry.budget_low.is_some() || inquiry.budget_high.is_some() {
        let low = inquiry
            .budget_low
            .map(|v| v.to_string())
            .unwrap_or_else(|| "0".to_string());
        let high = inquiry
            .budget_high
            .map(|v| v.to_string())
            .unwrap_or_else(|| "Unlimited".to_string());
        html.push_str(&format!("<p><strong>Budget:</strong> ${} - ${}</p>", low, high));
    }
    if inquiry.has_existing_system {
        html.push_str("<p><strong>Has Existing System:</strong> Yes</p>");
    }
    if let Some(file_path) = &inquiry.file_path {
        html.push_str(&format!(
            "<p><strong>File Uploaded:</strong> {}</p>",
            file_path
        ));
    }
    if let Some(desired_date) = &inquiry.desired_date {
        html.push_str(&format!(
            "<p><strong>Desired Date:</strong> {}</p>",
            desired_date
        ));
    }
    if let Some(template_id) = &inquiry.template_id {
        html.push_str(&format!(
            "<p><strong>Template:</strong> {}</p>",
            template_id
        ));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::inquiry::InquiryStatus;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn sample_inquiry() -> Inquiry {
        Inquiry {
            id: "inquiry-1".to_string(),
            name: "Dana Smith".to_string(),
            email: "dana@example.com".to_string(),
            company: Some("Sunrise Bakery".to_string()),
            phone: None,
            services: vec!["dashboards".to_string()],
            description: "Weekly sales dashboard".to_string(),
            has_existing_system: true,
            file_path: None,
            budget_low: Some(dec!(500)),
            budget_high: None,
            desired_date: None,
            template_id: None,
            meta: None,
            status: InquiryStatus::New,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            reviewed_at: None,
        }
    }

    #[test]
    fn alert_includes_optional_fields_only_when_present() {
        let html = render_inquiry_alert(&sample_inquiry());
        assert!(html.contains("Dana Smith"));
        assert!(html.contains("Sunrise Bakery"));
        assert!(html.contains("$500 - $Unlimited"));
        assert!(html.contains("Has Existing System"));
        assert!(!html.contains("Phone"));
        assert!(!html.contains("Desired Date"));
    }
}
