use chrono::Utc;

use crate::middleware::error_handling::{AppError, Result};
use crate::models::inquiry::{
    check_budget_invariant, generate_inquiry_id, CreateInquiryRequest, Inquiry, InquiryStatus,
    UpdateInquiryRequest,
};
use crate::store::DocumentStore;

/// Collection key for inquiries in the document store.
pub const LEADS_COLLECTION: &str = "leads";

pub struct InquiryRepository {
    store: DocumentStore,
}

impl InquiryRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// All inquiries, newest first.
    pub async fn get_all(&self) -> Result<Vec<Inquiry>> {
        let mut inquiries = self.load().await?;
        inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inquiries)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>> {
        Ok(self.load().await?.into_iter().find(|i| i.id == id))
    }

    pub async fn create(&self, input: CreateInquiryRequest) -> Result<Inquiry> {
        let mut inquiries = self.load().await?;
        let now = Utc::now();

        let inquiry = Inquiry {
            id: generate_inquiry_id(),
            name: input.name,
            email: input.email,
            company: input.company,
            phone: input.phone,
            services: input.services,
            description: input.description,
            has_existing_system: input.has_existing_system,
            file_path: input.file_path,
            budget_low: input.budget_low,
            budget_high: input.budget_high,
            desired_date: input.desired_date,
            template_id: input.template_id,
            meta: input.meta,
            status: InquiryStatus::New,
            created_at: now,
            updated_at: now,
            reviewed_at: None,
        };

        inquiries.push(inquiry.clone());
        self.store.write(LEADS_COLLECTION, &inquiries).await?;

        Ok(inquiry)
    }

    /// Shallow-merge `patch` over the stored record. A status transition away
    /// from `new` stamps `reviewed_at` the first time it happens.
    pub async fn update(&self, id: &str, patch: UpdateInquiryRequest) -> Result<Inquiry> {
        let mut inquiries = self.load().await?;
        let now = Utc::now();

        let inquiry = inquiries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))?;

        if let Some(name) = patch.name {
            inquiry.name = name;
        }
        if let Some(email) = patch.email {
            inquiry.email = email;
        }
        if let Some(company) = patch.company {
            inquiry.company = Some(company);
        }
        if let Some(phone) = patch.phone {
            inquiry.phone = Some(phone);
        }
        if let Some(services) = patch.services {
            inquiry.services = services;
        }
        if let Some(description) = patch.description {
            inquiry.description = description;
        }
        if let Some(has_existing_system) = patch.has_existing_system {
            inquiry.has_existing_system = has_existing_system;
        }
        if let Some(file_path) = patch.file_path {
            inquiry.file_path = Some(file_path);
        }
        if let Some(budget_low) = patch.budget_low {
            inquiry.budget_low = Some(budget_low);
        }
        if let Some(budget_high) = patch.budget_high {
            inquiry.budget_high = Some(budget_high);
        }
        if let Some(desired_date) = patch.desired_date {
            inquiry.desired_date = Some(desired_date);
        }
        if let Some(template_id) = patch.template_id {
            inquiry.template_id = Some(template_id);
        }
        if let Some(meta) = patch.meta {
            inquiry.meta = Some(meta);
        }
        if let Some(status) = patch.status {
            if inquiry.status.is_new() && !status.is_new() && inquiry.reviewed_at.is_none() {
                inquiry.reviewed_at = Some(now);
            }
            inquiry.status = status;
        }

        check_budget_invariant(inquiry.budget_low, inquiry.budget_high)?;

        inquiry.updated_at = now;
        let updated = inquiry.clone();

        self.store.write(LEADS_COLLECTION, &inquiries).await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut inquiries = self.load().await?;
        let before = inquiries.len();
        inquiries.retain(|i| i.id != id);

        if inquiries.len() == before {
            return Err(AppError::NotFound("Inquiry not found".to_string()));
        }

        self.store.write(LEADS_COLLECTION, &inquiries).await
    }

    /// Case-insensitive substring match over name, email and description,
    /// optionally pre-filtered by status. Results stay newest-first.
    pub async fn search(
        &self,
        term: Option<&str>,
        status: Option<InquiryStatus>,
    ) -> Result<Vec<Inquiry>> {
        let mut inquiries = self.get_all().await?;

        if let Some(status) = status {
            inquiries.retain(|i| i.status == status);
        }

        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            inquiries.retain(|i| {
                i.name.to_lowercase().contains(&term)
                    || i.email.to_lowercase().contains(&term)
                    || i.description.to_lowercase().contains(&term)
            });
        }

        Ok(inquiries)
    }

    async fn load(&self) -> Result<Vec<Inquiry>> {
        Ok(self.store.read(LEADS_COLLECTION).await?.into_records())
    }
}
