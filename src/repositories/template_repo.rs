use chrono::Utc;

use crate::middleware::error_handling::{AppError, Result};
use crate::models::template::{
    CreateTemplateRequest, Template, UpdateTemplateRequest, DEFAULT_COVER,
};
use crate::store::DocumentStore;

/// Collection key for templates in the document store.
pub const TEMPLATES_COLLECTION: &str = "templates";

pub struct TemplateRepository {
    store: DocumentStore,
}

impl TemplateRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// All templates in insertion order.
    pub async fn get_all(&self) -> Result<Vec<Template>> {
        Ok(self.store.read(TEMPLATES_COLLECTION).await?.into_records())
    }

    /// Published templates only; the public catalog never sees the rest.
    pub async fn get_active(&self) -> Result<Vec<Template>> {
        let mut templates = self.get_all().await?;
        templates.retain(|t| t.active);
        Ok(templates)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Template>> {
        Ok(self.get_all().await?.into_iter().find(|t| t.id == id))
    }

    pub async fn create(&self, input: CreateTemplateRequest) -> Result<Template> {
        let mut templates = self.get_all().await?;

        if templates.iter().any(|t| t.id == input.id) {
            return Err(AppError::Conflict(
                "Template with this ID already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let template = Template {
            id: input.id,
            name: input.name,
            price: input.price,
            short_desc: input.short_desc,
            long_desc: input.long_desc,
            features: input.features,
            use_cases: input.use_cases,
            images: input.images,
            cover: input.cover.unwrap_or_else(|| DEFAULT_COVER.to_string()),
            preview_url: input.preview_url,
            purchase_url: input.purchase_url,
            buy_url: input.buy_url,
            active: input.active.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        templates.push(template.clone());
        self.store.write(TEMPLATES_COLLECTION, &templates).await?;

        Ok(template)
    }

    pub async fn update(&self, id: &str, patch: UpdateTemplateRequest) -> Result<Template> {
        let mut templates = self.get_all().await?;

        let template = templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::NotFound("Template not found".to_string()))?;

        if let Some(name) = patch.name {
            template.name = name;
        }
        if let Some(price) = patch.price {
            template.price = price;
        }
        if let Some(short_desc) = patch.short_desc {
            template.short_desc = short_desc;
        }
        if let Some(long_desc) = patch.long_desc {
            template.long_desc = Some(long_desc);
        }
        if let Some(features) = patch.features {
            template.features = features;
        }
        if let Some(use_cases) = patch.use_cases {
            template.use_cases = use_cases;
        }
        if let Some(images) = patch.images {
            template.images = images;
        }
        if let Some(cover) = patch.cover {
            template.cover = cover;
        }
        if let Some(preview_url) = patch.preview_url {
            template.preview_url = Some(preview_url);
        }
        if let Some(purchase_url) = patch.purchase_url {
            template.purchase_url = Some(purchase_url);
        }
        if let Some(buy_url) = patch.buy_url {
            template.buy_url = Some(buy_url);
        }
        if let Some(active) = patch.active {
            template.active = active;
        }

        template.updated_at = Utc::now();
        let updated = template.clone();

        self.store.write(TEMPLATES_COLLECTION, &templates).await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut templates = self.get_all().await?;
        let before = templates.len();
        templates.retain(|t| t.id != id);

        if templates.len() == before {
            return Err(AppError::NotFound("Template not found".to_string()));
        }

        self.store.write(TEMPLATES_COLLECTION, &templates).await
    }

    /// Case-insensitive substring match over name, descriptions, features and
    /// use cases, optionally pre-filtered by the active flag.
    pub async fn search(&self, term: Option<&str>, active: Option<bool>) -> Result<Vec<Template>> {
        let mut templates = self.get_all().await?;

        if let Some(active) = active {
            templates.retain(|t| t.active == active);
        }

        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            templates.retain(|t| {
                t.name.to_lowercase().contains(&term)
                    || t.short_desc.to_lowercase().contains(&term)
                    || t.long_desc
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
                    || t.features.iter().any(|f| f.to_lowercase().contains(&term))
                    || t.use_cases.iter().any(|u| u.to_lowercase().contains(&term))
            });
        }

        Ok(templates)
    }
}
