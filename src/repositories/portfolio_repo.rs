use chrono::Utc;

use crate::middleware::error_handling::{AppError, Result};
use crate::models::portfolio::{CreateProjectRequest, PortfolioProject, UpdateProjectRequest};
use crate::models::template::DEFAULT_COVER;
use crate::store::DocumentStore;

/// Collection key for portfolio projects in the document store.
pub const PORTFOLIO_COLLECTION: &str = "portfolio";

pub struct PortfolioRepository {
    store: DocumentStore,
}

impl PortfolioRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// All projects in insertion order.
    pub async fn get_all(&self) -> Result<Vec<PortfolioProject>> {
        Ok(self.store.read(PORTFOLIO_COLLECTION).await?.into_records())
    }

    pub async fn get_active(&self) -> Result<Vec<PortfolioProject>> {
        let mut projects = self.get_all().await?;
        projects.retain(|p| p.active);
        Ok(projects)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<PortfolioProject>> {
        Ok(self.get_all().await?.into_iter().find(|p| p.id == id))
    }

    pub async fn create(&self, input: CreateProjectRequest) -> Result<PortfolioProject> {
        let mut projects = self.get_all().await?;

        if projects.iter().any(|p| p.id == input.id) {
            return Err(AppError::Conflict(
                "Portfolio project with this ID already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let project = PortfolioProject {
            id: input.id,
            title: input.title,
            short_desc: input.short_desc,
            long_desc: input.long_desc,
            cover: input.cover.unwrap_or_else(|| DEFAULT_COVER.to_string()),
            images: input.images,
            sheet_url: input.sheet_url,
            buy_url: input.buy_url,
            preview_url: input.preview_url,
            use_cases: input.use_cases,
            active: input.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        projects.push(project.clone());
        self.store.write(PORTFOLIO_COLLECTION, &projects).await?;

        Ok(project)
    }

    pub async fn update(&self, id: &str, patch: UpdateProjectRequest) -> Result<PortfolioProject> {
        let mut projects = self.get_all().await?;

        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Portfolio project not found".to_string()))?;

        if let Some(title) = patch.title {
            project.title = title;
        }
        if let Some(short_desc) = patch.short_desc {
            project.short_desc = short_desc;
        }
        if let Some(long_desc) = patch.long_desc {
            project.long_desc = Some(long_desc);
        }
        if let Some(cover) = patch.cover {
            project.cover = cover;
        }
        if let Some(images) = patch.images {
            project.images = images;
        }
        if let Some(sheet_url) = patch.sheet_url {
            project.sheet_url = Some(sheet_url);
        }
        if let Some(buy_url) = patch.buy_url {
            project.buy_url = Some(buy_url);
        }
        if let Some(preview_url) = patch.preview_url {
            project.preview_url = Some(preview_url);
        }
        if let Some(use_cases) = patch.use_cases {
            project.use_cases = use_cases;
        }
        if let Some(active) = patch.active {
            project.active = active;
        }

        project.updated_at = Utc::now();
        let updated = project.clone();

        self.store.write(PORTFOLIO_COLLECTION, &projects).await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut projects = self.get_all().await?;
        let before = projects.len();
        projects.retain(|p| p.id != id);

        if projects.len() == before {
            return Err(AppError::NotFound(
                "Portfolio project not found".to_string(),
            ));
        }

        self.store.write(PORTFOLIO_COLLECTION, &projects).await
    }

    /// Case-insensitive substring match over title, descriptions and use
    /// cases, optionally pre-filtered by the active flag.
    pub async fn search(
        &self,
        term: Option<&str>,
        active: Option<bool>,
    ) -> Result<Vec<PortfolioProject>> {
        let mut projects = self.get_all().await?;

        if let Some(active) = active {
            projects.retain(|p| p.active == active);
        }

        if let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            projects.retain(|p| {
                p.title.to_lowercase().contains(&term)
                    || p.short_desc.to_lowercase().contains(&term)
                    || p.long_desc
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
                    || p.use_cases.iter().any(|u| u.to_lowercase().contains(&term))
            });
        }

        Ok(projects)
    }
}
