//! JSON document store.
//!
//! Each collection is one JSON array persisted under a string key: local
//! files in development, S3 objects in production. The backend is chosen once
//! at construction from [`StorageConfig`]; read/write never consult ambient
//! state. Remote reads degrade to bundled seed data instead of failing, and
//! that degradation is tagged on the result rather than hidden.

pub mod local;
pub mod s3;

pub use local::LocalBackend;
pub use s3::S3Backend;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::middleware::error_handling::{AppError, Result};

/// Physical persistence of a collection's raw JSON body.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Fetch the raw body for `key`. `Ok(None)` means the collection has
    /// never been written (NOT an error: first-run behavior relies on it).
    async fn fetch(&self, key: &str) -> Result<Option<String>>;

    /// Persist the raw body for `key`, replacing any previous version.
    async fn store(&self, key: &str, body: &str) -> Result<()>;

    /// Short backend label for startup logs.
    fn kind(&self) -> &'static str;
}

/// Storage backend selection, resolved once at process start.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local {
        data_dir: PathBuf,
    },
    S3 {
        bucket: String,
        prefix: String,
        region: Option<String>,
        seed_dir: PathBuf,
    },
}

/// Outcome of a collection read.
///
/// `Degraded` carries records recovered from seed data after the backend
/// reported the object missing or errored; callers that only want the data
/// use [`StoreRead::into_records`], callers that care (logs, tests) can
/// inspect the cause.
#[derive(Debug)]
pub enum StoreRead<T> {
    Fresh(Vec<T>),
    Degraded { records: Vec<T>, cause: String },
}

impl<T> StoreRead<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            StoreRead::Fresh(records) => records,
            StoreRead::Degraded { records, .. } => records,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StoreRead::Degraded { .. })
    }
}

/// Bundled fallback collections for remote deployments.
#[derive(Debug, Clone)]
pub struct SeedData {
    seed_dir: PathBuf,
}

impl SeedData {
    pub fn new(seed_dir: impl Into<PathBuf>) -> Self {
        Self {
            seed_dir: seed_dir.into(),
        }
    }

    /// Load `seed.{key}.json`. A missing or unreadable seed file degrades
    /// further to an empty collection.
    async fn load(&self, key: &str) -> String {
        let path = self.seed_dir.join(format!("seed.{key}.json"));
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to load seed data for {}: {}", key, e);
                "[]".to_string()
            }
        }
    }
}

#[derive(Clone)]
pub struct DocumentStore {
    backend: Arc<dyn DocumentBackend>,
    seed: Option<SeedData>,
}

impl DocumentStore {
    /// Local-filesystem store without seed fallback (development default).
    pub fn local(data_dir: impl AsRef<Path>) -> Self {
        Self {
            backend: Arc::new(LocalBackend::new(data_dir.as_ref())),
            seed: None,
        }
    }

    /// Store over an explicit backend; `seed` enables the degrade path.
    pub fn with_backend(backend: Arc<dyn DocumentBackend>, seed: Option<SeedData>) -> Self {
        Self { backend, seed }
    }

    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        match config {
            StorageConfig::Local { data_dir } => Ok(Self::local(data_dir)),
            StorageConfig::S3 {
                bucket,
                prefix,
                region,
                seed_dir,
            } => {
                let backend = S3Backend::connect(bucket, prefix, region.clone()).await;
                Ok(Self::with_backend(
                    Arc::new(backend),
                    Some(SeedData::new(seed_dir)),
                ))
            }
        }
    }

    pub fn backend_kind(&self) -> &'static str {
        self.backend.kind()
    }

    /// Read the full collection for `key`.
    ///
    /// Without seed data, an absent collection is an empty one and backend
    /// errors propagate. With seed data, absence and errors both fall back to
    /// the bundled seed collection, logged and tagged as degraded.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<StoreRead<T>> {
        match self.backend.fetch(key).await {
            Ok(Some(body)) => Ok(StoreRead::Fresh(parse_collection(key, &body)?)),
            Ok(None) => match &self.seed {
                Some(seed) => {
                    self.degraded_read(seed, key, "collection object missing")
                        .await
                }
                None => Ok(StoreRead::Fresh(Vec::new())),
            },
            Err(err) => match &self.seed {
                Some(seed) => self.degraded_read(seed, key, &err.to_string()).await,
                None => Err(err),
            },
        }
    }

    /// Serialize the whole collection and persist it.
    pub async fn write<T: Serialize>(&self, key: &str, records: &[T]) -> Result<()> {
        let body = serde_json::to_string_pretty(records)?;
        self.backend.store(key, &body).await
    }

    async fn degraded_read<T: DeserializeOwned>(
        &self,
        seed: &SeedData,
        key: &str,
        cause: &str,
    ) -> Result<StoreRead<T>> {
        tracing::warn!("Falling back to seed data for {}: {}", key, cause);
        let body = seed.load(key).await;
        let records = match parse_collection(key, &body) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Seed data for {} is unreadable: {}", key, e);
                Vec::new()
            }
        };
        Ok(StoreRead::Degraded {
            records,
            cause: cause.to_string(),
        })
    }
}

fn parse_collection<T: DeserializeOwned>(key: &str, body: &str) -> Result<Vec<T>> {
    serde_json::from_str(body)
        .map_err(|e| AppError::Storage(format!("collection {key} is not a valid JSON array: {e}")))
}
