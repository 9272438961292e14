//! S3 backend: one `{prefix}/{key}.json` object per collection.
//!
//! Writes are direct whole-object overwrites: the object storage API gives
//! last-writer-wins and nothing stronger.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use super::DocumentBackend;
use crate::middleware::error_handling::{AppError, Result};

pub struct S3Backend {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3Backend {
    pub async fn connect(bucket: &str, prefix: &str, region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let sdk_config = loader.load().await;

        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        }
    }

    fn object_key(&self, key: &str) -> String {
        format!("{}/{}.json", self.prefix, key)
    }
}

#[async_trait]
impl DocumentBackend for S3Backend {
    async fn fetch(&self, key: &str) -> Result<Option<String>> {
        let object_key = self.object_key(key);
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    return Ok(None);
                }
                return Err(AppError::Storage(format!(
                    "failed to get s3://{}/{}: {}",
                    self.bucket, object_key, err
                )));
            }
        };

        let bytes = output.body.collect().await.map_err(|e| {
            AppError::Storage(format!(
                "failed to read body of s3://{}/{}: {}",
                self.bucket, object_key, e
            ))
        })?;
        let body = String::from_utf8(bytes.into_bytes().to_vec()).map_err(|e| {
            AppError::Storage(format!(
                "s3://{}/{} is not valid UTF-8: {}",
                self.bucket, object_key, e
            ))
        })?;

        // An empty object is as good as a missing one
        if body.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(body))
    }

    async fn store(&self, key: &str, body: &str) -> Result<()> {
        let object_key = self.object_key(key);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .content_type("application/json")
            .body(ByteStream::from(body.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|e| {
                AppError::Storage(format!(
                    "failed to put s3://{}/{}: {}",
                    self.bucket, object_key, e
                ))
            })?;

        Ok(())
    }

    fn kind(&self) -> &'static str {
        "s3"
    }
}
