//! Raw files in an S3 bucket under `raw/<day>/`

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{validate_name, RawStore, RawStoreError, RawStoreResult};

/// S3-backed raw store
#[derive(Debug, Clone)]
pub struct S3RawStore {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3RawStore {
    /// Uses the default credential chain (IAM role, environment, profile)
    pub async fn from_env(bucket: String, day: &str) -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket, day)
    }

    pub fn new(client: Client, bucket: String, day: &str) -> Self {
        Self {
            client,
            bucket,
            prefix: format!("raw/{}/", day),
        }
    }

    fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    async fn keys(&self) -> RawStoreResult<Vec<String>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(&self.prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| RawStoreError::Backend(e.to_string()))?;
            if page.contents().is_empty() {
                tracing::warn!(bucket = %self.bucket, prefix = %self.prefix, "No contents in page");
            }
            keys.extend(page.contents().iter().filter_map(|o| o.key().map(str::to_string)));
        }
        Ok(keys)
    }
}

#[async_trait]
impl RawStore for S3RawStore {
    fn location(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.prefix)
    }

    async fn reset(&self) -> RawStoreResult<()> {
        for key in self.keys().await? {
            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(&key)
                .send()
                .await
                .map_err(|e| RawStoreError::Backend(e.to_string()))?;
        }
        Ok(())
    }

    async fn put(&self, name: &str, bytes: Vec<u8>) -> RawStoreResult<()> {
        validate_name(name)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.key(name))
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| RawStoreError::Backend(e.to_string()))?;
        Ok(())
    }

    async fn list(&self) -> RawStoreResult<Vec<String>> {
        let mut names: Vec<String> = self
            .keys()
            .await?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.prefix).map(str::to_string))
            .filter(|name| !name.is_empty() && !name.contains('/'))
            .collect();
        names.sort();
        Ok(names)
    }

    async fn get(&self, name: &str) -> RawStoreResult<Vec<u8>> {
        validate_name(name)?;
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.key(name))
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().map(|s| s.is_no_such_key()).unwrap_or(false) {
                    RawStoreError::NotFound(name.to_string())
                } else {
                    RawStoreError::Backend(e.to_string())
                }
            })?;

        let body = object
            .body
            .collect()
            .await
            .map_err(|e| RawStoreError::Backend(e.to_string()))?;
        Ok(body.into_bytes().to_vec())
    }
}
