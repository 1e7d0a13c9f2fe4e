// Raw snapshot storage
// Where downloaded files land before they are prepared

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::Settings;
use crate::domain::aircraft::SAMPLE_DAY;

pub use local::LocalRawStore;
#[cfg(feature = "s3")]
pub use s3::S3RawStore;

/// Errors raised by raw stores
#[derive(Debug, Error)]
pub enum RawStoreError {
    #[error("raw folder does not exist: {0}")]
    Missing(String),

    #[error("raw file not found: {0}")]
    NotFound(String),

    #[error("invalid raw file name: {0}")]
    InvalidName(String),

    #[error("raw store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("raw store backend error: {0}")]
    Backend(String),

    #[error("raw store not available: {0}")]
    Unavailable(String),
}

pub type RawStoreResult<T> = Result<T, RawStoreError>;

/// Flat namespace of raw snapshot files for one day
#[async_trait]
pub trait RawStore: Send + Sync {
    /// Human readable location, for logs
    fn location(&self) -> String;

    /// Remove every stored file
    async fn reset(&self) -> RawStoreResult<()>;

    /// Store `bytes` under `name`, replacing any previous file
    async fn put(&self, name: &str, bytes: Vec<u8>) -> RawStoreResult<()>;

    /// Names of the stored files in ascending order
    async fn list(&self) -> RawStoreResult<Vec<String>>;

    /// Contents of a stored file
    async fn get(&self, name: &str) -> RawStoreResult<Vec<u8>>;
}

/// Names are plain file names, never paths
pub(crate) fn validate_name(name: &str) -> RawStoreResult<()> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(RawStoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Local raw folder of the sample day, `<raw_dir>/day=20231101`
pub fn local_store(settings: &Settings) -> Arc<dyn RawStore> {
    Arc::new(LocalRawStore::new(settings.raw_dir.join(SAMPLE_DAY)))
}

/// Bucket-backed raw store, `None` when `BDI_S3_BUCKET` is unset
///
/// A bucket requires building with the `s3` feature.
pub async fn bucket_store(settings: &Settings) -> RawStoreResult<Option<Arc<dyn RawStore>>> {
    match &settings.s3_bucket {
        #[cfg(feature = "s3")]
        Some(bucket) => Ok(Some(Arc::new(
            S3RawStore::from_env(bucket.clone(), SAMPLE_DAY).await,
        ))),
        #[cfg(not(feature = "s3"))]
        Some(bucket) => Err(RawStoreError::Unavailable(format!(
            "BDI_S3_BUCKET={} requires building with the s3 feature",
            bucket
        ))),
        None => Ok(None),
    }
}
