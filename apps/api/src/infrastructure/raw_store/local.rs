use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{validate_name, RawStore, RawStoreError, RawStoreResult};

/// Raw files in a local directory, e.g. `data/raw/day=20231101`
#[derive(Debug, Clone)]
pub struct LocalRawStore {
    dir: PathBuf,
}

impl LocalRawStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl RawStore for LocalRawStore {
    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    async fn reset(&self) -> RawStoreResult<()> {
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    async fn put(&self, name: &str, bytes: Vec<u8>) -> RawStoreResult<()> {
        validate_name(name)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(name), bytes).await?;
        Ok(())
    }

    async fn list(&self) -> RawStoreResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RawStoreError::Missing(self.location()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn get(&self, name: &str) -> RawStoreResult<Vec<u8>> {
        validate_name(name)?;
        match tokio::fs::read(self.dir.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(RawStoreError::NotFound(name.into())),
            Err(e) => Err(e.into()),
        }
    }
}
