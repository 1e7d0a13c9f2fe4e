use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use super::raw_store::{RawStore, RawStoreError};
use super::repositories::SqliteAircraftRepository;
use crate::domain::aircraft::{
    decode_snapshot, hourly_file_names, is_snapshot_file, DatasetBuilder, SnapshotError,
    SAMPLE_DATE_PATH, SAMPLE_DAY,
};
use crate::domain::repositories::{AircraftRepository, RepositoryError};

/// File name of the prepared database inside the day folder
pub const PREPARED_DB_FILE: &str = "aircraft.db";

/// Errors raised while downloading or preparing raw snapshots
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    RawStore(#[from] RawStoreError),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse {name}: {source}")]
    Snapshot {
        name: String,
        #[source]
        source: SnapshotError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to reset prepared folder: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a download run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub stored: usize,
    pub skipped: Vec<String>,
}

/// Outcome of a prepare run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrepareReport {
    pub files: usize,
    pub aircraft: usize,
    pub positions: usize,
}

/// HTTP client used to fetch snapshots
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
}

/// Path of the prepared database for the sample day
pub fn prepared_db_path(prepared_dir: &Path) -> PathBuf {
    prepared_dir.join(SAMPLE_DAY).join(PREPARED_DB_FILE)
}

/// Downloads up to `file_limit` hourly snapshots into `store`
///
/// The store is emptied first. Hours the source does not serve (non-200)
/// are skipped and do not count towards the limit.
pub async fn download(
    client: &reqwest::Client,
    source_url: &str,
    store: &dyn RawStore,
    file_limit: usize,
) -> Result<DownloadReport, IngestError> {
    let base_url = format!("{}/{}", source_url.trim_end_matches('/'), SAMPLE_DATE_PATH);
    store.reset().await?;

    let mut report = DownloadReport::default();
    for name in hourly_file_names() {
        if report.stored >= file_limit {
            break;
        }

        let url = format!("{}/{}", base_url, name);
        let fetch_err = |source| IngestError::Fetch {
            url: url.clone(),
            source,
        };

        let response = client.get(&url).send().await.map_err(fetch_err)?;
        if response.status() != StatusCode::OK {
            tracing::warn!(file = %name, status = %response.status(), "Skipping file");
            report.skipped.push(name);
            continue;
        }

        let bytes = response.bytes().await.map_err(fetch_err)?;
        store.put(&name, bytes.to_vec()).await?;
        report.stored += 1;
        tracing::debug!(file = %name, size = bytes.len(), "Stored raw file");
    }

    tracing::info!(
        stored = report.stored,
        skipped = report.skipped.len(),
        location = %store.location(),
        "Download finished"
    );
    Ok(report)
}

/// Rebuilds the prepared database from every snapshot in `store`
pub async fn prepare(store: &dyn RawStore, prepared_dir: &Path) -> Result<PrepareReport, IngestError> {
    let names = store.list().await?;

    let mut builder = DatasetBuilder::new();
    let mut files = 0;
    for name in names.into_iter().filter(|n| is_snapshot_file(n)) {
        files += 1;
        tracing::debug!(file = %name, "Processing raw file");
        let bytes = store.get(&name).await?;
        let snapshot = decode_snapshot(&bytes).map_err(|source| IngestError::Snapshot {
            name: name.clone(),
            source,
        })?;
        if !builder.ingest(snapshot) {
            tracing::warn!(file = %name, "Unexpected format, no aircraft array");
        }
    }
    let dataset = builder.finish();

    let db_path = prepared_db_path(prepared_dir);
    let day_dir = prepared_dir.join(SAMPLE_DAY);
    match tokio::fs::remove_dir_all(&day_dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    tokio::fs::create_dir_all(&day_dir).await?;

    let repo = SqliteAircraftRepository::open(&db_path).await?;
    repo.replace_all(&dataset).await?;
    repo.close().await;

    let report = PrepareReport {
        files,
        aircraft: dataset.aircraft.len(),
        positions: dataset.positions.len(),
    };
    tracing::info!(
        files = report.files,
        aircraft = report.aircraft,
        positions = report.positions,
        db = %db_path.display(),
        "Prepared aircraft database"
    );
    Ok(report)
}
