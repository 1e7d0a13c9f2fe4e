use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Settings;
use crate::domain::repositories::{HrRepository, PositionStore};
use crate::infrastructure::ingest::http_client;
use crate::infrastructure::raw_store::{self, RawStore};
use crate::infrastructure::repositories::{MongoPositionStore, PostgresHrRepository};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub hr: Arc<dyn HrRepository>,
    pub positions: Arc<dyn PositionStore>,
    /// Local raw folder behind `/api/s1`
    pub raw_store: Arc<dyn RawStore>,
    /// Bucket behind `/api/s4`, when one is configured
    pub bucket_store: Option<Arc<dyn RawStore>>,
    pub http: reqwest::Client,
}

impl AppState {
    /// Wires the Postgres HR repository, the MongoDB position store and the
    /// raw stores
    pub async fn new(settings: Settings, pool: PgPool) -> anyhow::Result<Self> {
        let positions = MongoPositionStore::connect(&settings.mongo_url).await?;
        let bucket_store = raw_store::bucket_store(&settings).await?;
        let raw_store = raw_store::local_store(&settings);

        let state = Self::with_parts(
            settings,
            Arc::new(PostgresHrRepository::new(pool)),
            Arc::new(positions),
            raw_store,
        )?;
        Ok(match bucket_store {
            Some(store) => state.with_bucket_store(store),
            None => state,
        })
    }

    /// Builds state from already constructed adapters
    pub fn with_parts(
        settings: Settings,
        hr: Arc<dyn HrRepository>,
        positions: Arc<dyn PositionStore>,
        raw_store: Arc<dyn RawStore>,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            settings: Arc::new(settings),
            hr,
            positions,
            raw_store,
            bucket_store: None,
            http: http_client()?,
        })
    }

    /// Serves `/api/s4` from `store`
    pub fn with_bucket_store(mut self, store: Arc<dyn RawStore>) -> Self {
        self.bucket_store = Some(store);
        self
    }
}
