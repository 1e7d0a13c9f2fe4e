use async_trait::async_trait;

use super::errors::RepositoryResult;
use crate::domain::aircraft::{Aircraft, AircraftStats, Position, PreparedDataset};

/// Repository for the prepared aircraft dataset of one day
#[async_trait]
pub trait AircraftRepository: Send + Sync {
    /// Replace all stored aircraft and positions with `dataset`
    async fn replace_all(&self, dataset: &PreparedDataset) -> RepositoryResult<()>;

    /// Aircraft ordered by ICAO
    async fn list_aircraft(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Aircraft>>;

    /// Positions of one aircraft ordered by timestamp
    async fn list_positions(
        &self,
        icao: &str,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Position>>;

    /// Maximum altitude, maximum ground speed and emergency flag of one aircraft
    async fn stats(&self, icao: &str) -> RepositoryResult<AircraftStats>;
}
