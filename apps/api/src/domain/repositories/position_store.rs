use async_trait::async_trait;

use super::errors::RepositoryResult;
use crate::domain::aircraft::{Aircraft, TrackedPosition, TypeCount};
use crate::domain::pagination::PageRequest;

/// Store of client-submitted aircraft positions
#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Append one position report
    async fn insert(&self, position: &TrackedPosition) -> RepositoryResult<()>;

    /// Reports per aircraft type, most frequent first
    async fn count_by_type(&self) -> RepositoryResult<Vec<TypeCount>>;

    /// One entry per ICAO ordered by ICAO, with the registration and type of
    /// its first stored report
    async fn list_aircraft(&self, page: PageRequest) -> RepositoryResult<Vec<Aircraft>>;

    /// Report of an aircraft with the greatest timestamp
    async fn latest(&self, icao: &str) -> RepositoryResult<Option<TrackedPosition>>;

    /// Remove every report of an aircraft, returning how many were removed
    async fn delete_aircraft(&self, icao: &str) -> RepositoryResult<u64>;
}
