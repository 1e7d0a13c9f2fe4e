use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use super::aircraft::AircraftResponse;
use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::aircraft::{TrackedPosition, TypeCount};
use crate::domain::pagination::PageRequest;

/// Query string of the tracked aircraft listing
#[derive(Debug, Deserialize)]
pub struct TrackedListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TypeCountResponse {
    #[serde(rename = "type")]
    pub aircraft_type: Option<String>,
    pub count: i64,
}

impl From<TypeCount> for TypeCountResponse {
    fn from(c: TypeCount) -> Self {
        Self {
            aircraft_type: c.aircraft_type,
            count: c.count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

/// Store one aircraft position report
///
/// POST /api/s6/aircraft
pub async fn create_position(
    State(state): State<AppState>,
    body: Result<Json<TrackedPosition>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let Json(position) = body?;
    state.positions.insert(&position).await?;
    tracing::debug!(icao = %position.icao, "Stored position report");
    Ok(Json(CreatedResponse { status: "ok" }))
}

/// Number of reports per aircraft type, most frequent first
///
/// GET /api/s6/aircraft/stats
pub async fn type_stats(
    State(state): State<AppState>,
) -> Result<Json<Vec<TypeCountResponse>>, ApiError> {
    let counts = state.positions.count_by_type().await?;
    Ok(Json(counts.into_iter().map(Into::into).collect()))
}

/// Distinct reported aircraft ordered by ICAO, paginated
///
/// GET /api/s6/aircraft/?page=1&page_size=20
pub async fn list_tracked_aircraft(
    State(state): State<AppState>,
    query: Result<Query<TrackedListQuery>, QueryRejection>,
) -> Result<Json<Vec<AircraftResponse>>, ApiError> {
    let Query(query) = query?;
    let page =
        PageRequest::new(query.page, query.page_size).map_err(ApiError::unprocessable_entity)?;

    let aircraft = state.positions.list_aircraft(page).await?;
    Ok(Json(aircraft.into_iter().map(Into::into).collect()))
}

/// Most recent report of one aircraft
///
/// GET /api/s6/aircraft/:icao
pub async fn latest_position(
    State(state): State<AppState>,
    Path(icao): Path<String>,
) -> Result<Json<TrackedPosition>, ApiError> {
    let position = state
        .positions
        .latest(&icao)
        .await?
        .ok_or_else(|| ApiError::not_found("Aircraft not found"))?;
    Ok(Json(position))
}

/// Remove every report of one aircraft
///
/// DELETE /api/s6/aircraft/:icao
pub async fn delete_positions(
    State(state): State<AppState>,
    Path(icao): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.positions.delete_aircraft(&icao).await?;
    tracing::info!(%icao, deleted, "Deleted position reports");
    Ok(Json(DeletedResponse { deleted }))
}
