use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::domain::aircraft::{Aircraft, AircraftStats, Position};
use crate::domain::repositories::AircraftRepository;
use crate::infrastructure::ingest::{self, prepared_db_path};
use crate::infrastructure::raw_store::RawStore;
use crate::infrastructure::repositories::SqliteAircraftRepository;

/// Query string of the download endpoint
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(default = "default_file_limit")]
    pub file_limit: usize,
}

fn default_file_limit() -> usize {
    100
}

/// 0-indexed page of a listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub num_results: Option<u32>,
    #[serde(default)]
    pub page: u32,
}

impl ListQuery {
    fn limit_offset(&self, default_results: u32) -> (i64, i64) {
        let limit = i64::from(self.num_results.unwrap_or(default_results));
        (limit, limit * i64::from(self.page))
    }
}

#[derive(Debug, Serialize)]
pub struct AircraftResponse {
    pub icao: String,
    pub registration: Option<String>,
    #[serde(rename = "type")]
    pub aircraft_type: Option<String>,
}

impl From<Aircraft> for AircraftResponse {
    fn from(a: Aircraft) -> Self {
        Self {
            icao: a.icao,
            registration: a.registration,
            aircraft_type: a.aircraft_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PositionResponse {
    pub timestamp: Option<f64>,
    pub lat: f64,
    pub lon: f64,
    pub alt_baro: Option<f64>,
    pub gs: Option<f64>,
    pub emergency: bool,
}

impl From<Position> for PositionResponse {
    fn from(p: Position) -> Self {
        Self {
            timestamp: p.timestamp,
            lat: p.lat,
            lon: p.lon,
            alt_baro: p.alt_baro,
            gs: p.ground_speed,
            emergency: p.emergency,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AircraftStatsResponse {
    pub max_altitude_baro: Option<f64>,
    pub max_ground_speed: Option<f64>,
    pub had_emergency: bool,
}

impl From<AircraftStats> for AircraftStatsResponse {
    fn from(s: AircraftStats) -> Self {
        Self {
            max_altitude_baro: s.max_altitude_baro,
            max_ground_speed: s.max_ground_speed,
            had_emergency: s.had_emergency,
        }
    }
}

async fn prepared_repository(state: &AppState) -> Result<Option<SqliteAircraftRepository>, ApiError> {
    let path = prepared_db_path(&state.settings.prepared_dir);
    Ok(SqliteAircraftRepository::open_existing(&path).await?)
}

fn configured_bucket(state: &AppState) -> Result<&dyn RawStore, ApiError> {
    state.bucket_store.as_deref().ok_or_else(|| {
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "No S3 bucket configured: set BDI_S3_BUCKET and build with the s3 feature",
        )
    })
}

async fn download_into(
    state: &AppState,
    store: &dyn RawStore,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let Query(query) = query?;
    ingest::download(
        &state.http,
        &state.settings.source_url,
        store,
        query.file_limit,
    )
    .await?;
    Ok(Json("OK"))
}

async fn prepare_from(state: &AppState, store: &dyn RawStore) -> Result<Json<&'static str>, ApiError> {
    ingest::prepare(store, &state.settings.prepared_dir).await?;
    Ok(Json("OK"))
}

/// Download the hourly snapshots of the sample day into the local raw folder
///
/// POST /api/s1/aircraft/download?file_limit=100
pub async fn download_data(
    State(state): State<AppState>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Json<&'static str>, ApiError> {
    download_into(&state, state.raw_store.as_ref(), query).await
}

/// Rebuild the prepared aircraft database from the local raw folder
///
/// POST /api/s1/aircraft/prepare
pub async fn prepare_data(State(state): State<AppState>) -> Result<Json<&'static str>, ApiError> {
    prepare_from(&state, state.raw_store.as_ref()).await
}

/// Download the hourly snapshots of the sample day into the S3 bucket
///
/// POST /api/s4/aircraft/download?file_limit=100
pub async fn download_to_bucket(
    State(state): State<AppState>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let store = configured_bucket(&state)?;
    download_into(&state, store, query).await
}

/// Rebuild the prepared aircraft database from the S3 bucket
///
/// POST /api/s4/aircraft/prepare
pub async fn prepare_from_bucket(
    State(state): State<AppState>,
) -> Result<Json<&'static str>, ApiError> {
    let store = configured_bucket(&state)?;
    prepare_from(&state, store).await
}

/// List aircraft ordered by ICAO
///
/// GET /api/s1/aircraft/?num_results=100&page=0
pub async fn list_aircraft(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<AircraftResponse>>, ApiError> {
    let Query(query) = query?;
    let Some(repo) = prepared_repository(&state).await? else {
        return Ok(Json(Vec::new()));
    };

    let (limit, offset) = query.limit_offset(100);
    let aircraft = repo.list_aircraft(limit, offset).await?;
    repo.close().await;
    Ok(Json(aircraft.into_iter().map(Into::into).collect()))
}

/// Positions of one aircraft ordered by timestamp
///
/// GET /api/s1/aircraft/:icao/positions?num_results=1000&page=0
pub async fn get_aircraft_positions(
    State(state): State<AppState>,
    Path(icao): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<PositionResponse>>, ApiError> {
    let Query(query) = query?;
    let Some(repo) = prepared_repository(&state).await? else {
        return Ok(Json(Vec::new()));
    };

    let (limit, offset) = query.limit_offset(1000);
    let positions = repo.list_positions(&icao, limit, offset).await?;
    repo.close().await;
    Ok(Json(positions.into_iter().map(Into::into).collect()))
}

/// Maximum altitude, maximum ground speed and emergency flag of one aircraft
///
/// GET /api/s1/aircraft/:icao/stats
pub async fn get_aircraft_statistics(
    State(state): State<AppState>,
    Path(icao): Path<String>,
) -> Result<Json<AircraftStatsResponse>, ApiError> {
    let Some(repo) = prepared_repository(&state).await? else {
        return Ok(Json(AircraftStats::default().into()));
    };

    let stats = repo.stats(&icao).await?;
    repo.close().await;
    Ok(Json(stats.into()))
}
