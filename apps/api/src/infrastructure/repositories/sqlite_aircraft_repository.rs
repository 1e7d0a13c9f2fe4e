use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::domain::aircraft::{Aircraft, AircraftStats, Position, PreparedDataset};
use crate::domain::repositories::{AircraftRepository, RepositoryResult};

const AIRCRAFT_SCHEMA_SQL: &str = include_str!("../sql/aircraft_schema.sql");

/// Rows per multi-row INSERT; 7 columns keeps this under SQLite's
/// 999 bound-parameter limit
const INSERT_CHUNK: usize = 100;

/// SQLite implementation of AircraftRepository
///
/// One database file per prepared day.
pub struct SqliteAircraftRepository {
    pool: SqlitePool,
}

impl SqliteAircraftRepository {
    /// Opens (and creates if missing) the database file at `path`
    pub async fn open(path: &Path) -> RepositoryResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Opens the database file at `path` only if it was already prepared
    pub async fn open_existing(path: &Path) -> RepositoryResult<Option<Self>> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(None);
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Some(Self { pool }))
    }

    /// Waits for every connection to close, flushing the file
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[derive(FromRow)]
struct AircraftRow {
    icao: String,
    registration: Option<String>,
    #[sqlx(rename = "type")]
    aircraft_type: Option<String>,
}

#[derive(FromRow)]
struct PositionRow {
    icao: String,
    timestamp: Option<f64>,
    lat: f64,
    lon: f64,
    alt_baro: Option<f64>,
    gs: Option<f64>,
    emergency: bool,
}

#[derive(FromRow)]
struct StatsRow {
    max_altitude_baro: Option<f64>,
    max_ground_speed: Option<f64>,
    had_emergency: i64,
}

#[async_trait]
impl AircraftRepository for SqliteAircraftRepository {
    async fn replace_all(&self, dataset: &PreparedDataset) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        (&mut *tx).execute(AIRCRAFT_SCHEMA_SQL).await?;

        for chunk in dataset.aircraft.chunks(INSERT_CHUNK) {
            let mut insert: QueryBuilder<Sqlite> =
                QueryBuilder::new("INSERT INTO aircraft (icao, registration, type) ");
            insert.push_values(chunk, |mut row, aircraft| {
                row.push_bind(&aircraft.icao)
                    .push_bind(&aircraft.registration)
                    .push_bind(&aircraft.aircraft_type);
            });
            insert.build().execute(&mut *tx).await?;
        }

        for chunk in dataset.positions.chunks(INSERT_CHUNK) {
            let mut insert: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO positions (icao, timestamp, lat, lon, alt_baro, gs, emergency) ",
            );
            insert.push_values(chunk, |mut row, position| {
                row.push_bind(&position.icao)
                    .push_bind(position.timestamp)
                    .push_bind(position.lat)
                    .push_bind(position.lon)
                    .push_bind(position.alt_baro)
                    .push_bind(position.ground_speed)
                    .push_bind(position.emergency);
            });
            insert.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_aircraft(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<Aircraft>> {
        let rows = sqlx::query_as::<_, AircraftRow>(
            r#"
            SELECT icao, registration, type
            FROM aircraft
            ORDER BY icao ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Aircraft {
                icao: r.icao,
                registration: r.registration,
                aircraft_type: r.aircraft_type,
            })
            .collect())
    }

    async fn list_positions(
        &self,
        icao: &str,
        limit: i64,
        offset: i64,
    ) -> RepositoryResult<Vec<Position>> {
        let rows = sqlx::query_as::<_, PositionRow>(
            r#"
            SELECT icao, timestamp, lat, lon, alt_baro, gs, emergency
            FROM positions
            WHERE icao = ?
            ORDER BY timestamp ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(icao)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Position {
                icao: r.icao,
                timestamp: r.timestamp,
                lat: r.lat,
                lon: r.lon,
                alt_baro: r.alt_baro,
                ground_speed: r.gs,
                emergency: r.emergency,
            })
            .collect())
    }

    async fn stats(&self, icao: &str) -> RepositoryResult<AircraftStats> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                MAX(alt_baro) AS max_altitude_baro,
                MAX(gs) AS max_ground_speed,
                COALESCE(MAX(emergency), 0) AS had_emergency
            FROM positions
            WHERE icao = ?
            "#,
        )
        .bind(icao)
        .fetch_one(&self.pool)
        .await?;

        Ok(AircraftStats {
            max_altitude_baro: row.max_altitude_baro,
            max_ground_speed: row.max_ground_speed,
            had_emergency: row.had_emergency != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(icao: &str, ts: f64, alt: Option<f64>, gs: f64, emergency: bool) -> Position {
        Position {
            icao: icao.into(),
            timestamp: Some(ts),
            lat: 41.0,
            lon: 2.0,
            alt_baro: alt,
            ground_speed: Some(gs),
            emergency,
        }
    }

    fn dataset() -> PreparedDataset {
        PreparedDataset {
            aircraft: vec![
                Aircraft {
                    icao: "06a0af".into(),
                    registration: Some("EC-MTI".into()),
                    aircraft_type: Some("A320".into()),
                },
                Aircraft {
                    icao: "aabbcc".into(),
                    registration: None,
                    aircraft_type: Some("B737".into()),
                },
            ],
            positions: vec![
                position("06a0af", 30.0, Some(3200.0), 180.5, false),
                position("06a0af", 10.0, Some(1200.0), 120.0, true),
                position("aabbcc", 20.0, None, 0.0, false),
            ],
        }
    }

    async fn repo(dir: &tempfile::TempDir) -> SqliteAircraftRepository {
        let repo = SqliteAircraftRepository::open(&dir.path().join("aircraft.db"))
            .await
            .unwrap();
        repo.replace_all(&dataset()).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn lists_aircraft_by_icao_with_paging() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&dir).await;

        let all = repo.list_aircraft(100, 0).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].icao, "06a0af");
        assert_eq!(all[0].aircraft_type.as_deref(), Some("A320"));

        let second = repo.list_aircraft(1, 1).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].icao, "aabbcc");
    }

    #[tokio::test]
    async fn positions_ordered_by_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&dir).await;

        let positions = repo.list_positions("06a0af", 1000, 0).await.unwrap();
        let times: Vec<_> = positions.iter().map(|p| p.timestamp).collect();
        assert_eq!(times, vec![Some(10.0), Some(30.0)]);
        assert!(positions[0].emergency);
    }

    #[tokio::test]
    async fn stats_aggregate_positions() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&dir).await;

        let stats = repo.stats("06a0af").await.unwrap();
        assert_eq!(stats.max_altitude_baro, Some(3200.0));
        assert_eq!(stats.max_ground_speed, Some(180.5));
        assert!(stats.had_emergency);

        let unknown = repo.stats("ffffff").await.unwrap();
        assert_eq!(unknown, AircraftStats::default());
    }

    #[tokio::test]
    async fn replace_all_discards_previous_rows() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&dir).await;

        repo.replace_all(&PreparedDataset::default()).await.unwrap();
        assert!(repo.list_aircraft(100, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_existing_skips_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = SqliteAircraftRepository::open_existing(&dir.path().join("none.db"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
