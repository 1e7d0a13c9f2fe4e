use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::options::FindOneOptions;
use mongodb::{Client, Collection};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::aircraft::{Aircraft, TrackedPosition, TypeCount};
use crate::domain::pagination::PageRequest;
use crate::domain::repositories::{PositionStore, RepositoryResult};

/// Database holding the submitted positions
pub const DATABASE: &str = "bdi_aircraft";

/// Collection with one document per submitted position
pub const COLLECTION: &str = "positions";

/// MongoDB implementation of PositionStore
pub struct MongoPositionStore {
    positions: Collection<TrackedPosition>,
}

impl MongoPositionStore {
    /// Builds a client for `url`
    ///
    /// The driver connects lazily, so an unreachable server only fails the
    /// first request that needs it.
    pub async fn connect(url: &str) -> RepositoryResult<Self> {
        let client = Client::with_uri_str(url).await?;
        Ok(Self::new(&client))
    }

    pub fn new(client: &Client) -> Self {
        Self {
            positions: client.database(DATABASE).collection(COLLECTION),
        }
    }

    async fn aggregate<T>(&self, pipeline: Vec<Document>) -> RepositoryResult<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        let mut cursor = self.positions.aggregate(pipeline, None).await?.with_type::<T>();
        let mut rows = Vec::new();
        while cursor.advance().await? {
            rows.push(cursor.deserialize_current()?);
        }
        Ok(rows)
    }
}

#[derive(Deserialize)]
struct TypeCountRow {
    #[serde(default, rename = "type")]
    aircraft_type: Option<String>,
    count: i64,
}

#[derive(Deserialize)]
struct AircraftRow {
    icao: String,
    #[serde(default)]
    registration: Option<String>,
    #[serde(default, rename = "type")]
    aircraft_type: Option<String>,
}

fn type_count_pipeline() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$type", "count": { "$sum": 1 } } },
        doc! { "$sort": { "count": -1, "_id": 1 } },
        doc! { "$project": { "_id": 0, "type": "$_id", "count": 1 } },
    ]
}

fn aircraft_pipeline(page: PageRequest) -> Vec<Document> {
    vec![
        doc! { "$group": {
            "_id": "$icao",
            "registration": { "$first": "$registration" },
            "type": { "$first": "$type" },
        } },
        doc! { "$project": { "_id": 0, "icao": "$_id", "registration": 1, "type": 1 } },
        doc! { "$sort": { "icao": 1 } },
        doc! { "$skip": page.offset() },
        doc! { "$limit": page.limit() },
    ]
}

#[async_trait]
impl PositionStore for MongoPositionStore {
    async fn insert(&self, position: &TrackedPosition) -> RepositoryResult<()> {
        self.positions.insert_one(position, None).await?;
        Ok(())
    }

    async fn count_by_type(&self) -> RepositoryResult<Vec<TypeCount>> {
        let rows: Vec<TypeCountRow> = self.aggregate(type_count_pipeline()).await?;
        Ok(rows
            .into_iter()
            .map(|r| TypeCount {
                aircraft_type: r.aircraft_type,
                count: r.count,
            })
            .collect())
    }

    async fn list_aircraft(&self, page: PageRequest) -> RepositoryResult<Vec<Aircraft>> {
        let rows: Vec<AircraftRow> = self.aggregate(aircraft_pipeline(page)).await?;
        Ok(rows
            .into_iter()
            .map(|r| Aircraft {
                icao: r.icao,
                registration: r.registration,
                aircraft_type: r.aircraft_type,
            })
            .collect())
    }

    async fn latest(&self, icao: &str) -> RepositoryResult<Option<TrackedPosition>> {
        let options = FindOneOptions::builder()
            .sort(doc! { "timestamp": -1 })
            .build();
        Ok(self.positions.find_one(doc! { "icao": icao }, options).await?)
    }

    async fn delete_aircraft(&self, icao: &str) -> RepositoryResult<u64> {
        let result = self
            .positions
            .delete_many(doc! { "icao": icao }, None)
            .await?;
        Ok(result.deleted_count)
    }
}
