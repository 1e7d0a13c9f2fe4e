// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod mongo_position_store;
pub mod postgres_hr_repository;
pub mod sqlite_aircraft_repository;

pub use mongo_position_store::MongoPositionStore;
pub use postgres_hr_repository::PostgresHrRepository;
pub use sqlite_aircraft_repository::SqliteAircraftRepository;
