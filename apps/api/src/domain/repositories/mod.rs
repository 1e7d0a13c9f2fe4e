// Repository interfaces (ports)
// Implemented by adapters in crate::infrastructure::repositories

pub mod aircraft_repository;
pub mod errors;
pub mod hr_repository;
pub mod position_store;

pub use aircraft_repository::AircraftRepository;
pub use errors::{RepositoryError, RepositoryResult};
pub use hr_repository::HrRepository;
pub use position_store::PositionStore;
