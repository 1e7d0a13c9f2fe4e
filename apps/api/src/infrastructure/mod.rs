// Infrastructure layer module
// Contains database adapters and external service integrations
// Follows Hexagonal Architecture

pub mod ingest;
pub mod raw_store;
pub mod repositories;
