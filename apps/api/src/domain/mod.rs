// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod aircraft;
pub mod hr;
pub mod pagination;
pub mod repositories;
