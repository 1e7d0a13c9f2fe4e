// HTTP handlers, one module per API section

pub mod aircraft;
pub mod health;
pub mod hr;
pub mod positions;
