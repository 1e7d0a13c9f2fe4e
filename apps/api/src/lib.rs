//! BDI API Library
//!
//! This library provides the core functionality of the BDI API: the HR
//! Postgres endpoints, the ADS-B aircraft pipeline and the deployment
//! topology checks, split into domain, repositories and infrastructure.

pub mod api;
pub mod config;
pub mod deployment;
pub mod domain;
pub mod infrastructure;

/// Installs the global tracing subscriber
///
/// Honors `RUST_LOG`, falling back to `info,tower_http=warn`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
