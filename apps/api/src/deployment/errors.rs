use thiserror::Error;

/// Errors raised while reading deployment descriptions
#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("invalid database url: {0}")]
    InvalidDatabaseUrl(String),

    #[error("unsupported database url scheme: {0} (expected postgresql)")]
    UnsupportedScheme(String),

    #[error("database url has no host")]
    MissingHost,

    #[error("database url has no database name")]
    MissingDatabase,

    #[error("invalid public endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("invalid CIDR block: {0}")]
    InvalidCidr(String),

    #[error("invalid topology manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    #[error("failed to read topology manifest: {0}")]
    Io(#[from] std::io::Error),
}

pub type DeploymentResult<T> = Result<T, DeploymentError>;
