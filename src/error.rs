use std::path::PathBuf;
use thiserror::Error;

/// Failures that are not HTTP statuses.
///
/// A 4xx/5xx answer from the service is an ordinary `ApiResponse`; only
/// transport problems and local I/O end up here.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to read photo {}: {source}", path.display())]
    PhotoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No credentials configured. Set PETFRIENDS_EMAIL and PETFRIENDS_PASSWORD")]
    MissingCredentials,

    #[error("Failed to read config: {0}")]
    ConfigRead(std::io::Error),

    #[error("Invalid config format: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl ClientError {
    pub fn photo_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PhotoRead {
            path: path.into(),
            source,
        }
    }
}
