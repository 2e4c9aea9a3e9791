use sea_orm::DbErr;
use thiserror::Error;

/// Why a traffic request produced no usable response.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("provider answered HTTP {status}")]
    Status { status: reqwest::StatusCode },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure reported by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbErr),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("response is empty, nothing to save")]
    EmptyResponse,

    #[error("provider returned status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    ProviderStatus {
        status: i32,
        message: Option<String>,
    },

    #[error("database connection failed: {0}")]
    Connect(#[source] StoreError),

    #[error("failed to save traffic data: {0}")]
    Write(#[source] StoreError),
}

impl PersistError {
    /// True when the database was never touched.
    pub fn is_rejected(&self) -> bool {
        matches!(self, PersistError::EmptyResponse | PersistError::ProviderStatus { .. })
    }
}
