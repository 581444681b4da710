use asset::mesh::MeshError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request timed out")]
    Timeout,

    #[error("server is offline or unreachable")]
    Offline,

    #[error("network error: {0}")]
    Network(String),

    #[error("server rejected the request (HTTP {0})")]
    HttpStatus(u16),

    #[error("mesh contained no usable geometry")]
    EmptyMesh,
}

impl LoadError {
    /// Transport failures are retried; everything else fails immediately.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LoadError::Timeout | LoadError::Offline | LoadError::Network(_)
        )
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LoadError::Timeout
        } else if err.is_connect() {
            LoadError::Offline
        } else {
            LoadError::Network(err.to_string())
        }
    }
}

impl From<MeshError> for LoadError {
    fn from(err: MeshError) -> Self {
        match err {
            MeshError::EmptyMesh => LoadError::EmptyMesh,
        }
    }
}
