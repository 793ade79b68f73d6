#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid file name: {0}")]
    InvalidFileName(String),
    #[error("data directory not available")]
    DataDirUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;
