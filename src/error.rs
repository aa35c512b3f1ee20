pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Malformed input, reported back to the caller as-is
    #[error("{0}")]
    Validation(String),
    // No stored row for the requested id
    #[error("subscription not found")]
    NotFound,
    // Anything the storage backend failed on
    #[error("storage error: {0}")]
    Storage(anyhow::Error),
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Storage(other.into()),
        }
    }
}
