use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("catalog unavailable: {0}")]
    Catalog(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog record: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for errors caused by caller input rather than the catalog backend.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::UnknownSortKey(_) | Error::UnknownCategory(_))
    }
}
