use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The catalog source could not be opened or parsed at all.
    #[error("catalog unavailable at {}: {reason}", path.display())]
    CatalogUnavailable { path: PathBuf, reason: String },

    /// The catalog header lacks a column every row needs.
    #[error("catalog is missing required column {column:?}")]
    MissingColumn { column: &'static str },

    #[error("not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
