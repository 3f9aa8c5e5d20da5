use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("The provided path {} does not exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("Cannot find config file (tried {})", .0.join(", "))]
    ConfigNotFound(Vec<String>),

    #[error("Cannot find song DB at {}", .0.display())]
    DatabaseNotFound(PathBuf),

    #[error("Invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
