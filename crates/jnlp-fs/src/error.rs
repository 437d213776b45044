//! Error types for jnlp-fs

use std::path::PathBuf;

/// Result type for jnlp-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in jnlp-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("Run directory {path} already exists; remove it or choose another temp root")]
    RunDirExists { path: PathBuf },

    #[error("Refusing to write {name:?}: not a flat file name")]
    NotFlat { name: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
