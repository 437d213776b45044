//! Error types for jnlp-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that end the launcher with exit status 1
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from jnlp-core
    #[error(transparent)]
    Core(#[from] jnlp_core::Error),

    /// HTTP client could not be set up
    #[error(transparent)]
    Fetch(#[from] jnlp_core::FetchError),

    /// Bad command-line input
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Extra line printed after the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Core(jnlp_core::Error::BinaryNotFound { .. }) => {
                Some("Please provide suitable unpack200 binary (unpack=PATH)")
            }
            _ => None,
        }
    }
}
