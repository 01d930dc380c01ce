use thiserror::Error;

/// The error type for every fallible recipe book operation.
///
/// Variants carry plain strings so the enum stays `Clone` and can be
/// delivered inside UI messages from background tasks. Each variant has
/// a defined presentation: `Validation` is shown inline in the form,
/// `NotFound` and `Image` appear in the dismissible notice bar, and
/// `Storage` is fatal at startup (blocking dialog) but only a notice
/// once the window is up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A form field failed validation (e.g. empty recipe name).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An operation targeted a recipe id that no longer exists.
    #[error("Recipe #{0} not found")]
    NotFound(i64),

    /// The attached image could not be read, decoded, or stored.
    #[error("Image error: {0}")]
    Image(String),

    /// The recipe database could not be opened or queried.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

/// A specialized `Result` type for recipe book operations.
pub type Result<T> = std::result::Result<T, Error>;
