//! Error types for the logger and its sinks

use std::io;
use std::path::PathBuf;

/// Result type for logger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up, writing to, or closing a logger
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The log directory does not exist
    #[error("Log directory not found: {}", path.display())]
    PathNotFound {
        /// The directory that was looked up
        path: PathBuf,
    },

    /// An I/O operation on a sink failed
    #[error("{context}: {source}")]
    Io {
        /// What was being done when the error occurred
        context: String,
        /// The underlying error
        source: io::Error,
    },

    /// A level value outside the recognized set
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// A sink failed to initialize; sinks opened before it were closed again
    #[error("Logger initialization failed: {0}")]
    Init(#[source] Box<Error>),

    /// First failure reported while closing all sinks
    #[error("Logger close failed: {0}")]
    Close(#[source] Box<Error>),

    /// A file sink was written to before `init`
    #[error("Sink is not open")]
    NotOpen,

    /// The sink or logger was already closed
    #[error("Logger is closed")]
    Closed,

    /// A logger was built without any sink
    #[error("Logger has no sinks")]
    NoSinks,

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an I/O error with a short description of the failed operation
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }
}
