//! Common error types used throughout dvdforged.
//!
//! This module provides the error type shared by the path helpers and the
//! primitive types: filesystem failures while preparing a disc tree and
//! malformed user-supplied values.

/// Common error type for dvdforged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A directory of the disc tree could not be created.
    #[error("Cannot create dir {}: {source}", path.display())]
    CreateDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A menu language code was not exactly two letters.
    #[error("Menu language '{0}' is not two letters")]
    InvalidLanguage(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidLanguage("eng".into());
        assert_eq!(err.to_string(), "Menu language 'eng' is not two letters");

        let err = Error::invalid_input("bad format");
        assert_eq!(err.to_string(), "Invalid input: bad format");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_create_dir_keeps_source() {
        let err = Error::CreateDir {
            path: "/nope/VIDEO_TS".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/nope/VIDEO_TS"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
