//! Error types for dvdforged-ifo.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for dvdforged-ifo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for dvdforged-ifo operations.
///
/// Every variant except [`Error::Validation`] is fatal on first occurrence.
/// `Validation` carries the complete batch of navigation-graph problems
/// found in one pass.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred, typically while writing the output sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Shared-layer error (directory creation, language codes).
    #[error(transparent)]
    Common(#[from] dvdforged_common::Error),

    /// An existing titleset control file could not be opened.
    #[error("Cannot open {}: {source}", path.display())]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An existing titleset control file is shorter than its two header sectors.
    #[error("Truncated IFO {}: {len} bytes", path.display())]
    TruncatedIfo { path: PathBuf, len: usize },

    /// A titleset control file holds a sector count that cannot be represented.
    #[error("Invalid IFO {}: sector count out of range", path.display())]
    InvalidIfo { path: PathBuf },

    /// The title search table would no longer fit one sector.
    #[error("Too many titlesets (max: {max})")]
    TooManyTitlesets { max: usize },

    /// A `VTS_00_0.IFO` file was found.
    #[error("Cannot have titleset #0 ({name})")]
    TitlesetZero { name: String },

    /// Two file names map to the same titleset number.
    #[error("Two different names for titleset #{number}: {first} and {second}")]
    DuplicateTitleset {
        number: u32,
        first: String,
        second: String,
    },

    /// Titleset numbering has a hole.
    #[error("Titleset #{number} ({name}) does not immediately follow the last titleset")]
    TitlesetGap { number: u32, name: String },

    /// No titleset control files exist.
    #[error("No .IFO files to process")]
    NoTitlesets,

    /// Navigation-graph validation failed.
    #[error("{} validation error(s):\n  {}", .0.len(), .0.join("\n  "))]
    Validation(Vec<String>),

    /// The navigation compiler rejected a program.
    #[error("Cannot compile {context}: {message}")]
    Compile { context: String, message: String },

    /// The data model is internally inconsistent.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// A table produced a different size in the commit pass than in the plan pass.
    #[error("Layout mismatch: {0}")]
    Layout(String),
}

impl Error {
    /// Create an invalid model error.
    pub fn invalid_model(msg: impl Into<String>) -> Self {
        Self::InvalidModel(msg.into())
    }

    /// Create a compile error.
    pub fn compile(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Compile {
            context: context.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_lists_every_message() {
        let err = Error::Validation(vec!["first".into(), "second".into()]);
        let text = err.to_string();
        assert!(text.starts_with("2 validation error(s)"));
        assert!(text.contains("first"));
        assert!(text.contains("second"));
    }

    #[test]
    fn test_gap_message() {
        let err = Error::TitlesetGap {
            number: 3,
            name: "VTS_03_0.IFO".into(),
        };
        assert_eq!(
            err.to_string(),
            "Titleset #3 (VTS_03_0.IFO) does not immediately follow the last titleset"
        );
    }
}
