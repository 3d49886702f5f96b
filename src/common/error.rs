//! Unified error types for the statusdeck library.
//!
//! A single error enum covers both layers of the crate: dataset shape
//! violations surfaced by the composer, and package/XML failures surfaced
//! by the deck writer.
use thiserror::Error;

/// Main error type for statusdeck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container error while reading or writing the package
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML generation or parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Records within one dataset have inconsistent or reordered keys
    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),

    /// An operation requires more columns per record than are present
    #[error("Insufficient columns: required {required}, found {found}")]
    InsufficientColumns { required: usize, found: usize },

    /// A named key is absent from some record in an otherwise-conforming dataset
    #[error("Key '{0}' not found in dataset records")]
    MissingKey(String),

    /// Part not found in a saved package
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for statusdeck operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Zip(err.to_string())
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
