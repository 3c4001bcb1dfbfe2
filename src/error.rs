//! Error types for paperparse.

use std::io;
use thiserror::Error;

/// Result type alias for paperparse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting a paper.
///
/// Pattern misses are never errors; they surface as empty fields in the
/// parsed document. Only the page source, the resource guards and the
/// language-model collaborator produce these.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Process memory went over the configured ceiling mid-parse.
    #[error("Memory limit exceeded: {used_mb} MB in use, limit is {limit_mb} MB")]
    MemoryExhausted { used_mb: u64, limit_mb: u64 },

    /// The language-model collaborator failed or returned nothing usable.
    #[error("Completion error: {0}")]
    Completion(String),

    /// Error during rendering (JSON, outline, records).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is the resource-exhaustion kind.
    ///
    /// Callers use this to tell users a document is too large or complex
    /// rather than broken.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Error::MemoryExhausted { .. })
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Render(format!("JSON serialization error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MemoryExhausted {
            used_mb: 612,
            limit_mb: 500,
        };
        assert_eq!(
            err.to_string(),
            "Memory limit exceeded: 612 MB in use, limit is 500 MB"
        );

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );
    }

    #[test]
    fn test_resource_exhaustion_kind() {
        let err = Error::MemoryExhausted {
            used_mb: 1,
            limit_mb: 0,
        };
        assert!(err.is_resource_exhaustion());
        assert!(!Error::Other("boom".to_string()).is_resource_exhaustion());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
