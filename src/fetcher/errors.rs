//! Errors reported by the fetcher to its callers

use std::error::Error;
use std::fmt;

/// Error code for a region the decoder could not produce
pub const CODE_DECODE_FAILED: &str = "getRegion-tiff-null";
/// Error code for a failure while opening or reading the resource
pub const CODE_READ_EXCEPTION: &str = "getRegion-tiff-read-exception";

/// Why a fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The reference could not be opened
    ResourceUnavailable,
    /// The decoder ran but produced no image
    DecodeFailed,
    /// Reading or decompressing the data failed
    ReadException,
}

impl FetchErrorKind {
    /// Error code reported on the method channel
    ///
    /// An unavailable resource is reported as a read exception.
    pub fn code(&self) -> &'static str {
        match self {
            FetchErrorKind::DecodeFailed => CODE_DECODE_FAILED,
            FetchErrorKind::ResourceUnavailable | FetchErrorKind::ReadException => CODE_READ_EXCEPTION,
        }
    }
}

/// A failed fetch, with a message naming the reference, page and region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
    /// Message of the underlying error, when there is one
    pub details: Option<String>,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        FetchError {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for FetchError {}

/// Result type for fetch operations
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_per_kind() {
        assert_eq!(FetchErrorKind::DecodeFailed.code(), "getRegion-tiff-null");
        assert_eq!(FetchErrorKind::ReadException.code(), "getRegion-tiff-read-exception");
        assert_eq!(FetchErrorKind::ResourceUnavailable.code(), "getRegion-tiff-read-exception");
    }

    #[test]
    fn display_appends_details() {
        let error = FetchError::new(FetchErrorKind::ReadException, "failed to read from uri=a.tif")
            .with_details("I/O error: unexpected end of file");
        assert_eq!(error.to_string(), "failed to read from uri=a.tif: I/O error: unexpected end of file");
        assert_eq!(FetchError::new(FetchErrorKind::DecodeFailed, "x").to_string(), "x");
    }
}
