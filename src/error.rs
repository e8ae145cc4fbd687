//! Error types for price_tracker

use std::fmt;

/// Unified error type for price_tracker operations
#[derive(Debug)]
pub enum Error {
    /// HTTP request failed (network error, timeout, etc.)
    Network(reqwest::Error),
    /// Failed to parse JSON response
    Parse(serde_json::Error),
    /// HTTP error status code
    HttpStatus(reqwest::StatusCode),
    /// File I/O error
    Io(std::io::Error),
    /// Sheet file read/write failed
    Csv(csv::Error),
    /// Malformed card-reference text (unmatched grouping delimiter)
    Format(String),
    /// Search matched more results than the safety cap allows
    AmbiguousQuery { total: u64, cap: u64 },
    /// Configuration failure, fatal at the CLI
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Network(e) => write!(f, "Network error: {}", e),
            Error::Parse(e) => write!(f, "Parse error: {}", e),
            Error::HttpStatus(status) => write!(f, "HTTP error: {}", status),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Csv(e) => write!(f, "Sheet error: {}", e),
            Error::Format(msg) => write!(f, "Format error: {}", msg),
            Error::AmbiguousQuery { total, cap } => {
                write!(f, "Got {} results (cap {}). Try to be more specific.", total, cap)
            }
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Network(e) => Some(e),
            Error::Parse(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

/// Result alias for price_tracker operations
pub type Result<T> = std::result::Result<T, Error>;
