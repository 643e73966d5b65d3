//! Error types for the csvmatrix service.
//!
//! - [`CsvError`] - malformed CSV text
//! - [`ValidationError`] - grid is empty or not square
//! - [`OperationError`] - numeric failures in `sum` / `multiply`
//! - [`InputError`] - reading a CSV file from disk (CLI)
//! - [`RequestError`] - everything a single HTTP request can fail with
//! - [`ServerError`] - startup and configuration errors
//!
//! Lower-level errors convert into [`RequestError`] via `From`,
//! so `?` works across module boundaries inside a handler.

use axum::http::StatusCode;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// CSV parsing error with position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvError {
    pub line: usize,
    pub column: Option<usize>,
    pub message: String,
}

impl std::fmt::Display for CsvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.column {
            Some(col) => write!(
                f,
                "parse error on line {}, column {}: {}",
                self.line, col, self.message
            ),
            None => write!(f, "parse error on line {}: {}", self.line, self.message),
        }
    }
}

impl std::error::Error for CsvError {}

impl CsvError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
        CsvError::new(line, err.to_string())
    }
}

// =============================================================================
// Input File Errors
// =============================================================================

/// Errors loading a CSV file from disk.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read; no CSV position applies.
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] CsvError),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Shape errors reported by [`crate::validation::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The CSV contained no rows at all.
    #[error("no data provided")]
    EmptyInput,

    /// A row's length differs from the number of rows.
    #[error("unequal rows and column lengths")]
    ShapeMismatch {
        /// 0-based index of the first offending row.
        row: usize,
        /// Row count, which every row length must match.
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// Operation Errors
// =============================================================================

/// Errors raised while computing `sum` or `multiply`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// A token is not a base-10 integer.
    #[error("invalid integer {token:?}: {source}")]
    NumericParse {
        token: String,
        #[source]
        source: ParseIntError,
    },

    /// The result does not fit in an `i64`.
    #[error("integer overflow while computing {operation}")]
    Overflow { operation: &'static str },
}

// =============================================================================
// Request Errors (top-level)
// =============================================================================

/// Every way a single request can fail.
///
/// Rendered by the API layer as `error <message>` with the status
/// returned by [`RequestError::status_code`].
#[derive(Debug, Error)]
pub enum RequestError {
    /// The uploaded `file` field could not be read.
    #[error("{0}")]
    FileRetrieval(String),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    /// No route matches the request path (kept for logging).
    #[error("endpoint not found")]
    RouteNotFound(String),

    /// The path exists but not for this method (kept for logging).
    #[error("method not allowed")]
    MethodNotAllowed(String),
}

impl RequestError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::FileRetrieval(_) | RequestError::Csv(_) | RequestError::Operation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RequestError::Validation(_) => StatusCode::BAD_REQUEST,
            RequestError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            RequestError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// Startup errors for the HTTP server and CLI.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Binding or serving failed.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV parsing.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for a single request.
pub type RequestResult<T> = Result<T, RequestError>;

/// Result type for server startup.
pub type ServerResult<T> = Result<T, ServerError>;
