//! # csvmatrix - matrix operations over uploaded CSV files
//!
//! An HTTP service that takes a square matrix as a CSV upload and
//! echoes, transposes, flattens, sums or multiplies it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  multipart  │────▶│   Parser    │────▶│  Validator  │────▶│  Operation  │
//! │  "file"     │     │  (Grid)     │     │ (SquareGrid)│     │  (output)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use csvmatrix::{parse_grid_str, validate, Operation};
//!
//! let grid = parse_grid_str("1,2,3\n4,5,6\n7,8,9\n").unwrap();
//! let square = validate(grid).unwrap();
//! let output = Operation::Invert.apply(&square).unwrap();
//! assert_eq!(output.to_string(), "1,4,7\n2,5,8\n3,6,9\n");
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and HTTP status mapping
//! - [`models`] - Grid, SquareGrid, OperationOutput
//! - [`parser`] - CSV parsing with encoding detection
//! - [`validation`] - Square-shape validation
//! - [`operations`] - The five matrix operations
//! - [`config`] - Server configuration
//! - [`api`] - HTTP server, route table, logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Validation
pub mod validation;

// Operations
pub mod operations;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{
    CsvError, InputError, OperationError, RequestError, ServerError, ValidationError,
};

pub use models::{Grid, OperationOutput, SquareGrid};

pub use parser::{parse_grid, parse_grid_file, parse_grid_str};

pub use validation::{check_shape, is_square, validate};

pub use operations::{operations_description, Operation};

pub use config::ServerConfig;

pub use api::routes::RouteTable;

// Server
pub mod server {
    pub use crate::api::server::{build_router, start_server};
}
