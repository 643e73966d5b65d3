//! Domain models for the csvmatrix service.
//!
//! - [`Grid`] - rows of string tokens exactly as parsed, no shape guarantee
//! - [`SquareGrid`] - a grid proven non-empty and square
//! - [`OperationOutput`] - what an operation produces, ready to render

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Grid
// =============================================================================

/// Two-dimensional collection of tokens, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

impl<S: Into<String>> FromIterator<Vec<S>> for Grid {
    fn from_iter<I: IntoIterator<Item = Vec<S>>>(iter: I) -> Self {
        Grid::new(
            iter.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

// =============================================================================
// Square Grid
// =============================================================================

/// An N×N grid with N ≥ 1.
///
/// Only [`crate::validation::validate`] builds one, so every operation
/// can index `rows[i][j]` for `i, j < size()` without checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SquareGrid {
    rows: Vec<Vec<String>>,
}

impl SquareGrid {
    pub(crate) fn new_unchecked(rows: Vec<Vec<String>>) -> Self {
        debug_assert!(!rows.is_empty());
        debug_assert!(rows.iter().all(|r| r.len() == rows.len()));
        Self { rows }
    }

    /// Side length N.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Entry at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<&str> {
        self.rows.get(i)?.get(j).map(String::as_str)
    }

    /// All tokens in row-major order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

impl From<SquareGrid> for Grid {
    fn from(square: SquareGrid) -> Self {
        Grid::new(square.rows)
    }
}

// =============================================================================
// Operation Output
// =============================================================================

/// Result of applying an [`crate::operations::Operation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OperationOutput {
    /// A full grid (echo, invert).
    Grid(Vec<Vec<String>>),
    /// A single row of tokens (flatten).
    Row(Vec<String>),
    /// A single integer (sum, multiply).
    Scalar(i64),
}

/// Plaintext body: comma-separated fields, one line per row, each
/// line terminated by `\n`.
impl fmt::Display for OperationOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationOutput::Grid(rows) => {
                for row in rows {
                    writeln!(f, "{}", row.join(","))?;
                }
                Ok(())
            }
            OperationOutput::Row(tokens) => writeln!(f, "{}", tokens.join(",")),
            OperationOutput::Scalar(n) => writeln!(f, "{}", n),
        }
    }
}
