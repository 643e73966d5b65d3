//! Matrix operations.
//!
//! Every operation is a pure function of a [`SquareGrid`]. `echo`,
//! `invert` and `flatten` work on raw tokens; `sum` and `multiply` parse
//! each token as a base-10 `i64` first.
//!
//! Arithmetic is checked: a result that does not fit in `i64` is an
//! [`OperationError::Overflow`] rather than a wrapped value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OperationError;
use crate::models::{OperationOutput, SquareGrid};

/// All available matrix operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Return the matrix unchanged
    Echo,

    /// Transpose: entry (i, j) becomes entry (j, i)
    Invert,

    /// All entries in row-major order, on one line
    Flatten,

    /// Sum of all entries
    Sum,

    /// Product of all entries
    Multiply,
}

impl Operation {
    /// Every operation, in route order.
    pub const ALL: [Operation; 5] = [
        Operation::Echo,
        Operation::Invert,
        Operation::Flatten,
        Operation::Sum,
        Operation::Multiply,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Echo => "echo",
            Operation::Invert => "invert",
            Operation::Flatten => "flatten",
            Operation::Sum => "sum",
            Operation::Multiply => "multiply",
        }
    }

    /// HTTP path this operation is served on.
    pub fn path(&self) -> &'static str {
        match self {
            Operation::Echo => "/echo",
            Operation::Invert => "/invert",
            Operation::Flatten => "/flatten",
            Operation::Sum => "/sum",
            Operation::Multiply => "/multiply",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::Echo => "Return the matrix as uploaded",
            Operation::Invert => "Transpose the matrix (rows become columns)",
            Operation::Flatten => "All values in row-major order on a single line",
            Operation::Sum => "Sum of all values",
            Operation::Multiply => "Product of all values",
        }
    }

    /// Apply this operation to a validated grid
    pub fn apply(&self, grid: &SquareGrid) -> Result<OperationOutput, OperationError> {
        match self {
            Operation::Echo => Ok(echo(grid)),
            Operation::Invert => Ok(invert(grid)),
            Operation::Flatten => Ok(flatten(grid)),
            Operation::Sum => sum(grid).map(OperationOutput::Scalar),
            Operation::Multiply => multiply(grid).map(OperationOutput::Scalar),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/').to_lowercase().as_str() {
            "echo" => Ok(Operation::Echo),
            "invert" | "transpose" => Ok(Operation::Invert),
            "flatten" => Ok(Operation::Flatten),
            "sum" => Ok(Operation::Sum),
            "multiply" | "product" => Ok(Operation::Multiply),
            other => Err(format!(
                "unknown operation '{}' (expected one of: echo, invert, flatten, sum, multiply)",
                other
            )),
        }
    }
}

fn echo(grid: &SquareGrid) -> OperationOutput {
    OperationOutput::Grid(grid.rows().to_vec())
}

/// Builds a fresh grid; the input is only read.
fn invert(grid: &SquareGrid) -> OperationOutput {
    let rows = grid.rows();
    let n = grid.size();

    let transposed = (0..n)
        .map(|i| (0..n).map(|j| rows[j][i].clone()).collect())
        .collect();

    OperationOutput::Grid(transposed)
}

fn flatten(grid: &SquareGrid) -> OperationOutput {
    OperationOutput::Row(grid.tokens().map(str::to_string).collect())
}

fn parse_token(token: &str) -> Result<i64, OperationError> {
    token
        .parse::<i64>()
        .map_err(|source| OperationError::NumericParse {
            token: token.to_string(),
            source,
        })
}

fn parse_all(grid: &SquareGrid) -> Result<Vec<i64>, OperationError> {
    grid.tokens().map(parse_token).collect()
}

fn sum(grid: &SquareGrid) -> Result<i64, OperationError> {
    parse_all(grid)?
        .into_iter()
        .try_fold(0i64, |acc, n| acc.checked_add(n))
        .ok_or(OperationError::Overflow { operation: "sum" })
}

/// Every token is parsed before multiplying, so a bad token wins over
/// overflow, and a zero factor always yields 0.
fn multiply(grid: &SquareGrid) -> Result<i64, OperationError> {
    let values = parse_all(grid)?;

    if values.contains(&0) {
        return Ok(0);
    }

    values
        .into_iter()
        .try_fold(1i64, |acc, n| acc.checked_mul(n))
        .ok_or(OperationError::Overflow {
            operation: "multiply",
        })
}

/// Human-readable listing of the operations, for the CLI.
pub fn operations_description() -> String {
    let mut out = String::from("Available operations:\n\n");
    for op in Operation::ALL {
        out.push_str(&format!(
            "  {:<10} POST {:<10} {}\n",
            op.name(),
            op.path(),
            op.description()
        ));
    }
    out.push_str("\nUpload the matrix as a multipart field named 'file', e.g.\n");
    out.push_str("  curl -F 'file=@./matrix.csv' localhost:8080/sum\n");
    out
}
