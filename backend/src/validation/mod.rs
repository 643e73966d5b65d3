//! Shape validation for parsed grids.
//!
//! A grid is accepted when it has at least one row and every row is as
//! long as the number of rows. Success upgrades the [`Grid`] into a
//! [`SquareGrid`], the only type the operations accept, so a request
//! that fails here can never reach an operation.
//!
//! # Example
//!
//! ```
//! use csvmatrix::models::Grid;
//! use csvmatrix::validation::{validate, is_square};
//! use csvmatrix::error::ValidationError;
//!
//! let square: Grid = vec![vec!["1", "2"], vec!["3", "4"]].into_iter().collect();
//! assert!(is_square(&square));
//! assert_eq!(validate(square).unwrap().size(), 2);
//!
//! let empty = Grid::default();
//! assert_eq!(validate(empty).unwrap_err(), ValidationError::EmptyInput);
//! ```

use crate::error::ValidationError;
use crate::models::{Grid, SquareGrid};

/// Check that `grid` is non-empty and square.
///
/// Reports the first row whose length differs from the row count.
pub fn check_shape(grid: &Grid) -> Result<(), ValidationError> {
    let expected = grid.len();

    if expected == 0 {
        return Err(ValidationError::EmptyInput);
    }

    match grid
        .rows()
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != expected)
    {
        Some((row, cells)) => Err(ValidationError::ShapeMismatch {
            row,
            expected,
            found: cells.len(),
        }),
        None => Ok(()),
    }
}

/// Validate `grid` and turn it into a [`SquareGrid`].
pub fn validate(grid: Grid) -> Result<SquareGrid, ValidationError> {
    check_shape(&grid)?;
    Ok(SquareGrid::new_unchecked(grid.into_rows()))
}

/// Simple variant: just true/false.
pub fn is_square(grid: &Grid) -> bool {
    check_shape(grid).is_ok()
}
