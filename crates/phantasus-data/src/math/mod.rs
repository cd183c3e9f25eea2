//! Dense storage backing matrices and owned vectors.
//!
//! `Array2` holds an expression grid in row-major order and `Array1` holds
//! the values of owned vectors. Both are deliberately small; anything that
//! carries a name or annotations lives one level up in `vector` / `matrix`.
pub mod array1;
pub mod array2;

pub use array1::Array1;
pub use array2::{Array2, ShapeError};
