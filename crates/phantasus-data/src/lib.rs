//! phantasus-data: expression matrices and a GEO dataset loader.
//!
//! The crate provides a `Matrix` of `f32` values whose rows and columns are
//! exposed as named `Vector`s carrying a property bag, a reader for NCBI GEO
//! series-matrix files, and an async `GeoReader` that fetches a series by
//! accession and assembles one matrix per platform.
pub mod config;
pub mod error;
pub mod io;
pub mod loader;
pub mod math;
pub mod matrix;
pub mod vector;

pub use config::LoaderConfig;
pub use error::{LoadError, LoadStage};
pub use loader::{GeoReader, LoadState, ReadHandle};
pub use matrix::Matrix;
pub use vector::{Properties, Vector, VectorMut};
