//! Error types for the data layer.
//!
//! Structural errors (`VectorError`, `MatrixError`) are contract violations
//! at the call site. `FetchError` and `ParseError` are boundary failures
//! that the loader hands back through `LoadError`, which always names the
//! stage that failed.
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::math::ShapeError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    #[error("vector '{name}' does not provide element access")]
    NotImplemented { name: String },

    #[error("index {index} out of range for vector of size {size}")]
    OutOfRange { index: usize, size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// Which part of a matrix disagreed with the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Mismatch {
    #[error("{axis} headers {headers} but grid has {grid}")]
    Headers {
        axis: Axis,
        headers: usize,
        grid: usize,
    },

    #[error("{rows} x {cols} grid but {len} values")]
    Values { rows: usize, cols: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(Mismatch),

    #[error("{axis} index {index} out of range for {len} {axis}s")]
    OutOfRange { axis: Axis, index: usize, len: usize },
}

impl MatrixError {
    pub(crate) fn headers(axis: Axis, headers: usize, grid: usize) -> Self {
        MatrixError::DimensionMismatch(Mismatch::Headers {
            axis,
            headers,
            grid,
        })
    }
}

impl From<ShapeError> for MatrixError {
    fn from(e: ShapeError) -> Self {
        MatrixError::DimensionMismatch(Mismatch::Values {
            rows: e.rows,
            cols: e.cols,
            len: e.len,
        })
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("'{0}' is not a GEO series identifier (expected GSE<digits>[-GPL<digits>])")]
    InvalidIdentifier(String),

    #[error("no series matrix files found for {0}")]
    NotFound(String),

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{file}: could not decompress payload: {source}")]
    Decompress {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}: payload is not valid UTF-8")]
    Encoding { file: String },

    #[error("{file}: no series_matrix_table_begin/end section")]
    MissingTable { file: String },

    #[error("{file}: table has no ID_REF header row")]
    MissingHeader { file: String },

    #[error("{file}, line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{file}, line {line}, column {column}: '{token}' is not a number")]
    InvalidValue {
        file: String,
        line: usize,
        column: usize,
        token: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Stage of a load at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Fetch,
    Parse,
    Assemble,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStage::Fetch => write!(f, "fetch"),
            LoadStage::Parse => write!(f, "parse"),
            LoadStage::Assemble => write!(f, "assemble"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),

    #[error("assemble failed for {name}: {source}")]
    Assemble {
        name: String,
        #[source]
        source: MatrixError,
    },

    #[error("parse failed: worker panicked or was cancelled: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl LoadError {
    pub fn stage(&self) -> LoadStage {
        match self {
            LoadError::Fetch(_) => LoadStage::Fetch,
            LoadError::Parse(_) | LoadError::Worker(_) => LoadStage::Parse,
            LoadError::Assemble { .. } => LoadStage::Assemble,
        }
    }
}
