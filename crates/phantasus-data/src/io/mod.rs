//! Reading GEO series-matrix payloads and writing matrices back out.
pub mod series_matrix;
pub mod tsv;

pub use series_matrix::{parse_series_matrix, SeriesTable};
pub use tsv::write_tsv;
