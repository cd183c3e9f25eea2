use std::io::Write;

use crate::matrix::Matrix;
use crate::vector::Vector;

/// Write `matrix` as TSV: an `id` header followed by column names, then one
/// line per row. NaN is written as an empty field.
pub fn write_tsv<W: Write>(matrix: &Matrix, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    let mut header = Vec::with_capacity(matrix.column_count() + 1);
    header.push("id".to_string());
    header.extend(matrix.columns().map(|c| c.name().to_string()));
    wtr.write_record(&header)?;

    for row in matrix.rows() {
        let mut record = Vec::with_capacity(matrix.column_count() + 1);
        record.push(row.name().to_string());
        record.extend(row.as_slice().iter().map(|v| {
            if v.is_nan() {
                String::new()
            } else {
                v.to_string()
            }
        }));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
