//! GEO series-matrix reader.
//!
//! A series matrix is a tab separated text file, usually gzip compressed:
//!
//! ```text
//! !Series_title           "LPS time course"
//! !Series_platform_id     "GPL1261"
//! !Sample_title           "ctrl_1"        "lps_1"
//! !Sample_geo_accession   "GSM1304836"    "GSM1304837"
//! !series_matrix_table_begin
//! "ID_REF"                "GSM1304836"    "GSM1304837"
//! "1415670_at"            8.31            8.12
//! !series_matrix_table_end
//! ```
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::io::Read;

use flate2::read::MultiGzDecoder;
use rayon::prelude::*;

use crate::error::ParseError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const TABLE_BEGIN: &str = "!series_matrix_table_begin";
const TABLE_END: &str = "!series_matrix_table_end";

/// Records decoded from one series-matrix file, before assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    pub name: String,
    /// `!Series_<key>` lines; repeated keys accumulate.
    pub series: BTreeMap<String, Vec<String>>,
    /// `!Sample_<key>` lines in file order, one value per sample.
    pub samples: Vec<(String, Vec<String>)>,
    pub sample_ids: Vec<String>,
    pub row_ids: Vec<String>,
    /// Row-major, `row_ids.len() * sample_ids.len()` values.
    pub values: Vec<f32>,
}

pub fn parse_series_matrix(name: &str, bytes: &[u8]) -> Result<SeriesTable, ParseError> {
    let text = decode(name, bytes)?;

    let mut series: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut samples = Vec::new();
    let mut header: Option<Vec<String>> = None;
    let mut table_lines: Vec<(usize, &str)> = Vec::new();
    let mut in_table = false;
    let mut saw_begin = false;
    let mut saw_end = false;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim_end_matches('\r');

        if in_table {
            if line.starts_with(TABLE_END) {
                in_table = false;
                saw_end = true;
            } else if line.trim().is_empty() {
                continue;
            } else if header.is_none() {
                header = Some(split_fields(line).map(str::to_string).collect());
            } else {
                table_lines.push((line_no, line));
            }
            continue;
        }

        if line.starts_with(TABLE_BEGIN) {
            in_table = true;
            saw_begin = true;
        } else if let Some(rest) = line.strip_prefix("!Series_") {
            let (key, values) = split_annotation(rest);
            series.entry(key).or_default().extend(values);
        } else if let Some(rest) = line.strip_prefix("!Sample_") {
            samples.push(split_annotation(rest));
        }
    }

    if !(saw_begin && saw_end) {
        return Err(ParseError::MissingTable {
            file: name.to_string(),
        });
    }
    let header = header
        .filter(|h| h.first().is_some_and(|id| id.eq_ignore_ascii_case("ID_REF")))
        .ok_or_else(|| ParseError::MissingHeader {
            file: name.to_string(),
        })?;
    let width = header.len();

    let rows: Vec<(String, Vec<f32>)> = table_lines
        .par_iter()
        .map(|&(line_no, line)| parse_row(name, line_no, line, width))
        .collect::<Result<_, _>>()?;

    let mut row_ids = Vec::with_capacity(rows.len());
    let mut values = Vec::with_capacity(rows.len() * (width - 1));
    for (id, row) in rows {
        row_ids.push(id);
        values.extend(row);
    }

    log::debug!(
        "{name}: parsed {} rows x {} samples, {} sample annotations",
        row_ids.len(),
        width - 1,
        samples.len()
    );

    Ok(SeriesTable {
        name: name.to_string(),
        series,
        samples,
        sample_ids: header.into_iter().skip(1).collect(),
        row_ids,
        values,
    })
}

fn decode<'a>(name: &str, bytes: &'a [u8]) -> Result<Cow<'a, str>, ParseError> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut text = String::new();
        MultiGzDecoder::new(bytes)
            .read_to_string(&mut text)
            .map_err(|source| ParseError::Decompress {
                file: name.to_string(),
                source,
            })?;
        Ok(Cow::Owned(text))
    } else {
        std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|_| ParseError::Encoding {
                file: name.to_string(),
            })
    }
}

fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split('\t').map(unquote)
}

fn split_annotation(rest: &str) -> (String, Vec<String>) {
    let mut fields = split_fields(rest);
    let key = fields.next().unwrap_or_default().to_string();
    (key, fields.map(str::to_string).collect())
}

fn parse_row(
    file: &str,
    line_no: usize,
    line: &str,
    width: usize,
) -> Result<(String, Vec<f32>), ParseError> {
    let fields: Vec<&str> = split_fields(line).collect();
    if fields.len() != width {
        return Err(ParseError::FieldCount {
            file: file.to_string(),
            line: line_no,
            expected: width,
            found: fields.len(),
        });
    }
    let values = fields[1..]
        .iter()
        .enumerate()
        .map(|(j, tok)| {
            parse_value(tok).ok_or_else(|| ParseError::InvalidValue {
                file: file.to_string(),
                line: line_no,
                column: j + 1,
                token: tok.to_string(),
            })
        })
        .collect::<Result<Vec<f32>, _>>()?;
    Ok((fields[0].to_string(), values))
}

fn parse_value(token: &str) -> Option<f32> {
    match token {
        "" => Some(f32::NAN),
        t if t.eq_ignore_ascii_case("null")
            || t.eq_ignore_ascii_case("na")
            || t.eq_ignore_ascii_case("nan") =>
        {
            Some(f32::NAN)
        }
        t => t.parse::<f32>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_markers_are_reported() {
        let err = parse_series_matrix("x", b"!Series_title\t\"t\"\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingTable { .. }));
    }

    #[test]
    fn unterminated_table_is_reported() {
        let text = "!series_matrix_table_begin\n\"ID_REF\"\t\"GSM1\"\n\"p1\"\t1.0\n";
        let err = parse_series_matrix("x", text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MissingTable { .. }));
    }

    #[test]
    fn missing_value_tokens_become_nan() {
        for tok in ["", "null", "NA", "NaN"] {
            assert!(parse_value(tok).unwrap().is_nan(), "{tok}");
        }
        assert_eq!(parse_value("1e-3"), Some(0.001));
        assert_eq!(parse_value("abc"), None);
    }

    #[test]
    fn unquote_strips_only_matching_quotes() {
        assert_eq!(unquote("\"GSM1\""), "GSM1");
        assert_eq!(unquote("\"half"), "\"half");
        assert_eq!(unquote(" 8.1 "), "8.1");
    }
}
