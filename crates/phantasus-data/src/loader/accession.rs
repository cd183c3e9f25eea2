use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FetchError;

static ACCESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(GSE[0-9]+)(?:-(GPL[0-9]+))?$").expect("valid accession regex"));

/// A GEO series identifier, optionally pinned to one platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accession {
    pub series: String,
    pub platform: Option<String>,
}

impl Accession {
    /// Directory bucket GEO files the series under: `GSE53986` -> `GSE53nnn`.
    pub fn bucket(&self) -> String {
        let digits = &self.series[3..];
        let keep = digits.len().saturating_sub(3);
        format!("GSE{}nnn", &digits[..keep])
    }

    /// Whether a series-matrix file name belongs to this accession.
    pub fn matches_file(&self, file_name: &str) -> bool {
        let Some(stem) = file_name.strip_suffix("_series_matrix.txt.gz") else {
            return false;
        };
        match &self.platform {
            Some(platform) => stem == format!("{}-{}", self.series, platform),
            None => stem == self.series || stem.starts_with(&format!("{}-GPL", self.series)),
        }
    }
}

impl FromStr for Accession {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let caps = ACCESSION_RE
            .captures(&normalized)
            .ok_or_else(|| FetchError::InvalidIdentifier(s.to_string()))?;
        Ok(Accession {
            series: caps[1].to_string(),
            platform: caps.get(2).map(|m| m.as_str().to_string()),
        })
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.platform {
            Some(platform) => write!(f, "{}-{}", self.series, platform),
            None => write!(f, "{}", self.series),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_series_and_platform() {
        let a: Accession = "gse53986-gpl1261".parse().unwrap();
        assert_eq!(a.series, "GSE53986");
        assert_eq!(a.platform.as_deref(), Some("GPL1261"));
        assert_eq!(a.to_string(), "GSE53986-GPL1261");
    }

    #[test]
    fn rejects_other_identifiers() {
        for bad in [
            "",
            "GSM1304836",
            "GSE",
            "GSE12-",
            "GSE12 GPL3",
            "GSE\u{0661}\u{0662}",
            "GSE\u{ff11}\u{ff12}",
            "GSE12-GPL\u{0663}",
        ] {
            assert!(bad.parse::<Accession>().is_err(), "{bad}");
        }
    }

    #[test]
    fn bucket_keeps_leading_digits() {
        let a: Accession = "GSE53986".parse().unwrap();
        assert_eq!(a.bucket(), "GSE53nnn");
        let short: Accession = "GSE12".parse().unwrap();
        assert_eq!(short.bucket(), "GSEnnn");
    }

    #[test]
    fn file_matching_respects_platform() {
        let all: Accession = "GSE100".parse().unwrap();
        assert!(all.matches_file("GSE100_series_matrix.txt.gz"));
        assert!(all.matches_file("GSE100-GPL570_series_matrix.txt.gz"));
        assert!(!all.matches_file("GSE1000_series_matrix.txt.gz"));

        let one: Accession = "GSE100-GPL570".parse().unwrap();
        assert!(one.matches_file("GSE100-GPL570_series_matrix.txt.gz"));
        assert!(!one.matches_file("GSE100-GPL96_series_matrix.txt.gz"));
    }
}
