//! Where series-matrix payloads come from.
use std::collections::BTreeSet;

use async_trait::async_trait;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::LoaderConfig;
use crate::error::FetchError;
use crate::loader::accession::Accession;

static MATRIX_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"href="([^"]*_series_matrix\.txt\.gz)""#).expect("valid listing regex")
});

/// One raw series-matrix file as fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFile {
    /// File stem, e.g. `GSE53986` or `GSE100-GPL570`.
    pub name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch every series-matrix file for `accession`.
    async fn fetch(&self, accession: &Accession) -> Result<Vec<SeriesFile>, FetchError>;
}

/// Fetches series matrices over HTTP from a GEO-style directory tree:
/// `{base_url}/{GSEnnn}/{GSE}/matrix/{GSE}[-GPL]_series_matrix.txt.gz`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(config: &LoaderConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn matrix_dir(&self, accession: &Accession) -> String {
        format!(
            "{}/{}/{}/matrix/",
            self.base_url,
            accession.bucket(),
            accession.series
        )
    }

    async fn get(&self, url: &str, accession: &Accession) -> Result<Vec<u8>, FetchError> {
        let http = |source: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().await.map_err(http)?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(accession.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(http)?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self, accession: &Accession) -> Result<Vec<SeriesFile>, FetchError> {
        let dir = self.matrix_dir(accession);
        let listing = self.get(&dir, accession).await?;
        let names = series_matrix_links(&String::from_utf8_lossy(&listing), accession);
        if names.is_empty() {
            return Err(FetchError::NotFound(accession.to_string()));
        }

        let mut files = Vec::with_capacity(names.len());
        for file_name in names {
            let url = format!("{dir}{file_name}");
            info!("Downloading {url}");
            let bytes = self.get(&url, accession).await?;
            let name = file_name
                .trim_end_matches("_series_matrix.txt.gz")
                .to_string();
            files.push(SeriesFile { name, bytes });
        }
        Ok(files)
    }
}

/// Series-matrix file names linked from a directory listing, sorted and
/// restricted to `accession`.
pub fn series_matrix_links(listing: &str, accession: &Accession) -> Vec<String> {
    let mut names = BTreeSet::new();
    for caps in MATRIX_LINK_RE.captures_iter(listing) {
        let href = &caps[1];
        let file_name = href.rsplit('/').next().unwrap_or(href);
        if accession.matches_file(file_name) {
            names.insert(file_name.to_string());
        } else {
            warn!("Skipping {file_name}: not part of {accession}");
        }
    }
    names.into_iter().collect()
}
