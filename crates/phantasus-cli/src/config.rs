use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use phantasus_data::LoaderConfig;

/// Settings for `phantasus load`, read from JSON and overridden by flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    pub version: String,
    pub loader: LoaderConfig,
    /// Directory TSV exports are written to; nothing is written when unset.
    pub output_dir: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            version: clap::crate_version!().to_string(),
            loader: LoaderConfig::default(),
            output_dir: None,
        }
    }
}

/// Load a CLI configuration from a JSON file.
pub fn load_cli_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: CliConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

impl CliConfig {
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => {
                log::info!("Using config: {:?}", path);
                load_cli_config(path)?
            }
            None => CliConfig::default(),
        };

        if let Some(base_url) = matches.get_one::<String>("base_url") {
            config.loader = config.loader.with_base_url(base_url.clone());
        }
        if let Some(timeout) = matches.get_one::<u64>("timeout") {
            config.loader.timeout_secs = *timeout;
        }
        if let Some(output_dir) = matches.get_one::<PathBuf>("output_dir") {
            config.output_dir = Some(output_dir.to_string_lossy().into_owned());
        }

        Ok(config)
    }
}
