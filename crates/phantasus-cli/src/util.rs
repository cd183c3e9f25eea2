use std::path::{Path, PathBuf};

use anyhow::Result;

/// Make sure `dir` exists and is a directory, creating it if needed.
pub fn ensure_output_dir(dir: &str) -> Result<PathBuf> {
    let path = PathBuf::from(dir);
    if path.exists() && !path.is_dir() {
        anyhow::bail!("Output path exists and is not a directory: {}", dir);
    }
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// Path of the TSV export for a matrix named `name` under `dir`.
pub fn tsv_path(dir: &Path, name: &str) -> PathBuf {
    let safe: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    dir.join(format!("{safe}.tsv"))
}
