use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use crate::table::Table;

/// `hu.csv` becomes `hu-utf8.csv` next to it.
pub fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|x| x.to_string_lossy().to_string())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}-utf8.csv"))
}

/// Rewrites a CSV as UTF-8 with a signature.
pub fn run(input: &Path, output: &Path) -> Result<()> {
    let table = Table::read(input)?;
    table.write(output)?;
    info!("Saved {} rows to {}", table.len(), output.display());
    Ok(())
}
