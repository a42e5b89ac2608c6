use std::{
    fs::read_dir,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::{prelude::*, ThreadPoolBuilder};
use tracing::{info, warn};

use crate::{table::Table, utils::progress_bar};

pub mod collect;
pub mod compare;
pub mod filter;
pub mod ratios;
pub mod reencode;
pub mod unique_areas;

/// `*.csv` files directly inside `dir`, sorted by name.
pub fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut output = Vec::new();
    for entry in read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|x| x == "csv") {
            output.push(path);
        }
    }
    output.sort();
    Ok(output)
}

/// Runs `process` over every CSV in `folder` on a pool of `threads` workers
/// (all CPUs when unset) and stacks the results under `headers`.
///
/// A file that fails is logged and counts as an empty table.
pub fn ingest<F>(folder: &Path, headers: &[&str], threads: Option<usize>, process: F) -> Result<Table>
where
    F: Fn(&Path) -> Result<Table> + Sync,
{
    let files = csv_files(folder)?;
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(0))
        .build()?;
    info!(
        "Processing {} files from {} on {} workers",
        files.len(),
        folder.display(),
        pool.current_num_threads()
    );

    let pb = progress_bar(files.len() as u64);
    let tables: Vec<Table> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let table = process(path.as_path()).unwrap_or_else(|e| {
                    warn!("Error processing {}: {e:#}", path.display());
                    Table::new(headers)
                });
                pb.inc(1);
                table
            })
            .collect()
    });
    pb.finish_and_clear();

    Ok(Table::concat(headers, tables))
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use anyhow::bail;

    use super::*;

    #[test]
    fn lists_only_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("b.csv"), "x\n").unwrap();
        write(dir.path().join("a.csv"), "x\n").unwrap();
        write(dir.path().join("notes.txt"), "x\n").unwrap();

        let names: Vec<_> = csv_files(dir.path())
            .unwrap()
            .iter()
            .map(|x| x.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn failed_files_become_empty() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("good.csv"), "name\nx\ny\n").unwrap();
        write(dir.path().join("bad.csv"), "name\nz\n").unwrap();

        let table = ingest(dir.path(), &["name"], Some(2), |path| {
            if path.ends_with("bad.csv") {
                bail!("unreadable");
            }
            Table::read(path)
        })
        .unwrap();

        assert_eq!(table.headers, vec!["name"]);
        assert_eq!(table.rows, vec![vec!["x"], vec!["y"]]);
    }
}
