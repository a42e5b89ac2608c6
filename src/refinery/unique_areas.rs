use std::path::Path;

use _model::RegionAliases;
use anyhow::Result;
use tracing::info;

use crate::table::Table;

use super::ingest;

pub const COLUMNS: [&str; 2] = ["시도명", "시군구명"];

/// Distinct (province, district) pairs of one bulk file, with provinces
/// canonicalized.
pub fn areas(path: &Path, aliases: &RegionAliases) -> Result<Table> {
    let mut table = Table::read(path)?.select(&COLUMNS)?;
    for row in table.rows.iter_mut() {
        row[0] = aliases.canonicalize(&row[0]).to_string();
    }
    table.dedup();
    Ok(table)
}

pub fn run(
    folder: &Path,
    output: &Path,
    aliases: &RegionAliases,
    threads: Option<usize>,
) -> Result<Table> {
    let mut table = ingest(folder, &COLUMNS, threads, |path| areas(path, aliases))?;
    table.dedup();

    table.write(output)?;
    info!("{} unique areas saved to {}", table.len(), output.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, fs::write};

    use super::*;

    #[test]
    fn merged_pairs_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let bulk = dir.path().join("bulk");
        std::fs::create_dir(&bulk).unwrap();
        write(
            bulk.join("seoul.csv"),
            "상호명,시도명,시군구명,행정동명\n\
             a,서울특별시,강남구,역삼1동\n\
             b,서울특별시,강남구,역삼2동\n\
             c,서울,서초구,반포동\n",
        )
        .unwrap();
        write(
            bulk.join("mixed.csv"),
            "\u{feff}시도명,시군구명\n서울시,강남구\n경기도,수원시 장안구\n",
        )
        .unwrap();
        write(bulk.join("broken.csv"), "상호명\nx\n").unwrap();

        let output = dir.path().join("unique_cities_normalized.csv");
        let table = run(&bulk, &output, &RegionAliases::default(), Some(2)).unwrap();

        let pairs: HashSet<_> = table.rows.iter().collect();
        assert_eq!(pairs.len(), table.len());
        assert_eq!(table.len(), 3);
        assert!(table.rows.contains(&vec!["서울".to_string(), "강남구".to_string()]));
        assert!(table.rows.contains(&vec!["경기".to_string(), "수원시 장안구".to_string()]));

        assert_eq!(Table::read(&output).unwrap(), table);
    }
}
