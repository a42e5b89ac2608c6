use std::{
    ffi::OsStr,
    fs::create_dir_all,
    path::{Path, PathBuf},
};

use _model::{split_address, ReferenceAreas, RegionAliases};
use anyhow::Result;
use tracing::{info, warn};

use crate::table::Table;

use super::csv_files;

const SAMPLE_PROVINCE: &str = "시도명";
const SAMPLE_DISTRICT: &str = "시군구명";

const OUTPUT_HEADER: [&str; 5] = ["store", "addr", "prov", "area", "div"];
const FAIL_HEADER: [&str; 6] = ["store", "addr", "prov", "area", "div", "original_file"];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub files: usize,
    pub kept: usize,
    pub failed: usize,
}

/// Loads valid districts from the sample file. Pairs are used when the sample
/// names provinces, otherwise only the district is checked.
pub fn load_reference(path: &Path, aliases: &RegionAliases) -> Result<ReferenceAreas> {
    let table = Table::read(path)?;
    let area = table.column(SAMPLE_DISTRICT)?;

    Ok(match table.column(SAMPLE_PROVINCE) {
        Ok(prov) => ReferenceAreas::from_pairs((0..table.len()).map(|i| {
            (
                aliases.canonicalize(table.cell(i, prov)).to_string(),
                table.cell(i, area).to_string(),
            )
        })),
        Err(_) => ReferenceAreas::from_areas((0..table.len()).map(|i| table.cell(i, area))),
    })
}

/// Splits the address of every store listing in `dir` and sorts rows into
/// `dir/filter/<file>` or the shared failure file.
pub fn run(dir: &Path, sample: &Path, fail: &Path, aliases: &RegionAliases) -> Result<FilterStats> {
    let reference = load_reference(sample, aliases)?;
    info!("Loaded {} reference areas from {}", reference.len(), sample.display());

    let output_dir = dir.join("filter");
    create_dir_all(&output_dir)?;

    let skip = [sample.file_name(), fail.file_name()];
    let mut stats = FilterStats::default();
    let mut failures = Table::new(&FAIL_HEADER);

    for path in csv_files(dir)? {
        if skip.contains(&path.file_name()) {
            continue;
        }

        let input = Table::read(&path)?;
        let name = path
            .file_name()
            .map(OsStr::to_string_lossy)
            .unwrap_or_default()
            .to_string();
        if input.headers.is_empty() {
            warn!("No data in file {name}, skipping...");
            continue;
        }

        let mut output = Table::new(&OUTPUT_HEADER);
        for i in 0..input.len() {
            let (store, addr) = (input.cell(i, 0), input.cell(i, 1));
            let split = split_address(addr, aliases);
            let div = split.div();

            if reference.contains(&split) {
                output.push(&[
                    store,
                    addr,
                    split.prov.as_str(),
                    split.area.as_str(),
                    div.as_str(),
                ]);
            } else {
                failures.push(&[
                    store,
                    addr,
                    split.prov.as_str(),
                    split.area.as_str(),
                    div.as_str(),
                    name.as_str(),
                ]);
            }
        }

        let output_path: PathBuf = output_dir.join(&name);
        output.write(&output_path)?;
        info!(
            "Processed file saved at: {} ({} kept)",
            output_path.display(),
            output.len()
        );

        stats.files += 1;
        stats.kept += output.len();
    }

    stats.failed = failures.len();
    failures.write(fail)?;
    info!(
        "{} rows kept, {} rows sent to {}",
        stats.kept,
        stats.failed,
        fail.display()
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;

    fn setup(sample: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("sample.csv"), sample).unwrap();
        write(
            dir.path().join("burgerking_stores.csv"),
            "storNm,storAddr\n\
             강남점,서울특별시 강남구 테헤란로 1\n\
             장안점,경기도 수원시 장안구 정자로 2\n\
             세종점,세종특별자치시 한누리대로 3\n\
             오타점,서울특별시 강남귀 테헤란로 4\n",
        )
        .unwrap();
        write(dir.path().join("empty.csv"), "").unwrap();
        dir
    }

    #[test]
    fn routes_unknown_districts_to_fail_file() {
        let dir = setup("시도명,시군구명\n서울특별시,강남구\n경기도,수원시 장안구\n세종특별자치시,세종시\n");
        let fail = dir.path().join("fail.csv");

        let stats = run(
            dir.path(),
            &dir.path().join("sample.csv"),
            &fail,
            &RegionAliases::default(),
        )
        .unwrap();
        assert_eq!(
            stats,
            FilterStats {
                files: 1,
                kept: 3,
                failed: 1
            }
        );

        let kept = Table::read(&dir.path().join("filter/burgerking_stores.csv")).unwrap();
        assert_eq!(kept.headers, OUTPUT_HEADER);
        assert_eq!(
            kept.rows[1],
            vec!["장안점", "경기도 수원시 장안구 정자로 2", "경기", "수원시 장안구", "경기 수원시 장안구"]
        );
        assert_eq!(kept.rows[2][3], "세종시");
        assert!(kept.rows.iter().all(|x| x[0] != "오타점"));

        let failed = Table::read(&fail).unwrap();
        assert_eq!(failed.headers, FAIL_HEADER);
        assert_eq!(
            failed.rows,
            vec![vec![
                "오타점",
                "서울특별시 강남귀 테헤란로 4",
                "서울",
                "강남귀",
                "서울 강남귀",
                "burgerking_stores.csv"
            ]]
        );
        // empty input is skipped rather than written
        assert!(!dir.path().join("filter/empty.csv").exists());
    }

    #[test]
    fn pair_mismatch_fails() {
        let dir = setup("시도명,시군구명\n부산광역시,강남구\n");
        let fail = dir.path().join("fail.csv");
        let stats = run(
            dir.path(),
            &dir.path().join("sample.csv"),
            &fail,
            &RegionAliases::default(),
        )
        .unwrap();
        assert_eq!(stats.kept, 0);
        assert_eq!(stats.failed, 4);
    }

    #[test]
    fn district_only_sample() {
        let dir = setup("시군구명\n강남구\n");
        let reference =
            load_reference(&dir.path().join("sample.csv"), &RegionAliases::default()).unwrap();
        assert_eq!(reference.len(), 1);

        let stats = run(
            dir.path(),
            &dir.path().join("sample.csv"),
            &dir.path().join("fail.csv"),
            &RegionAliases::default(),
        )
        .unwrap();
        assert_eq!(stats.kept, 1);
        assert_eq!(stats.failed, 3);
    }

    #[test]
    fn sample_without_district_column() {
        let dir = setup("name\nx\n");
        assert!(load_reference(&dir.path().join("sample.csv"), &RegionAliases::default()).is_err());
    }
}
