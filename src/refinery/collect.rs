use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::table::Table;

use super::ingest;

pub const COLUMNS: [&str; 5] = ["상호명", "도로명주소", "시도명", "시군구명", "행정동명"];

/// Rows of one bulk file whose business name contains `keyword`.
pub fn matching(path: &Path, keyword: &str) -> Result<Table> {
    let mut table = Table::read(path)?.select(&COLUMNS)?;
    table.retain(|x| x[0].contains(keyword));
    Ok(table)
}

pub fn run(folder: &Path, output: &Path, keyword: &str, threads: Option<usize>) -> Result<Table> {
    let table = ingest(folder, &COLUMNS, threads, |path| matching(path, keyword))?;

    table.write(output)?;
    info!(
        "{} {keyword} stores saved to {}",
        table.len(),
        output.display()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;

    #[test]
    fn keeps_keyword_rows() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path().join("part1.csv"),
            "상가업소번호,상호명,도로명주소,시도명,시군구명,행정동명\n\
             1,이삭토스트 강남점,서울특별시 강남구 테헤란로 1,서울특별시,강남구,역삼1동\n\
             2,김밥천국,서울특별시 강남구 테헤란로 2,서울특별시,강남구,역삼1동\n",
        )
        .unwrap();
        write(
            dir.path().join("part2.csv"),
            "상호명,도로명주소,시도명,시군구명,행정동명\n\
             이삭토스트,부산광역시 해운대구 해운대로 3,부산광역시,해운대구,우1동\n",
        )
        .unwrap();

        let out = tempfile::tempdir().unwrap();
        let output = out.path().join("issac.csv");
        let table = run(dir.path(), &output, "이삭토스트", None).unwrap();

        assert_eq!(table.headers, COLUMNS);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][0], "이삭토스트 강남점");
        assert_eq!(table.rows[1][1], "부산광역시 해운대구 해운대로 3");
    }
}
