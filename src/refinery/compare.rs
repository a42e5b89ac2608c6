use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::{table::Table, utils::squash};

/// Column names for [`copy_matches`].
#[derive(Clone, Debug)]
pub struct Columns {
    /// Key columns in the table being filled.
    pub a_keys: [String; 2],
    /// Matching key columns in the lookup table.
    pub b_keys: [String; 2],
    /// Column copied out of the lookup table.
    pub source: String,
    /// Column written in the table being filled; created when missing.
    pub target: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            a_keys: ["prov".to_string(), "area".to_string()],
            b_keys: ["prov".to_string(), "SIG_KOR_NM".to_string()],
            source: "SIG_CD".to_string(),
            target: "sig_cd".to_string(),
        }
    }
}

/// Fills `columns.target` in `a` from the first row of `b` whose key columns
/// equal `a`'s once whitespace is removed. Comparison is case sensitive.
///
/// Every row of `a` scans all of `b`, with no index. When `b` holds duplicate
/// keys the first one in file order wins and later ones are ignored. Rows
/// without a match keep their current target value.
///
/// Returns the number of rows of `a` that matched.
pub fn copy_matches(a: &mut Table, b: &Table, columns: &Columns) -> Result<usize> {
    let a_keys = [a.column(&columns.a_keys[0])?, a.column(&columns.a_keys[1])?];
    let b_keys = [b.column(&columns.b_keys[0])?, b.column(&columns.b_keys[1])?];
    let source = b.column(&columns.source)?;
    let target = a.column_or_insert(&columns.target);

    let mut matched = 0;
    for i in 0..a.len() {
        let key = [squash(a.cell(i, a_keys[0])), squash(a.cell(i, a_keys[1]))];
        let found = (0..b.len()).find(|&j| {
            squash(b.cell(j, b_keys[0])) == key[0] && squash(b.cell(j, b_keys[1])) == key[1]
        });

        if let Some(j) = found {
            let value = b.cell(j, source).to_string();
            a.set(i, target, value);
            matched += 1;
        }
    }

    Ok(matched)
}

/// Copies matched values from `b` into `a`, overwriting `a` unless `output` is given.
pub fn run(a_path: &Path, b_path: &Path, output: Option<&Path>, columns: &Columns) -> Result<()> {
    let mut a = Table::read(a_path)?;
    let b = Table::read(b_path)?;

    let matched = copy_matches(&mut a, &b, columns).with_context(|| {
        format!(
            "Failed to match {} against {}",
            a_path.display(),
            b_path.display()
        )
    })?;

    let output = output.unwrap_or(a_path);
    a.write(output)?;
    info!(
        "Copied {} into {matched} of {} rows, saved to {}",
        columns.target,
        a.len(),
        output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> Table {
        let mut b = Table::new(&["prov", "SIG_KOR_NM", "SIG_CD"]);
        b.push(&["부산", "강남구", "99999"]);
        b.push(&["서울", "강남구", "11680"]);
        b.push(&["서울", "강남구", "11111"]);
        b.push(&["경기", "수원시 장안구", "41111"]);
        b
    }

    #[test]
    fn copies_code_into_new_column() {
        let mut a = Table::new(&["store", "prov", "area"]);
        a.push(&["강남점", "서울", "강남구"]);
        a.push(&["장안점", "경기", "수원시장안구"]);
        a.push(&["없는점", "서울", "없는구"]);

        let matched = copy_matches(&mut a, &lookup(), &Columns::default()).unwrap();
        assert_eq!(matched, 2);
        assert_eq!(a.headers, vec!["store", "prov", "area", "sig_cd"]);
        // first duplicate wins
        assert_eq!(a.cell(0, 3), "11680");
        assert_eq!(a.cell(1, 3), "41111");
        assert_eq!(a.cell(2, 3), "");
    }

    #[test]
    fn existing_values_survive_without_match() {
        let mut a = Table::new(&["prov", "area", "sig_cd"]);
        a.push(&["제주", "제주시", "50110"]);
        copy_matches(&mut a, &lookup(), &Columns::default()).unwrap();
        assert_eq!(a.cell(0, 2), "50110");
    }

    #[test]
    fn case_sensitive_keys() {
        let mut a = Table::new(&["prov", "area"]);
        a.push(&["seoul", "A"]);
        let mut b = Table::new(&["prov", "SIG_KOR_NM", "SIG_CD"]);
        b.push(&["Seoul", "A", "1"]);
        assert_eq!(copy_matches(&mut a, &b, &Columns::default()).unwrap(), 0);
    }

    #[test]
    fn missing_column_is_named() {
        let mut a = Table::new(&["prov"]);
        let err = copy_matches(&mut a, &lookup(), &Columns::default()).unwrap_err();
        assert!(err.to_string().contains("area"));
    }

    #[test]
    fn overwrites_file_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let a_path = dir.path().join("hu.csv");
        let b_path = dir.path().join("extracted_sig_data.csv");

        let mut a = Table::new(&["prov", "area"]);
        a.push(&["서울", "강남구"]);
        a.write(&a_path).unwrap();
        lookup().write(&b_path).unwrap();

        run(&a_path, &b_path, None, &Columns::default()).unwrap();
        let a = Table::read(&a_path).unwrap();
        assert_eq!(a.rows, vec![vec!["서울", "강남구", "11680"]]);
    }
}
