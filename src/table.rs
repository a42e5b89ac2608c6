use std::{
    fs::{self, File},
    io::{BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use itertools::Itertools;

/// UTF-8 signature written ahead of every CSV this tool produces.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

/// An in-memory CSV: one header row plus string cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: ToString>(headers: &[S]) -> Self {
        Self {
            headers: headers.iter().map(|x| x.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_reader(data.strip_prefix(BOM).unwrap_or(&data[..]))
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.iter().map(|x| x.to_string()).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(|x| x.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        self.to_writer(BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(BOM)?;
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push<S: ToString>(&mut self, row: &[S]) {
        self.rows.push(row.iter().map(|x| x.to_string()).collect());
    }

    /// Index of the named column.
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|x| x == name)
            .with_context(|| format!("Missing column {name:?}"))
    }

    /// Index of the named column, appending it with empty cells if absent.
    pub fn column_or_insert(&mut self, name: &str) -> usize {
        if let Some(i) = self.headers.iter().position(|x| x == name) {
            return i;
        }
        self.headers.push(name.to_string());
        for row in self.rows.iter_mut() {
            row.resize(self.headers.len(), String::new());
        }
        self.headers.len() - 1
    }

    /// Cell at `(row, col)`, empty when the row is short.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows[row].get(col).map(|x| x.as_str()).unwrap_or_default()
    }

    pub fn set(&mut self, row: usize, col: usize, value: impl Into<String>) {
        let row = &mut self.rows[row];
        if row.len() <= col {
            row.resize(col + 1, String::new());
        }
        row[col] = value.into();
    }

    /// A new table with only the named columns, in the given order.
    pub fn select(&self, columns: &[&str]) -> Result<Self> {
        let indices: Vec<_> = columns.iter().map(|x| self.column(x)).collect::<Result<_>>()?;
        let mut output = Self::new(columns);
        for i in 0..self.rows.len() {
            output
                .rows
                .push(indices.iter().map(|&col| self.cell(i, col).to_string()).collect());
        }
        Ok(output)
    }

    pub fn retain(&mut self, f: impl FnMut(&Vec<String>) -> bool) {
        self.rows.retain(f);
    }

    /// Drops repeated rows, keeping the first occurrence.
    pub fn dedup(&mut self) {
        self.rows = std::mem::take(&mut self.rows).into_iter().unique().collect();
    }

    /// Stacks the rows of `tables` under `headers`. Callers make sure every
    /// table was selected with the same columns.
    pub fn concat(headers: &[&str], tables: Vec<Table>) -> Self {
        Self {
            headers: headers.iter().map(|x| x.to_string()).collect(),
            rows: tables.into_iter().flat_map(|x| x.rows).collect_vec(),
        }
    }
}
