//! Tabular data sources
//!
//! A source is anything that can hand back a named table as rows of
//! loosely-typed cells. Cell typing stops here: the loader only ever
//! sees display strings.

use std::collections::BTreeMap;
use std::path::Path;

use crate::common::{Error, Result};

use super::workbook::WorkbookSource;
use super::yaml::YamlSource;

/// A single cell as the source stores it
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// Render the cell the way a spreadsheet displays it in "General" format
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

/// Rows of one table, with the 1-based source row number of the first row
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub first_row: usize,
    pub rows: Vec<Vec<Cell>>,
}

/// A resource holding one or more named tables
pub trait TableSource {
    /// Human-readable locator used in errors and reports
    fn locator(&self) -> &str;

    /// Names of the tables in this resource, in resource order
    fn table_names(&self) -> Vec<String>;

    /// Read a table by name. `Ok(None)` means the table does not exist.
    fn read_table(&mut self, name: &str) -> Result<Option<RawTable>>;
}

/// Open a fixture resource, choosing the reader from the file extension
pub fn open_source(path: &Path) -> Result<Box<dyn TableSource>> {
    let locator = path.display().to_string();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Box::new(WorkbookSource::open(path)?)),
        "yaml" | "yml" => Ok(Box::new(YamlSource::open(path)?)),
        "" => Err(Error::fixture_read(
            &locator,
            "file has no extension; expected .xlsx, .xls, .ods or .yaml",
        )),
        other => Err(Error::fixture_read(
            &locator,
            format!("unsupported fixture format '.{}'", other),
        )),
    }
}

/// Tables built in code
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    name: String,
    tables: BTreeMap<String, Vec<Vec<Cell>>>,
}

impl MemorySource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tables: BTreeMap::new(),
        }
    }

    /// Add a table of text rows; empty strings become blank cells
    pub fn with_table(mut self, table: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| Cell::from(*cell)).collect())
            .collect();
        self.tables.insert(table.to_string(), rows);
        self
    }

    /// Add a table of typed cells
    pub fn with_cells(mut self, table: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.tables.insert(table.to_string(), rows);
        self
    }
}

impl TableSource for MemorySource {
    fn locator(&self) -> &str {
        &self.name
    }

    fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    fn read_table(&mut self, name: &str) -> Result<Option<RawTable>> {
        Ok(self.tables.get(name).map(|rows| RawTable {
            first_row: 1,
            rows: rows.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_display_forms() {
        assert_eq!(Cell::Empty.display(), "");
        assert_eq!(Cell::Text("abc".into()).display(), "abc");
        assert_eq!(Cell::Int(12345).display(), "12345");
        assert_eq!(Cell::Float(12345.0).display(), "12345");
        assert_eq!(Cell::Float(2.5).display(), "2.5");
        assert_eq!(Cell::Bool(true).display(), "TRUE");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = open_source(Path::new("data.csv")).err().unwrap();
        assert!(matches!(err, Error::FixtureRead { .. }));
        assert!(err.to_string().contains(".csv"));
    }

    #[test]
    fn test_memory_source_missing_table() {
        let mut source = MemorySource::new("mem").with_table("Sheet1", &[&["a"]]);
        assert!(source.read_table("Sheet2").unwrap().is_none());
        assert_eq!(source.table_names(), vec!["Sheet1".to_string()]);
    }
}
