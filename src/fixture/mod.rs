//! Tabular test fixtures
//!
//! A fixture is a table with one header row followed by one record per row.
//! The scenario kind fixes how many columns are read and what they are
//! called; the sheet itself never decides the record shape.

mod loader;
pub mod source;
mod workbook;
mod yaml;

use serde::ser::{Serialize, SerializeMap, Serializer};

pub use loader::{load, load_from};
pub use source::{open_source, Cell, MemorySource, RawTable, TableSource};
pub use workbook::WorkbookSource;
pub use yaml::YamlSource;

/// Name of the trailing field every scenario declares
pub const EXPECTED_OUTCOME: &str = "expected_outcome";

/// One row of named string fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    row: usize,
    names: &'static [&'static str],
    values: Vec<String>,
}

impl Record {
    /// Build a record. `values` is padded or cut to the arity of `names`.
    pub fn new(row: usize, names: &'static [&'static str], mut values: Vec<String>) -> Self {
        values.resize(names.len(), String::new());
        Self { row, names, values }
    }

    /// 1-based row number in the source table
    pub fn row(&self) -> usize {
        self.row
    }

    /// Value of a named field; `None` only if the scenario never declared it
    pub fn get(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .position(|n| *n == name)
            .map(|i| self.values[i].as_str())
    }

    /// The expected-outcome field (always the last declared field)
    pub fn expected_outcome(&self) -> &str {
        self.values.last().map(String::as_str).unwrap_or("")
    }

    /// Field names and values in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.names
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn arity(&self) -> usize {
        self.names.len()
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {} (", self.row)?;
        for (i, (name, value)) in self.fields().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", name, value)?;
        }
        write!(f, ")")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("row", &self.row)?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// An immutable, ordered set of records loaded from one table
#[derive(Debug, Clone)]
pub struct Fixture {
    resource: String,
    table: String,
    records: Vec<Record>,
}

impl Fixture {
    pub fn new(resource: &str, table: &str, records: Vec<Record>) -> Self {
        Self {
            resource: resource.to_string(),
            table: table.to_string(),
            records,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN: &[&str] = &["username", "password", EXPECTED_OUTCOME];

    #[test]
    fn test_record_pads_missing_fields() {
        let record = Record::new(2, LOGIN, vec!["standard_user".to_string()]);
        assert_eq!(record.arity(), 3);
        assert_eq!(record.get("password"), Some(""));
        assert_eq!(record.expected_outcome(), "");
        assert_eq!(record.get("postal_code"), None);
    }

    #[test]
    fn test_record_serializes_in_field_order() {
        let record = Record::new(
            3,
            LOGIN,
            vec!["u".to_string(), "p".to_string(), "Success".to_string()],
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"row":3,"username":"u","password":"p","expected_outcome":"Success"}"#
        );
        assert_eq!(
            record.to_string(),
            r#"row 3 (username="u", password="p", expected_outcome="Success")"#
        );
    }
}
