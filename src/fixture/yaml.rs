//! YAML workbooks
//!
//! A mapping of table name to a list of rows:
//!
//! ```yaml
//! Sheet1:
//!   - [username, password, expected_outcome]
//!   - [standard_user, secret_sauce, Success]
//!   - []
//!   - [locked_out_user, secret_sauce, "Sorry, this user has been locked out."]
//! ```
//!
//! A row may be `~` or `[]` to stand for a blank spreadsheet row.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::common::{Error, Result};

use super::source::{Cell, RawTable, TableSource};

pub struct YamlSource {
    locator: String,
    tables: Mapping,
}

impl YamlSource {
    pub fn open(path: &Path) -> Result<Self> {
        let locator = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::fixture_read(&locator, e))?;
        Self::parse(&locator, &content)
    }

    pub fn parse(locator: &str, content: &str) -> Result<Self> {
        let value: Value =
            serde_yaml::from_str(content).map_err(|e| Error::fixture_read(locator, e))?;
        let tables = match value {
            Value::Mapping(m) => m,
            Value::Null => Mapping::new(),
            _ => {
                return Err(Error::fixture_read(
                    locator,
                    "top level must map table names to rows",
                ))
            }
        };
        Ok(Self {
            locator: locator.to_string(),
            tables,
        })
    }
}

impl TableSource for YamlSource {
    fn locator(&self) -> &str {
        &self.locator
    }

    fn table_names(&self) -> Vec<String> {
        self.tables
            .keys()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect()
    }

    fn read_table(&mut self, name: &str) -> Result<Option<RawTable>> {
        let Some(table) = self.tables.get(name) else {
            return Ok(None);
        };

        let rows = match table {
            Value::Null => Vec::new(),
            Value::Sequence(rows) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| convert_row(row).map_err(|reason| {
                    Error::fixture_read(&self.locator, format!("{} row {}: {}", name, i + 1, reason))
                }))
                .collect::<Result<Vec<_>>>()?,
            _ => {
                return Err(Error::fixture_read(
                    &self.locator,
                    format!("table '{}' must be a list of rows", name),
                ))
            }
        };

        Ok(Some(RawTable { first_row: 1, rows }))
    }
}

fn convert_row(row: &Value) -> std::result::Result<Vec<Cell>, String> {
    match row {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(cells) => cells.iter().map(convert_cell).collect(),
        _ => Err("row must be a list of cells".to_string()),
    }
}

fn convert_cell(value: &Value) -> std::result::Result<Cell, String> {
    match value {
        Value::Null => Ok(Cell::Empty),
        Value::Bool(b) => Ok(Cell::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Cell::Int(i))
            } else {
                Ok(Cell::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        Value::String(s) => Ok(Cell::Text(s.clone())),
        other => Err(format!("unsupported cell value {:?}", other)),
    }
}
