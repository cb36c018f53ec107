//! Spreadsheet workbooks (xlsx, xls, xlsb, ods) via calamine

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader, Sheets};
use chrono::Timelike;

use crate::common::{Error, Result};

use super::source::{Cell, RawTable, TableSource};

/// A workbook opened from disk
pub struct WorkbookSource {
    locator: String,
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookSource {
    pub fn open(path: &Path) -> Result<Self> {
        let locator = path.display().to_string();
        let workbook = open_workbook_auto(path).map_err(|e| Error::fixture_read(&locator, e))?;
        tracing::debug!(resource = %locator, "opened workbook");
        Ok(Self { locator, workbook })
    }
}

impl TableSource for WorkbookSource {
    fn locator(&self) -> &str {
        &self.locator
    }

    fn table_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_table(&mut self, name: &str) -> Result<Option<RawTable>> {
        if !self.workbook.sheet_names().iter().any(|s| s == name) {
            return Ok(None);
        }

        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| Error::fixture_read(&self.locator, e))?;

        // The range starts at the first used cell; pad so column 0 is column A
        let (first_row, first_col) = match range.start() {
            Some((row, col)) => (row as usize + 1, col as usize),
            None => return Ok(Some(RawTable::default())),
        };

        let rows = range
            .rows()
            .map(|row| {
                let mut cells = vec![Cell::Empty; first_col];
                cells.extend(row.iter().map(convert_cell));
                cells
            })
            .collect();

        Ok(Some(RawTable { first_row, rows }))
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(value) => Cell::Text(display_datetime(value)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

/// Dates as `YYYY-MM-DD`, adding the time of day when there is one.
/// Pure times (serial below 1) and durations render as `H:MM:SS`.
fn display_datetime(value: &ExcelDateTime) -> String {
    if value.is_duration() {
        if let Some(duration) = value.as_duration() {
            return display_clock(duration.num_seconds());
        }
    }

    match value.as_datetime() {
        Some(dt) if value.as_f64() < 1.0 => display_clock(i64::from(dt.num_seconds_from_midnight())),
        Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => value.as_f64().to_string(),
    }
}

fn display_clock(seconds: i64) -> String {
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
