//! Fixture loading
//!
//! Reads exactly `fields.len()` columns from every data row, converts each
//! cell to its display string and trims it. The first row is the header and
//! is never data. Rows that are blank across all read columns are dropped.

use std::path::Path;

use crate::common::{Error, Result};

use super::source::{open_source, TableSource};
use super::{Fixture, Record};

/// Load a fixture table from a resource on disk
pub fn load(resource: &Path, table: &str, fields: &'static [&'static str]) -> Result<Fixture> {
    let mut source = open_source(resource)?;
    load_from(source.as_mut(), table, fields)
}

/// Load a fixture table from an already-open source
pub fn load_from(
    source: &mut dyn TableSource,
    table: &str,
    fields: &'static [&'static str],
) -> Result<Fixture> {
    let locator = source.locator().to_string();
    let raw = match source.read_table(table)? {
        Some(raw) => raw,
        None => {
            return Err(Error::fixture_not_found(
                &locator,
                table,
                &source.table_names(),
            ))
        }
    };

    let arity = fields.len();
    let mut rows = raw.rows.into_iter().enumerate();

    let Some((_, header)) = rows.next() else {
        tracing::info!(resource = %locator, table, "fixture table is empty");
        return Ok(Fixture::new(&locator, table, Vec::new()));
    };

    let header: Vec<String> = read_cells(&header, arity);
    if let Some(missing) = header.iter().position(String::is_empty) {
        return Err(Error::fixture_read(
            &locator,
            format!(
                "header of table '{}' has {} named columns but {} are required ({})",
                table,
                missing,
                arity,
                fields.join(", ")
            ),
        ));
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (index, row) in rows {
        let values = read_cells(&row, arity);
        if values.iter().all(String::is_empty) {
            skipped += 1;
            continue;
        }
        records.push(Record::new(raw.first_row + index, fields, values));
    }

    tracing::info!(
        resource = %locator,
        table,
        records = records.len(),
        blank_rows = skipped,
        "loaded fixture"
    );

    Ok(Fixture::new(&locator, table, records))
}

fn read_cells(row: &[super::Cell], arity: usize) -> Vec<String> {
    (0..arity)
        .map(|i| {
            row.get(i)
                .map(|cell| cell.display().trim().to_string())
                .unwrap_or_default()
        })
        .collect()
}
