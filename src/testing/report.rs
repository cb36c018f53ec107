//! Console and JSON reporting of run results

use colored::Colorize;
use serde::Serialize;

use crate::common::one_line;
use crate::fixture::{Fixture, Record};
use crate::scenario::ScenarioKind;

use super::runner::{RecordRun, RunSummary};

/// Machine-readable report of a whole run
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub scenario: ScenarioKind,
    pub resource: &'a str,
    pub table: &'a str,
    pub summary: RunSummary,
    pub results: &'a [RecordRun],
}

impl<'a> RunReport<'a> {
    pub fn new(scenario: ScenarioKind, fixture: &'a Fixture, results: &'a [RecordRun]) -> Self {
        Self {
            scenario,
            resource: fixture.resource(),
            table: fixture.table(),
            summary: RunSummary::from_runs(results),
            results,
        }
    }
}

fn describe(record: &Record) -> String {
    record
        .fields()
        .map(|(name, value)| {
            if value.is_empty() {
                format!("{}=<empty>", name)
            } else {
                format!("{}={}", name, one_line(value, 40))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print the run header
pub fn print_header(scenario: ScenarioKind, fixture: &Fixture) {
    println!(
        "\n{} {} ({} records from {} [{}])",
        "Running Scenario:".blue().bold(),
        scenario.to_string().white().bold(),
        fixture.len(),
        fixture.resource(),
        fixture.table()
    );
    println!("\n{}", "Records:".cyan());
}

/// Print one finished record
pub fn print_record(run: &RecordRun, verbose: bool) {
    let row = format!("Row {}", run.record.row());
    if run.result.passed() {
        println!(
            "  {} {}: {}",
            "✓".green(),
            row,
            describe(&run.record).dimmed()
        );
    } else {
        println!(
            "  {} {}: {}",
            "✗".red(),
            row,
            describe(&run.record).dimmed()
        );
        if let Some(reason) = run.result.reason() {
            println!("      {}", reason.red());
        }
    }
    if verbose {
        println!(
            "      {} {} in {} ms",
            "observed".dimmed(),
            run.result.observed(),
            run.duration_ms
        );
    }
}

/// Print the totals line
pub fn print_summary(summary: &RunSummary) {
    let detail = format!(
        "{} passed, {} failed ({} timed out, {} faulted) of {}",
        summary.passed, summary.failed, summary.timed_out, summary.faulted, summary.total
    );
    if summary.all_passed() {
        println!("\n{} {}\n", "✓".green().bold(), detail.green().bold());
    } else {
        println!("\n{} {}\n", "✗".red().bold(), detail.red().bold());
    }
}

/// Print loaded records without running them
pub fn print_fixture(scenario: ScenarioKind, fixture: &Fixture) {
    println!(
        "{} {} [{}] as {} ({} records)",
        "Fixture:".blue().bold(),
        fixture.resource(),
        fixture.table(),
        scenario,
        fixture.len()
    );
    for record in fixture.records() {
        println!("  Row {}: {}", record.row(), describe(record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::EXPECTED_OUTCOME;

    #[test]
    fn test_describe_marks_empty_fields() {
        const FIELDS: &[&str] = &["first_name", "last_name", "postal_code", EXPECTED_OUTCOME];
        let record = Record::new(
            4,
            FIELDS,
            vec![
                String::new(),
                "User".to_string(),
                "12345".to_string(),
                "Error: First Name is required".to_string(),
            ],
        );
        assert_eq!(
            describe(&record),
            "first_name=<empty>, last_name=User, postal_code=12345, expected_outcome=Error: First Name is required"
        );
    }
}
