//! Main control of the CLI subcommands.
//!
//! Each function returns `true` on success so that `main` can set the exit
//! status.

use std::path::Path;

use hashbrown::HashSet;
use indicatif::{ProgressBar, ProgressStyle};

use crate::compare::assert_equivalent;
use crate::error::Result;
use crate::runner::{ProcessRunner, ScenarioRunner};
use crate::scenarios;
use crate::table::Table;

/// Code for `peelcheck run`
///
/// Every selected scenario runs even if an earlier one fails; failures are
/// listed at the end.
pub fn run(names: &[String], program: &str, tests_dir: &str, verbose: bool) -> Result<bool> {
    let selected = scenarios::select(names)?;
    let runner = ScenarioRunner::new(ProcessRunner, program, tests_dir);

    let progress = if verbose {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(selected.len() as u64)
    };
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let reports = runner.run_all(&selected, |report| {
        progress.set_message(report.name);
        progress.inc(1);
    });
    progress.finish_and_clear();

    let mut passed = true;
    for report in &reports {
        match &report.result {
            Ok(()) => println!("{}\tok", report.name),
            Err(e) => {
                passed = false;
                println!("{}\tFAILED", report.name);
                eprintln!("{}: {e}", report.name);
            }
        }
    }
    Ok(passed)
}

/// Code for `peelcheck list`
pub fn list() {
    for scenario in scenarios::all() {
        println!("{}\t{}", scenario.name, scenario.description);
    }
}

/// Code for `peelcheck command`
///
/// Prints one line per sub-case. Nothing is run and no directory is touched.
pub fn command(name: &str, program: &str, tests_dir: &str) -> Result<()> {
    let selected = scenarios::select(&[name.to_string()])?;
    // only used to resolve paths and build commands, nothing is executed
    let runner = ScenarioRunner::new(ProcessRunner, program, tests_dir);
    for scenario in &selected {
        for case in runner.cases(scenario) {
            println!("{}", runner.builder().build(&case.config)?);
        }
    }
    Ok(())
}

/// Code for `peelcheck compare`
pub fn compare(
    actual: &str,
    expected: &str,
    ids: &Option<Vec<String>>,
    delete_columns: &[usize],
) -> Result<bool> {
    let filter: Option<HashSet<String>> = ids.as_ref().map(|ids| ids.iter().cloned().collect());
    let actual_table = Table::load_sorted(actual, filter.as_ref())?;
    let mut expected_table = Table::load_sorted(expected, filter.as_ref())?;
    expected_table.delete_columns(delete_columns)?;

    log::info!(
        "Comparing {} records against {} records",
        actual_table.len(),
        expected_table.len()
    );
    match assert_equivalent(
        &actual_table,
        &expected_table,
        Path::new(actual),
        Path::new(expected),
    ) {
        Ok(()) => {
            println!("Tables match ({} records)", actual_table.len());
            Ok(true)
        }
        Err(e) => {
            eprintln!("{e}");
            Ok(false)
        }
    }
}
