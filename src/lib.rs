//! Functional tests for AlphaPeel, driven from the outside.
//!
//! `peelcheck` runs the AlphaPeel executable through a fixed set of scenarios,
//! then checks the files it writes against reference files. It knows nothing
//! about pedigrees or genotypes: outputs and references are treated as plain
//! whitespace-delimited tables, and compared by record identity rather than by
//! line order.
//!
//! ## Details
//!
//! A scenario is a directory holding input files and reference outputs, for
//! example `tests/functional_tests/test_files`. Each input has a *role*, which
//! is both the command line flag and the file name:
//! ```text
//! tests/functional_tests/test_files/
//!     genotypes.txt  pedigree.txt  penetrance.txt  phasefile.txt  seqfile.txt
//!     trueGenotypes.txt
//! ```
//! produces the command line
//! ```text
//! AlphaPeel -genotypes tests/functional_tests/test_files/genotypes.txt ... \
//!     -runType multi -calling_threshold .1 -esterrors \
//!     -out tests/functional_tests/test_files/outputs/files
//! ```
//! Where a scenario has sub-cases with different input content, the role is
//! read from a *variant* file instead, e.g. `genotypes-a.txt`.
//!
//! Before comparing, both tables are put in canonical form: optionally
//! filtered to a set of identifiers (first field of each record), then sorted
//! by identifier as strings. So `10` sorts before `2`, and reference files
//! are expected to agree with this. Where an option drops columns from the
//! output, the matching columns are removed from the reference first.
//!
//! Every scenario gets a freshly emptied `outputs` directory, so stale files
//! from a previous run can never be compared.
//!
//! # Usage
//!
//! Run all scenarios against `AlphaPeel` on the `PATH`:
//! ```bash
//! peelcheck run
//! ```
//! Or a selection, against a particular build:
//! ```bash
//! peelcheck run test_files test_no --program ./target/AlphaPeel --tests-dir tests/functional_tests
//! ```
//! The exit status is non-zero if any scenario fails, and each failure is
//! reported with the differing records. Add `-v` for the command lines and
//! progress messages.
//!
//! ## peelcheck list
//!
//! Lists scenario names with a one line description.
//!
//! ## peelcheck command
//!
//! Prints the command lines a scenario would run, one per sub-case, without
//! running anything:
//! ```bash
//! peelcheck command test_sex
//! ```
//!
//! ## peelcheck compare
//!
//! Compares two tables directly, as the scenarios do:
//! ```bash
//! peelcheck compare outputs/subset.called.0.1 trueGenotypes.txt --delete-columns 2,6
//! ```
//! `--ids` restricts both tables to a comma separated list of identifiers.
//!
//! # API usage
//!
//! The pieces can be used separately. To compare two files:
//! ```no_run
//! use std::path::Path;
//! use peelcheck::table::Table;
//! use peelcheck::compare::assert_equivalent;
//!
//! let actual = Table::load_sorted("rec.seg", None).unwrap();
//! let expected = Table::load_sorted("trueSeg.txt", None).unwrap();
//! assert_equivalent(&actual, &expected, Path::new("rec.seg"), Path::new("trueSeg.txt")).unwrap();
//! ```
//!
//! To run a scenario with a different way of launching the tool, implement
//! [`runner::ToolRunner`] and hand it to a [`runner::ScenarioRunner`].

#![warn(missing_docs)]
use std::process::ExitCode;
use std::time::Instant;

pub mod error;
pub mod table;
pub mod compare;
pub mod command;
pub mod outputs;
pub mod runner;
pub mod scenarios;

pub mod modes;
use crate::modes::*;

pub mod cli;
use crate::cli::*;

#[doc(hidden)]
pub fn main() -> ExitCode {
    let args = cli_args();
    if args.verbose {
        simple_logger::init_with_level(log::Level::Info).unwrap();
    }

    let start = Instant::now();
    let outcome = match &args.command {
        Commands::Run {
            scenarios,
            program,
            tests_dir,
        } => run(scenarios, program, tests_dir, args.verbose),
        Commands::List => {
            list();
            Ok(true)
        }
        Commands::Command {
            scenario,
            program,
            tests_dir,
        } => command(scenario, program, tests_dir).map(|_| true),
        Commands::Compare {
            actual,
            expected,
            ids,
            delete_columns,
        } => compare(actual, expected, ids, delete_columns),
    };
    log::info!("Done in {}s", start.elapsed().as_secs());

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
