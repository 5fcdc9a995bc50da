//! Command line interface, built using clap derive
use clap::{Parser, Subcommand};

/// Default program run by the scenarios
pub const DEFAULT_PROGRAM: &str = "AlphaPeel";
/// Default directory holding one sub-directory per scenario
pub const DEFAULT_TESTS_DIR: &str = "tests/functional_tests";

fn valid_column(s: &str) -> Result<usize, String> {
    let col: usize = s
        .parse()
        .map_err(|_| format!("`{s}` isn't a valid column number"))?;
    if col < 1 {
        Err("Columns are numbered from 1".to_string())
    } else {
        Ok(col)
    }
}

/// Options for command-line interface
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Show progress messages
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands and their specific options
#[derive(Subcommand)]
pub enum Commands {
    /// Run scenarios against the tool
    Run {
        /// Scenarios to run (all if none given)
        scenarios: Vec<String>,

        /// Program to test
        #[arg(long, default_value_t = DEFAULT_PROGRAM.to_string())]
        program: String,

        /// Directory containing the scenario directories
        #[arg(long, default_value_t = DEFAULT_TESTS_DIR.to_string())]
        tests_dir: String,
    },
    /// List the available scenarios
    List,
    /// Print the command lines a scenario would run, without running them
    Command {
        /// Scenario to show
        scenario: String,

        /// Program to test
        #[arg(long, default_value_t = DEFAULT_PROGRAM.to_string())]
        program: String,

        /// Directory containing the scenario directories
        #[arg(long, default_value_t = DEFAULT_TESTS_DIR.to_string())]
        tests_dir: String,
    },
    /// Compare an output table with a reference, ignoring record order
    Compare {
        /// Table written by the tool
        actual: String,

        /// Reference table
        expected: String,

        /// Only compare records with these identifiers (comma separated)
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<String>>,

        /// 1-based columns to remove from the reference (comma separated)
        #[arg(long, value_delimiter = ',', value_parser = valid_column)]
        delete_columns: Vec<usize>,
    },
}

/// Function to parse command line args into [`Args`] struct
pub fn cli_args() -> Args {
    Args::parse()
}
