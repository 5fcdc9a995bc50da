//! Running scenarios end to end.
//!
//! For each scenario the [`ScenarioRunner`] recreates an empty output
//! directory, then for every [`SubCase`] builds the command line, runs the
//! tool through a [`ToolRunner`] and applies the sub-case's [`Check`].
//! Process execution sits behind [`ToolRunner`] so the whole pipeline can be
//! driven by a fake tool.

use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashSet;

use crate::command::{CommandBuilder, Invocation, ScenarioConfig};
use crate::compare::assert_equivalent;
use crate::error::{Error, Result};
use crate::outputs::ExistenceVector;
use crate::scenarios::Scenario;
use crate::table::Table;

/// Name of the per-scenario output directory
pub const OUTPUT_DIR: &str = "outputs";

/// How the external program finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    /// Exit code, [`None`] if terminated by a signal
    pub code: Option<i32>,
    /// Captured standard error
    pub stderr: String,
}

impl ToolStatus {
    /// Exited with code zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external command and reports how it exited
pub trait ToolRunner {
    /// Runs `invocation` to completion.
    ///
    /// Only fails if the program could not be started; an abnormal exit is
    /// reported through [`ToolStatus`].
    fn execute(&self, invocation: &Invocation) -> Result<ToolStatus>;
}

/// Runs the real program as a child process, blocking until it exits
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn execute(&self, invocation: &Invocation) -> Result<ToolStatus> {
        let output = invocation
            .to_command()
            .output()
            .map_err(|source| Error::Launch {
                program: invocation.program().to_string(),
                source,
            })?;
        log::debug!("stdout:\n{}", String::from_utf8_lossy(&output.stdout));
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        log::debug!("stderr:\n{stderr}");
        Ok(ToolStatus {
            code: output.status.code(),
            stderr,
        })
    }
}

/// Deletes `path` if it exists and creates it again, empty
pub fn prepare_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        log::debug!("Removing previous outputs in {}", path.display());
        fs::remove_dir_all(path).map_err(|e| Error::from_io(path, e))?;
    }
    fs::create_dir_all(path).map_err(|e| Error::from_io(path, e))
}

/// What to verify once the tool has run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Output `<prefix>.<output>` must equal reference file `expected`
    /// (relative to the input directory) once both are in canonical form
    Table {
        /// Output suffix, e.g. `called.0.1`
        output: String,
        /// Reference file name
        expected: String,
        /// Only compare records with these identifiers
        identifiers: Option<HashSet<String>>,
        /// 1-based columns removed from the reference before comparing
        drop_columns: Vec<usize>,
    },
    /// Which of the watched output categories were written
    Existence(ExistenceVector),
    /// Output `<prefix>.<output>`, in file order, has `count` records and
    /// starts with `first_identifier`
    Records {
        /// Output suffix
        output: String,
        /// Expected number of records
        count: usize,
        /// Expected identifier of the first record
        first_identifier: String,
    },
    /// Only require the tool to exit successfully
    RunOnly,
}

impl Check {
    /// Compares output `output` with reference `expected`
    pub fn table(output: &str, expected: &str) -> Self {
        Check::Table {
            output: output.to_string(),
            expected: expected.to_string(),
            identifiers: None,
            drop_columns: Vec::new(),
        }
    }
}

/// One invocation of the tool together with its check
#[derive(Debug, Clone)]
pub struct SubCase {
    /// Command line to run
    pub config: ScenarioConfig,
    /// What to verify afterwards
    pub check: Check,
}

/// Outcome of one scenario in a batch
#[derive(Debug)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: &'static str,
    /// First failure, if any
    pub result: Result<()>,
}

/// Runs scenarios found under a tests directory with a given tool
pub struct ScenarioRunner<R: ToolRunner> {
    builder: CommandBuilder,
    tool: R,
    tests_dir: PathBuf,
}

impl<R: ToolRunner> ScenarioRunner<R> {
    /// Scenario `name` reads its inputs from `<tests_dir>/<name>`
    pub fn new<P: AsRef<Path>>(tool: R, program: &str, tests_dir: P) -> Self {
        Self {
            builder: CommandBuilder::new(program),
            tool,
            tests_dir: tests_dir.as_ref().to_path_buf(),
        }
    }

    /// The tool used to run commands
    pub fn tool(&self) -> &R {
        &self.tool
    }

    /// Command builder for the configured program
    pub fn builder(&self) -> &CommandBuilder {
        &self.builder
    }

    /// Input directory of a scenario
    pub fn input_dir(&self, name: &str) -> PathBuf {
        self.tests_dir.join(name)
    }

    /// Output directory of a scenario
    pub fn output_dir(&self, name: &str) -> PathBuf {
        self.input_dir(name).join(OUTPUT_DIR)
    }

    /// Sub-cases of `scenario`, with paths resolved against the tests directory
    pub fn cases(&self, scenario: &Scenario) -> Vec<SubCase> {
        (scenario.cases)(&self.input_dir(scenario.name), &self.output_dir(scenario.name))
    }

    /// Runs every sub-case of `scenario` in a fresh output directory,
    /// stopping at the first failure.
    ///
    /// Every sub-case config is validated before the tool is run at all.
    pub fn run_scenario(&self, scenario: &Scenario) -> Result<()> {
        log::info!("Running scenario {}", scenario.name);
        let cases = self.cases(scenario);
        for case in &cases {
            case.config.validate()?;
        }
        prepare_output_dir(&self.output_dir(scenario.name))?;
        for case in &cases {
            self.run_case(case)?;
        }
        log::info!("Scenario {} passed", scenario.name);
        Ok(())
    }

    /// Runs each scenario independently; `on_done` is called after each one
    pub fn run_all<F>(&self, scenarios: &[Scenario], mut on_done: F) -> Vec<ScenarioReport>
    where
        F: FnMut(&ScenarioReport),
    {
        scenarios
            .iter()
            .map(|scenario| {
                let report = ScenarioReport {
                    name: scenario.name,
                    result: self.run_scenario(scenario),
                };
                if let Err(e) = &report.result {
                    log::warn!("Scenario {} failed: {e}", scenario.name);
                }
                on_done(&report);
                report
            })
            .collect()
    }

    /// Runs one sub-case and applies its check
    pub fn run_case(&self, case: &SubCase) -> Result<()> {
        self.invoke(&case.config)?;
        self.check(&case.config, &case.check)
    }

    /// Builds and executes the command line for `config`.
    ///
    /// Fails on a bad config before anything is run, and on any abnormal
    /// exit of the tool.
    pub fn invoke(&self, config: &ScenarioConfig) -> Result<Invocation> {
        let invocation = self.builder.build(config)?;
        log::info!("{invocation}");
        let status = self.tool.execute(&invocation)?;
        if !status.success() {
            return Err(Error::ExternalToolFailure {
                command: invocation.to_string(),
                status: match status.code {
                    Some(code) => format!("exit code {code}"),
                    None => "terminated by signal".to_string(),
                },
                stderr: status.stderr,
            });
        }
        Ok(invocation)
    }

    /// Verifies the outputs of a sub-case that has already run
    pub fn check(&self, config: &ScenarioConfig, check: &Check) -> Result<()> {
        match check {
            Check::Table {
                output,
                expected,
                identifiers,
                drop_columns,
            } => {
                let actual_path = config.output_file(output);
                let expected_path = config.input_dir().join(expected);
                let actual = Table::load_sorted(&actual_path, identifiers.as_ref())?;
                let mut reference = Table::load_sorted(&expected_path, identifiers.as_ref())?;
                reference.delete_columns(drop_columns)?;
                assert_equivalent(&actual, &reference, &actual_path, &expected_path)
            }
            Check::Existence(expected) => {
                let observed = ExistenceVector::observe(config);
                if observed == *expected {
                    Ok(())
                } else {
                    Err(Error::ExistenceMismatch {
                        prefix: config.prefix().to_string(),
                        expected: expected.clone(),
                        observed,
                    })
                }
            }
            Check::Records {
                output,
                count,
                first_identifier,
            } => {
                let path = config.output_file(output);
                let table = Table::load(&path)?;
                if table.len() != *count {
                    return Err(Error::UnexpectedOutput {
                        path,
                        message: format!("expected {count} records, found {}", table.len()),
                    });
                }
                match table.first_identifier() {
                    Some(id) if id == first_identifier => Ok(()),
                    found => Err(Error::UnexpectedOutput {
                        path,
                        message: format!(
                            "expected first identifier `{first_identifier}`, found `{}`",
                            found.unwrap_or("")
                        ),
                    }),
                }
            }
            Check::RunOnly => Ok(()),
        }
    }
}
