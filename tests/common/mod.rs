use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;

use peelcheck::command::Invocation;
use peelcheck::error::Result;
use peelcheck::outputs::OutputKind;
use peelcheck::runner::{ToolRunner, ToolStatus};

// Creates correct path for input/output files
static FILE_IN: &'static str = "tests/test_files_in";
static SYM_IN: &'static str = "input";
static TESTS_DIR: &'static str = "functional_tests";

pub struct TestSetup {
    wd: TempDir,
}

impl TestSetup {
    pub fn setup() -> Self {
        let wd = assert_fs::TempDir::new().unwrap();
        wd.child(SYM_IN)
            .symlink_to_dir(
                Path::new(FILE_IN)
                    .canonicalize()
                    .expect("Could not link input files"),
            )
            .unwrap();
        wd.child(TESTS_DIR).create_dir_all().unwrap();
        Self { wd }
    }

    pub fn get_wd(&self) -> String {
        self.wd.path().display().to_string()
    }

    pub fn input_path(&self, name: &str) -> PathBuf {
        self.wd.child(SYM_IN).child(name).path().to_path_buf()
    }

    pub fn input_string(&self, name: &str) -> String {
        self.input_path(name)
            .to_str()
            .expect("Could not unpack file path")
            .to_owned()
    }

    /// Directory scenarios are looked up in
    pub fn tests_dir(&self) -> PathBuf {
        self.wd.child(TESTS_DIR).path().to_path_buf()
    }

    /// Copies a fixture into a scenario directory under a new name
    pub fn add_scenario_file(&self, scenario: &str, fixture: &str, name: &str) {
        self.wd
            .child(TESTS_DIR)
            .child(scenario)
            .child(name)
            .write_file(&self.input_path(fixture))
            .unwrap();
    }

    /// Writes a file with the given contents anywhere in the sandbox
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let child = self.wd.child(name);
        child.write_str(contents).unwrap();
        child.path().to_path_buf()
    }

    pub fn file_exists(&self, path: &Path) -> bool {
        let predicate_fn = predicate::path::is_file();
        predicate_fn.eval(path)
    }
}

/// Stands in for AlphaPeel.
///
/// Writes the output categories the real tool would, given the toggle flags,
/// and copies a fixture to each `<prefix>.<suffix>` in `tables`.
pub struct FakePeel {
    pub tables: Vec<(String, PathBuf)>,
    pub called: Option<fn(&Invocation) -> String>,
    pub exit_code: Option<i32>,
    pub calls: RefCell<Vec<String>>,
}

impl FakePeel {
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            called: None,
            exit_code: Some(0),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_table(mut self, suffix: &str, fixture: PathBuf) -> Self {
        self.tables.push((suffix.to_string(), fixture));
        self
    }

    /// Writes `<prefix>.called.0.1` with contents chosen from the command line
    pub fn with_called(mut self, contents: fn(&Invocation) -> String) -> Self {
        self.called = Some(contents);
        self
    }

    pub fn failing(mut self, code: Option<i32>) -> Self {
        self.exit_code = code;
        self
    }

    pub fn ncalls(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ToolRunner for FakePeel {
    fn execute(&self, invocation: &Invocation) -> Result<ToolStatus> {
        self.calls.borrow_mut().push(invocation.to_string());
        if self.exit_code != Some(0) {
            return Ok(ToolStatus {
                code: self.exit_code,
                stderr: "fake failure".to_string(),
            });
        }

        let prefix = invocation.flag_value("out").expect("No -out flag");
        let write = |suffix: &str| fs::write(format!("{prefix}.{suffix}"), "1 0\n").unwrap();
        for kind in OutputKind::ALL {
            let written = match kind {
                OutputKind::Dosages => !invocation.has_flag("no_dosages"),
                OutputKind::Seg => !invocation.has_flag("no_seg"),
                OutputKind::Maf | OutputKind::GenoError | OutputKind::SeqError => {
                    !invocation.has_flag("no_params")
                }
                OutputKind::Haps => invocation.has_flag("haps"),
            };
            if written {
                write(kind.suffix());
            }
        }
        if let Some(contents) = self.called {
            fs::write(format!("{prefix}.called.0.1"), contents(invocation)).unwrap();
        }
        for (suffix, fixture) in &self.tables {
            fs::copy(fixture, format!("{prefix}.{suffix}")).unwrap();
        }

        Ok(ToolStatus {
            code: Some(0),
            stderr: String::new(),
        })
    }
}
