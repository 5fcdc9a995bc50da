//! Error type shared by every stage of a scenario run.
//!
//! Errors are local to one scenario: loading, invoking and comparing all
//! propagate an [`Error`] back to the [`ScenarioRunner`](crate::runner::ScenarioRunner),
//! which reports it against that scenario only.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::compare::TableDiff;
use crate::outputs::ExistenceVector;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can make a scenario fail
#[derive(Debug, Error)]
pub enum Error {
    /// An input, output or reference file is absent
    #[error("file not found: {}", path.display())]
    MissingFile {
        /// Path that was looked up
        path: PathBuf,
    },

    /// A file exists but could not be read, or a directory could not be prepared
    #[error("could not access {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The external program could not be started at all
    #[error("could not launch `{program}`: {source}")]
    Launch {
        /// Program name as given on the command line
        program: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The external program ran but terminated abnormally
    #[error("`{command}` exited abnormally ({status})\n{stderr}")]
    ExternalToolFailure {
        /// Rendered invocation
        command: String,
        /// Exit code, or a note that it was killed by a signal
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// Actual and expected tables differ after normalisation
    #[error("{} does not match {}\n{diff}", actual.display(), expected.display())]
    ComparisonMismatch {
        /// Output produced by the tool
        actual: PathBuf,
        /// Reference file
        expected: PathBuf,
        /// Differing records
        diff: TableDiff,
    },

    /// A feature-toggle scenario produced the wrong set of output files
    #[error("output files for `{prefix}` differ: expected {expected}, found {observed}")]
    ExistenceMismatch {
        /// Output prefix of the sub-case
        prefix: String,
        /// Expected vector
        expected: ExistenceVector,
        /// Vector observed on disk
        observed: ExistenceVector,
    },

    /// An output has the wrong shape (record count or leading identifier)
    #[error("{}: {message}", path.display())]
    UnexpectedOutput {
        /// Output file checked
        path: PathBuf,
        /// What was wrong
        message: String,
    },

    /// Malformed scenario configuration, caught before anything runs
    #[error("invalid scenario configuration: {0}")]
    Configuration(String),

    /// A column deletion reaches past the end of a record
    #[error("column {column} is out of range for record {record} ({fields} fields)")]
    ColumnOutOfRange {
        /// 1-based column requested
        column: usize,
        /// 0-based index of the offending record
        record: usize,
        /// Number of fields that record has
        fields: usize,
    },

    /// No scenario with this name is defined
    #[error("unknown scenario `{0}`")]
    UnknownScenario(String),
}

impl Error {
    /// Maps an [`io::Error`] from reading `path`, keeping not-found distinct
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::MissingFile { path }
        } else {
            Self::Io { path, source }
        }
    }
}
