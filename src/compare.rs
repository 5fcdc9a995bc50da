//! Strict record-by-record comparison of two canonical tables.
//!
//! Tables are expected to already be in canonical form (see
//! [`Table::load_sorted`](crate::table::Table::load_sorted)). Two tables are
//! equivalent when they have the same number of records and every record has
//! identical fields in identical order.

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::table::{Record, Table};

/// The records that differ between an actual and an expected table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDiff {
    /// Number of records in the actual table
    pub actual_len: usize,
    /// Number of records in the expected table
    pub expected_len: usize,
    /// Differing positions as `(index, actual, expected)`; `None` where one
    /// table has run out of records
    pub records: Vec<(usize, Option<Record>, Option<Record>)>,
}

impl TableDiff {
    /// Compares position by position, returns [`None`] if the tables are equal
    pub fn between(actual: &Table, expected: &Table) -> Option<Self> {
        if actual == expected {
            return None;
        }
        let rows = actual.len().max(expected.len());
        let records = (0..rows)
            .filter_map(|idx| {
                let a = actual.get(idx);
                let e = expected.get(idx);
                if a == e {
                    None
                } else {
                    Some((idx, a.cloned(), e.cloned()))
                }
            })
            .collect();
        Some(Self {
            actual_len: actual.len(),
            expected_len: expected.len(),
            records,
        })
    }
}

impl fmt::Display for TableDiff {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "{} actual records, {} expected records, {} differ",
            self.actual_len,
            self.expected_len,
            self.records.len()
        )?;
        for (idx, actual, expected) in &self.records {
            writeln!(f, "record {idx}:")?;
            writeln!(f, "  actual:   {}", render(actual))?;
            writeln!(f, "  expected: {}", render(expected))?;
        }
        Ok(())
    }
}

fn render(record: &Option<Record>) -> String {
    match record {
        Some(fields) => fields.join(" "),
        None => "<missing>".to_string(),
    }
}

/// Fails with [`Error::ComparisonMismatch`] unless the tables are equal.
///
/// The paths are only used for reporting. Both tables are logged in full at
/// debug level on a mismatch.
pub fn assert_equivalent(
    actual: &Table,
    expected: &Table,
    actual_path: &Path,
    expected_path: &Path,
) -> Result<()> {
    match TableDiff::between(actual, expected) {
        None => Ok(()),
        Some(diff) => {
            log::debug!("Actual table {}:\n{actual}", actual_path.display());
            log::debug!("Expected table {}:\n{expected}", expected_path.display());
            Err(Error::ComparisonMismatch {
                actual: actual_path.to_path_buf(),
                expected: expected_path.to_path_buf(),
                diff,
            })
        }
    }
}
