//! Whitespace-delimited tables, as written by AlphaPeel and stored as
//! reference files.
//!
//! A [`Table`] is a list of records, each record being the whitespace-separated
//! fields of one line. There is no header and no quoting. The first field of
//! a record is its identifier, which is used to put tables into a canonical
//! order before comparing them (see [`Table::load_sorted`]).
//!
//! # Examples
//! ```no_run
//! use hashbrown::HashSet;
//! use peelcheck::table::Table;
//!
//! let ids: HashSet<String> = ["1", "10"].iter().map(|s| s.to_string()).collect();
//! let mut expected = Table::load_sorted("trueGenotypes.txt", Some(&ids)).unwrap();
//! expected.delete_columns(&[2, 6]).unwrap();
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use hashbrown::HashSet;

use crate::error::{Error, Result};

/// One line of a table, split into fields
pub type Record = Vec<String>;

/// An ordered list of records.
///
/// Records are not required to have the same number of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Reads `path`, one record per line.
    ///
    /// Empty lines are kept as empty records, so line numbers and record
    /// indices agree. Fails with [`Error::MissingFile`] if the file is absent.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
        let table = Self::parse(&text);
        log::debug!("Loaded {} records from {}", table.len(), path.display());
        Ok(table)
    }

    /// Splits already-read text into records
    pub fn parse(text: &str) -> Self {
        let records: Vec<Record> = text
            .lines()
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect();
        Self { records }
    }

    /// Loads `path` into its canonical, order-independent form.
    ///
    /// If `identifiers` is given only records whose first field is in the
    /// set are kept. The remaining records are stably sorted by first field
    /// as plain strings, so `"10"` sorts before `"2"`. Reference files are
    /// generated against this ordering and it must not become numeric.
    pub fn load_sorted<P: AsRef<Path>>(
        path: P,
        identifiers: Option<&HashSet<String>>,
    ) -> Result<Self> {
        let mut table = Self::load(path)?;
        if let Some(ids) = identifiers {
            table.retain_identifiers(ids);
        }
        table.sort_by_identifier();
        Ok(table)
    }

    /// Drops every record whose identifier is not in `ids`.
    ///
    /// Empty records have no identifier and are always dropped.
    pub fn retain_identifiers(&mut self, ids: &HashSet<String>) {
        self.records
            .retain(|record| record.first().map_or(false, |id| ids.contains(id)));
    }

    /// Stable sort by first field; empty records sort as `""`
    pub fn sort_by_identifier(&mut self) {
        self.records.sort_by(|a, b| identifier(a).cmp(identifier(b)));
    }

    /// Removes the fields at 1-based `positions` from every record.
    ///
    /// Positions refer to the original layout. They are applied in ascending
    /// order, and as each deletion shifts later fields left the n-th removal
    /// (0-based) takes index `positions[n] - n - 1`.
    ///
    /// Nothing is modified if a position is zero or repeated, or if any record
    /// is too short to hold the largest position.
    pub fn delete_columns(&mut self, positions: &[usize]) -> Result<()> {
        let mut sorted = positions.to_vec();
        sorted.sort_unstable();
        if sorted.first() == Some(&0) {
            return Err(Error::Configuration(
                "column positions are 1-based, got 0".to_string(),
            ));
        }
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::Configuration(format!(
                "column {} listed more than once",
                pair[0]
            )));
        }
        let Some(&last) = sorted.last() else {
            return Ok(());
        };
        if let Some((idx, record)) = self
            .records
            .iter()
            .enumerate()
            .find(|(_, record)| record.len() < last)
        {
            return Err(Error::ColumnOutOfRange {
                column: last,
                record: idx,
                fields: record.len(),
            });
        }

        for (n, position) in sorted.iter().enumerate() {
            for record in self.records.iter_mut() {
                record.remove(position - n - 1);
            }
        }
        Ok(())
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, in their current order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Record at `idx`, if any
    pub fn get(&self, idx: usize) -> Option<&Record> {
        self.records.get(idx)
    }

    /// First field of the first record
    pub fn first_identifier(&self) -> Option<&str> {
        self.records
            .first()
            .and_then(|record| record.first())
            .map(String::as_str)
    }
}

impl From<Vec<Record>> for Table {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "{}", record.join("\t"))?;
        }
        Ok(())
    }
}

fn identifier(record: &Record) -> &str {
    record.first().map_or("", String::as_str)
}
