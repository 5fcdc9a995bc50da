use hashbrown::HashSet;

#[cfg(test)]
use pretty_assertions::assert_eq;

use peelcheck::compare::{assert_equivalent, TableDiff};
use peelcheck::error::Error;
use peelcheck::table::Table;

pub mod common;
use crate::common::*;

fn ids(list: &[&str]) -> HashSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn row(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|s| s.to_string()).collect()
}

#[test]
fn load_tokenises() {
    let sandbox = TestSetup::setup();
    let path = sandbox.write("t.txt", "  a\tb   c \n\nd e\n");

    let table = Table::load(&path).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.get(0).unwrap(), &row(&["a", "b", "c"]));
    // Empty lines are kept as empty records
    assert!(table.get(1).unwrap().is_empty());
    assert_eq!(table.get(2).unwrap(), &row(&["d", "e"]));
    assert_eq!(table.first_identifier(), Some("a"));
}

#[test]
fn load_missing() {
    let sandbox = TestSetup::setup();
    let missing = sandbox.input_path("not_there.txt");

    match Table::load(&missing) {
        Err(Error::MissingFile { path }) => assert_eq!(path, missing),
        other => panic!("Expected missing file, got {other:?}"),
    }
    assert!(matches!(
        Table::load_sorted(&missing, None),
        Err(Error::MissingFile { .. })
    ));
}

#[test]
fn sort_is_lexicographic() {
    let mut table = Table::parse("2 x\n10 y\n1 z\n");
    table.sort_by_identifier();
    let order: Vec<&str> = table.records().iter().map(|r| r[0].as_str()).collect();
    assert_eq!(order, vec!["1", "10", "2"]);
}

#[test]
fn sort_is_stable_and_empty_first() {
    let mut table = Table::parse("b 1\na 2\n\nb 0\n");
    table.sort_by_identifier();
    assert_eq!(
        table,
        Table::from(vec![
            row(&[]),
            row(&["a", "2"]),
            row(&["b", "1"]),
            row(&["b", "0"]),
        ])
    );
}

#[test]
fn order_independent() {
    let sandbox = TestSetup::setup();

    let expected = Table::load_sorted(sandbox.input_path("trueGenotypes.txt"), None).unwrap();
    let shuffled = Table::load_sorted(sandbox.input_path("called_shuffled.txt"), None).unwrap();
    assert_eq!(expected.len(), 11);
    assert_eq!(expected, shuffled);

    // The file order itself differs
    let raw_expected = Table::load(sandbox.input_path("trueGenotypes.txt")).unwrap();
    let raw_shuffled = Table::load(sandbox.input_path("called_shuffled.txt")).unwrap();
    assert_ne!(raw_expected, raw_shuffled);
}

#[test]
fn identifier_filter() {
    let sandbox = TestSetup::setup();
    let path = sandbox.input_path("trueGenotypes.txt");
    let filter = ids(&["1", "10", "7", "not_an_id"]);

    let filtered = Table::load_sorted(&path, Some(&filter)).unwrap();
    let order: Vec<&str> = filtered.records().iter().map(|r| r[0].as_str()).collect();
    assert_eq!(order, vec!["1", "10", "7"]);

    // Exactly the unfiltered records with a matching identifier
    let all = Table::load_sorted(&path, None).unwrap();
    let manual: Vec<Vec<String>> = all
        .records()
        .iter()
        .filter(|r| filter.contains(&r[0]))
        .cloned()
        .collect();
    assert_eq!(filtered, Table::from(manual));

    // Empty records never match
    let mut with_blank = Table::parse("1 a\n\n2 b\n");
    with_blank.retain_identifiers(&ids(&["1", "2", ""]));
    assert_eq!(with_blank.len(), 2);
}

#[test]
fn delete_columns_shifts() {
    let mut table = Table::from(vec![row(&["a", "b", "c", "d", "e", "f", "g"])]);
    table.delete_columns(&[2, 6]).unwrap();
    assert_eq!(table.get(0).unwrap(), &row(&["a", "c", "d", "e", "g"]));

    // Order of positions does not matter
    let mut table = Table::from(vec![
        row(&["a", "b", "c", "d", "e", "f", "g"]),
        row(&["1", "2", "3", "4", "5", "6", "7"]),
    ]);
    table.delete_columns(&[6, 2, 1]).unwrap();
    assert_eq!(
        table,
        Table::from(vec![row(&["c", "d", "e", "g"]), row(&["3", "4", "5", "7"])])
    );

    // Empty list is a no-op
    let before = table.clone();
    table.delete_columns(&[]).unwrap();
    assert_eq!(table, before);
}

#[test]
fn delete_columns_rejects() {
    let original = Table::from(vec![row(&["a", "b", "c"]), row(&["d", "e"])]);

    let mut table = original.clone();
    match table.delete_columns(&[1, 3]) {
        Err(Error::ColumnOutOfRange {
            column,
            record,
            fields,
        }) => {
            assert_eq!((column, record, fields), (3, 1, 2));
        }
        other => panic!("Expected out of range, got {other:?}"),
    }
    // Untouched on failure
    assert_eq!(table, original);

    assert!(matches!(
        table.delete_columns(&[0]),
        Err(Error::Configuration(_))
    ));
    assert!(matches!(
        table.delete_columns(&[2, 2]),
        Err(Error::Configuration(_))
    ));
    assert_eq!(table, original);
}

#[test]
fn reference_projection() {
    let sandbox = TestSetup::setup();

    let mut expected = Table::load_sorted(sandbox.input_path("trueGenotypes.txt"), None).unwrap();
    expected.delete_columns(&[2, 6]).unwrap();
    let actual = Table::load_sorted(sandbox.input_path("subset_called.txt"), None).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn table_diff() {
    let sandbox = TestSetup::setup();
    let expected_path = sandbox.input_path("trueGenotypes.txt");
    let actual_path = sandbox.input_path("called_wrong.txt");
    let expected = Table::load_sorted(&expected_path, None).unwrap();
    let actual = Table::load_sorted(&actual_path, None).unwrap();

    assert_eq!(TableDiff::between(&expected, &expected), None);
    assert!(assert_equivalent(&expected, &expected, &expected_path, &expected_path).is_ok());

    // Only individual 11 differs; "11" sorts third
    let diff = TableDiff::between(&actual, &expected).unwrap();
    assert_eq!(diff.actual_len, 11);
    assert_eq!(diff.expected_len, 11);
    assert_eq!(
        diff.records,
        vec![(
            2,
            Some(row(&["11", "1", "1", "1", "1", "2"])),
            Some(row(&["11", "1", "1", "1", "0", "2"]))
        )]
    );

    match assert_equivalent(&actual, &expected, &actual_path, &expected_path) {
        Err(Error::ComparisonMismatch { diff: reported, .. }) => assert_eq!(reported, diff),
        other => panic!("Expected mismatch, got {other:?}"),
    }

    // Length differences list the missing records
    let short = Table::parse("1 a\n");
    let long = Table::parse("1 a\n2 b\n");
    let diff = TableDiff::between(&short, &long).unwrap();
    assert_eq!(diff.records, vec![(1, None, Some(row(&["2", "b"])))]);
    assert!(diff.to_string().contains("<missing>"));
}
