use stockledger_core::{export_to_path, write_snapshot, ExportError, StockRecord};

#[test]
fn empty_snapshot_is_refused() {
    let mut out = Vec::new();
    let err = write_snapshot(&[], &mut out).unwrap_err();

    assert!(matches!(err, ExportError::NothingToExport));
    assert_eq!(err.to_string(), "nothing to export");
    assert!(out.is_empty());
}

#[test]
fn refused_export_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");

    let err = export_to_path(&[], &path).unwrap_err();
    assert!(matches!(err, ExportError::NothingToExport));
    assert!(!path.exists());
}

#[test]
fn snapshot_serializes_with_fixed_header_and_row_order() {
    let records = vec![
        record(1, "Electronics", "Cable", 8, Some(1_700_000_000_000), None),
        record(
            3,
            "Office",
            "Paper",
            2,
            Some(1_700_000_000_000),
            Some(1_700_000_060_000),
        ),
    ];

    let mut out = Vec::new();
    write_snapshot(&records, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ID,Type,Description,Quantity,Entry Time,Exit Time");
    assert_eq!(lines[1], "1,Electronics,Cable,8,2023-11-14 22:13:20,");
    assert_eq!(
        lines[2],
        "3,Office,Paper,2,2023-11-14 22:13:20,2023-11-14 22:14:20"
    );
}

#[test]
fn fields_containing_the_separator_are_quoted() {
    let records = vec![record(1, "Electronics", "Cable, coaxial", 4, None, None)];

    let mut out = Vec::new();
    write_snapshot(&records, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("\"Cable, coaxial\""));
}

#[test]
fn export_to_path_writes_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.csv");
    let records = vec![record(1, "Electronics", "Cable", 8, None, None)];

    export_to_path(&records, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("ID,Type,Description,Quantity,Entry Time,Exit Time"));
    assert!(text.contains("1,Electronics,Cable,8,,"));
}

fn record(
    id: i64,
    item_type: &str,
    description: &str,
    quantity: i64,
    last_entry_at: Option<i64>,
    last_exit_at: Option<i64>,
) -> StockRecord {
    StockRecord {
        id,
        item_type: item_type.to_string(),
        description: description.to_string(),
        quantity,
        last_entry_at,
        last_exit_at,
    }
}
