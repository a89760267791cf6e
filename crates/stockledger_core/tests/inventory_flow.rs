use stockledger_core::db::open_db_in_memory;
use stockledger_core::{
    EntryRequest, ExitRequest, InventoryError, InventoryService, SqliteStockRepository,
};

#[test]
fn first_entry_creates_record_with_no_exit_time() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);

    let id = service
        .register_entry(&entry("Electronics", "Cable", 5), 1_000)
        .unwrap();

    let snapshot = service.list_inventory().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, id);
    assert_eq!(snapshot[0].quantity, 5);
    assert_eq!(snapshot[0].last_entry_at, Some(1_000));
    assert_eq!(snapshot[0].last_exit_at, None);
}

#[test]
fn repeated_entries_merge_into_one_record() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);

    let first_id = service
        .register_entry(&entry("Electronics", "Cable", 5), 1_000)
        .unwrap();
    let second_id = service
        .register_entry(&entry("Electronics", "Cable", 3), 2_000)
        .unwrap();
    assert_eq!(first_id, second_id);

    let snapshot = service.list_inventory().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].quantity, 8);
    assert_eq!(snapshot[0].last_entry_at, Some(2_000));
}

#[test]
fn entries_with_different_descriptions_do_not_merge() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);

    let cable = service
        .register_entry(&entry("Electronics", "Cable", 5), 1_000)
        .unwrap();
    let lowercase = service
        .register_entry(&entry("Electronics", "cable", 2), 1_000)
        .unwrap();

    assert_ne!(cable, lowercase);
    assert_eq!(service.list_inventory().unwrap().len(), 2);
}

#[test]
fn partial_exit_keeps_record_with_remaining_quantity() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);

    let id = service
        .register_entry(&entry("Electronics", "Cable", 5), 1_000)
        .unwrap();
    service
        .register_exit(&exit(id, 2), 2_000)
        .unwrap();

    let snapshot = service.list_inventory().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].quantity, 3);
    assert_eq!(snapshot[0].last_entry_at, Some(1_000));
    assert_eq!(snapshot[0].last_exit_at, Some(2_000));
}

#[test]
fn exact_depletion_removes_the_record() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);

    let id = service
        .register_entry(&entry("Electronics", "Cable", 5), 1_000)
        .unwrap();
    service.register_exit(&exit(id, 5), 2_000).unwrap();

    assert!(service.list_inventory().unwrap().is_empty());
}

#[test]
fn unknown_id_and_insufficient_stock_share_one_error_kind() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);

    let id = service
        .register_entry(&entry("Electronics", "Cable", 5), 1_000)
        .unwrap();

    let unknown = service.register_exit(&exit(id + 1, 1), 2_000).unwrap_err();
    let insufficient = service.register_exit(&exit(id, 6), 2_000).unwrap_err();

    assert!(matches!(
        unknown,
        InventoryError::InsufficientStockOrNotFound
    ));
    assert!(matches!(
        insufficient,
        InventoryError::InsufficientStockOrNotFound
    ));

    // Neither failure mutates the ledger.
    let snapshot = service.list_inventory().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].quantity, 5);
    assert_eq!(snapshot[0].last_exit_at, None);
}

#[test]
fn non_positive_quantities_are_rejected_without_mutation() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);

    let id = service
        .register_entry(&entry("Electronics", "Cable", 5), 1_000)
        .unwrap();

    assert!(matches!(
        service
            .register_entry(&entry("Electronics", "Cable", 0), 2_000)
            .unwrap_err(),
        InventoryError::InvalidQuantity
    ));
    assert!(matches!(
        service
            .register_entry(&entry("Electronics", "Cable", -3), 2_000)
            .unwrap_err(),
        InventoryError::InvalidQuantity
    ));
    assert!(matches!(
        service.register_exit(&exit(id, 0), 2_000).unwrap_err(),
        InventoryError::InvalidQuantity
    ));
    assert!(matches!(
        service.register_exit(&exit(id, -1), 2_000).unwrap_err(),
        InventoryError::InvalidQuantity
    ));

    let snapshot = service.list_inventory().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].quantity, 5);
    assert_eq!(snapshot[0].last_entry_at, Some(1_000));
    assert_eq!(snapshot[0].last_exit_at, None);
}

#[test]
fn invalid_quantity_message_matches_the_form_contract() {
    assert_eq!(
        InventoryError::InvalidQuantity.to_string(),
        "quantity must be a valid positive integer"
    );
}

#[test]
fn entry_then_merge_then_deplete_then_reject() {
    let conn = open_db_in_memory().unwrap();
    let service = service_over(&conn);

    let id = service
        .register_entry(&entry("Electronics", "Cable", 5), 1_000)
        .unwrap();
    let snapshot = service.list_inventory().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].quantity, 5);
    assert_eq!(snapshot[0].last_exit_at, None);

    let merged_id = service
        .register_entry(&entry("Electronics", "Cable", 3), 2_000)
        .unwrap();
    assert_eq!(merged_id, id);
    let snapshot = service.list_inventory().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].quantity, 8);

    service.register_exit(&exit(id, 8), 3_000).unwrap();
    assert!(service.list_inventory().unwrap().is_empty());

    let err = service.register_exit(&exit(id, 1), 4_000).unwrap_err();
    assert!(matches!(err, InventoryError::InsufficientStockOrNotFound));
}

fn service_over(conn: &rusqlite::Connection) -> InventoryService<SqliteStockRepository<'_>> {
    InventoryService::new(SqliteStockRepository::try_new(conn).unwrap())
}

fn entry(item_type: &str, description: &str, quantity: i64) -> EntryRequest {
    EntryRequest {
        item_type: item_type.to_string(),
        description: description.to_string(),
        quantity,
    }
}

fn exit(record_id: i64, quantity: i64) -> ExitRequest {
    ExitRequest {
        record_id,
        quantity,
    }
}
