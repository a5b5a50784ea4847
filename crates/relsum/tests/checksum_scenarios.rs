//! End-to-end scenarios over the in-memory backend: the checksum behavior
//! a DBA or migration tool actually relies on.

use relsum::mem::{type_ids, MemCatalog, MemIndex, MemRow, MemTable, MemTypeCatalog};
use relsum::{
    checksum_index, checksum_row_column, checksum_table, checksum_tuple, run_database_checksum,
    CancelToken, ContainerId, ContainerKind, Fingerprint64, Persistence, ScanOptions, TxnId,
    VisibilityStamp, NULL_MARK,
};

const HEADER_LEN: usize = 8;

/// Build a stored row image: a fixed-size dummy header followed by the
/// encoded column data.
fn row_bytes(id: i32, text: &str) -> Vec<u8> {
    let mut bytes = vec![0u8; HEADER_LEN];
    bytes.extend_from_slice(&id.to_le_bytes());
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

fn decoded_row(id: i32, text: &str) -> MemRow {
    let mut row = MemRow::new();
    row.push_bytes(type_ids::INT4, id.to_le_bytes().to_vec());
    row.push_bytes(type_ids::TEXT, text.as_bytes().to_vec());
    row
}

#[test]
fn two_rows_at_distinct_slots_fingerprint_differently() {
    let stamp = VisibilityStamp::created(TxnId(10));
    let mut table = MemTable::new(ContainerId(500));
    let loc1 = table.insert(row_bytes(1, "test data"), HEADER_LEN, stamp);
    let loc2 = table.insert(row_bytes(2, "more data"), HEADER_LEN, stamp);
    assert_ne!(loc1, loc2);

    let page = table.page(loc1.block).unwrap();
    let fp1 = checksum_tuple(page, loc1.offset, loc1.block, false);
    let fp2 = checksum_tuple(page, loc2.offset, loc2.block, false);
    assert_ne!(fp1, fp2);
    assert!(!fp1.is_zero() && !fp2.is_zero());

    // Column 2 differs between the rows as well.
    let types = MemTypeCatalog::with_builtins();
    let col1 = checksum_row_column(&types, &decoded_row(1, "test data"), 2).unwrap();
    let col2 = checksum_row_column(&types, &decoded_row(2, "more data"), 2).unwrap();
    assert_ne!(col1, col2);
}

#[test]
fn null_column_scenario() {
    let types = MemTypeCatalog::with_builtins();

    let mut with_null = MemRow::new();
    with_null.push_null(type_ids::INT4);
    assert_eq!(checksum_row_column(&types, &with_null, 1).unwrap(), NULL_MARK);

    // The same attribute set to a non-null value never yields the
    // sentinel, for a fixed-width and a variable-width type.
    let mut fixed = MemRow::new();
    fixed.push_bytes(type_ids::INT4, 0xFFFF_FFFFu32.to_le_bytes().to_vec());
    assert!(!checksum_row_column(&types, &fixed, 1).unwrap().is_null_mark());

    let mut varlen = MemRow::new();
    varlen.push_bytes(type_ids::TEXT, vec![0xFF; 16]);
    assert!(!checksum_row_column(&types, &varlen, 1)
        .unwrap()
        .is_null_mark());
}

#[test]
fn table_rescan_is_deterministic() {
    let stamp = VisibilityStamp::created(TxnId(3));
    let mut table = MemTable::new(ContainerId(510));
    for i in 0..100 {
        table.insert(row_bytes(i, "payload"), HEADER_LEN, stamp);
    }

    let first = checksum_table(&table, false).unwrap();
    let second = checksum_table(&table, false).unwrap();
    assert_eq!(first, second);
    assert_ne!(
        checksum_table(&table, true).unwrap(),
        first,
        "header inclusion must change the table fingerprint"
    );
}

#[test]
fn updating_an_indexed_column_moves_the_index_aggregate() {
    let mut index = MemIndex::new(ContainerId(520));
    let target = index.insert(b"test data".to_vec(), None);
    index.insert(b"other key".to_vec(), None);

    let original = checksum_index(&index).unwrap();

    // Update the indexed value in place.
    let page = index.page_mut(target.block).unwrap();
    page.place_entry(target.offset, b"updated data".to_vec(), None);
    let updated = checksum_index(&index).unwrap();
    assert_ne!(original, updated);

    // Restoring the value restores the aggregate: data-content
    // determinism, given the same physical slot.
    let page = index.page_mut(target.block).unwrap();
    page.place_entry(target.offset, b"test data".to_vec(), None);
    assert_eq!(checksum_index(&index).unwrap(), original);
}

#[test]
fn database_fingerprint_ignores_catalog_enumeration_order() {
    let stamp = VisibilityStamp::created(TxnId(8));

    let build_table = |id: u32, text: &str| {
        let mut t = MemTable::new(ContainerId(id));
        t.insert(row_bytes(id as i32, text), HEADER_LEN, stamp);
        t
    };

    let mut forward = MemCatalog::new();
    forward.add_table(
        build_table(600, "alpha"),
        false,
        Persistence::Durable,
        ContainerKind::Table,
    );
    forward.add_table(
        build_table(601, "beta"),
        false,
        Persistence::Durable,
        ContainerKind::Table,
    );

    let mut reversed = MemCatalog::new();
    reversed.add_table(
        build_table(601, "beta"),
        false,
        Persistence::Durable,
        ContainerKind::Table,
    );
    reversed.add_table(
        build_table(600, "alpha"),
        false,
        Persistence::Durable,
        ContainerKind::Table,
    );

    let cancel = CancelToken::new();
    let a = run_database_checksum(&forward, ScanOptions::default(), None, &cancel).unwrap();
    let b = run_database_checksum(&reversed, ScanOptions::default(), None, &cancel).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, Fingerprint64::ZERO);
}

#[test]
fn row_rewrite_at_a_reused_slot_changes_the_fingerprint() {
    let mut table = MemTable::new(ContainerId(530));
    let loc = table.insert(
        row_bytes(1, "first occupant"),
        HEADER_LEN,
        VisibilityStamp::created(TxnId(20)),
    );
    let page = table.page(loc.block).unwrap();
    let original = checksum_tuple(page, loc.offset, loc.block, false);

    // The slot is reclaimed and reused by a different transaction with
    // different content: a fresh row snapshot, never the same checksum.
    let page = table.page_mut(loc.block).unwrap();
    page.reclaim(loc.offset);
    assert!(checksum_tuple(page, loc.offset, loc.block, false).is_zero());

    page.place_row(
        loc.offset,
        row_bytes(9, "second occupant"),
        HEADER_LEN,
        VisibilityStamp::created(TxnId(31)),
    );
    let reused = checksum_tuple(table.page(loc.block).unwrap(), loc.offset, loc.block, false);
    assert_ne!(original, reused);
    assert!(!reused.is_zero());
}

#[test]
fn content_identical_rows_with_different_stamps_differ() {
    // Same bytes, same slot, different lifecycle points: only the
    // visibility stamp separates the two versions.
    let build = |stamp: VisibilityStamp| {
        let mut table = MemTable::new(ContainerId(540));
        let loc = table.insert(row_bytes(1, "same"), HEADER_LEN, stamp);
        checksum_tuple(table.page(loc.block).unwrap(), loc.offset, loc.block, false)
    };

    let live = build(VisibilityStamp::created(TxnId(40)));
    let superseded = build(VisibilityStamp::created(TxnId(40)).superseded(TxnId(41)));
    assert_ne!(live, superseded);
}
