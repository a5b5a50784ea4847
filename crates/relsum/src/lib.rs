//! Public API facade for relsum.
//!
//! Logical data-integrity checksums for relational stores, at five nested
//! granularities: column value, row version, index entry, whole table or
//! index, and whole database. Unlike physical block checksums, these
//! fingerprints cover decoded logical content bound to physical location
//! and visibility state, so they survive logical replication and
//! migration while still distinguishing structurally identical rows in
//! different slots.
//!
//! The engine lives in [`relsum_core`]; this crate re-exports the stable
//! surface.

pub use relsum_core::{
    begin_aggregate, checksum_column, checksum_index, checksum_index_entry, checksum_index_page,
    checksum_row_column, checksum_table, checksum_tuple, mix, run_database_checksum,
    AggregateState, CancelToken, CatalogSnapshot, ChecksumProgress, ContainerRef, ContributionKind,
    DecodedColumn, IndexContainer, RowContainer, RowDecoder, ScanOptions, TypeCatalog,
    CANCEL_CHECK_INTERVAL,
};
pub use relsum_error::{ChecksumError, Result};
pub use relsum_types::{
    BlockNumber, ColumnValue, ContainerId, ContainerKind, ContainerMeta, Fingerprint,
    Fingerprint64, HeapPage, HeapSlot, IndexPage, IndexSlot, OffsetNumber, Persistence,
    StorageEncoding, TupleLocation, TxnId, TypeId, TypeMod, VisibilityStamp, NULL_MARK,
};

/// In-memory reference backend, re-exported for embedders and tests.
pub mod mem {
    pub use relsum_core::mem::*;
}
