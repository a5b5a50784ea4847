//! Collaborator seams: what the engine requires from the storage, catalog,
//! and scan layers.
//!
//! The engine only ever reads through these traits and never retains a
//! reference beyond one call. Implementations own all locking and I/O;
//! pages handed to the engine must be stable for the duration of the call
//! (the owned [`HeapPage`]/[`IndexPage`] representation makes that trivial).
//! Blocking, snapshot isolation, and retry policy all live on the
//! implementation side of these traits.

use relsum_error::Result;
use relsum_types::{
    BlockNumber, ColumnValue, ContainerId, ContainerMeta, HeapPage, IndexPage, StorageEncoding,
    TypeId, TypeMod,
};

/// Resolves type identifiers to their storage encoding class.
///
/// Detoasting/decompression of variable-width values is this layer's job;
/// the engine expects [`ColumnValue`] spans already in canonical decoded
/// form.
pub trait TypeCatalog {
    /// Resolve a type to its encoding class, or fail with `UnknownType`.
    fn resolve(&self, type_id: TypeId, type_mod: TypeMod) -> Result<StorageEncoding>;
}

/// One column of a decoded row, borrowed from the decoder.
#[derive(Debug, Clone, Copy)]
pub struct DecodedColumn<'a> {
    pub value: ColumnValue<'a>,
    pub type_id: TypeId,
    pub type_mod: TypeMod,
}

/// A decoded row: per-column typed value access.
///
/// Attribute numbers are 1-based, matching slot offsets.
pub trait RowDecoder {
    /// Number of attributes in the row descriptor.
    fn natts(&self) -> usize;

    /// The typed value of attribute `attnum` (1-based, already validated
    /// against [`Self::natts`] by the caller).
    fn column(&self, attnum: u16) -> Result<DecodedColumn<'_>>;
}

/// A row container (table, materialized view, sequence, toast table) the
/// orchestrator can scan page by page.
///
/// Implementations supply a snapshot-consistent view: each live row version
/// appears exactly once per scan, in any order.
pub trait RowContainer {
    /// This container's catalog identifier, used as the aggregate salt.
    fn id(&self) -> ContainerId;

    /// Number of blocks in the container's main fork.
    fn block_count(&self) -> Result<u32>;

    /// Materialize one page. The returned page is an owned snapshot of the
    /// block at read time.
    fn read_page(&self, block: BlockNumber) -> Result<HeapPage>;
}

/// An index container the orchestrator can scan page by page.
pub trait IndexContainer {
    /// This container's catalog identifier, used as the aggregate salt.
    fn id(&self) -> ContainerId;

    /// Number of blocks in the index's main fork.
    fn block_count(&self) -> Result<u32>;

    /// Materialize one page, or `None` for an allocated-but-uninitialized
    /// block. Uninitialized pages contribute nothing to any checksum.
    fn read_page(&self, block: BlockNumber) -> Result<Option<IndexPage>>;
}

/// A scannable container, as opened through the catalog.
pub enum ContainerRef<'a> {
    Rows(&'a dyn RowContainer),
    Index(&'a dyn IndexContainer),
}

/// A consistent view of the catalog for one database-level scan.
pub trait CatalogSnapshot {
    /// Enumerate every container in the database, system and transient
    /// included; the orchestrator applies the inclusion filters.
    fn containers(&self) -> Result<Vec<ContainerMeta>>;

    /// Open a container for scanning.
    fn open(&self, id: ContainerId) -> Result<ContainerRef<'_>>;
}
