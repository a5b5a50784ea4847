//! In-memory reference backend.
//!
//! Owned implementations of every collaborator trait, for tests and for
//! embedders prototyping against the engine without a real storage layer.
//! Pages are handed out as clones, which trivially satisfies the
//! stable-for-the-duration-of-a-call contract.

use std::collections::HashMap;
use std::io;

use relsum_error::{ChecksumError, Result};
use relsum_types::{
    BlockNumber, ColumnValue, ContainerId, ContainerKind, ContainerMeta, HeapPage, IndexPage,
    Persistence, StorageEncoding, TupleLocation, TypeId, TypeMod, VisibilityStamp,
};

use crate::traits::{
    CatalogSnapshot, ContainerRef, DecodedColumn, IndexContainer, RowContainer, RowDecoder,
    TypeCatalog,
};

/// Well-known type ids registered by [`MemTypeCatalog::with_builtins`].
pub mod type_ids {
    use relsum_types::TypeId;

    pub const INT2: TypeId = TypeId(21);
    pub const INT4: TypeId = TypeId(23);
    pub const INT8: TypeId = TypeId(20);
    pub const FLOAT8: TypeId = TypeId(701);
    pub const TEXT: TypeId = TypeId(25);
    pub const BYTEA: TypeId = TypeId(17);
    pub const CSTRING: TypeId = TypeId(2275);
    pub const NAME: TypeId = TypeId(19);
}

/// Type catalog over a plain map.
#[derive(Debug, Clone, Default)]
pub struct MemTypeCatalog {
    types: HashMap<TypeId, StorageEncoding>,
}

impl MemTypeCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog pre-loaded with the [`type_ids`] set.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut cat = Self::new();
        cat.register(type_ids::INT2, StorageEncoding::FixedInline { width: 2 });
        cat.register(type_ids::INT4, StorageEncoding::FixedInline { width: 4 });
        cat.register(type_ids::INT8, StorageEncoding::FixedInline { width: 8 });
        cat.register(type_ids::FLOAT8, StorageEncoding::FixedInline { width: 8 });
        cat.register(type_ids::TEXT, StorageEncoding::VarLen);
        cat.register(type_ids::BYTEA, StorageEncoding::VarLen);
        cat.register(type_ids::CSTRING, StorageEncoding::CString);
        cat.register(type_ids::NAME, StorageEncoding::FixedRef { width: 64 });
        cat
    }

    /// Register (or replace) a type's encoding.
    pub fn register(&mut self, type_id: TypeId, encoding: StorageEncoding) {
        self.types.insert(type_id, encoding);
    }
}

impl TypeCatalog for MemTypeCatalog {
    fn resolve(&self, type_id: TypeId, _type_mod: TypeMod) -> Result<StorageEncoding> {
        self.types
            .get(&type_id)
            .copied()
            .ok_or(ChecksumError::UnknownType {
                type_id: type_id.get(),
            })
    }
}

/// A decoded row held as owned per-column byte vectors.
#[derive(Debug, Clone, Default)]
pub struct MemRow {
    columns: Vec<(Option<Vec<u8>>, TypeId, TypeMod)>,
}

impl MemRow {
    /// An empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a non-null column.
    pub fn push_bytes(&mut self, type_id: TypeId, bytes: Vec<u8>) {
        self.columns.push((Some(bytes), type_id, TypeMod::NONE));
    }

    /// Append a null column.
    pub fn push_null(&mut self, type_id: TypeId) {
        self.columns.push((None, type_id, TypeMod::NONE));
    }

    /// Replace a column's value in place (1-based position).
    ///
    /// # Panics
    /// If `attnum` is outside the row.
    pub fn set_bytes(&mut self, attnum: u16, bytes: Vec<u8>) {
        self.columns[usize::from(attnum) - 1].0 = Some(bytes);
    }
}

impl RowDecoder for MemRow {
    fn natts(&self) -> usize {
        self.columns.len()
    }

    fn column(&self, attnum: u16) -> Result<DecodedColumn<'_>> {
        let (bytes, type_id, type_mod) = self
            .columns
            .get(usize::from(attnum).wrapping_sub(1))
            .ok_or(ChecksumError::InvalidPosition {
                attnum: i32::from(attnum),
                natts: self.columns.len(),
            })?;
        let value = match bytes {
            Some(b) => ColumnValue::Bytes(b),
            None => ColumnValue::Null,
        };
        Ok(DecodedColumn {
            value,
            type_id: *type_id,
            type_mod: *type_mod,
        })
    }
}

fn block_out_of_range(container: ContainerId, block: BlockNumber) -> ChecksumError {
    ChecksumError::storage(io::Error::new(
        io::ErrorKind::NotFound,
        format!("container {container} has no block {block}"),
    ))
}

/// Rows per page before [`MemTable::insert`] starts a new block.
const MEM_PAGE_CAPACITY: u16 = 32;

/// An in-memory row container.
#[derive(Debug, Clone)]
pub struct MemTable {
    id: ContainerId,
    pages: Vec<HeapPage>,
}

impl MemTable {
    /// An empty table.
    #[must_use]
    pub const fn new(id: ContainerId) -> Self {
        Self {
            id,
            pages: Vec::new(),
        }
    }

    /// Insert a row version, extending the last page or starting a new one.
    /// Returns the location the row landed at.
    pub fn insert(
        &mut self,
        bytes: Vec<u8>,
        header_len: usize,
        visibility: VisibilityStamp,
    ) -> TupleLocation {
        let needs_page = self
            .pages
            .last()
            .map_or(true, |p| p.max_offset() >= MEM_PAGE_CAPACITY);
        if needs_page {
            self.pages.push(HeapPage::new());
        }
        let block = BlockNumber((self.pages.len() - 1) as u32);
        let page = self.pages.last_mut().expect("page was just ensured");
        let offset = page.add_row(bytes, header_len, visibility);
        TupleLocation::new(block, offset)
    }

    /// Force subsequent inserts onto a fresh block.
    pub fn start_new_page(&mut self) {
        self.pages.push(HeapPage::new());
    }

    /// Mutable access to one page, for slot-level manipulation.
    pub fn page_mut(&mut self, block: BlockNumber) -> Option<&mut HeapPage> {
        self.pages.get_mut(block.get() as usize)
    }

    /// Borrow one page.
    #[must_use]
    pub fn page(&self, block: BlockNumber) -> Option<&HeapPage> {
        self.pages.get(block.get() as usize)
    }
}

impl RowContainer for MemTable {
    fn id(&self) -> ContainerId {
        self.id
    }

    fn block_count(&self) -> Result<u32> {
        Ok(self.pages.len() as u32)
    }

    fn read_page(&self, block: BlockNumber) -> Result<HeapPage> {
        self.pages
            .get(block.get() as usize)
            .cloned()
            .ok_or_else(|| block_out_of_range(self.id, block))
    }
}

/// An in-memory index container. Blocks may be allocated but
/// uninitialized, mirroring storage layers that extend files ahead of use.
#[derive(Debug, Clone)]
pub struct MemIndex {
    id: ContainerId,
    pages: Vec<Option<IndexPage>>,
}

impl MemIndex {
    /// An empty index.
    #[must_use]
    pub const fn new(id: ContainerId) -> Self {
        Self {
            id,
            pages: Vec::new(),
        }
    }

    /// Insert a live entry on the last initialized page (starting one if
    /// needed). Returns the entry's location.
    pub fn insert(
        &mut self,
        bytes: Vec<u8>,
        back_ref: Option<TupleLocation>,
    ) -> TupleLocation {
        let needs_page = !matches!(self.pages.last(), Some(Some(_)));
        if needs_page {
            self.pages.push(Some(IndexPage::new()));
        }
        let block = BlockNumber((self.pages.len() - 1) as u32);
        let page = self
            .pages
            .last_mut()
            .and_then(Option::as_mut)
            .expect("page was just ensured");
        let offset = page.add_entry(bytes, back_ref);
        TupleLocation::new(block, offset)
    }

    /// Append an allocated-but-uninitialized block.
    pub fn add_uninitialized_page(&mut self) {
        self.pages.push(None);
    }

    /// Mutable access to one initialized page.
    pub fn page_mut(&mut self, block: BlockNumber) -> Option<&mut IndexPage> {
        self.pages
            .get_mut(block.get() as usize)
            .and_then(Option::as_mut)
    }

    /// Remove the entry at `location` (slot becomes unused).
    pub fn remove(&mut self, location: TupleLocation) {
        if let Some(page) = self.page_mut(location.block) {
            page.remove_entry(location.offset);
        }
    }
}

impl IndexContainer for MemIndex {
    fn id(&self) -> ContainerId {
        self.id
    }

    fn block_count(&self) -> Result<u32> {
        Ok(self.pages.len() as u32)
    }

    fn read_page(&self, block: BlockNumber) -> Result<Option<IndexPage>> {
        self.pages
            .get(block.get() as usize)
            .cloned()
            .ok_or_else(|| block_out_of_range(self.id, block))
    }
}

enum MemContainer {
    Rows(MemTable),
    Index(MemIndex),
}

/// An in-memory catalog snapshot over owned containers.
#[derive(Default)]
pub struct MemCatalog {
    entries: Vec<(ContainerMeta, MemContainer)>,
}

impl MemCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a row container.
    pub fn add_table(
        &mut self,
        table: MemTable,
        is_system: bool,
        persistence: Persistence,
        kind: ContainerKind,
    ) {
        let meta = ContainerMeta {
            id: table.id,
            kind,
            is_system,
            persistence,
        };
        self.entries.push((meta, MemContainer::Rows(table)));
    }

    /// Register an index container.
    pub fn add_index(&mut self, index: MemIndex, is_system: bool, persistence: Persistence) {
        let meta = ContainerMeta {
            id: index.id,
            kind: ContainerKind::Index,
            is_system,
            persistence,
        };
        self.entries.push((meta, MemContainer::Index(index)));
    }

    /// Mutable access to a registered table.
    pub fn table_mut(&mut self, id: ContainerId) -> Option<&mut MemTable> {
        self.entries.iter_mut().find_map(|(meta, c)| match c {
            MemContainer::Rows(t) if meta.id == id => Some(t),
            _ => None,
        })
    }

    /// Mutable access to a registered index.
    pub fn index_mut(&mut self, id: ContainerId) -> Option<&mut MemIndex> {
        self.entries.iter_mut().find_map(|(meta, c)| match c {
            MemContainer::Index(i) if meta.id == id => Some(i),
            _ => None,
        })
    }
}

impl CatalogSnapshot for MemCatalog {
    fn containers(&self) -> Result<Vec<ContainerMeta>> {
        Ok(self.entries.iter().map(|(meta, _)| *meta).collect())
    }

    fn open(&self, id: ContainerId) -> Result<ContainerRef<'_>> {
        self.entries
            .iter()
            .find(|(meta, _)| meta.id == id)
            .map(|(_, c)| match c {
                MemContainer::Rows(t) => ContainerRef::Rows(t),
                MemContainer::Index(i) => ContainerRef::Index(i),
            })
            .ok_or_else(|| {
                ChecksumError::storage(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no container {id} in catalog"),
                ))
            })
    }
}
