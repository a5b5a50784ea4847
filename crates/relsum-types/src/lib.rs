//! Core types for the relsum checksum engine.
//!
//! Identifiers, physical locations, fingerprints, typed column values, and
//! the slotted-page model the engine reads. Everything here is a plain value
//! type: the engine itself holds no state between calls.

pub mod fingerprint;
pub mod page;
pub mod value;
pub mod visibility;

pub use fingerprint::{Fingerprint, Fingerprint64, NULL_MARK};
pub use page::{HeapPage, HeapSlot, IndexPage, IndexSlot};
pub use value::{ColumnValue, StorageEncoding, TypeId, TypeMod};
pub use visibility::{TxnId, VisibilityStamp};

use std::fmt;
use std::num::NonZeroU16;

/// A container-relative block number.
///
/// Blocks are 0-based: block 0 is the first block of a container's main
/// fork. Distinct from any global page numbering — a checksum binds to the
/// location of a row *within its container*, which survives relocation of
/// the container as a whole.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct BlockNumber(pub u32);

impl BlockNumber {
    /// Get the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A slot offset within a block.
///
/// Offsets are 1-based (offset 0 does not exist); the first slot on a page
/// is [`OffsetNumber::FIRST`]. The niche in `NonZeroU16` keeps
/// `Option<OffsetNumber>` the same size as `u16`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct OffsetNumber(NonZeroU16);

impl OffsetNumber {
    /// The first slot on a page.
    pub const FIRST: Self = Self(NonZeroU16::MIN);

    /// Create a new offset number from a raw u16.
    ///
    /// Returns `None` if `n` is 0 (slot 0 does not exist).
    #[inline]
    #[must_use]
    pub const fn new(n: u16) -> Option<Self> {
        match NonZeroU16::new(n) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Get the raw u16 value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for OffsetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for OffsetNumber {
    type Error = InvalidOffsetNumber;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidOffsetNumber)
    }
}

/// Error returned when attempting to create an `OffsetNumber` from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidOffsetNumber;

impl fmt::Display for InvalidOffsetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset number 0 is invalid (offsets are 1-based)")
    }
}

impl std::error::Error for InvalidOffsetNumber {}

/// The physical location of one row or index entry: container-relative
/// block plus in-block slot offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TupleLocation {
    pub block: BlockNumber,
    pub offset: OffsetNumber,
}

impl TupleLocation {
    /// Create a location from a block and offset.
    #[must_use]
    pub const fn new(block: BlockNumber, offset: OffsetNumber) -> Self {
        Self { block, offset }
    }

    /// The location seed: `(block << 16) | offset`.
    ///
    /// Used both as the mixer seed and as a final XOR combinator so that
    /// identical content at distinct locations always fingerprints
    /// differently. Blocks beyond 2^16 fold their high bits away, which is
    /// acceptable: the seed is a disambiguator, not an address.
    #[inline]
    #[must_use]
    pub const fn seed(self) -> u32 {
        (self.block.get() << 16) | self.offset.get() as u32
    }
}

impl fmt::Display for TupleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.block, self.offset)
    }
}

/// Identifier of a container (table or index) in the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct ContainerId(pub u32);

impl ContainerId {
    /// Get the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of thing a container is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum ContainerKind {
    /// Ordinary row container.
    Table,
    /// Index over a row container.
    Index,
    /// Materialized query result; scanned like a table.
    MaterializedView,
    /// Sequence state; scanned like a (one-row) table.
    Sequence,
    /// Out-of-line value storage for a table; scanned like a table.
    Toast,
    /// Anything else (views, foreign containers). Never scanned.
    Other,
}

impl ContainerKind {
    /// Whether containers of this kind hold row versions in slotted pages.
    #[must_use]
    pub const fn holds_rows(self) -> bool {
        matches!(
            self,
            Self::Table | Self::MaterializedView | Self::Sequence | Self::Toast
        )
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Table => "table",
            Self::Index => "index",
            Self::MaterializedView => "materialized view",
            Self::Sequence => "sequence",
            Self::Toast => "toast table",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Whether a container survives a crash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Persistence {
    /// Crash-safe; participates in database checksums.
    Durable,
    /// Unlogged or temporary; always excluded from database checksums.
    Transient,
}

/// Catalog metadata for one container, as seen by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContainerMeta {
    pub id: ContainerId,
    pub kind: ContainerKind,
    /// Whether the container lives in a system namespace.
    pub is_system: bool,
    pub persistence: Persistence,
}
