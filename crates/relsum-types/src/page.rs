//! Slotted-page model.
//!
//! The engine reads one page at a time through this owned representation:
//! a slot directory where each slot is either unused (reclaimed) or holds
//! the bytes of one row version / index entry. Storage layers materialize
//! pages into this form for the duration of a checksum call; the in-memory
//! backend and the tests build them directly.

use crate::visibility::VisibilityStamp;
use crate::{OffsetNumber, TupleLocation};

/// One row version in a heap page slot.
///
/// Superseded (deleted or updated-away) versions that have not been
/// reclaimed still occupy their slot and are represented here like live
/// ones — their integrity matters too. A *reclaimed* slot is `None` in the
/// page's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapSlot {
    bytes: Vec<u8>,
    header_len: usize,
    visibility: VisibilityStamp,
}

impl HeapSlot {
    /// Create a slot from a row's stored bytes (header followed by data).
    ///
    /// # Panics
    /// If `header_len` exceeds the byte length.
    #[must_use]
    pub fn new(bytes: Vec<u8>, header_len: usize, visibility: VisibilityStamp) -> Self {
        assert!(
            header_len <= bytes.len(),
            "row header length {header_len} exceeds row length {}",
            bytes.len()
        );
        Self {
            bytes,
            header_len,
            visibility,
        }
    }

    /// The full stored bytes: header plus data.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The data portion beyond the row header. May be empty.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.bytes[self.header_len..]
    }

    /// This version's visibility stamp.
    #[inline]
    #[must_use]
    pub const fn visibility(&self) -> VisibilityStamp {
        self.visibility
    }

    /// Replace the visibility stamp (e.g. when a version is superseded).
    pub fn set_visibility(&mut self, visibility: VisibilityStamp) {
        self.visibility = visibility;
    }
}

/// A heap page: slot directory of row versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeapPage {
    slots: Vec<Option<HeapSlot>>,
}

impl HeapPage {
    /// An empty page with no slots.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// The highest populated offset on this page (0 for an empty page).
    #[inline]
    #[must_use]
    pub fn max_offset(&self) -> u16 {
        self.slots.len() as u16
    }

    /// Look up a slot. Returns `None` for offsets outside the populated
    /// range and for reclaimed (unused) slots.
    #[must_use]
    pub fn slot(&self, offset: OffsetNumber) -> Option<&HeapSlot> {
        self.slots
            .get(usize::from(offset.get()) - 1)
            .and_then(Option::as_ref)
    }

    /// Mutable slot access, same range rules as [`Self::slot`].
    pub fn slot_mut(&mut self, offset: OffsetNumber) -> Option<&mut HeapSlot> {
        self.slots
            .get_mut(usize::from(offset.get()) - 1)
            .and_then(Option::as_mut)
    }

    /// Append a row version and return its offset.
    pub fn add_row(
        &mut self,
        bytes: Vec<u8>,
        header_len: usize,
        visibility: VisibilityStamp,
    ) -> OffsetNumber {
        self.slots
            .push(Some(HeapSlot::new(bytes, header_len, visibility)));
        OffsetNumber::new(self.slots.len() as u16).expect("slot directory is non-empty")
    }

    /// Reclaim a slot, leaving a hole in the directory. A later
    /// [`Self::place_row`] at the same offset models slot reuse.
    pub fn reclaim(&mut self, offset: OffsetNumber) {
        if let Some(s) = self.slots.get_mut(usize::from(offset.get()) - 1) {
            *s = None;
        }
    }

    /// Place a row version into a specific (previously reclaimed) slot.
    ///
    /// # Panics
    /// If the offset is outside the populated range.
    pub fn place_row(
        &mut self,
        offset: OffsetNumber,
        bytes: Vec<u8>,
        header_len: usize,
        visibility: VisibilityStamp,
    ) {
        let idx = usize::from(offset.get()) - 1;
        self.slots[idx] = Some(HeapSlot::new(bytes, header_len, visibility));
    }

    /// Iterate over `(offset, slot)` for every in-use slot.
    pub fn iter(&self) -> impl Iterator<Item = (OffsetNumber, &HeapSlot)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            let offset = OffsetNumber::new((i + 1) as u16)?;
            Some((offset, s.as_ref()?))
        })
    }
}

/// One index entry in an index page slot.
///
/// Index entries carry no visibility stamp. Entries known to point at
/// reclaimed rows are marked dead and excluded from checksums while they
/// await physical removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSlot {
    bytes: Vec<u8>,
    back_ref: Option<TupleLocation>,
    dead: bool,
}

impl IndexSlot {
    /// Create a live entry. `back_ref` is the referenced row location for
    /// back-reference-bearing index kinds, `None` otherwise.
    #[must_use]
    pub const fn new(bytes: Vec<u8>, back_ref: Option<TupleLocation>) -> Self {
        Self {
            bytes,
            back_ref,
            dead: false,
        }
    }

    /// The entry's raw bytes.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The referenced row location, if this index kind carries one.
    #[inline]
    #[must_use]
    pub const fn back_ref(&self) -> Option<TupleLocation> {
        self.back_ref
    }

    /// Whether the entry is marked dead.
    #[inline]
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.dead
    }
}

/// An index page: slot directory of index entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexPage {
    slots: Vec<Option<IndexSlot>>,
}

impl IndexPage {
    /// An empty page with no slots.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// The highest populated offset on this page (0 for an empty page).
    #[inline]
    #[must_use]
    pub fn max_offset(&self) -> u16 {
        self.slots.len() as u16
    }

    /// Look up a slot. Returns `None` for offsets outside the populated
    /// range and for unused slots; dead entries are returned (callers
    /// check [`IndexSlot::is_dead`]).
    #[must_use]
    pub fn slot(&self, offset: OffsetNumber) -> Option<&IndexSlot> {
        self.slots
            .get(usize::from(offset.get()) - 1)
            .and_then(Option::as_ref)
    }

    /// Append a live entry and return its offset.
    pub fn add_entry(&mut self, bytes: Vec<u8>, back_ref: Option<TupleLocation>) -> OffsetNumber {
        self.slots.push(Some(IndexSlot::new(bytes, back_ref)));
        OffsetNumber::new(self.slots.len() as u16).expect("slot directory is non-empty")
    }

    /// Place a live entry into a specific slot, replacing whatever was
    /// there. Models in-place update and slot reuse.
    ///
    /// # Panics
    /// If the offset is outside the populated range.
    pub fn place_entry(
        &mut self,
        offset: OffsetNumber,
        bytes: Vec<u8>,
        back_ref: Option<TupleLocation>,
    ) {
        let idx = usize::from(offset.get()) - 1;
        self.slots[idx] = Some(IndexSlot::new(bytes, back_ref));
    }

    /// Mark an entry dead. Dead entries stay in the directory but drop out
    /// of every checksum.
    pub fn kill_entry(&mut self, offset: OffsetNumber) {
        if let Some(Some(slot)) = self.slots.get_mut(usize::from(offset.get()) - 1) {
            slot.dead = true;
        }
    }

    /// Physically remove an entry, leaving the slot unused.
    pub fn remove_entry(&mut self, offset: OffsetNumber) {
        if let Some(s) = self.slots.get_mut(usize::from(offset.get()) - 1) {
            *s = None;
        }
    }

    /// Iterate over `(offset, slot)` for every in-use slot, dead included.
    pub fn iter(&self) -> impl Iterator<Item = (OffsetNumber, &IndexSlot)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            let offset = OffsetNumber::new((i + 1) as u16)?;
            Some((offset, s.as_ref()?))
        })
    }
}
