//! Index-entry and index-page checksums.
//!
//! Structurally the tuple checksum minus visibility (index entries carry no
//! visibility stamp), plus an optional back-reference binding: for index
//! kinds whose entries point back at a row, the referenced location is
//! folded in so a stale or corrupted back-reference changes the
//! fingerprint independently of the entry's own key bytes.

use relsum_error::Result;
use relsum_types::{BlockNumber, Fingerprint, IndexPage, OffsetNumber, TupleLocation};

use crate::aggregate::begin_aggregate;
use crate::mix::mix;
use crate::traits::IndexContainer;

/// Compute the fingerprint of one index entry.
///
/// `position` is the entry's slot offset within its page, applied both as
/// mix seed and final XOR. `back_ref` is the referenced row location for
/// back-reference-bearing index kinds, `None` otherwise.
#[must_use]
pub fn checksum_index_entry(
    entry: &[u8],
    position: OffsetNumber,
    back_ref: Option<TupleLocation>,
) -> Fingerprint {
    let pos = u32::from(position.get());
    let mut checksum = mix(entry, pos) ^ pos;

    if let Some(target) = back_ref {
        checksum ^= target.block.get();
        checksum ^= u32::from(target.offset.get()) << 16;
    }

    // Index fingerprints must never collide with the null sentinel.
    Fingerprint(checksum).remap_null_collision(pos ^ entry.len() as u32)
}

/// Fold every live entry on one index page into a 32-bit page fingerprint.
///
/// Dead entries are excluded: they await physical removal and their
/// presence is not a property of the logical index content. The XOR fold
/// is commutative, so slot order does not matter; a page with no live
/// entries folds to zero.
#[must_use]
pub fn checksum_index_page(page: &IndexPage) -> Fingerprint {
    let mut acc = Fingerprint::ZERO;
    for (offset, slot) in page.iter() {
        if slot.is_dead() {
            continue;
        }
        acc ^= checksum_index_entry(slot.bytes(), offset, slot.back_ref());
    }
    acc
}

/// Fold every initialized page of an index into one 32-bit index
/// fingerprint. Uninitialized pages contribute nothing — they are skipped
/// entirely, not counted as zero-valued pages.
pub fn checksum_index(container: &dyn IndexContainer) -> Result<Fingerprint> {
    let mut state = begin_aggregate();
    let blocks = container.block_count()?;
    for blkno in 0..blocks {
        let Some(page) = container.read_page(BlockNumber(blkno))? else {
            continue;
        };
        state.accumulate_entry(checksum_index_page(&page));
        state.note_page();
    }
    Ok(state.value32())
}
