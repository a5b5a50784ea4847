//! Tuple-level checksums.
//!
//! A tuple fingerprint binds a row version's bytes to its physical
//! location and (when the header is excluded) to its visibility stamp.
//! Identical rows in different slots, and identical bytes at different
//! lifecycle points, always fingerprint differently.

use relsum_error::Result;
use relsum_types::{BlockNumber, Fingerprint, HeapPage, OffsetNumber, TupleLocation};

use crate::aggregate::begin_aggregate;
use crate::mix::mix;
use crate::traits::RowContainer;

/// Compute the fingerprint of the row version in one page slot.
///
/// Returns [`Fingerprint::ZERO`] when the offset lies outside the page's
/// populated range, the slot has been reclaimed, or a header-excluded mix
/// would cover an empty span. Zero is a recognizable non-answer, distinct
/// from any computed checksum — callers probing slots speculatively must
/// not read it as "valid but empty".
///
/// The location seed `(block << 16) | offset` is applied twice: as the mix
/// seed and as a final XOR. Even if two locations mixed to the same
/// intermediate value, the final fingerprints still differ.
///
/// Superseded-but-unreclaimed versions are checksummed exactly like live
/// ones; their integrity matters until the slot is reclaimed.
#[must_use]
pub fn checksum_tuple(
    page: &HeapPage,
    offset: OffsetNumber,
    block: BlockNumber,
    include_header: bool,
) -> Fingerprint {
    let Some(slot) = page.slot(offset) else {
        return Fingerprint::ZERO;
    };

    let span = if include_header {
        slot.bytes()
    } else {
        let data = slot.data();
        if data.is_empty() {
            return Fingerprint::ZERO;
        }
        data
    };

    let seed = TupleLocation::new(block, offset).seed();
    let mut checksum = mix(span, seed) ^ seed;

    // With the header out of the mix, fold the visibility stamp in so two
    // content-identical versions of the same logical row still disagree. A
    // corrupted stamp is itself a corruption worth detecting.
    if !include_header {
        checksum ^= slot.visibility().mask();
    }

    // Tuple fingerprints must never collide with the null sentinel.
    Fingerprint(checksum).remap_null_collision(seed)
}

/// Fold every row version of a container into one 32-bit table
/// fingerprint (header excluded unless requested).
///
/// The XOR fold is commutative: scan order never affects the result.
pub fn checksum_table(container: &dyn RowContainer, include_header: bool) -> Result<Fingerprint> {
    let mut state = begin_aggregate();
    let blocks = container.block_count()?;
    for blkno in 0..blocks {
        let block = BlockNumber(blkno);
        let page = container.read_page(block)?;
        for (offset, _) in page.iter() {
            state.accumulate_entry(checksum_tuple(&page, offset, block, include_header));
        }
        state.note_page();
    }
    Ok(state.value32())
}
