//! Database-level checksum orchestration.
//!
//! Enumerates every container in a catalog snapshot, applies the inclusion
//! filters, and folds per-entry fingerprints into one 64-bit database
//! fingerprint. Authorization for running this (it reads every durable
//! container) is the binding layer's responsibility, not the engine's.

use tracing::{debug, trace, warn};

use relsum_error::Result;
use relsum_types::{BlockNumber, ContainerId, ContainerKind, Fingerprint64, Persistence};

use crate::aggregate::{begin_aggregate, AggregateState, ContributionKind};
use crate::cancel::CancelToken;
use crate::index::checksum_index_entry;
use crate::traits::{CatalogSnapshot, ContainerRef, IndexContainer, RowContainer};
use crate::tuple::checksum_tuple;

/// Pages between cooperative cancellation checks. Periodic rather than
/// per-entry to bound checking overhead.
pub const CANCEL_CHECK_INTERVAL: u32 = 64;

/// Inclusion filters for a database-level scan.
///
/// Transient (unlogged/temporary) containers are always excluded; these
/// options only widen the durable set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Include system-namespace containers.
    pub include_system: bool,
    /// Include toast (out-of-line value) containers.
    pub include_toast: bool,
}

/// Snapshot of scan progress, delivered after each container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumProgress {
    /// Container just finished.
    pub container: ContainerId,
    pub kind: ContainerKind,
    /// Entries folded so far across the whole scan.
    pub entries_seen: u64,
    /// Pages processed so far across the whole scan.
    pub pages_seen: u64,
}

/// Compute the 64-bit fingerprint of an entire database.
///
/// Drives a snapshot-consistent scan over every included container: row
/// containers contribute header-excluded tuple fingerprints, indexes
/// contribute live-entry fingerprints, each salted with its container id
/// (at mirrored bit positions, see
/// [`ContributionKind`](crate::aggregate::ContributionKind)). Scan order
/// never affects the result.
///
/// `progress` fires after each container. Cancellation is checked between
/// containers and every [`CANCEL_CHECK_INTERVAL`] pages; observing it
/// returns `Cancelled` with the partial aggregate discarded.
pub fn run_database_checksum(
    catalog: &dyn CatalogSnapshot,
    options: ScanOptions,
    mut progress: Option<&mut dyn FnMut(&ChecksumProgress)>,
    cancel: &CancelToken,
) -> Result<Fingerprint64> {
    let mut state = begin_aggregate();

    for meta in catalog.containers()? {
        if !options.include_system && meta.is_system {
            continue;
        }
        if !options.include_toast && meta.kind == ContainerKind::Toast {
            continue;
        }
        if meta.persistence == Persistence::Transient {
            continue;
        }

        match (meta.kind, catalog.open(meta.id)?) {
            (kind, ContainerRef::Rows(rows)) if kind.holds_rows() => {
                scan_row_container(rows, &mut state, cancel)?;
            }
            (ContainerKind::Index, ContainerRef::Index(index)) => {
                scan_index_container(index, &mut state, cancel)?;
            }
            (kind, _) => {
                // Views, foreign containers, or a catalog/container kind
                // mismatch: skipped, not failed.
                warn!(container = %meta.id, kind = %kind, "skipping unsupported container");
                continue;
            }
        }

        debug!(
            container = %meta.id,
            kind = %meta.kind,
            entries = state.entries_seen(),
            pages = state.pages_seen(),
            "container checksummed"
        );

        if let Some(cb) = progress.as_deref_mut() {
            cb(&ChecksumProgress {
                container: meta.id,
                kind: meta.kind,
                entries_seen: state.entries_seen(),
                pages_seen: state.pages_seen(),
            });
        }

        cancel.checkpoint()?;
    }

    Ok(state.value())
}

fn scan_row_container(
    container: &dyn RowContainer,
    state: &mut AggregateState,
    cancel: &CancelToken,
) -> Result<()> {
    let salt = container.id();
    let blocks = container.block_count()?;
    for blkno in 0..blocks {
        let block = BlockNumber(blkno);
        let page = container.read_page(block)?;
        for (offset, _) in page.iter() {
            let fp = checksum_tuple(&page, offset, block, false);
            state.accumulate_wide(fp, salt, ContributionKind::Rows);
        }
        state.note_page();
        trace!(container = %salt, block = blkno, "row page folded");

        if blkno % CANCEL_CHECK_INTERVAL == 0 {
            cancel.checkpoint()?;
        }
    }
    Ok(())
}

fn scan_index_container(
    container: &dyn IndexContainer,
    state: &mut AggregateState,
    cancel: &CancelToken,
) -> Result<()> {
    let salt = container.id();
    let blocks = container.block_count()?;
    for blkno in 0..blocks {
        let block = BlockNumber(blkno);
        // Uninitialized pages contribute nothing and are not counted.
        let Some(page) = container.read_page(block)? else {
            continue;
        };
        for (offset, slot) in page.iter() {
            if slot.is_dead() {
                continue;
            }
            let fp = checksum_index_entry(slot.bytes(), offset, slot.back_ref());
            state.accumulate_wide(fp, salt, ContributionKind::IndexEntries);
        }
        state.note_page();
        trace!(container = %salt, block = blkno, "index page folded");

        if blkno % CANCEL_CHECK_INTERVAL == 0 {
            cancel.checkpoint()?;
        }
    }
    Ok(())
}
