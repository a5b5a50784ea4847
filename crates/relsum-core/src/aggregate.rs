//! Commutative checksum aggregation.
//!
//! Per-entry fingerprints combine by XOR, so any scan order over the same
//! entry set yields the same aggregate, the empty aggregate is the
//! identity `0`, and re-accumulating an entry cancels it out. The last
//! point is an accepted limitation, not a bug: the aggregate detects set
//! changes, not multiplicity changes that happen to cancel.

use relsum_types::{ContainerId, Fingerprint, Fingerprint64};

/// Which kind of container an entry came from.
///
/// Row and index contributions occupy mirrored bit positions in the 64-bit
/// aggregate (fingerprint high/salt low vs. salt high/fingerprint low), so
/// a row fingerprint and an index fingerprint over the same container can
/// never alias or cancel each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionKind {
    Rows,
    IndexEntries,
}

/// Accumulator threaded through one scan.
///
/// Mutated monotonically, never reset mid-scan, and owned exclusively by
/// the caller driving that scan; concurrent scans each carry their own
/// state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateState {
    checksum: u64,
    entries_seen: u64,
    pages_seen: u64,
}

impl AggregateState {
    /// 32-bit fold for table- and index-level aggregation.
    pub fn accumulate_entry(&mut self, fingerprint: Fingerprint) {
        self.checksum ^= u64::from(fingerprint.get());
        self.entries_seen += 1;
    }

    /// 64-bit salted fold for database-level aggregation.
    ///
    /// The container salt makes identical entry sets in different
    /// containers disagree.
    pub fn accumulate_wide(
        &mut self,
        fingerprint: Fingerprint,
        salt: ContainerId,
        kind: ContributionKind,
    ) {
        let fp = u64::from(fingerprint.get());
        let salt = u64::from(salt.get());
        self.checksum ^= match kind {
            ContributionKind::Rows => (fp << 32) | salt,
            ContributionKind::IndexEntries => (salt << 32) | fp,
        };
        self.entries_seen += 1;
    }

    /// Record one processed page.
    pub fn note_page(&mut self) {
        self.pages_seen += 1;
    }

    /// The aggregate as a 32-bit fingerprint (table/index level; only
    /// meaningful after exclusively 32-bit folds).
    #[must_use]
    pub const fn value32(&self) -> Fingerprint {
        Fingerprint(self.checksum as u32)
    }

    /// The aggregate as a 64-bit fingerprint (database level).
    #[must_use]
    pub const fn value(&self) -> Fingerprint64 {
        Fingerprint64(self.checksum)
    }

    /// Entries folded so far.
    #[must_use]
    pub const fn entries_seen(&self) -> u64 {
        self.entries_seen
    }

    /// Pages processed so far.
    #[must_use]
    pub const fn pages_seen(&self) -> u64 {
        self.pages_seen
    }
}

/// Begin a fresh aggregate: all fields zero.
#[must_use]
pub fn begin_aggregate() -> AggregateState {
    AggregateState::default()
}
