//! Fingerprint values produced by the checksum engine.
//!
//! A fingerprint is an opaque integer with no byte-order contract beyond
//! "equal inputs produce equal output, platform-independently". It is not
//! cryptographically secure and offers only pairwise sensitivity to the
//! inputs that were mixed into it.

use std::fmt;
use std::ops::{BitXor, BitXorAssign};

/// The reserved fingerprint value meaning "the input was a null value".
///
/// Exclusively produced by the column checksum for null inputs; every other
/// fingerprint-producing path remaps away from this value.
pub const NULL_MARK: Fingerprint = Fingerprint(0xFFFF_FFFF);

/// A 32-bit fingerprint: column, tuple, index-entry, table, and index
/// granularity.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(transparent)]
pub struct Fingerprint(pub u32);

impl Fingerprint {
    /// The zero fingerprint. Returned for invalid or unused slots and as the
    /// empty-aggregate identity; never a computed checksum of actual content.
    pub const ZERO: Self = Self(0);

    /// Get the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this is the reserved null sentinel.
    #[inline]
    #[must_use]
    pub const fn is_null_mark(self) -> bool {
        self.0 == NULL_MARK.0
    }

    /// Whether this is the zero fingerprint.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Remap a fingerprint that collided with [`NULL_MARK`].
    ///
    /// XORs in the caller's disambiguation context and clears the low bit,
    /// so the result is deterministic, reproducible for identical inputs,
    /// and can never equal the all-ones sentinel. Callers apply this as the
    /// explicit final step of every fingerprint-producing function.
    #[inline]
    #[must_use]
    pub const fn remap_null_collision(self, context: u32) -> Self {
        if self.0 == NULL_MARK.0 {
            Self((NULL_MARK.0 ^ context) & 0xFFFF_FFFE)
        } else {
            self
        }
    }
}

impl BitXor for Fingerprint {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Fingerprint {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// A 64-bit fingerprint: whole-database granularity.
///
/// The high and low halves carry per-entry fingerprints and container salts
/// at positions chosen so row and index contributions cannot alias.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(transparent)]
pub struct Fingerprint64(pub u64);

impl Fingerprint64 {
    /// The empty-aggregate identity.
    pub const ZERO: Self = Self(0);

    /// Get the raw u64 value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl BitXor for Fingerprint64 {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Fingerprint64 {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl fmt::Display for Fingerprint64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_mark_is_all_ones() {
        assert_eq!(NULL_MARK.get(), 0xFFFF_FFFF);
        assert!(NULL_MARK.is_null_mark());
        assert!(!Fingerprint::ZERO.is_null_mark());
    }

    #[test]
    fn remap_only_touches_the_sentinel() {
        let fp = Fingerprint(0xDEAD_BEEF);
        assert_eq!(fp.remap_null_collision(42), fp);

        let remapped = NULL_MARK.remap_null_collision(42);
        assert!(!remapped.is_null_mark());
        // Low bit is cleared, so the result can never be all-ones.
        assert_eq!(remapped.get() & 1, 0);
        // Deterministic for identical inputs.
        assert_eq!(remapped, NULL_MARK.remap_null_collision(42));
        // Different contexts disambiguate differently.
        assert_ne!(remapped, NULL_MARK.remap_null_collision(43));
    }

    #[test]
    fn xor_is_self_inverse() {
        let a = Fingerprint(0x1234_5678);
        let b = Fingerprint(0x9ABC_DEF0);
        assert_eq!(a ^ b ^ b, a);

        let mut acc = Fingerprint64::ZERO;
        acc ^= Fingerprint64(77);
        acc ^= Fingerprint64(77);
        assert_eq!(acc, Fingerprint64::ZERO);
    }

    #[test]
    fn display_is_fixed_width_hex() {
        assert_eq!(Fingerprint(0xAB).to_string(), "000000ab");
        assert_eq!(Fingerprint64(0xAB).to_string(), "00000000000000ab");
    }
}
