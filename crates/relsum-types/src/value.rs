//! Typed column values and their storage encoding classes.
//!
//! The engine is type-polymorphic over an open set of logical types but a
//! *closed* set of storage encodings: every type the catalog can resolve
//! falls into one of four encoding classes, resolved once per type lookup
//! and dispatched as a tagged enum rather than per-value conditionals.

use std::fmt;

/// Identifier of a logical type in the external catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Get the raw u32 value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type modifier (e.g. declared precision or length limit).
///
/// Carried through for catalog resolution; [`TypeMod::NONE`] means the type
/// was declared without a modifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct TypeMod(pub i32);

impl TypeMod {
    /// No modifier.
    pub const NONE: Self = Self(-1);
}

/// The storage encoding class of a resolved type.
///
/// Exactly four variants; the catalog maps every resolvable [`TypeId`] to
/// one of them and the column checksum dispatches on the variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum StorageEncoding {
    /// Fixed-width value stored inline; exactly `width` bytes are mixed.
    FixedInline { width: usize },
    /// Variable-width value with a length header. Any out-of-line or
    /// compressed representation has already been resolved to its canonical
    /// decoded span by the storage layer before it reaches the engine.
    VarLen,
    /// Null-terminated text; the terminator is excluded from the mix.
    CString,
    /// Fixed-width value stored out of line; the referenced buffer must be
    /// present and at least `width` bytes long.
    FixedRef { width: usize },
}

/// A single column value as handed to the checksum engine: either null or a
/// borrowed byte span. Owned by the caller (the row decoder) and valid for
/// the duration of one checksum call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnValue<'a> {
    /// SQL NULL.
    Null,
    /// The value's raw bytes in its storage encoding.
    Bytes(&'a [u8]),
}

impl ColumnValue<'_> {
    /// Whether this value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_a_closed_set() {
        // Width travels with the variant, so dispatch needs no second
        // catalog lookup.
        let enc = StorageEncoding::FixedInline { width: 4 };
        match enc {
            StorageEncoding::FixedInline { width } => assert_eq!(width, 4),
            _ => unreachable!(),
        }
    }

    #[test]
    fn null_detection() {
        assert!(ColumnValue::Null.is_null());
        assert!(!ColumnValue::Bytes(b"abc").is_null());
        assert!(!ColumnValue::Bytes(b"").is_null());
    }
}
