//! Error types for the relsum checksum engine.
//!
//! One structured error enum for the whole workspace: variants carry the
//! fields a caller needs to react (type ids, positions, container kinds)
//! rather than pre-formatted strings. Storage-layer failures are wrapped
//! and propagated unchanged; the engine never retries internally.

use thiserror::Error;

/// Primary error type for checksum operations.
#[derive(Error, Debug)]
pub enum ChecksumError {
    /// Type metadata could not be resolved by the catalog.
    #[error("cache lookup failed for type {type_id}")]
    UnknownType { type_id: u32 },

    /// The declared storage encoding is inconsistent with the actual bytes,
    /// e.g. a fixed-width value shorter than its declared width or a missing
    /// out-of-line reference.
    #[error("invalid encoding: {detail}")]
    InvalidEncoding { detail: String },

    /// Column position outside the row descriptor.
    ///
    /// Note that tuple *slot* misses are not errors: callers probe slot
    /// offsets speculatively, so an out-of-range slot yields a zero
    /// fingerprint instead.
    #[error("invalid attribute number {attnum} (row has {natts} attributes)")]
    InvalidPosition { attnum: i32, natts: usize },

    /// Container kind not modeled by the engine. The orchestrator skips
    /// these rather than failing the scan.
    #[error("unsupported container kind: {kind}")]
    Unsupported { kind: String },

    /// Failure in the external storage layer, propagated unchanged.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A cooperative cancellation request was observed mid-scan.
    #[error("checksum scan cancelled")]
    Cancelled,
}

impl ChecksumError {
    /// Create an `InvalidEncoding` error.
    pub fn invalid_encoding(detail: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            detail: detail.into(),
        }
    }

    /// Create an `Unsupported` error.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::Unsupported { kind: kind.into() }
    }

    /// Wrap an external storage-layer failure.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(source))
    }

    /// Whether this error reflects bad caller input, as opposed to an
    /// infrastructure failure. Binding layers use this to pick between
    /// "input error" and "infrastructure error" reporting.
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownType { .. } | Self::InvalidEncoding { .. } | Self::InvalidPosition { .. }
        )
    }
}

/// Result type alias using `ChecksumError`.
pub type Result<T> = std::result::Result<T, ChecksumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ChecksumError::UnknownType { type_id: 25 };
        assert_eq!(err.to_string(), "cache lookup failed for type 25");

        let err = ChecksumError::InvalidPosition { attnum: 4, natts: 3 };
        assert_eq!(
            err.to_string(),
            "invalid attribute number 4 (row has 3 attributes)"
        );
    }

    #[test]
    fn constructors() {
        let err = ChecksumError::invalid_encoding("missing out-of-line reference");
        assert!(matches!(err, ChecksumError::InvalidEncoding { .. }));

        let err = ChecksumError::unsupported("foreign table");
        assert!(matches!(err, ChecksumError::Unsupported { kind } if kind == "foreign table"));
    }

    #[test]
    fn storage_wrapping_preserves_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "page read failed");
        let err = ChecksumError::storage(io_err);
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_input_error());
    }

    #[test]
    fn input_error_classification() {
        assert!(ChecksumError::UnknownType { type_id: 1 }.is_input_error());
        assert!(ChecksumError::InvalidPosition { attnum: 0, natts: 2 }.is_input_error());
        assert!(!ChecksumError::Cancelled.is_input_error());
        assert!(!ChecksumError::unsupported("view").is_input_error());
    }
}
