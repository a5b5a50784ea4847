//! Column-level checksums.
//!
//! A column fingerprint covers one typed value at one attribute position.
//! Null values produce the reserved [`NULL_MARK`] sentinel — this is the
//! only producer of that value in the engine — and every non-null path is
//! remapped away from it, so `fingerprint == NULL_MARK` always means "the
//! value was null", never "the value hashed unluckily".

use relsum_error::{ChecksumError, Result};
use relsum_types::{ColumnValue, Fingerprint, StorageEncoding, TypeId, TypeMod, NULL_MARK};

use crate::mix::mix;
use crate::traits::{RowDecoder, TypeCatalog};

/// Compute the fingerprint of a single column value.
///
/// `attnum` is the 1-based attribute position; it seeds the mix so that
/// equal values in different columns of the same row fingerprint
/// differently. The encoding class is resolved once through `catalog` and
/// dispatched as a closed enum:
///
/// - fixed-width inline: exactly the declared width of raw bytes
/// - variable-width: the full canonical decoded span, length header included
/// - null-terminated text: the string bytes, terminator excluded
/// - fixed-width out-of-line: the referenced buffer, which must be present
pub fn checksum_column(
    catalog: &dyn TypeCatalog,
    value: ColumnValue<'_>,
    type_id: TypeId,
    type_mod: TypeMod,
    attnum: u16,
) -> Result<Fingerprint> {
    let ColumnValue::Bytes(bytes) = value else {
        return Ok(NULL_MARK);
    };

    let seed = u32::from(attnum);
    let checksum = match catalog.resolve(type_id, type_mod)? {
        StorageEncoding::FixedInline { width } => {
            if bytes.len() < width {
                return Err(ChecksumError::invalid_encoding(format!(
                    "fixed-width type {type_id} declares {width} bytes but value has {}",
                    bytes.len()
                )));
            }
            mix(&bytes[..width], seed)
        }
        StorageEncoding::VarLen => mix(bytes, seed),
        StorageEncoding::CString => {
            let text = bytes.strip_suffix(&[0]).unwrap_or(bytes);
            mix(text, seed)
        }
        StorageEncoding::FixedRef { width } => {
            if bytes.is_empty() {
                return Err(ChecksumError::invalid_encoding(format!(
                    "missing out-of-line reference for fixed-width type {type_id}"
                )));
            }
            if bytes.len() < width {
                return Err(ChecksumError::invalid_encoding(format!(
                    "out-of-line buffer for type {type_id} holds {} bytes, expected {width}",
                    bytes.len()
                )));
            }
            mix(&bytes[..width], seed)
        }
    };

    // Non-null values must never collide with the null sentinel.
    Ok(Fingerprint(checksum).remap_null_collision(seed ^ type_id.get()))
}

/// Compute the fingerprint of one column extracted from a decoded row.
///
/// Validates `attnum` against the row descriptor (`InvalidPosition` for
/// zero, negative, or beyond-descriptor positions), then delegates to
/// [`checksum_column`].
pub fn checksum_row_column(
    catalog: &dyn TypeCatalog,
    row: &dyn RowDecoder,
    attnum: i32,
) -> Result<Fingerprint> {
    let natts = row.natts();
    if attnum <= 0 || attnum as usize > natts {
        return Err(ChecksumError::InvalidPosition { attnum, natts });
    }
    let attnum = attnum as u16;
    let col = row.column(attnum)?;
    checksum_column(catalog, col.value, col.type_id, col.type_mod, attnum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::{type_ids, MemRow, MemTypeCatalog};
    use proptest::prelude::*;

    fn catalog() -> MemTypeCatalog {
        MemTypeCatalog::with_builtins()
    }

    #[test]
    fn null_returns_the_sentinel() {
        let fp = checksum_column(
            &catalog(),
            ColumnValue::Null,
            type_ids::INT4,
            TypeMod::NONE,
            1,
        )
        .unwrap();
        assert_eq!(fp, NULL_MARK);
    }

    #[test]
    fn fixed_width_uses_declared_width() {
        let cat = catalog();
        // An 8-byte register holding a 4-byte value: only the declared
        // width participates.
        let a = checksum_column(
            &cat,
            ColumnValue::Bytes(&[1, 0, 0, 0, 0, 0, 0, 0]),
            type_ids::INT4,
            TypeMod::NONE,
            1,
        )
        .unwrap();
        let b = checksum_column(
            &cat,
            ColumnValue::Bytes(&[1, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]),
            type_ids::INT4,
            TypeMod::NONE,
            1,
        )
        .unwrap();
        assert_eq!(a, b);

        let short = checksum_column(
            &cat,
            ColumnValue::Bytes(&[1, 0]),
            type_ids::INT4,
            TypeMod::NONE,
            1,
        );
        assert!(matches!(short, Err(ChecksumError::InvalidEncoding { .. })));
    }

    #[test]
    fn position_disambiguates_equal_values() {
        let cat = catalog();
        let bytes = 42i32.to_le_bytes();
        let at1 = checksum_column(
            &cat,
            ColumnValue::Bytes(&bytes),
            type_ids::INT4,
            TypeMod::NONE,
            1,
        )
        .unwrap();
        let at2 = checksum_column(
            &cat,
            ColumnValue::Bytes(&bytes),
            type_ids::INT4,
            TypeMod::NONE,
            2,
        )
        .unwrap();
        assert_ne!(at1, at2);
    }

    #[test]
    fn cstring_ignores_the_terminator() {
        let cat = catalog();
        let with_nul = checksum_column(
            &cat,
            ColumnValue::Bytes(b"abc\0"),
            type_ids::CSTRING,
            TypeMod::NONE,
            1,
        )
        .unwrap();
        let without = checksum_column(
            &cat,
            ColumnValue::Bytes(b"abc"),
            type_ids::CSTRING,
            TypeMod::NONE,
            1,
        )
        .unwrap();
        assert_eq!(with_nul, without);
    }

    #[test]
    fn fixed_ref_requires_the_buffer() {
        let cat = catalog();
        let err = checksum_column(
            &cat,
            ColumnValue::Bytes(b""),
            type_ids::NAME,
            TypeMod::NONE,
            1,
        );
        assert!(matches!(err, Err(ChecksumError::InvalidEncoding { .. })));

        let buf = [7u8; 64];
        let ok = checksum_column(
            &cat,
            ColumnValue::Bytes(&buf),
            type_ids::NAME,
            TypeMod::NONE,
            1,
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn unknown_type_is_reported() {
        let err = checksum_column(
            &catalog(),
            ColumnValue::Bytes(&[0]),
            TypeId(999_999),
            TypeMod::NONE,
            1,
        );
        assert!(matches!(err, Err(ChecksumError::UnknownType { type_id }) if type_id == 999_999));
    }

    #[test]
    fn row_column_validates_position() {
        let cat = catalog();
        let mut row = MemRow::new();
        row.push_bytes(type_ids::INT4, 1i32.to_le_bytes().to_vec());
        row.push_null(type_ids::TEXT);

        assert!(matches!(
            checksum_row_column(&cat, &row, 0),
            Err(ChecksumError::InvalidPosition { attnum: 0, natts: 2 })
        ));
        assert!(matches!(
            checksum_row_column(&cat, &row, 3),
            Err(ChecksumError::InvalidPosition { attnum: 3, natts: 2 })
        ));
        assert!(matches!(
            checksum_row_column(&cat, &row, -1),
            Err(ChecksumError::InvalidPosition { .. })
        ));

        assert!(!checksum_row_column(&cat, &row, 1).unwrap().is_null_mark());
        assert_eq!(checksum_row_column(&cat, &row, 2).unwrap(), NULL_MARK);
    }

    proptest::proptest! {
        #![proptest_config(ProptestConfig::with_cases(2000))]

        /// No non-null value may ever produce the null sentinel, at any
        /// attribute position, for fixed- and variable-width encodings.
        #[test]
        fn non_null_never_hits_the_sentinel(
            data in proptest::collection::vec(any::<u8>(), 0..64),
            attnum in 1u16..=32,
        ) {
            let cat = catalog();
            let fp = checksum_column(
                &cat,
                ColumnValue::Bytes(&data),
                type_ids::TEXT,
                TypeMod::NONE,
                attnum,
            )
            .unwrap();
            prop_assert!(!fp.is_null_mark());

            if data.len() >= 8 {
                let fp = checksum_column(
                    &cat,
                    ColumnValue::Bytes(&data),
                    type_ids::INT8,
                    TypeMod::NONE,
                    attnum,
                )
                .unwrap();
                prop_assert!(!fp.is_null_mark());
            }
        }

        /// Equal inputs always produce equal fingerprints.
        #[test]
        fn deterministic(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let cat = catalog();
            let a = checksum_column(&cat, ColumnValue::Bytes(&data), type_ids::TEXT, TypeMod::NONE, 1).unwrap();
            let b = checksum_column(&cat, ColumnValue::Bytes(&data), type_ids::TEXT, TypeMod::NONE, 1).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
