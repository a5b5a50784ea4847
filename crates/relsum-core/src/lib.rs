//! The checksum composition engine.
//!
//! Turns typed values, row snapshots, index entries, and streams of
//! lower-level checksums into deterministic 32- and 64-bit fingerprints,
//! composed strictly bottom-up:
//!
//! ```text
//! mix → column / tuple / index entry → aggregate → database
//! ```
//!
//! Every function is a pure computation over caller-supplied bytes; the
//! only mutable structure is the [`AggregateState`] the caller threads
//! through one scan. Page access, locking, snapshot isolation, and type
//! resolution live behind the [`traits`] seams.

pub mod aggregate;
pub mod cancel;
pub mod column;
pub mod database;
pub mod index;
pub mod mem;
pub mod mix;
pub mod traits;
pub mod tuple;

pub use aggregate::{begin_aggregate, AggregateState, ContributionKind};
pub use cancel::CancelToken;
pub use column::{checksum_column, checksum_row_column};
pub use database::{
    run_database_checksum, ChecksumProgress, ScanOptions, CANCEL_CHECK_INTERVAL,
};
pub use index::{checksum_index, checksum_index_entry, checksum_index_page};
pub use mix::mix;
pub use traits::{
    CatalogSnapshot, ContainerRef, DecodedColumn, IndexContainer, RowContainer, RowDecoder,
    TypeCatalog,
};
pub use tuple::{checksum_table, checksum_tuple};
