//! Named-record persistence backend.

mod memory;

pub use memory::{MemoryFileStore, MemoryStoreError};

/// Byte-exact storage of small records keyed by a logical file name.
///
/// A record's size is the only integrity signal callers get.
pub trait FileStore {
    type Error: core::fmt::Debug;

    /// `None` when no record with this name exists.
    fn file_size(&mut self, name: &str) -> Result<Option<usize>, Self::Error>;
    /// Fills `buf` from the start of the record.
    fn read_file(&mut self, name: &str, buf: &mut [u8]) -> Result<(), Self::Error>;
    /// Replaces the record with exactly `data`.
    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), Self::Error>;
}
