use heapless::{String, Vec};

use super::FileStore;

pub const MEMORY_MAX_FILES: usize = 4;
pub const MEMORY_NAME_BYTES: usize = 24;
pub const MEMORY_RECORD_BYTES: usize = 64;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MemoryStoreError {
    NotFound,
    NameTooLong,
    RecordTooLarge,
    Full,
    ShortRecord,
}

#[derive(Debug, Clone)]
struct Entry {
    name: String<MEMORY_NAME_BYTES>,
    data: Vec<u8, MEMORY_RECORD_BYTES>,
}

/// RAM-backed store used during bring-up and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
    entries: Vec<Entry, MEMORY_MAX_FILES>,
    writes: usize,
}

impl MemoryFileStore {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            writes: 0,
        }
    }

    /// Number of successful writes since construction.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn contents(&self, name: &str) -> Option<&[u8]> {
        self.find(name).map(|entry| entry.data.as_slice())
    }

    fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name.as_str() == name)
    }
}

impl FileStore for MemoryFileStore {
    type Error = MemoryStoreError;

    fn file_size(&mut self, name: &str) -> Result<Option<usize>, Self::Error> {
        Ok(self.find(name).map(|entry| entry.data.len()))
    }

    fn read_file(&mut self, name: &str, buf: &mut [u8]) -> Result<(), Self::Error> {
        let entry = self.find(name).ok_or(MemoryStoreError::NotFound)?;
        if entry.data.len() < buf.len() {
            return Err(MemoryStoreError::ShortRecord);
        }
        buf.copy_from_slice(&entry.data[..buf.len()]);
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), Self::Error> {
        let data = Vec::from_slice(data).map_err(|_| MemoryStoreError::RecordTooLarge)?;

        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.name.as_str() == name)
        {
            entry.data = data;
        } else {
            let mut owned = String::new();
            owned
                .push_str(name)
                .map_err(|_| MemoryStoreError::NameTooLong)?;
            self.entries
                .push(Entry { name: owned, data })
                .map_err(|_| MemoryStoreError::Full)?;
        }

        self.writes = self.writes.saturating_add(1);
        Ok(())
    }
}
