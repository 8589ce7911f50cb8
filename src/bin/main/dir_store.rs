use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use log::debug;
use sensorface_core::files::FileStore;

/// One host file per record, all under a single directory.
pub(super) struct DirFileStore {
    root: PathBuf,
}

impl DirFileStore {
    pub(super) fn open(root: &Path) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl FileStore for DirFileStore {
    type Error = io::Error;

    fn file_size(&mut self, name: &str) -> Result<Option<usize>, Self::Error> {
        match fs::metadata(self.path(name)) {
            Ok(meta) => Ok(Some(meta.len() as usize)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn read_file(&mut self, name: &str, buf: &mut [u8]) -> Result<(), Self::Error> {
        fs::File::open(self.path(name))?.read_exact(buf)
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), Self::Error> {
        let path = self.path(name);
        debug!("writing {} bytes to {}", data.len(), path.display());
        fs::write(path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_has_no_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirFileStore::open(dir.path()).unwrap();
        assert_eq!(store.file_size("quiet_time.bin").unwrap(), None);
    }

    #[test]
    fn open_creates_nested_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data").join("watch");

        let mut store = DirFileStore::open(&root).unwrap();
        store.write_file("quiet_time.bin", &[2, 8, 0x7F]).unwrap();

        assert!(root.join("quiet_time.bin").is_file());
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirFileStore::open(dir.path()).unwrap();
        store.write_file("quiet_time.bin", &[2, 8, 0x7F]).unwrap();

        assert_eq!(store.file_size("quiet_time.bin").unwrap(), Some(3));
        let mut buf = [0u8; 3];
        store.read_file("quiet_time.bin", &mut buf).unwrap();
        assert_eq!(buf, [2, 8, 0x7F]);
    }
}
