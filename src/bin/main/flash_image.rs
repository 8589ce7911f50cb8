use std::{
    fs, io,
    path::{Path, PathBuf},
};

use embedded_storage::nor_flash::{
    ErrorType, NorFlash, NorFlashErrorKind, ReadNorFlash, check_erase, check_read, check_write,
};
use log::{info, warn};

pub(super) const SECTOR_SIZE: usize = 4096;
pub(super) const SECTOR_COUNT: usize = 4;

/// NOR flash emulated by an image file. Every erase or write is flushed.
pub(super) struct FlashImage {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl FlashImage {
    pub(super) fn open(path: &Path) -> io::Result<Self> {
        let capacity = SECTOR_SIZE * SECTOR_COUNT;
        let bytes = match fs::read(path) {
            Ok(mut bytes) => {
                if bytes.len() != capacity {
                    warn!(
                        "flash image {} is {} bytes, resizing to {}",
                        path.display(),
                        bytes.len(),
                        capacity
                    );
                    bytes.resize(capacity, 0xFF);
                }
                bytes
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("creating blank flash image {}", path.display());
                vec![0xFF; capacity]
            }
            Err(err) => return Err(err),
        };

        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    fn flush(&self) -> Result<(), NorFlashErrorKind> {
        fs::write(&self.path, &self.bytes).map_err(|err| {
            warn!("flash image flush failed: {err}");
            NorFlashErrorKind::Other
        })
    }
}

impl ErrorType for FlashImage {
    type Error = NorFlashErrorKind;
}

impl ReadNorFlash for FlashImage {
    const READ_SIZE: usize = 1;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        check_read(self, offset, bytes.len())?;
        let start = offset as usize;
        bytes.copy_from_slice(&self.bytes[start..start + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl NorFlash for FlashImage {
    const WRITE_SIZE: usize = 4;
    const ERASE_SIZE: usize = SECTOR_SIZE;

    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
        check_erase(self, from, to)?;
        self.bytes[from as usize..to as usize].fill(0xFF);
        self.flush()
    }

    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        check_write(self, offset, bytes.len())?;
        for (cell, byte) in self.bytes[offset as usize..].iter_mut().zip(bytes) {
            *cell &= *byte;
        }
        self.flush()
    }
}
