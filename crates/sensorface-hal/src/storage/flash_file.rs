//! Named records on raw NOR flash, one erase sector per record.
//!
//! Slot image (little endian):
//!
//! | bytes | field |
//! |---|---|
//! | 0..4 | magic |
//! | 4 | version |
//! | 5 | name length |
//! | 6..8 | data length |
//! | 8..24 | name, `0xFF` padded |
//! | 24.. | data, then an FNV-1a checksum over everything before it |

use embedded_storage::nor_flash::{NorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash};
use log::{debug, warn};
use sensorface_core::files::FileStore;

/// Bytes of each erase sector actually used by a record.
pub const SLOT_BYTES: usize = 256;
pub const MAX_SLOTS: usize = 8;
pub const MAX_NAME_BYTES: usize = 16;
pub const MAX_RECORD_BYTES: usize = SLOT_BYTES - HEADER_LEN - CHECKSUM_LEN;

const FILE_MAGIC: u32 = 0x3146_4653; // "SFF1"
const FILE_VERSION: u8 = 1;
const NAME_OFFSET: usize = 8;
const HEADER_LEN: usize = NAME_OFFSET + MAX_NAME_BYTES;
const CHECKSUM_LEN: usize = 4;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FlashFileError {
    Flash(NorFlashErrorKind),
    /// Sector geometry cannot hold a slot image.
    Unsupported,
    RegionOutOfBounds,
    NotFound,
    NameTooLong,
    RecordTooLarge,
    Full,
    ShortRecord,
}

fn flash_error<E: NorFlashError>(err: E) -> FlashFileError {
    FlashFileError::Flash(err.kind())
}

pub struct FlashFileStore<F: NorFlash> {
    flash: F,
    region_start: u32,
    slots: usize,
}

impl<F: NorFlash> FlashFileStore<F> {
    /// Uses `slots` consecutive erase sectors starting at `region_start`.
    pub fn new(flash: F, region_start: u32, slots: usize) -> Result<Self, FlashFileError> {
        if F::ERASE_SIZE < SLOT_BYTES
            || SLOT_BYTES % F::WRITE_SIZE != 0
            || SLOT_BYTES % F::READ_SIZE != 0
        {
            return Err(FlashFileError::Unsupported);
        }
        if slots == 0 || slots > MAX_SLOTS || region_start as usize % F::ERASE_SIZE != 0 {
            return Err(FlashFileError::RegionOutOfBounds);
        }
        let region_end = region_start as usize + slots * F::ERASE_SIZE;
        if region_end > flash.capacity() {
            return Err(FlashFileError::RegionOutOfBounds);
        }

        Ok(Self {
            flash,
            region_start,
            slots,
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Hands the flash back, e.g. to reopen the region later.
    pub fn release(self) -> F {
        self.flash
    }

    fn slot_offset(&self, slot: usize) -> u32 {
        self.region_start + (slot * F::ERASE_SIZE) as u32
    }

    fn read_slot(
        &mut self,
        slot: usize,
        image: &mut [u8; SLOT_BYTES],
    ) -> Result<(), FlashFileError> {
        let offset = self.slot_offset(slot);
        self.flash.read(offset, image).map_err(flash_error)
    }

    /// Index of the slot holding `name`; its image is left in `image`.
    fn find(
        &mut self,
        name: &str,
        image: &mut [u8; SLOT_BYTES],
    ) -> Result<Option<usize>, FlashFileError> {
        for slot in 0..self.slots {
            self.read_slot(slot, image)?;
            if decode(image).is_some_and(|record| record.name == name.as_bytes()) {
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }

    fn free_slot(&mut self) -> Result<Option<usize>, FlashFileError> {
        let mut image = [0u8; SLOT_BYTES];
        for slot in 0..self.slots {
            self.read_slot(slot, &mut image)?;
            if decode(&image).is_none() {
                return Ok(Some(slot));
            }
        }
        Ok(None)
    }
}

impl<F: NorFlash> FileStore for FlashFileStore<F> {
    type Error = FlashFileError;

    fn file_size(&mut self, name: &str) -> Result<Option<usize>, Self::Error> {
        let mut image = [0u8; SLOT_BYTES];
        Ok(self
            .find(name, &mut image)?
            .and_then(|_| decode(&image))
            .map(|record| record.data.len()))
    }

    fn read_file(&mut self, name: &str, buf: &mut [u8]) -> Result<(), Self::Error> {
        let mut image = [0u8; SLOT_BYTES];
        self.find(name, &mut image)?
            .ok_or(FlashFileError::NotFound)?;
        let record = decode(&image).ok_or(FlashFileError::NotFound)?;
        if record.data.len() < buf.len() {
            return Err(FlashFileError::ShortRecord);
        }
        buf.copy_from_slice(&record.data[..buf.len()]);
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), Self::Error> {
        if name.len() > MAX_NAME_BYTES {
            return Err(FlashFileError::NameTooLong);
        }
        if data.len() > MAX_RECORD_BYTES {
            return Err(FlashFileError::RecordTooLarge);
        }

        let mut image = [0u8; SLOT_BYTES];
        let slot = match self.find(name, &mut image)? {
            Some(slot) => slot,
            None => self.free_slot()?.ok_or(FlashFileError::Full)?,
        };

        let image = encode(name, data);
        let offset = self.slot_offset(slot);
        self.flash
            .erase(offset, offset + F::ERASE_SIZE as u32)
            .map_err(flash_error)?;
        self.flash.write(offset, &image).map_err(flash_error)?;
        debug!("flash record {} ({} bytes) -> slot {}", name, data.len(), slot);
        Ok(())
    }
}

struct Record<'a> {
    name: &'a [u8],
    data: &'a [u8],
}

fn encode(name: &str, data: &[u8]) -> [u8; SLOT_BYTES] {
    let mut image = [0xFFu8; SLOT_BYTES];
    image[0..4].copy_from_slice(&FILE_MAGIC.to_le_bytes());
    image[4] = FILE_VERSION;
    image[5] = name.len() as u8;
    image[6..8].copy_from_slice(&(data.len() as u16).to_le_bytes());
    image[NAME_OFFSET..NAME_OFFSET + name.len()].copy_from_slice(name.as_bytes());

    let data_end = HEADER_LEN + data.len();
    image[HEADER_LEN..data_end].copy_from_slice(data);
    let checksum = checksum32(&image[..data_end]);
    image[data_end..data_end + CHECKSUM_LEN].copy_from_slice(&checksum.to_le_bytes());
    image
}

/// `None` for erased, foreign or corrupted slots.
fn decode(image: &[u8; SLOT_BYTES]) -> Option<Record<'_>> {
    let magic = u32::from_le_bytes([image[0], image[1], image[2], image[3]]);
    if magic != FILE_MAGIC {
        return None;
    }
    if image[4] != FILE_VERSION {
        warn!("flash record version {} not understood", image[4]);
        return None;
    }

    let name_len = image[5] as usize;
    let data_len = u16::from_le_bytes([image[6], image[7]]) as usize;
    if name_len > MAX_NAME_BYTES || data_len > MAX_RECORD_BYTES {
        warn!("flash record header out of range");
        return None;
    }

    let data_end = HEADER_LEN + data_len;
    let stored = u32::from_le_bytes([
        image[data_end],
        image[data_end + 1],
        image[data_end + 2],
        image[data_end + 3],
    ]);
    if stored != checksum32(&image[..data_end]) {
        warn!("flash record checksum mismatch");
        return None;
    }

    Some(Record {
        name: &image[NAME_OFFSET..NAME_OFFSET + name_len],
        data: &image[HEADER_LEN..data_end],
    })
}

fn checksum32(bytes: &[u8]) -> u32 {
    let mut hash = 0x811C9DC5u32;
    for b in bytes {
        hash ^= *b as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash
}
