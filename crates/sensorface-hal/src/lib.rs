#![cfg_attr(not(test), no_std)]

//! Board glue for sensorface: persistent storage on raw NOR flash.

pub mod storage;

pub use storage::flash_file::{FlashFileError, FlashFileStore};
