pub mod flash_file;
