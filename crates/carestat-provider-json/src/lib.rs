//! JSONL item source for carestat
//!
//! This crate implements the item-source traits over a directory of `.jsonl`
//! files, handling file discovery, parallel parsing, and conversion of raw
//! records into domain items.

pub mod data_loader;
pub mod records;

#[cfg(test)]
pub mod test_utils;

pub use data_loader::{DATA_PATH_ENV, JsonlSource};
