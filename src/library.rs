//! Folder scanning for playable audio files.

mod scan;

pub use scan::{ScanError, scan_folder};

#[cfg(test)]
mod tests;
