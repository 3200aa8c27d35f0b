//! File probing utilities for the content filter.

use std::fs;
use std::io::Read;
use std::path::Path;

/// Number of leading bytes inspected when deciding whether a file is binary.
pub const BINARY_SAMPLE_SIZE: usize = 1024;

/// Check if a file looks binary: any NUL byte in its first KiB.
///
/// Files that cannot be opened are reported as not binary; reading them
/// later fails on its own.
pub fn is_binary_file(path: &Path) -> bool {
    let Ok(file) = fs::File::open(path) else {
        return false;
    };

    let mut buffer = Vec::with_capacity(BINARY_SAMPLE_SIZE);
    match file.take(BINARY_SAMPLE_SIZE as u64).read_to_end(&mut buffer) {
        Ok(_) => buffer.contains(&0),
        Err(_) => false,
    }
}

/// Read a whole file as text, replacing invalid UTF-8 sequences.
pub fn read_file_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
