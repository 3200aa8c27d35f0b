//! Utility modules.

pub mod file;
pub mod text;

pub use file::{is_binary_file, read_file_lossy};
pub use text::{slugify, split_command, split_patterns, tokenize_terms};
