use std::env;
use std::path::PathBuf;

use crate::config::LibrarySettings;

/// Pick the library directory: command-line argument, then `library.root`,
/// then the working directory.
pub fn library_root(arg: Option<String>, library: &LibrarySettings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| library.root.clone())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
