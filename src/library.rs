//! Music library: track model and the sources that enumerate it.
//!
//! `DirectoryLibrary` is the on-disk source; the playback core only sees the
//! `LibrarySource` trait.

mod display;
mod model;
mod scan;
mod source;

pub use display::label_from_fields;
pub use model::{Locator, Track};
pub use scan::DirectoryLibrary;
pub use source::LibrarySource;

#[cfg(test)]
pub use source::StaticLibrary;
