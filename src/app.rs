//! Application module: the presentation model used by the TUI and runtime.
//!
//! `App` lives in `app::model` and holds the list cursor, the visible screen
//! and page, and popup flags.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
