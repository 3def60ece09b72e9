//! Schema types written by `struct-gen`. Regenerate instead of editing.

mod structs;

pub use structs::*;
