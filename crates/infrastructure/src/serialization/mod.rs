//! Document serialization for contract files.
//!
//! Output is deterministic so resolved documents diff cleanly:
//! - Keys keep document order
//! - 2-space indentation
//! - Trailing newline
//! - UTF-8 encoding without BOM

mod format;
mod json;

pub use format::*;
pub use json::*;
