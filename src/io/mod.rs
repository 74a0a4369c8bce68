//! Input/output helpers.
//!
//! - per-indicator CSV exports (`export`)
//! - dashboard snapshot JSON read/write (`snapshot`)

pub mod export;
pub mod snapshot;

pub use export::*;
pub use snapshot::*;
