//! Reporting utilities: formatted terminal output for dashboard runs.

pub mod format;

pub use format::*;
