//! Series normalization and range filtering.
//!
//! - raw upstream records to normalized `TimePoint`s (`parse`)
//! - inclusive date-window selection with full-series fallback (`filter`)

pub mod filter;
pub mod parse;

pub use filter::*;
pub use parse::*;
