//! Data acquisition.
//!
//! - FRED API integration (`fred`)
//! - bundled static fallback datasets (`fallback`)
//!
//! Both paths hand RAW observation records to the series parser; nothing here
//! normalizes values or dates.

pub mod fallback;
pub mod fred;

pub use fred::FredClient;
