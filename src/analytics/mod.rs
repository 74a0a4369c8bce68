//! Derived analytics over normalized series.
//!
//! - moving averages with count-based and time-based windows (`moving_average`)
//! - three-level risk classification (`risk`)
//! - the composite recession-probability heuristic (`probability`)

pub mod moving_average;
pub mod probability;
pub mod risk;
