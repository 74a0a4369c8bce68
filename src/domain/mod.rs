//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - normalized time-series types (`TimePoint`, `Series`, `DateRange`)
//! - moving-average outputs (`MaPoint`, `MaSummary`, `MaWindow`)
//! - risk classification data (`RiskLevel`, `RiskProfile`, `ThresholdTable`)
//! - the closed indicator catalog (`IndicatorKind` and its sub-series variants)
//! - pipeline outputs (`IndicatorReport`) and run configuration (`DashConfig`)

pub mod types;

pub use types::*;
