//! Command-line parsing for the recession indicators dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the analytics code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{IndicatorKind, SpreadVariant, UnemploymentVariant};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "rlens", version, about = "Recession Indicators Dashboard (FRED-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch all indicators and print the formatted dashboard report.
    Report(DashArgs),
    /// Print the composite recession probability only (useful for scripting).
    Probability(DashArgs),
    /// Export one indicator's computed series to CSV and/or the whole
    /// dashboard to a snapshot JSON.
    Export(ExportArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `rlens report`, but renders
    /// charts in a terminal UI using Ratatui.
    Tui(DashArgs),
}

/// Common options shared by every dashboard-computing command.
#[derive(Debug, Parser, Clone)]
pub struct DashArgs {
    /// Display window start (YYYY-MM-DD). Defaults to five years back.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Display window end (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Which Treasury spread the yield-curve indicator tracks.
    #[arg(short = 's', long, value_enum, default_value_t = SpreadVariant::T10y2y)]
    pub spread: SpreadVariant,

    /// Which labor-market series the unemployment indicator tracks.
    #[arg(short = 'u', long, value_enum, default_value_t = UnemploymentVariant::Level)]
    pub unemployment: UnemploymentVariant,

    /// Shade historical recession periods on charts (enabled by default).
    #[arg(long, default_value_t = true)]
    pub recessions: bool,

    /// Disable recession shading.
    #[arg(long)]
    pub no_recessions: bool,

    /// Overlay the NASDAQ composite on charts.
    #[arg(long)]
    pub index: bool,

    /// Skip the FRED API and use the bundled fallback datasets.
    #[arg(long)]
    pub offline: bool,
}

/// Options for `rlens export`.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub dash: DashArgs,

    /// Indicator to export as CSV.
    #[arg(short = 'i', long, value_enum, default_value_t = IndicatorKind::YieldCurve)]
    pub indicator: IndicatorKind,

    /// CSV output path for the selected indicator.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Snapshot JSON output path for the whole dashboard.
    #[arg(long = "snapshot", value_name = "JSON")]
    pub snapshot: Option<PathBuf>,
}
