//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads indicator data (FRED or bundled fallback)
//! - runs the analytics pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, DashArgs, ExportArgs};
use crate::data::FredClient;
use crate::domain::DashConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `rlens` binary.
pub fn run() -> Result<(), AppError> {
    // We want bare `rlens` (and `rlens --offline` etc.) to behave like
    // `rlens tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args, OutputMode::Full),
        Command::Probability(args) => handle_report(args, OutputMode::ProbabilityOnly),
        Command::Export(args) => handle_export(args),
        Command::Tui(args) => handle_tui(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    ProbabilityOnly,
}

fn handle_report(args: DashArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = dash_config_from_args(&args);
    let client = connect(&config)?;
    let data = pipeline::load_dashboard_data(client.as_ref(), &config)?;
    let run = pipeline::run_dashboard(&data, &config, today());

    match mode {
        OutputMode::Full => {
            print!("{}", crate::report::format_dashboard(&run, &config));
        }
        OutputMode::ProbabilityOnly => {
            print!("{}", crate::report::format_probability(run.probability));
        }
    }

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    if args.csv.is_none() && args.snapshot.is_none() {
        return Err(AppError::usage(
            "Nothing to export: pass --csv and/or --snapshot.",
        ));
    }

    let config = dash_config_from_args(&args.dash);
    let client = connect(&config)?;
    let data = pipeline::load_dashboard_data(client.as_ref(), &config)?;
    let run = pipeline::run_dashboard(&data, &config, today());

    if let Some(path) = &args.csv {
        let report = run
            .report(args.indicator)
            .ok_or_else(|| AppError::data("Selected indicator produced no report."))?;
        crate::io::write_indicator_csv(path, report)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = &args.snapshot {
        crate::io::write_snapshot_json(path, &run)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_tui(args: DashArgs) -> Result<(), AppError> {
    crate::tui::run(dash_config_from_args(&args))
}

/// Build the FRED client unless the run is offline.
///
/// A missing API key degrades to offline mode rather than failing: the
/// bundled fallback datasets keep every command usable.
fn connect(config: &DashConfig) -> Result<Option<FredClient>, AppError> {
    if config.offline {
        return Ok(None);
    }
    match FredClient::from_env() {
        Ok(client) => Ok(Some(client)),
        Err(err) => {
            eprintln!("{err} Using bundled fallback data.");
            Ok(None)
        }
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn dash_config_from_args(args: &DashArgs) -> DashConfig {
    DashConfig {
        start_date: args.start,
        end_date: args.end,
        spread_variant: args.spread,
        unemployment_variant: args.unemployment,
        show_recessions: args.recessions && !args.no_recessions,
        show_index: args.index,
        offline: args.offline,
    }
}

/// Rewrite argv so `rlens` defaults to `rlens tui`.
///
/// Rules:
/// - `rlens`                     -> `rlens tui`
/// - `rlens --offline ...`       -> `rlens tui --offline ...`
/// - `rlens --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "probability" | "export" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("rlens")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&[])), argv(&["tui"]));
        assert_eq!(rewrite_args(argv(&["--offline"])), argv(&["tui", "--offline"]));
        assert_eq!(rewrite_args(argv(&["report"])), argv(&["report"]));
        assert_eq!(rewrite_args(argv(&["--help"])), argv(&["--help"]));
    }
}
