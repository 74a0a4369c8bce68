//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the analytics code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::DashboardRun;
use crate::domain::{ms_to_date, DashConfig, IndicatorReport};
use crate::overlay;

/// Format the full dashboard summary.
pub fn format_dashboard(run: &DashboardRun, config: &DashConfig) -> String {
    let mut out = String::new();

    out.push_str("=== rlens - Recession Indicators (FRED-based) ===\n");
    out.push_str(&format!(
        "Window: {} .. {}\n",
        ms_to_date(run.range.start),
        ms_to_date(run.range.end)
    ));
    out.push('\n');
    out.push_str(&format_probability(run.probability));
    out.push('\n');

    if let Some(days) = overlay::days_since_last_recession_end(run.range.end) {
        out.push_str(&format!("Days since last recession ended: {days}\n"));
    }
    out.push('\n');

    for report in &run.reports {
        out.push_str(&format_indicator(report, config));
        out.push('\n');
    }

    out
}

/// Format the composite probability as a one-line gauge.
pub fn format_probability(probability: u8) -> String {
    const WIDTH: usize = 20;
    let filled = (probability as usize * WIDTH) / 100;
    let gauge: String = (0..WIDTH).map(|i| if i < filled { '#' } else { '-' }).collect();
    format!("Recession probability: {probability:>3}% [{gauge}]\n")
}

/// Format one indicator's summary block.
pub fn format_indicator(report: &IndicatorReport, config: &DashConfig) -> String {
    let mut out = String::new();
    let kind = report.kind;
    let decimals = kind.value_decimals(config);
    let suffix = kind.unit_suffix(config);

    out.push_str(&format!(
        "{} [{}]{}\n",
        kind.display_name(config),
        report.source_id,
        if report.used_fallback { " (fallback data)" } else { "" },
    ));

    match report.current_value {
        Some(current) => {
            let trend = trend_arrow(report);
            out.push_str(&format!(
                "  current: {current:.decimals$}{suffix} {trend} | {}\n",
                report.risk_level.label(),
            ));
        }
        None => out.push_str("  current: - \n"),
    }

    out.push_str(&format!(
        "  points: n={} | ma: n={} band=[{:.2}, {:.2}] avg={:.2}\n",
        report.display_series.len(),
        report.ma_line.len(),
        report.summary.low,
        report.summary.high,
        report.summary.average,
    ));

    if let Some(warning) = &report.warning {
        out.push_str(&format!("  ! {warning}\n"));
    }

    out
}

fn trend_arrow(report: &IndicatorReport) -> &'static str {
    match (report.current_value, report.previous_value) {
        (Some(current), Some(previous)) => {
            if current > previous {
                "^"
            } else if current < previous {
                "v"
            } else {
                "="
            }
        }
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{load_dashboard_data, run_dashboard};
    use chrono::NaiveDate;

    #[test]
    fn dashboard_report_mentions_every_indicator() {
        let config = DashConfig {
            offline: true,
            ..DashConfig::default()
        };
        let data = load_dashboard_data(None, &config).unwrap();
        let run = run_dashboard(
            &data,
            &config,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        );
        let text = format_dashboard(&run, &config);

        assert!(text.contains("Recession probability:"));
        assert!(text.contains("Treasury Yield Curve Spread"));
        assert!(text.contains("Unemployment Level"));
        assert!(text.contains("GDP Growth Nowcast"));
        assert!(text.contains("Consumer Sentiment Index"));
        assert!(text.contains("Housing Permits"));
        assert!(text.contains("Leading Economic Indicators"));
        assert!(text.contains("(fallback data)"));
    }

    #[test]
    fn probability_gauge_scales() {
        assert!(format_probability(0).contains("[--------------------]"));
        assert!(format_probability(100).contains("[####################]"));
        let half = format_probability(50);
        assert!(half.contains("##########----------"));
    }
}
