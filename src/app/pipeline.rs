//! Shared dashboard pipeline used by both the CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch-or-fallback -> parse -> moving average -> range filter -> risk ->
//! composite probability
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//! The compute half is pure and synchronous: identical inputs always produce
//! identical outputs, and nothing here touches the network.

use chrono::NaiveDate;

use crate::analytics::{moving_average, probability, risk};
use crate::data::{fallback, fred, FredClient};
use crate::domain::{
    DashConfig, DateRange, Frequency, IndicatorKind, IndicatorReport, RiskLevel, Series, TimePoint,
};
use crate::error::AppError;
use crate::overlay;
use crate::series::{filter_ma_line, filter_range, parse_payload, parse_series};

/// Message attached to a report when the range filter fell back.
pub const EMPTY_RANGE_WARNING: &str =
    "No data available for the selected date range. Showing full dataset.";

/// One indicator's normalized source series plus its provenance.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub series: Series,
    pub used_fallback: bool,
}

/// All source data for one dashboard run, fetched up front so recomputation
/// (new range, new overlay toggle) never refetches.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub indicators: Vec<(IndicatorKind, LoadedSeries)>,
    pub aux_index: Option<LoadedSeries>,
}

/// All computed outputs of a single dashboard run.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub range: DateRange,
    pub reports: Vec<IndicatorReport>,
    pub probability: u8,
    /// Auxiliary index overlay, aligned to the visible window. Empty when the
    /// overlay is off or no index data exists.
    pub aux_overlay: Vec<TimePoint>,
}

impl DashboardRun {
    pub fn report(&self, kind: IndicatorKind) -> Option<&IndicatorReport> {
        self.reports.iter().find(|r| r.kind == kind)
    }
}

/// Load every indicator's source series, substituting bundled fallback data
/// for any source that fails to fetch or parse.
pub fn load_dashboard_data(
    client: Option<&FredClient>,
    config: &DashConfig,
) -> Result<DashboardData, AppError> {
    let mut indicators = Vec::with_capacity(IndicatorKind::ALL.len());
    for kind in IndicatorKind::ALL {
        indicators.push((kind, load_indicator(client, kind, config)?));
    }

    let aux_index = if config.show_index {
        Some(load_aux_index(client, config)?)
    } else {
        None
    };

    Ok(DashboardData {
        indicators,
        aux_index,
    })
}

fn load_indicator(
    client: Option<&FredClient>,
    kind: IndicatorKind,
    config: &DashConfig,
) -> Result<LoadedSeries, AppError> {
    if !config.offline {
        if let (Some(client), Some(series_id)) = (client, kind.series_id(config)) {
            if let Some(series) = try_fetch(client, series_id, kind.frequency(), config) {
                return Ok(LoadedSeries {
                    series,
                    used_fallback: false,
                });
            }
        }
    }

    let raw = fallback::for_indicator(kind, config);
    let series = parse_series(
        kind.series_id(config).unwrap_or("bundled"),
        kind.frequency(),
        &raw,
    )?;
    Ok(LoadedSeries {
        series,
        used_fallback: true,
    })
}

fn load_aux_index(
    client: Option<&FredClient>,
    config: &DashConfig,
) -> Result<LoadedSeries, AppError> {
    if !config.offline {
        if let Some(client) = client {
            if let Some(series) = try_fetch(client, fred::AUX_INDEX_SERIES, Frequency::Daily, config)
            {
                return Ok(LoadedSeries {
                    series,
                    used_fallback: false,
                });
            }
        }
    }

    let series = parse_series(fred::AUX_INDEX_SERIES, Frequency::Daily, &fallback::aux_index())?;
    Ok(LoadedSeries {
        series,
        used_fallback: true,
    })
}

/// Fetch and parse one series, treating every failure (network, HTTP status,
/// malformed payload, empty result) as "use the fallback" rather than an
/// error. The malformed-payload contract ends here: it never reaches
/// rendering.
fn try_fetch(
    client: &FredClient,
    series_id: &str,
    frequency: Frequency,
    config: &DashConfig,
) -> Option<Series> {
    let payload = client
        .fetch_payload(series_id, None, config.end_date)
        .ok()?;
    let series = parse_payload(series_id, frequency, &payload).ok()?;
    if series.is_empty() {
        return None;
    }
    Some(series)
}

/// Run the analytics pipeline for one indicator.
///
/// The moving average always runs over the FULL series; only the emitted line
/// is trimmed to the visible window afterwards. Zooming therefore never
/// changes the summary band or the computed risk level.
pub fn run_indicator(
    kind: IndicatorKind,
    series: &Series,
    used_fallback: bool,
    range: Option<&DateRange>,
    config: &DashConfig,
) -> IndicatorReport {
    let ma = moving_average::compute(series, kind.ma_window());
    let filtered = filter_range(series, range);

    let warning = filtered
        .fell_back_to_full
        .then(|| EMPTY_RANGE_WARNING.to_string());

    let ma_line = match range {
        Some(range) if !filtered.fell_back_to_full => filter_ma_line(&ma.ma_line, range),
        _ => ma.ma_line.clone(),
    };

    let (current_value, previous_value) = latest_two(&filtered.points);

    let risk_level = match current_value {
        Some(current) => risk::classify(
            &kind.risk_profile(config),
            current,
            previous_value,
            &ma.summary,
            ma.ma_line.len(),
        ),
        None => RiskLevel::Medium,
    };

    IndicatorReport {
        kind,
        source_id: series.source_id.clone(),
        used_fallback,
        display_series: filtered.points,
        ma_line,
        summary: ma.summary,
        ma_point_count: ma.ma_line.len(),
        risk_level,
        current_value,
        previous_value,
        warning,
    }
}

/// Compute the full dashboard from pre-loaded data.
pub fn run_dashboard(data: &DashboardData, config: &DashConfig, today: NaiveDate) -> DashboardRun {
    let range = config.resolved_range(today);

    let reports: Vec<IndicatorReport> = data
        .indicators
        .iter()
        .map(|(kind, loaded)| {
            run_indicator(*kind, &loaded.series, loaded.used_fallback, Some(&range), config)
        })
        .collect();

    let latest: Vec<(IndicatorKind, Option<f64>)> = reports
        .iter()
        .map(|r| (r.kind, r.current_value))
        .collect();
    let probability = probability::recession_probability(&latest);

    let aux_overlay = overlay::align_auxiliary_series(
        data.aux_index.as_ref().map(|l| l.series.points.as_slice()),
        &range,
    );

    DashboardRun {
        range,
        reports,
        probability,
        aux_overlay,
    }
}

/// The two most recent finite readings in the display series.
fn latest_two(points: &[TimePoint]) -> (Option<f64>, Option<f64>) {
    let mut finite = points.iter().rev().filter_map(|p| p.value);
    let current = finite.next();
    let previous = finite.next();
    (current, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> DashConfig {
        DashConfig {
            offline: true,
            show_index: true,
            ..DashConfig::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn offline_dashboard_computes_every_indicator() {
        let config = offline_config();
        let data = load_dashboard_data(None, &config).unwrap();
        let run = run_dashboard(&data, &config, today());

        assert_eq!(run.reports.len(), IndicatorKind::ALL.len());
        for report in &run.reports {
            assert!(report.used_fallback);
            assert!(!report.display_series.is_empty());
            assert!(report.current_value.is_some());
        }
        assert!(!run.aux_overlay.is_empty());
        assert!(run.probability <= 100);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let config = offline_config();
        let data = load_dashboard_data(None, &config).unwrap();
        let a = run_dashboard(&data, &config, today());
        let b = run_dashboard(&data, &config, today());

        assert_eq!(a.probability, b.probability);
        for (ra, rb) in a.reports.iter().zip(&b.reports) {
            assert_eq!(ra.display_series, rb.display_series);
            assert_eq!(ra.ma_line, rb.ma_line);
            assert_eq!(ra.summary, rb.summary);
            assert_eq!(ra.risk_level, rb.risk_level);
        }
    }

    #[test]
    fn disjoint_range_sets_warning_and_shows_full_data() {
        let mut config = offline_config();
        config.start_date = NaiveDate::from_ymd_opt(2030, 1, 1);
        config.end_date = NaiveDate::from_ymd_opt(2030, 6, 1);

        let data = load_dashboard_data(None, &config).unwrap();
        let run = run_dashboard(&data, &config, today());

        for report in &run.reports {
            assert_eq!(report.warning.as_deref(), Some(EMPTY_RANGE_WARNING));
            assert!(!report.display_series.is_empty());
        }
    }

    #[test]
    fn current_and_previous_skip_gaps() {
        let points = vec![
            TimePoint { date: 1, value: Some(1.0) },
            TimePoint { date: 2, value: Some(2.0) },
            TimePoint { date: 3, value: None },
        ];
        assert_eq!(latest_two(&points), (Some(2.0), Some(1.0)));
        assert_eq!(latest_two(&[]), (None, None));
    }

    #[test]
    fn zooming_does_not_move_the_summary_band() {
        let config = offline_config();
        let data = load_dashboard_data(None, &config).unwrap();

        let full = run_dashboard(&data, &config, today());

        let mut zoomed_config = config.clone();
        zoomed_config.start_date = NaiveDate::from_ymd_opt(2023, 4, 1);
        zoomed_config.end_date = NaiveDate::from_ymd_opt(2023, 5, 14);
        let zoomed = run_dashboard(&data, &zoomed_config, today());

        for (a, b) in full.reports.iter().zip(&zoomed.reports) {
            assert_eq!(a.summary, b.summary, "{:?} summary moved on zoom", a.kind);
        }
    }
}
