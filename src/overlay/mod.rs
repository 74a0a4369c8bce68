//! Chart overlays: historical recession intervals and the auxiliary market
//! index.
//!
//! Overlays are co-rendered on a primary indicator's time axis without ever
//! mutating the primary series. The recession table is a static reference,
//! safe for unsynchronized concurrent reads; the auxiliary index is optional
//! and its absence is never an error.

use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{epoch_ms, DateRange, RecessionPeriod, TimePoint};

/// NBER recession dates rendered as shaded chart regions.
static RECESSIONS: OnceLock<Vec<RecessionPeriod>> = OnceLock::new();

fn period(start: (i32, u32, u32), end: (i32, u32, u32), name: &'static str) -> RecessionPeriod {
    let to_ms = |(y, m, d): (i32, u32, u32)| {
        epoch_ms(NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
    };
    RecessionPeriod {
        start_date: to_ms(start),
        end_date: to_ms(end),
        name,
    }
}

/// The historical US recession table (NBER official dates).
pub fn historical_recession_periods() -> &'static [RecessionPeriod] {
    RECESSIONS.get_or_init(|| {
        vec![
            period((1980, 1, 1), (1980, 7, 31), "1980 Recession"),
            period((1981, 7, 1), (1982, 11, 30), "Early 1980s Recession"),
            period((1990, 7, 1), (1991, 3, 31), "Early 1990s Recession"),
            period((2001, 3, 1), (2001, 11, 30), "Dot-com Recession"),
            period((2007, 12, 1), (2009, 6, 30), "Great Recession"),
            period((2020, 2, 1), (2020, 4, 30), "COVID-19 Recession"),
        ]
    })
}

/// Recession periods for co-rendering with a chart window.
///
/// The intervals are already normalized to epoch milliseconds at load time, so
/// they pass through unchanged; clipping to the visible window is the
/// renderer's business.
pub fn align_recession_periods<'a>(
    periods: &'a [RecessionPeriod],
    _visible: &DateRange,
) -> &'a [RecessionPeriod] {
    periods
}

/// Days elapsed since the most recent recession ended, as of `now_ms`.
///
/// Returns `None` while a recession is ongoing or when `now_ms` predates the
/// table entirely.
pub fn days_since_last_recession_end(now_ms: i64) -> Option<i64> {
    const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
    let periods = historical_recession_periods();
    if periods
        .iter()
        .any(|p| p.start_date <= now_ms && now_ms <= p.end_date)
    {
        return None;
    }
    periods
        .iter()
        .map(|p| p.end_date)
        .filter(|&end| end <= now_ms)
        .max()
        .map(|end| (now_ms - end) / MS_PER_DAY)
}

/// A raw auxiliary-index record.
///
/// Older exports stored the reading under `value`; newer ones use
/// `nasdaqValue`. Both are tolerated and normalized to the one canonical
/// field on [`TimePoint`].
#[derive(Debug, Clone, Deserialize)]
pub struct AuxObservation {
    pub date: AuxDate,
    #[serde(default, rename = "nasdaqValue")]
    pub index_value: Option<f64>,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Auxiliary record dates arrive either as ISO strings or epoch milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuxDate {
    Millis(i64),
    Text(String),
}

impl AuxDate {
    fn to_ms(&self) -> Option<i64> {
        match self {
            AuxDate::Millis(ms) => Some(*ms),
            AuxDate::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .ok()
                .map(epoch_ms),
        }
    }
}

/// Normalize raw auxiliary records to canonical points.
///
/// Records with an unreadable date or no reading under either field name are
/// skipped; the overlay is decorative and must never take the chart down.
pub fn normalize_aux_records(records: &[AuxObservation]) -> Vec<TimePoint> {
    records
        .iter()
        .filter_map(|r| {
            let date = r.date.to_ms()?;
            let value = r.index_value.or(r.value)?;
            value.is_finite().then_some(TimePoint {
                date,
                value: Some(value),
            })
        })
        .collect()
}

/// Filter the auxiliary series to the primary chart's visible window, using
/// the same inclusive-bounds rule as the range filter.
///
/// A missing series returns an empty overlay, never an error, since the
/// overlay is optional and toggleable.
pub fn align_auxiliary_series(aux: Option<&[TimePoint]>, range: &DateRange) -> Vec<TimePoint> {
    let Some(points) = aux else {
        return Vec::new();
    };
    points
        .iter()
        .filter(|p| range.contains(p.date) && p.value.is_some())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_range() -> DateRange {
        DateRange {
            start: i64::MIN,
            end: i64::MAX,
        }
    }

    #[test]
    fn recession_table_is_ordered_and_well_formed() {
        let periods = historical_recession_periods();
        assert_eq!(periods.len(), 6);
        for p in periods {
            assert!(p.start_date < p.end_date, "{} is inverted", p.name);
        }
        for pair in periods.windows(2) {
            assert!(pair[0].end_date < pair[1].start_date);
        }
        assert_eq!(periods[4].name, "Great Recession");
    }

    #[test]
    fn recession_periods_pass_through_unchanged() {
        let periods = historical_recession_periods();
        let visible = DateRange::from_calendar(
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        );
        let aligned = align_recession_periods(periods, &visible);
        assert_eq!(aligned.len(), periods.len());
    }

    #[test]
    fn days_since_last_recession_end_counts_from_covid() {
        let now = epoch_ms(NaiveDate::from_ymd_opt(2020, 5, 10).unwrap());
        assert_eq!(days_since_last_recession_end(now), Some(10));

        // Mid-recession there is no "since" to report.
        let during = epoch_ms(NaiveDate::from_ymd_opt(2020, 3, 15).unwrap());
        assert_eq!(days_since_last_recession_end(during), None);

        let before_table = epoch_ms(NaiveDate::from_ymd_opt(1975, 1, 1).unwrap());
        assert_eq!(days_since_last_recession_end(before_table), None);
    }

    #[test]
    fn absent_auxiliary_series_yields_empty_overlay() {
        assert!(align_auxiliary_series(None, &full_range()).is_empty());
    }

    #[test]
    fn auxiliary_series_filters_inclusively() {
        let points = vec![
            TimePoint { date: 100, value: Some(1.0) },
            TimePoint { date: 200, value: Some(2.0) },
            TimePoint { date: 300, value: None },
            TimePoint { date: 400, value: Some(4.0) },
        ];
        let range = DateRange { start: 200, end: 400 };
        let aligned = align_auxiliary_series(Some(&points), &range);
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned[0].date, 200);
        assert_eq!(aligned[1].date, 400);
    }

    #[test]
    fn legacy_field_names_normalize_to_one_field() {
        let records: Vec<AuxObservation> = serde_json::from_value(serde_json::json!([
            {"date": "2023-01-01", "nasdaqValue": 11_500.0},
            {"date": 1672617600000i64, "value": 11_600.0},
            {"date": "2023-01-03"},
            {"date": "garbled", "value": 1.0},
        ]))
        .unwrap();
        let points = normalize_aux_records(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, Some(11_500.0));
        assert_eq!(points[1].date, 1_672_617_600_000);
    }
}
