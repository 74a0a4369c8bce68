//! Raw payload normalization.
//!
//! This module is responsible for turning heterogeneous upstream observation
//! records into a clean, sorted [`Series`] that is safe to analyze.
//!
//! Design goals:
//! - **Strict shape** for the payload container (clear errors naming the field)
//! - **Lenient values**: the `"."` sentinel, unparsable and non-finite values
//!   become explicit gaps instead of aborting the series
//! - **Deterministic behavior**: identical input always yields identical output

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{epoch_ms, Frequency, Series, TimePoint};
use crate::error::AppError;

/// A raw observation as received from the upstream API or a fallback table.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObservation {
    pub date: String,
    pub value: RawValue,
}

/// Upstream value field: a JSON number, a numeric string, or the missing-data
/// sentinel `"."`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawObservation {
    pub fn new(date: &str, value: f64) -> Self {
        Self {
            date: date.to_string(),
            value: RawValue::Number(value),
        }
    }

    pub fn missing(date: &str) -> Self {
        Self {
            date: date.to_string(),
            value: RawValue::Text(".".to_string()),
        }
    }
}

/// Normalize a raw observation array into a [`Series`].
///
/// Dates parse via calendar-date rules (see [`epoch_ms`]); the output is
/// sorted ascending and duplicate dates collapse to their first occurrence.
/// A record with an unreadable date is a malformed payload; a value that
/// fails to parse is merely a gap.
pub fn parse_series(
    source_id: &str,
    frequency: Frequency,
    raw: &[RawObservation],
) -> Result<Series, AppError> {
    let mut points = Vec::with_capacity(raw.len());
    for obs in raw {
        let date = parse_calendar_date(&obs.date)
            .ok_or_else(|| AppError::malformed("date", format!("unreadable date '{}'", obs.date)))?;
        points.push(TimePoint {
            date: epoch_ms(date),
            value: parse_value(&obs.value),
        });
    }

    points.sort_by_key(|p| p.date);
    points.dedup_by_key(|p| p.date);

    Ok(Series {
        source_id: source_id.to_string(),
        frequency,
        points,
    })
}

/// Normalize a JSON payload into a [`Series`].
///
/// Accepts either a bare observation array or the FRED envelope
/// `{"observations": [...]}`. Anything else fails with a malformed-payload
/// error naming the offending field, which callers answer by substituting a
/// fallback dataset.
pub fn parse_payload(
    source_id: &str,
    frequency: Frequency,
    payload: &serde_json::Value,
) -> Result<Series, AppError> {
    let observations = match payload {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => map
            .get("observations")
            .and_then(|v| v.as_array())
            .ok_or_else(|| AppError::malformed("observations", "expected an array"))?,
        _ => return Err(AppError::malformed("observations", "expected an array")),
    };

    let mut raw = Vec::with_capacity(observations.len());
    for (index, item) in observations.iter().enumerate() {
        let obs: RawObservation = serde_json::from_value(item.clone())
            .map_err(|e| AppError::malformed(&format!("observations[{index}]"), e))?;
        raw.push(obs);
    }

    parse_series(source_id, frequency, &raw)
}

/// Parse `YYYY-MM-DD` or a full ISO datetime down to its calendar day.
fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    // Full ISO timestamps embed the calendar day in their first ten bytes.
    if let Some(prefix) = trimmed.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Some(date);
        }
    }
    None
}

fn parse_value(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Number(v) => {
            if v.is_finite() {
                Some(*v)
            } else {
                None
            }
        }
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed == "." || trimmed.is_empty() {
                return None;
            }
            let v = trimmed.parse::<f64>().ok()?;
            if v.is_finite() {
                Some(v)
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_becomes_gap_and_numeric_string_parses() {
        let raw = vec![
            RawObservation::missing("2023-01-01"),
            RawObservation {
                date: "2023-01-02".to_string(),
                value: RawValue::Text("5.5".to_string()),
            },
        ];
        let series = parse_series("TEST", Frequency::Daily, &raw).unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].date, 1_672_531_200_000);
        assert_eq!(series.points[0].value, None);
        assert_eq!(series.points[1].value, Some(5.5));
    }

    #[test]
    fn output_is_sorted_and_deterministic() {
        let raw = vec![
            RawObservation::new("2023-03-01", 3.0),
            RawObservation::new("2023-01-01", 1.0),
            RawObservation::new("2023-02-01", 2.0),
        ];
        let a = parse_series("TEST", Frequency::Monthly, &raw).unwrap();
        let b = parse_series("TEST", Frequency::Monthly, &raw).unwrap();
        assert_eq!(a.points, b.points, "identical input must parse identically");
        let dates: Vec<i64> = a.points.iter().map(|p| p.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(a.points[0].value, Some(1.0));
    }

    #[test]
    fn full_iso_dates_map_to_the_same_day() {
        let raw = vec![
            RawObservation {
                date: "2023-01-01T00:00:00Z".to_string(),
                value: RawValue::Number(1.0),
            },
            RawObservation::new("2023-01-02", 2.0),
        ];
        let series = parse_series("TEST", Frequency::Daily, &raw).unwrap();
        assert_eq!(series.points[0].date, 1_672_531_200_000);
    }

    #[test]
    fn unparsable_values_become_gaps_not_errors() {
        let raw = vec![
            RawObservation {
                date: "2023-01-01".to_string(),
                value: RawValue::Text("n/a".to_string()),
            },
            RawObservation {
                date: "2023-01-02".to_string(),
                value: RawValue::Number(f64::NAN),
            },
        ];
        let series = parse_series("TEST", Frequency::Daily, &raw).unwrap();
        assert_eq!(series.points[0].value, None);
        assert_eq!(series.points[1].value, None);
    }

    #[test]
    fn non_array_payload_is_malformed() {
        let payload = serde_json::json!({"observations": "nope"});
        let err = parse_payload("TEST", Frequency::Daily, &payload).unwrap_err();
        assert!(err.is_malformed_payload());
        assert!(err.to_string().contains("observations"));

        let payload = serde_json::json!(42);
        let err = parse_payload("TEST", Frequency::Daily, &payload).unwrap_err();
        assert!(err.is_malformed_payload());
    }

    #[test]
    fn fred_envelope_parses() {
        let payload = serde_json::json!({
            "observations": [
                {"date": "2023-01-01", "value": "0.21"},
                {"date": "2023-01-08", "value": "."},
            ]
        });
        let series = parse_payload("T10Y2Y", Frequency::Daily, &payload).unwrap();
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].value, Some(0.21));
        assert_eq!(series.points[1].value, None);
    }

    #[test]
    fn duplicate_dates_collapse_to_first() {
        let raw = vec![
            RawObservation::new("2023-01-01", 1.0),
            RawObservation::new("2023-01-01", 9.0),
        ];
        let series = parse_series("TEST", Frequency::Daily, &raw).unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].value, Some(1.0));
    }
}
