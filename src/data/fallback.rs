//! Bundled fallback datasets.
//!
//! Whenever a live fetch fails or its payload is malformed, the dashboard
//! substitutes these static tables instead of rendering an empty chart. The
//! numbers mirror the reference datasets the dashboard originally shipped
//! with; indicators that never had a live source always use their table here.

use crate::domain::{DashConfig, IndicatorKind, SpreadVariant, UnemploymentVariant};
use crate::series::RawObservation;

fn table(rows: &[(&str, f64)]) -> Vec<RawObservation> {
    rows.iter()
        .map(|(date, value)| RawObservation::new(date, *value))
        .collect()
}

/// The fallback dataset for an indicator's active sub-series.
pub fn for_indicator(kind: IndicatorKind, config: &DashConfig) -> Vec<RawObservation> {
    match kind {
        IndicatorKind::YieldCurve => match config.spread_variant {
            SpreadVariant::T10y2y => t10y2y(),
            SpreadVariant::T10y3m => t10y3m(),
        },
        IndicatorKind::Unemployment => match config.unemployment_variant {
            UnemploymentVariant::Level => unemployment_level(),
            UnemploymentVariant::U1Rate => u1_rate(),
            UnemploymentVariant::EmRatio => employment_ratio(),
        },
        IndicatorKind::GdpGrowth => gdp_growth(),
        IndicatorKind::ConsumerSentiment => consumer_sentiment(),
        IndicatorKind::HousingPermits => housing_permits(),
        IndicatorKind::LeadingIndicators => leading_indicators(),
    }
}

fn t10y2y() -> Vec<RawObservation> {
    table(&[
        ("2023-01-01", 0.21),
        ("2023-01-08", 0.18),
        ("2023-01-15", 0.15),
        ("2023-01-22", 0.12),
        ("2023-01-29", 0.08),
        ("2023-02-05", 0.05),
        ("2023-02-12", 0.02),
        ("2023-02-19", -0.01),
        ("2023-02-26", -0.05),
        ("2023-03-05", -0.08),
        ("2023-03-12", -0.12),
        ("2023-03-19", -0.15),
        ("2023-03-26", -0.18),
        ("2023-04-02", -0.21),
        ("2023-04-09", -0.23),
        ("2023-04-16", -0.25),
        ("2023-04-23", -0.27),
        ("2023-04-30", -0.28),
        ("2023-05-07", -0.26),
        ("2023-05-14", -0.24),
    ])
}

fn t10y3m() -> Vec<RawObservation> {
    table(&[
        ("2023-01-01", 0.45),
        ("2023-01-08", 0.42),
        ("2023-01-15", 0.38),
        ("2023-01-22", 0.35),
        ("2023-01-29", 0.31),
        ("2023-02-05", 0.28),
        ("2023-02-12", 0.25),
        ("2023-02-19", 0.20),
        ("2023-02-26", 0.15),
        ("2023-03-05", 0.10),
        ("2023-03-12", 0.05),
        ("2023-03-19", 0.00),
        ("2023-03-26", -0.05),
        ("2023-04-02", -0.10),
        ("2023-04-09", -0.15),
        ("2023-04-16", -0.20),
        ("2023-04-23", -0.25),
        ("2023-04-30", -0.30),
        ("2023-05-07", -0.28),
        ("2023-05-14", -0.25),
    ])
}

fn consumer_sentiment() -> Vec<RawObservation> {
    table(&[
        ("2023-01-01", 64.9),
        ("2023-02-01", 67.0),
        ("2023-03-01", 62.0),
        ("2023-04-01", 63.5),
        ("2023-05-01", 59.2),
        ("2023-06-01", 64.4),
        ("2023-07-01", 71.6),
        ("2023-08-01", 69.5),
        ("2023-09-01", 68.1),
        ("2023-10-01", 63.8),
        ("2023-11-01", 61.3),
        ("2023-12-01", 69.7),
        ("2024-01-01", 79.0),
        ("2024-02-01", 76.9),
        ("2024-03-01", 79.4),
        ("2024-04-01", 77.2),
    ])
}

fn housing_permits() -> Vec<RawObservation> {
    table(&[
        ("2023-01-01", 1339.0),
        ("2023-02-01", 1371.0),
        ("2023-03-01", 1413.0),
        ("2023-04-01", 1425.0),
        ("2023-05-01", 1447.0),
        ("2023-06-01", 1466.0),
        ("2023-07-01", 1443.0),
        ("2023-08-01", 1541.0),
        ("2023-09-01", 1471.0),
        ("2023-10-01", 1495.0),
        ("2023-11-01", 1460.0),
        ("2023-12-01", 1493.0),
        ("2024-01-01", 1410.0),
        ("2024-02-01", 1425.0),
        ("2024-03-01", 1437.0),
        ("2024-04-01", 1453.0),
    ])
}

fn gdp_growth() -> Vec<RawObservation> {
    table(&[
        ("2023-01-01", 2.1),
        ("2023-01-08", 2.0),
        ("2023-01-15", 1.9),
        ("2023-01-22", 1.8),
        ("2023-01-29", 1.7),
        ("2023-02-05", 1.6),
        ("2023-02-12", 1.5),
        ("2023-02-19", 1.4),
        ("2023-02-26", 1.3),
        ("2023-03-05", 1.2),
        ("2023-03-12", 1.1),
        ("2023-03-19", 1.0),
        ("2023-03-26", 0.9),
        ("2023-04-02", 0.8),
        ("2023-04-09", 0.7),
        ("2023-04-16", 0.6),
        ("2023-04-23", 0.5),
        ("2023-04-30", 0.4),
        ("2023-05-07", 0.3),
        ("2023-05-14", 0.2),
    ])
}

fn leading_indicators() -> Vec<RawObservation> {
    table(&[
        ("2023-01-01", 101.5),
        ("2023-01-08", 101.3),
        ("2023-01-15", 101.1),
        ("2023-01-22", 100.9),
        ("2023-01-29", 100.7),
        ("2023-02-05", 100.5),
        ("2023-02-12", 100.3),
        ("2023-02-19", 100.1),
        ("2023-02-26", 99.9),
        ("2023-03-05", 99.7),
        ("2023-03-12", 99.5),
        ("2023-03-19", 99.3),
        ("2023-03-26", 99.1),
        ("2023-04-02", 98.9),
        ("2023-04-09", 98.7),
        ("2023-04-16", 98.5),
        ("2023-04-23", 98.3),
        ("2023-04-30", 98.1),
        ("2023-05-07", 97.9),
        ("2023-05-14", 97.7),
    ])
}

fn unemployment_level() -> Vec<RawObservation> {
    table(&[
        ("2023-01-01", 215.0),
        ("2023-01-08", 220.0),
        ("2023-01-15", 225.0),
        ("2023-01-22", 218.0),
        ("2023-01-29", 223.0),
        ("2023-02-05", 230.0),
        ("2023-02-12", 235.0),
        ("2023-02-19", 240.0),
        ("2023-02-26", 245.0),
        ("2023-03-05", 250.0),
        ("2023-03-12", 255.0),
        ("2023-03-19", 260.0),
        ("2023-03-26", 265.0),
        ("2023-04-02", 270.0),
        ("2023-04-09", 275.0),
        ("2023-04-16", 280.0),
        ("2023-04-23", 285.0),
        ("2023-04-30", 290.0),
        ("2023-05-07", 295.0),
        ("2023-05-14", 300.0),
    ])
}

fn u1_rate() -> Vec<RawObservation> {
    table(&[
        ("2023-01-01", 1.2),
        ("2023-02-01", 1.2),
        ("2023-03-01", 1.3),
        ("2023-04-01", 1.3),
        ("2023-05-01", 1.3),
        ("2023-06-01", 1.4),
        ("2023-07-01", 1.4),
        ("2023-08-01", 1.4),
        ("2023-09-01", 1.5),
        ("2023-10-01", 1.5),
        ("2023-11-01", 1.5),
        ("2023-12-01", 1.6),
        ("2024-01-01", 1.6),
        ("2024-02-01", 1.7),
        ("2024-03-01", 1.7),
        ("2024-04-01", 1.8),
    ])
}

fn employment_ratio() -> Vec<RawObservation> {
    table(&[
        ("2023-01-01", 60.2),
        ("2023-02-01", 60.2),
        ("2023-03-01", 60.4),
        ("2023-04-01", 60.4),
        ("2023-05-01", 60.3),
        ("2023-06-01", 60.3),
        ("2023-07-01", 60.4),
        ("2023-08-01", 60.4),
        ("2023-09-01", 60.4),
        ("2023-10-01", 60.2),
        ("2023-11-01", 60.3),
        ("2023-12-01", 60.1),
        ("2024-01-01", 60.2),
        ("2024-02-01", 60.1),
        ("2024-03-01", 60.3),
        ("2024-04-01", 60.2),
    ])
}

/// Fallback auxiliary market-index series for the overlay toggle.
pub fn aux_index() -> Vec<RawObservation> {
    table(&[
        ("2023-01-01", 10386.0),
        ("2023-01-08", 10569.0),
        ("2023-01-15", 11079.0),
        ("2023-01-22", 11621.0),
        ("2023-01-29", 12007.0),
        ("2023-02-05", 11718.0),
        ("2023-02-12", 11787.0),
        ("2023-02-19", 11395.0),
        ("2023-02-26", 11689.0),
        ("2023-03-05", 11139.0),
        ("2023-03-12", 11631.0),
        ("2023-03-19", 11824.0),
        ("2023-03-26", 12222.0),
        ("2023-04-02", 12088.0),
        ("2023-04-09", 12123.0),
        ("2023-04-16", 12072.0),
        ("2023-04-23", 12227.0),
        ("2023-04-30", 12235.0),
        ("2023-05-07", 12285.0),
        ("2023-05-14", 12658.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::parse_series;

    #[test]
    fn every_indicator_has_a_parseable_fallback() {
        let config = DashConfig::default();
        for kind in IndicatorKind::ALL {
            let raw = for_indicator(kind, &config);
            assert!(raw.len() >= 16, "{kind:?} fallback is too small");
            let series = parse_series("fallback", kind.frequency(), &raw)
                .expect("fallback tables must always parse");
            assert_eq!(series.points.len(), raw.len());
            assert!(series.points.iter().all(|p| p.value.is_some()));
        }
    }

    #[test]
    fn variant_fallbacks_differ() {
        let mut config = DashConfig::default();
        let t10y2y = for_indicator(IndicatorKind::YieldCurve, &config);
        config.spread_variant = SpreadVariant::T10y3m;
        let t10y3m = for_indicator(IndicatorKind::YieldCurve, &config);
        assert_ne!(
            format!("{:?}", t10y2y.first().map(|o| &o.value)),
            format!("{:?}", t10y3m.first().map(|o| &o.value)),
        );
    }

    #[test]
    fn reference_latest_values_line_up_with_probability_defaults() {
        // The last row of each fallback table is the reading the composite
        // probability falls back to.
        let config = DashConfig::default();
        let latest = |kind| {
            let raw = for_indicator(kind, &config);
            match raw.last().map(|o| &o.value) {
                Some(crate::series::RawValue::Number(v)) => *v,
                _ => f64::NAN,
            }
        };
        assert!((latest(IndicatorKind::YieldCurve) - (-0.24)).abs() < 1e-9);
        assert!((latest(IndicatorKind::Unemployment) - 300.0).abs() < 1e-9);
        assert!((latest(IndicatorKind::GdpGrowth) - 0.2).abs() < 1e-9);
        assert!((latest(IndicatorKind::LeadingIndicators) - 97.7).abs() < 1e-9);
    }
}
