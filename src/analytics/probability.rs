//! Composite recession-probability heuristic.
//!
//! Each indicator contributes a coarse step-function score (0..100) over its
//! latest reading; the composite is a fixed-weight weighted sum. This is a
//! policy heuristic, deliberately coarser than the three-level chart
//! classification, and the two are not required to agree.

use crate::domain::{IndicatorKind, IndicatorScore};

/// Fixed policy weight per indicator. The six weights sum to 1.0; the
/// aggregator does not normalize or validate them.
pub fn weight(kind: IndicatorKind) -> f64 {
    match kind {
        IndicatorKind::YieldCurve => 0.25,
        IndicatorKind::Unemployment => 0.15,
        IndicatorKind::GdpGrowth => 0.2,
        IndicatorKind::ConsumerSentiment => 0.1,
        IndicatorKind::LeadingIndicators => 0.2,
        IndicatorKind::HousingPermits => 0.1,
    }
}

/// Monotonic step score over an indicator's latest raw reading.
pub fn indicator_score(kind: IndicatorKind, latest: f64) -> f64 {
    match kind {
        IndicatorKind::YieldCurve => {
            if latest < 0.0 {
                80.0
            } else if latest < 0.5 {
                40.0
            } else {
                10.0
            }
        }
        IndicatorKind::Unemployment => {
            if latest > 275.0 {
                70.0
            } else if latest > 250.0 {
                50.0
            } else {
                20.0
            }
        }
        IndicatorKind::GdpGrowth => {
            if latest < 0.5 {
                80.0
            } else if latest < 1.0 {
                60.0
            } else {
                20.0
            }
        }
        IndicatorKind::ConsumerSentiment => {
            if latest < 60.0 {
                75.0
            } else if latest < 70.0 {
                40.0
            } else {
                15.0
            }
        }
        IndicatorKind::LeadingIndicators => {
            if latest < 98.5 {
                85.0
            } else if latest < 100.0 {
                50.0
            } else {
                15.0
            }
        }
        IndicatorKind::HousingPermits => {
            if latest < 1100.0 {
                70.0
            } else if latest < 1300.0 {
                40.0
            } else {
                10.0
            }
        }
    }
}

/// Reference readings used when an indicator's pipeline produced no data.
///
/// These are the values the dashboard originally shipped with; they keep the
/// composite defined even with every upstream source unavailable.
pub fn default_latest(kind: IndicatorKind) -> f64 {
    match kind {
        IndicatorKind::YieldCurve => -0.24,
        IndicatorKind::Unemployment => 300.0,
        IndicatorKind::GdpGrowth => 0.2,
        IndicatorKind::ConsumerSentiment => 56.0,
        IndicatorKind::LeadingIndicators => 97.7,
        IndicatorKind::HousingPermits => 1070.0,
    }
}

/// Weighted composite of per-indicator scores, rounded to an integer percent.
pub fn aggregate(scores: &[IndicatorScore]) -> u8 {
    let weighted: f64 = scores.iter().map(|s| s.score * s.weight).sum();
    weighted.round().clamp(0.0, 100.0) as u8
}

/// Build the composite from live latest readings, substituting the reference
/// reading for any indicator without data.
pub fn recession_probability(latest: &[(IndicatorKind, Option<f64>)]) -> u8 {
    let scores: Vec<IndicatorScore> = latest
        .iter()
        .map(|(kind, value)| IndicatorScore {
            kind: *kind,
            score: indicator_score(*kind, value.unwrap_or_else(|| default_latest(*kind))),
            weight: weight(*kind),
        })
        .collect();
    aggregate(&scores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_sum_matches_reference_readings() {
        // The shipped reference readings step to [80, 70, 80, 75, 85, 70],
        // which the fixed weights combine to 78.
        let scores: Vec<IndicatorScore> = IndicatorKind::ALL
            .iter()
            .map(|&kind| IndicatorScore {
                kind,
                score: indicator_score(kind, default_latest(kind)),
                weight: weight(kind),
            })
            .collect();

        let by_kind: Vec<f64> = scores.iter().map(|s| s.score).collect();
        assert_eq!(by_kind, vec![80.0, 70.0, 80.0, 75.0, 85.0, 70.0]);
        assert_eq!(aggregate(&scores), 78);
    }

    #[test]
    fn weights_sum_to_one() {
        let total: f64 = IndicatorKind::ALL.iter().map(|&k| weight(k)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn step_scores_are_monotonic_in_severity() {
        // Yield curve: deeper inversion never scores lower.
        assert!(indicator_score(IndicatorKind::YieldCurve, -1.0) >= indicator_score(IndicatorKind::YieldCurve, 0.2));
        assert!(indicator_score(IndicatorKind::YieldCurve, 0.2) >= indicator_score(IndicatorKind::YieldCurve, 1.0));

        // Boundary behavior: cut points belong to the less severe side.
        assert_eq!(indicator_score(IndicatorKind::YieldCurve, 0.0), 40.0);
        assert_eq!(indicator_score(IndicatorKind::Unemployment, 275.0), 50.0);
        assert_eq!(indicator_score(IndicatorKind::GdpGrowth, 1.0), 20.0);
    }

    #[test]
    fn live_values_override_reference_readings() {
        let latest: Vec<(IndicatorKind, Option<f64>)> = IndicatorKind::ALL
            .iter()
            .map(|&kind| {
                // A uniformly healthy economy.
                let healthy = match kind {
                    IndicatorKind::YieldCurve => 1.5,
                    IndicatorKind::Unemployment => 200.0,
                    IndicatorKind::GdpGrowth => 2.5,
                    IndicatorKind::ConsumerSentiment => 90.0,
                    IndicatorKind::LeadingIndicators => 103.0,
                    IndicatorKind::HousingPermits => 1500.0,
                };
                (kind, Some(healthy))
            })
            .collect();
        // 10*.25 + 20*.15 + 20*.2 + 15*.1 + 15*.2 + 10*.1 = 15
        assert_eq!(recession_probability(&latest), 15);
    }

    #[test]
    fn missing_pipelines_fall_back_per_indicator() {
        let latest: Vec<(IndicatorKind, Option<f64>)> =
            IndicatorKind::ALL.iter().map(|&k| (k, None)).collect();
        assert_eq!(recession_probability(&latest), 78);
    }
}
