//! Three-level risk classification.
//!
//! Two families, selected per indicator:
//!
//! - **threshold**: fixed cut points on the raw reading
//! - **band position**: where the reading sits inside its own full-history
//!   moving-average band, with polarity and a trend nudge in the ambiguous
//!   middle of the band
//!
//! Degenerate inputs (zero-width band, too little history) fall back to the
//! indicator's threshold table instead of dividing by zero. There is no
//! "unknown" level once a reading exists.

use crate::domain::{MaSummary, Polarity, RiskFamily, RiskLevel, RiskProfile};

/// The band positions that bound the ambiguous middle of the moving-average
/// band. Inside it, the trend direction breaks the tie.
const BAND_LOW: f64 = 0.3;
const BAND_MID: f64 = 0.5;
const BAND_HIGH: f64 = 0.7;

/// Minimum moving-average points for band positioning to be meaningful.
const MIN_BAND_POINTS: usize = 3;

/// Classify one indicator reading.
///
/// `previous` feeds the trend adjustment; `ma_points` is the length of the
/// full moving-average line the summary was computed from.
pub fn classify(
    profile: &RiskProfile,
    current: f64,
    previous: Option<f64>,
    summary: &MaSummary,
    ma_points: usize,
) -> RiskLevel {
    match profile.family {
        RiskFamily::Threshold => profile.thresholds.classify(current),
        RiskFamily::BandPosition => {
            if ma_points < MIN_BAND_POINTS || summary.is_degenerate() {
                return profile.thresholds.classify(current);
            }
            band_position_level(profile.polarity, current, previous, summary)
        }
    }
}

fn band_position_level(
    polarity: Polarity,
    current: f64,
    previous: Option<f64>,
    summary: &MaSummary,
) -> RiskLevel {
    let position = (current - summary.low) / (summary.high - summary.low);

    // Severity grows toward 1.0 regardless of the indicator's direction.
    let severity = match polarity {
        Polarity::HigherIsWorse => position,
        Polarity::HigherIsBetter => 1.0 - position,
    };

    let improving = previous.is_some_and(|prev| match polarity {
        Polarity::HigherIsWorse => current < prev,
        Polarity::HigherIsBetter => current > prev,
    });
    let worsening = previous.is_some_and(|prev| match polarity {
        Polarity::HigherIsWorse => current > prev,
        Polarity::HigherIsBetter => current < prev,
    });

    if severity >= BAND_HIGH {
        RiskLevel::High
    } else if severity >= BAND_MID {
        if worsening {
            RiskLevel::Medium.tightened()
        } else {
            RiskLevel::Medium
        }
    } else if severity >= BAND_LOW {
        if improving {
            RiskLevel::Medium.relaxed()
        } else {
            RiskLevel::Medium
        }
    } else {
        RiskLevel::Low
    }
}
