//! Date-window selection with a deliberate never-render-an-empty-chart
//! fallback.

use crate::domain::{DateRange, MaPoint, Series, TimePoint};

/// Result of applying a date window to a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    pub points: Vec<TimePoint>,
    /// True when the requested window excluded every point and the full
    /// series was returned instead. Callers surface this as a non-fatal
    /// warning, never an error.
    pub fell_back_to_full: bool,
}

/// Select all points with `start <= date <= end`.
///
/// An absent range returns the full series unfiltered. A range that excludes
/// everything also returns the full series, flagged, so the chart always has
/// something to draw.
pub fn filter_range(series: &Series, range: Option<&DateRange>) -> Filtered {
    let Some(range) = range else {
        return Filtered {
            points: series.points.clone(),
            fell_back_to_full: false,
        };
    };

    let points: Vec<TimePoint> = series
        .points
        .iter()
        .filter(|p| range.contains(p.date))
        .copied()
        .collect();

    if points.is_empty() {
        return Filtered {
            points: series.points.clone(),
            fell_back_to_full: true,
        };
    }

    Filtered {
        points,
        fell_back_to_full: false,
    }
}

/// Restrict a moving-average line to the visible window for display.
///
/// This only trims points; summary statistics are never recomputed from the
/// trimmed line.
pub fn filter_ma_line(ma_line: &[MaPoint], range: &DateRange) -> Vec<MaPoint> {
    ma_line
        .iter()
        .filter(|p| range.contains(p.date))
        .copied()
        .collect()
}
