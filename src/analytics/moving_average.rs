//! Parametrized moving-average engine.
//!
//! One engine serves every indicator; window size, window mode, and cadence
//! handling are configuration, not per-chart code. The engine sorts its input
//! internally and never assumes the caller already did.

use crate::domain::{Frequency, MaPoint, MaSummary, MaWindow, Series, TimePoint};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// A computed moving-average line plus its full-history summary.
#[derive(Debug, Clone, PartialEq)]
pub struct MaResult {
    pub ma_line: Vec<MaPoint>,
    /// Computed over the entire `ma_line`, regardless of any later display
    /// filtering. Recomputing on zoom would make risk levels range-dependent.
    pub summary: MaSummary,
}

/// Compute a moving-average line over a series.
///
/// Count-based windows need `window` prior points before the first value is
/// emitted; time-based windows emit from the first point on, since the window
/// is defined by elapsed days rather than point count. Missing observations
/// shrink the divisor instead of aborting the window; a window with no finite
/// value emits nothing at that position.
pub fn compute(series: &Series, window: MaWindow) -> MaResult {
    let mut sorted = series.points.clone();
    sorted.sort_by_key(|p| p.date);

    let ma_line = match window {
        MaWindow::Points(count) => count_based(&sorted, count),
        MaWindow::DayEquivalentPoints(days) => {
            count_based(&sorted, resolve_day_window(days, series.frequency))
        }
        MaWindow::Days(days) => time_based(&sorted, days),
    };

    let summary = summarize(&ma_line);
    MaResult { ma_line, summary }
}

/// Resolve a day-denominated window into a point count for the given cadence.
///
/// Non-daily series cover many days per observation, so a "200-day" request
/// becomes a small point count: `max(2, ceil(days / period))`. Daily series
/// use the day count unchanged.
pub fn resolve_day_window(days: u32, frequency: Frequency) -> usize {
    match frequency {
        Frequency::Daily => days as usize,
        _ => {
            let period = frequency.period_days();
            (days.div_ceil(period)).max(2) as usize
        }
    }
}

fn count_based(sorted: &[TimePoint], window: usize) -> Vec<MaPoint> {
    let mut ma_line = Vec::new();
    if window == 0 {
        return ma_line;
    }

    for i in 0..sorted.len() {
        // Cold start: the first window-1 positions have too little history.
        if i + 1 < window {
            continue;
        }
        let slice = &sorted[i + 1 - window..=i];
        if let Some(ma) = window_mean(slice.iter()) {
            ma_line.push(MaPoint {
                date: sorted[i].date,
                ma_value: ma,
            });
        }
    }

    ma_line
}

fn time_based(sorted: &[TimePoint], days: u32) -> Vec<MaPoint> {
    let span = days as i64 * MS_PER_DAY;
    let mut ma_line = Vec::with_capacity(sorted.len());

    for (i, point) in sorted.iter().enumerate() {
        let floor = point.date - span;
        // Points are sorted, so the window is a contiguous run ending at i.
        let start = sorted[..=i].partition_point(|p| p.date < floor);
        if let Some(ma) = window_mean(sorted[start..=i].iter()) {
            ma_line.push(MaPoint {
                date: point.date,
                ma_value: ma,
            });
        }
    }

    ma_line
}

/// Mean of the finite values in a window, or `None` when it has none.
fn window_mean<'a>(window: impl Iterator<Item = &'a TimePoint>) -> Option<f64> {
    let mut sum = 0.0;
    let mut valid = 0usize;
    for point in window {
        if let Some(v) = point.value {
            sum += v;
            valid += 1;
        }
    }
    if valid == 0 {
        None
    } else {
        Some(sum / valid as f64)
    }
}

fn summarize(ma_line: &[MaPoint]) -> MaSummary {
    if ma_line.is_empty() {
        return MaSummary::zeroed();
    }

    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    let mut sum = 0.0;
    for p in ma_line {
        high = high.max(p.ma_value);
        low = low.min(p.ma_value);
        sum += p.ma_value;
    }

    MaSummary {
        average: sum / ma_line.len() as f64,
        high,
        low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{epoch_ms, DateRange};
    use crate::series::filter_ma_line;
    use chrono::NaiveDate;

    fn daily_series(values: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| TimePoint {
                date: epoch_ms(start + chrono::Days::new(i as u64)),
                value: Some(*v),
            })
            .collect();
        Series {
            source_id: "TEST".to_string(),
            frequency: Frequency::Daily,
            points,
        }
    }

    #[test]
    fn count_based_cold_start() {
        // 10 points with a 5-point window: values emit at index 4..9.
        let series = daily_series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let result = compute(&series, MaWindow::Points(5));
        assert_eq!(result.ma_line.len(), 6);
        assert_eq!(result.ma_line[0].date, series.points[4].date);
        assert!((result.ma_line[0].ma_value - 3.0).abs() < 1e-12);
        assert!((result.ma_line[5].ma_value - 8.0).abs() < 1e-12);
    }

    #[test]
    fn time_based_emits_for_every_point() {
        let series = daily_series(&[2.0, 4.0, 6.0, 8.0]);
        let result = compute(&series, MaWindow::Days(2));
        assert_eq!(result.ma_line.len(), series.points.len());
        // First point's window contains only itself.
        assert!((result.ma_line[0].ma_value - 2.0).abs() < 1e-12);
        // Third point's 2-day window reaches back to the first.
        assert!((result.ma_line[2].ma_value - 4.0).abs() < 1e-12);
    }

    #[test]
    fn gaps_shrink_the_divisor() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let points = vec![
            TimePoint { date: epoch_ms(start), value: Some(10.0) },
            TimePoint { date: epoch_ms(start + chrono::Days::new(1)), value: None },
            TimePoint { date: epoch_ms(start + chrono::Days::new(2)), value: Some(20.0) },
        ];
        let series = Series {
            source_id: "TEST".to_string(),
            frequency: Frequency::Daily,
            points,
        };
        let result = compute(&series, MaWindow::Points(3));
        assert_eq!(result.ma_line.len(), 1);
        assert!(
            (result.ma_line[0].ma_value - 15.0).abs() < 1e-12,
            "gap must not drag the mean toward zero"
        );
    }

    #[test]
    fn all_gap_window_emits_nothing() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let points = vec![
            TimePoint { date: epoch_ms(start), value: None },
            TimePoint { date: epoch_ms(start + chrono::Days::new(1)), value: None },
        ];
        let series = Series {
            source_id: "TEST".to_string(),
            frequency: Frequency::Daily,
            points,
        };
        let result = compute(&series, MaWindow::Points(2));
        assert!(result.ma_line.is_empty());
        assert_eq!(result.summary, MaSummary::zeroed());
    }

    #[test]
    fn engine_sorts_unsorted_input() {
        let mut series = daily_series(&[1.0, 2.0, 3.0, 4.0]);
        series.points.reverse();
        let result = compute(&series, MaWindow::Points(2));
        assert_eq!(result.ma_line.len(), 3);
        assert!((result.ma_line[0].ma_value - 1.5).abs() < 1e-12);
    }

    #[test]
    fn day_window_resolution_per_cadence() {
        assert_eq!(resolve_day_window(200, Frequency::Daily), 200);
        // ceil(200 / 30) = 7 for monthly data.
        assert_eq!(resolve_day_window(200, Frequency::Monthly), 7);
        // ceil(200 / 7) = 29 for weekly data.
        assert_eq!(resolve_day_window(200, Frequency::Weekly), 29);
        // Tiny day windows still cover at least two observations.
        assert_eq!(resolve_day_window(10, Frequency::Monthly), 2);
    }

    #[test]
    fn summary_is_full_history_even_when_display_filters() {
        let series = daily_series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let result = compute(&series, MaWindow::Points(2));
        let full_summary = result.summary;

        // Zoom into the tail of the line.
        let range = DateRange::from_calendar(
            NaiveDate::from_ymd_opt(2023, 1, 6).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 8).unwrap(),
        );
        let visible = filter_ma_line(&result.ma_line, &range);
        let recomputed = summarize(&visible);

        // Recomputing over the zoomed view yields different numbers, which is
        // exactly why the engine's summary must stay attached to the full line.
        assert!(recomputed.low > full_summary.low);
        assert!(recomputed.average > full_summary.average);
        assert_eq!(full_summary, compute(&series, MaWindow::Points(2)).summary);
    }
}
