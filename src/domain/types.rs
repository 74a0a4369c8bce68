//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the analytics pipeline
//! - exported to JSON/CSV snapshots
//! - reloaded later for re-rendering without refetching

use chrono::{Datelike, NaiveDate, NaiveTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Convert a calendar date to epoch milliseconds at UTC midnight.
///
/// Every series in the system maps its calendar day through this one function,
/// so cross-series date-equality comparisons stay valid regardless of the
/// machine's local time zone.
pub fn epoch_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Inverse of [`epoch_ms`] for display purposes.
pub fn ms_to_date(ms: i64) -> NaiveDate {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.date_naive())
        .unwrap_or_default()
}

/// A single normalized observation.
///
/// `value = None` is an explicitly-missing upstream observation (the source
/// sentinel `"."`). Missing values are excluded from aggregate statistics but
/// may be kept as gaps in a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// Epoch milliseconds at UTC midnight of the observation's calendar day.
    pub date: i64,
    pub value: Option<f64>,
}

/// Sampling cadence of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Approximate days per observation, used to resolve day-denominated
    /// windows into point counts for non-daily series.
    pub fn period_days(self) -> u32 {
        match self {
            Frequency::Daily => 1,
            Frequency::Weekly => 7,
            Frequency::Monthly => 30,
        }
    }
}

/// An ordered, normalized time series.
///
/// Created once by the parser; downstream stages produce new collections
/// rather than mutating the points in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    /// Upstream series code (e.g. `T10Y2Y`) or a fallback dataset label.
    pub source_id: String,
    pub frequency: Frequency,
    /// Sorted ascending by date; dates are unique.
    pub points: Vec<TimePoint>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A date window, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    pub fn from_calendar(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: epoch_ms(start),
            end: epoch_ms(end),
        }
    }

    /// The trailing window ending at `end`, reaching back `years` calendar years.
    pub fn trailing_years(end: NaiveDate, years: i32) -> Self {
        // Feb 29 minus N years may not exist; clamp to Feb 28 in that case.
        let start = end.with_year(end.year() - years).unwrap_or_else(|| {
            NaiveDate::from_ymd_opt(end.year() - years, end.month(), end.day().min(28))
                .unwrap_or(end)
        });
        Self::from_calendar(start, end)
    }

    pub fn contains(&self, date: i64) -> bool {
        self.start <= date && date <= self.end
    }
}

/// One moving-average observation.
///
/// Distinct from [`TimePoint`] so both can be plotted against the same date
/// axis without key collisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaPoint {
    pub date: i64,
    pub ma_value: f64,
}

/// Summary statistics over a full moving-average line.
///
/// Always computed over the entire line, never over a zoomed sub-range, so
/// that risk classification does not change when the visible window does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaSummary {
    pub average: f64,
    pub high: f64,
    pub low: f64,
}

impl MaSummary {
    pub fn zeroed() -> Self {
        Self {
            average: 0.0,
            high: 0.0,
            low: 0.0,
        }
    }

    /// A band with no width cannot position a value inside it.
    pub fn is_degenerate(&self) -> bool {
        !(self.high > self.low)
    }
}

/// Moving-average window specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaWindow {
    /// Trailing window of exactly this many points, regardless of elapsed time.
    Points(usize),
    /// Trailing window of this many calendar days, regardless of point count.
    Days(u32),
    /// A window expressed in days but resolved against the series cadence to a
    /// point count of `max(2, ceil(days / period_days))` for non-daily data.
    /// Daily series use the day count unchanged.
    DayEquivalentPoints(u32),
}

/// Ordinal recession-relevance of one indicator's current reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    /// One notch less severe.
    pub fn relaxed(self) -> Self {
        match self {
            RiskLevel::High => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    /// One notch more severe.
    pub fn tightened(self) -> Self {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

/// Direction in which larger readings move the economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// e.g. unemployment: a reading near its historical high is high risk.
    HigherIsWorse,
    /// e.g. employment ratio or sentiment: a reading near its high is low risk.
    HigherIsBetter,
}

/// Which classification family an indicator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskFamily {
    /// Fixed numeric cut points on the raw reading.
    Threshold,
    /// Position of the reading within its own moving-average band.
    BandPosition,
}

/// Two fixed cut points plus the comparison direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    pub high_cut: f64,
    pub medium_cut: f64,
    /// When true, readings below the cuts are the risky ones.
    pub lower_is_worse: bool,
}

impl ThresholdTable {
    pub fn classify(&self, value: f64) -> RiskLevel {
        if self.lower_is_worse {
            if value < self.high_cut {
                RiskLevel::High
            } else if value < self.medium_cut {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            }
        } else if value > self.high_cut {
            RiskLevel::High
        } else if value > self.medium_cut {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Full risk configuration for one indicator reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskProfile {
    pub family: RiskFamily,
    pub polarity: Polarity,
    /// Used by the threshold family and as the degenerate-band fallback.
    pub thresholds: ThresholdTable,
}

/// A historical recession interval, pre-normalized to epoch milliseconds.
///
/// The reference table is read-only process-wide state; it is never mutated
/// at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecessionPeriod {
    pub start_date: i64,
    pub end_date: i64,
    pub name: &'static str,
}

/// Which Treasury spread the yield-curve indicator tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpreadVariant {
    /// 10-year minus 2-year constant maturity.
    T10y2y,
    /// 10-year minus 3-month constant maturity.
    T10y3m,
}

impl SpreadVariant {
    pub fn series_id(self) -> &'static str {
        match self {
            SpreadVariant::T10y2y => "T10Y2Y",
            SpreadVariant::T10y3m => "T10Y3M",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SpreadVariant::T10y2y => "10Y-2Y",
            SpreadVariant::T10y3m => "10Y-3M",
        }
    }
}

/// Which labor-market series the unemployment indicator tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnemploymentVariant {
    /// Total unemployed persons, thousands.
    Level,
    /// Percent of the labor force unemployed 15 weeks or longer.
    U1Rate,
    /// Employment-population ratio, percent.
    EmRatio,
}

impl UnemploymentVariant {
    pub fn series_id(self) -> &'static str {
        match self {
            UnemploymentVariant::Level => "UNEMPLOY",
            UnemploymentVariant::U1Rate => "U1RATE",
            UnemploymentVariant::EmRatio => "EMRATIO",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            UnemploymentVariant::Level => "Unemployment Level",
            UnemploymentVariant::U1Rate => "Unemployment Rate (U-1)",
            UnemploymentVariant::EmRatio => "Employment-Population Ratio",
        }
    }

    pub fn unit_suffix(self) -> &'static str {
        match self {
            UnemploymentVariant::Level => " thousand",
            UnemploymentVariant::U1Rate | UnemploymentVariant::EmRatio => "%",
        }
    }

    fn risk_profile(self) -> RiskProfile {
        match self {
            UnemploymentVariant::Level => RiskProfile {
                family: RiskFamily::BandPosition,
                polarity: Polarity::HigherIsWorse,
                thresholds: ThresholdTable {
                    high_cut: 250.0,
                    medium_cut: 230.0,
                    lower_is_worse: false,
                },
            },
            UnemploymentVariant::U1Rate => RiskProfile {
                family: RiskFamily::BandPosition,
                polarity: Polarity::HigherIsWorse,
                thresholds: ThresholdTable {
                    high_cut: 2.0,
                    medium_cut: 1.5,
                    lower_is_worse: false,
                },
            },
            UnemploymentVariant::EmRatio => RiskProfile {
                family: RiskFamily::BandPosition,
                polarity: Polarity::HigherIsBetter,
                thresholds: ThresholdTable {
                    high_cut: 58.0,
                    medium_cut: 60.0,
                    lower_is_worse: true,
                },
            },
        }
    }
}

/// The closed set of dashboard indicators.
///
/// Each kind carries its own data source, cadence, moving-average window,
/// risk configuration, and display metadata, looked up once instead of being
/// re-branched on throughout the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum IndicatorKind {
    YieldCurve,
    Unemployment,
    GdpGrowth,
    ConsumerSentiment,
    HousingPermits,
    LeadingIndicators,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 6] = [
        IndicatorKind::YieldCurve,
        IndicatorKind::Unemployment,
        IndicatorKind::GdpGrowth,
        IndicatorKind::ConsumerSentiment,
        IndicatorKind::HousingPermits,
        IndicatorKind::LeadingIndicators,
    ];

    pub fn display_name(self, config: &DashConfig) -> String {
        match self {
            IndicatorKind::YieldCurve => format!(
                "Treasury Yield Curve Spread ({})",
                config.spread_variant.display_name()
            ),
            IndicatorKind::Unemployment => config.unemployment_variant.display_name().to_string(),
            IndicatorKind::GdpGrowth => "GDP Growth Nowcast".to_string(),
            IndicatorKind::ConsumerSentiment => "Consumer Sentiment Index".to_string(),
            IndicatorKind::HousingPermits => "Housing Permits".to_string(),
            IndicatorKind::LeadingIndicators => "Leading Economic Indicators".to_string(),
        }
    }

    /// FRED series ID for the active configuration, if the indicator has a
    /// live upstream source. Indicators without one always use fallback data.
    pub fn series_id(self, config: &DashConfig) -> Option<&'static str> {
        match self {
            IndicatorKind::YieldCurve => Some(config.spread_variant.series_id()),
            IndicatorKind::Unemployment => Some(config.unemployment_variant.series_id()),
            IndicatorKind::GdpGrowth => None,
            IndicatorKind::ConsumerSentiment => Some("UMCSENT"),
            IndicatorKind::HousingPermits => Some("PERMIT"),
            IndicatorKind::LeadingIndicators => None,
        }
    }

    pub fn frequency(self) -> Frequency {
        match self {
            IndicatorKind::YieldCurve => Frequency::Daily,
            IndicatorKind::GdpGrowth | IndicatorKind::LeadingIndicators => Frequency::Weekly,
            IndicatorKind::Unemployment
            | IndicatorKind::ConsumerSentiment
            | IndicatorKind::HousingPermits => Frequency::Monthly,
        }
    }

    pub fn ma_window(self) -> MaWindow {
        match self {
            IndicatorKind::YieldCurve => MaWindow::Days(50),
            IndicatorKind::Unemployment => MaWindow::Days(200),
            IndicatorKind::GdpGrowth => MaWindow::Points(4),
            IndicatorKind::ConsumerSentiment => MaWindow::DayEquivalentPoints(200),
            IndicatorKind::HousingPermits => MaWindow::Points(50),
            IndicatorKind::LeadingIndicators => MaWindow::DayEquivalentPoints(365),
        }
    }

    /// Risk configuration for the active sub-series.
    ///
    /// Cut points and band boundaries are configuration data carried over from
    /// the dashboard's published tables; they are not derived from the data.
    pub fn risk_profile(self, config: &DashConfig) -> RiskProfile {
        match self {
            IndicatorKind::YieldCurve => RiskProfile {
                family: RiskFamily::Threshold,
                polarity: Polarity::HigherIsBetter,
                thresholds: ThresholdTable {
                    high_cut: 0.0,
                    medium_cut: 0.5,
                    lower_is_worse: true,
                },
            },
            IndicatorKind::Unemployment => config.unemployment_variant.risk_profile(),
            IndicatorKind::GdpGrowth => RiskProfile {
                family: RiskFamily::Threshold,
                polarity: Polarity::HigherIsBetter,
                thresholds: ThresholdTable {
                    high_cut: 0.5,
                    medium_cut: 1.0,
                    lower_is_worse: true,
                },
            },
            IndicatorKind::ConsumerSentiment => RiskProfile {
                family: RiskFamily::Threshold,
                polarity: Polarity::HigherIsBetter,
                thresholds: ThresholdTable {
                    high_cut: 60.0,
                    medium_cut: 70.0,
                    lower_is_worse: true,
                },
            },
            IndicatorKind::HousingPermits => RiskProfile {
                family: RiskFamily::BandPosition,
                polarity: Polarity::HigherIsBetter,
                thresholds: ThresholdTable {
                    high_cut: 1100.0,
                    medium_cut: 1300.0,
                    lower_is_worse: true,
                },
            },
            IndicatorKind::LeadingIndicators => RiskProfile {
                family: RiskFamily::Threshold,
                polarity: Polarity::HigherIsBetter,
                thresholds: ThresholdTable {
                    high_cut: 98.5,
                    medium_cut: 100.0,
                    lower_is_worse: true,
                },
            },
        }
    }

    pub fn unit_suffix(self, config: &DashConfig) -> &'static str {
        match self {
            IndicatorKind::YieldCurve => "%",
            IndicatorKind::Unemployment => config.unemployment_variant.unit_suffix(),
            IndicatorKind::GdpGrowth => "%",
            IndicatorKind::ConsumerSentiment => "",
            IndicatorKind::HousingPermits => " thousand",
            IndicatorKind::LeadingIndicators => "",
        }
    }

    /// Decimal places for terminal display of current readings.
    pub fn value_decimals(self, config: &DashConfig) -> usize {
        match self {
            IndicatorKind::YieldCurve => 2,
            IndicatorKind::Unemployment => match config.unemployment_variant {
                UnemploymentVariant::Level => 0,
                _ => 1,
            },
            IndicatorKind::HousingPermits => 0,
            _ => 1,
        }
    }
}

/// One indicator's contribution to the composite recession probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorScore {
    pub kind: IndicatorKind,
    /// Coarse per-indicator probability, 0..100.
    pub score: f64,
    /// Fixed policy weight; the six weights sum to 1.0 by construction.
    pub weight: f64,
}

/// Everything the rendering layer needs for one indicator chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorReport {
    pub kind: IndicatorKind,
    pub source_id: String,
    /// True when the static fallback dataset was substituted for live data.
    pub used_fallback: bool,
    /// Filtered to the visible range, ready to plot on a numeric time axis.
    pub display_series: Vec<TimePoint>,
    /// Filtered to the visible range; `summary` stays full-history.
    pub ma_line: Vec<MaPoint>,
    pub summary: MaSummary,
    /// Points in the full moving-average line, before display filtering.
    pub ma_point_count: usize,
    pub risk_level: RiskLevel,
    pub current_value: Option<f64>,
    pub previous_value: Option<f64>,
    /// Set when the range filter fell back to the full dataset.
    pub warning: Option<String>,
}

/// A full run's configuration as understood by the pipeline.
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub spread_variant: SpreadVariant,
    pub unemployment_variant: UnemploymentVariant,
    pub show_recessions: bool,
    pub show_index: bool,
    /// Skip the FRED API entirely and use the bundled fallback datasets.
    pub offline: bool,
}

impl DashConfig {
    /// The active display window. Defaults to the trailing five years when the
    /// caller supplied no dates.
    pub fn resolved_range(&self, today: NaiveDate) -> DateRange {
        let end = self.end_date.unwrap_or(today);
        match self.start_date {
            Some(start) => DateRange::from_calendar(start, end),
            None => DateRange::trailing_years(end, 5),
        }
    }
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            spread_variant: SpreadVariant::T10y2y,
            unemployment_variant: UnemploymentVariant::Level,
            show_recessions: true,
            show_index: false,
            offline: false,
        }
    }
}

/// A saved dashboard snapshot (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub tool: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub probability: u8,
    pub reports: Vec<IndicatorReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_ms_is_calendar_stable() {
        let d = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(epoch_ms(d), 1_672_531_200_000);
        assert_eq!(ms_to_date(epoch_ms(d)), d);
    }

    #[test]
    fn trailing_range_is_inclusive() {
        let end = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let range = DateRange::trailing_years(end, 5);
        assert!(range.contains(epoch_ms(NaiveDate::from_ymd_opt(2020, 6, 15).unwrap())));
        assert!(range.contains(epoch_ms(end)));
        assert!(!range.contains(epoch_ms(NaiveDate::from_ymd_opt(2020, 6, 14).unwrap())));
    }

    #[test]
    fn threshold_table_direction() {
        let gdp = ThresholdTable {
            high_cut: 0.5,
            medium_cut: 1.0,
            lower_is_worse: true,
        };
        assert_eq!(gdp.classify(0.2), RiskLevel::High);
        assert_eq!(gdp.classify(0.7), RiskLevel::Medium);
        assert_eq!(gdp.classify(2.1), RiskLevel::Low);

        let claims = ThresholdTable {
            high_cut: 250.0,
            medium_cut: 230.0,
            lower_is_worse: false,
        };
        assert_eq!(claims.classify(300.0), RiskLevel::High);
        assert_eq!(claims.classify(240.0), RiskLevel::Medium);
        assert_eq!(claims.classify(215.0), RiskLevel::Low);
    }

    #[test]
    fn risk_level_notches_saturate() {
        assert_eq!(RiskLevel::Medium.relaxed(), RiskLevel::Low);
        assert_eq!(RiskLevel::Medium.tightened(), RiskLevel::High);
        assert_eq!(RiskLevel::Low.relaxed(), RiskLevel::Low);
        assert_eq!(RiskLevel::High.tightened(), RiskLevel::High);
    }

    #[test]
    fn indicator_catalog_lookups() {
        let mut config = DashConfig::default();
        assert_eq!(IndicatorKind::Unemployment.series_id(&config), Some("UNEMPLOY"));
        config.unemployment_variant = UnemploymentVariant::EmRatio;
        assert_eq!(IndicatorKind::Unemployment.series_id(&config), Some("EMRATIO"));
        config.spread_variant = SpreadVariant::T10y3m;
        assert_eq!(IndicatorKind::YieldCurve.series_id(&config), Some("T10Y3M"));

        // Nowcast-style indicators have no live source.
        assert_eq!(IndicatorKind::GdpGrowth.series_id(&config), None);
        assert_eq!(IndicatorKind::LeadingIndicators.series_id(&config), None);

        assert_eq!(IndicatorKind::HousingPermits.ma_window(), MaWindow::Points(50));
        assert_eq!(IndicatorKind::YieldCurve.frequency(), Frequency::Daily);

        // The employment ratio flips band polarity relative to the level.
        let profile = IndicatorKind::Unemployment.risk_profile(&config);
        assert_eq!(profile.polarity, Polarity::HigherIsBetter);
    }
}
