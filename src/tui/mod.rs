//! Ratatui-based terminal UI.
//!
//! The TUI renders one indicator chart at a time with recession shading and an
//! optional market-index overlay, plus a header carrying the current reading,
//! trend, risk badge, and the composite recession probability.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, DashboardData, DashboardRun};
use crate::data::FredClient;
use crate::domain::{
    ms_to_date, DashConfig, IndicatorKind, IndicatorReport, RiskLevel, SpreadVariant,
    UnemploymentVariant,
};
use crate::error::AppError;
use crate::overlay;

mod plotters_chart;

use plotters_chart::{IndicatorChart, ShadedSpan};

/// Start the TUI.
pub fn run(config: DashConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::data(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::data(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::data(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    config: DashConfig,
    client: Option<FredClient>,
    data: Option<DashboardData>,
    run: Option<DashboardRun>,
    selected: usize,
    status: String,
}

impl App {
    fn new(config: DashConfig) -> Result<Self, AppError> {
        let client = if config.offline {
            None
        } else {
            FredClient::from_env().ok()
        };
        let mut app = Self {
            config,
            client,
            data: None,
            run: None,
            selected: 0,
            status: "Loading indicator data...".to_string(),
        };
        app.reload_data()?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::data(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::data(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::data(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Left => {
                self.selected = (self.selected + IndicatorKind::ALL.len() - 1)
                    % IndicatorKind::ALL.len();
            }
            KeyCode::Right => {
                self.selected = (self.selected + 1) % IndicatorKind::ALL.len();
            }
            KeyCode::Char('1') => self.set_range_years(Some(1)),
            KeyCode::Char('2') => self.set_range_years(Some(2)),
            KeyCode::Char('5') => self.set_range_years(Some(5)),
            KeyCode::Char('0') => self.set_range_years(Some(10)),
            KeyCode::Char('a') => self.set_range_years(None),
            KeyCode::Char('o') => {
                self.config.show_recessions = !self.config.show_recessions;
                self.status = format!(
                    "recession shading: {}",
                    if self.config.show_recessions { "on" } else { "off" }
                );
                self.recompute();
            }
            KeyCode::Char('n') => {
                self.config.show_index = !self.config.show_index;
                self.status = format!(
                    "index overlay: {}",
                    if self.config.show_index { "on" } else { "off" }
                );
                // The overlay series may not be loaded yet.
                self.reload_data()?;
            }
            KeyCode::Char('v') => {
                if self.cycle_variant() {
                    self.reload_data()?;
                }
            }
            KeyCode::Char('r') => {
                self.status = "Refreshing data...".to_string();
                self.reload_data()?;
            }
            _ => {}
        }

        Ok(false)
    }

    fn selected_kind(&self) -> IndicatorKind {
        IndicatorKind::ALL[self.selected]
    }

    /// Switch the selected indicator's sub-series, when it has one.
    fn cycle_variant(&mut self) -> bool {
        match self.selected_kind() {
            IndicatorKind::YieldCurve => {
                self.config.spread_variant = match self.config.spread_variant {
                    SpreadVariant::T10y2y => SpreadVariant::T10y3m,
                    SpreadVariant::T10y3m => SpreadVariant::T10y2y,
                };
                self.status = format!("spread: {}", self.config.spread_variant.display_name());
                true
            }
            IndicatorKind::Unemployment => {
                self.config.unemployment_variant = match self.config.unemployment_variant {
                    UnemploymentVariant::Level => UnemploymentVariant::U1Rate,
                    UnemploymentVariant::U1Rate => UnemploymentVariant::EmRatio,
                    UnemploymentVariant::EmRatio => UnemploymentVariant::Level,
                };
                self.status = format!(
                    "series: {}",
                    self.config.unemployment_variant.display_name()
                );
                true
            }
            _ => {
                self.status = "This indicator has a single series.".to_string();
                false
            }
        }
    }

    fn set_range_years(&mut self, years: Option<i32>) {
        let today = today();
        self.config.end_date = None;
        self.config.start_date = match years {
            Some(n) => {
                self.status = format!("range: {n}y");
                // Reuse the trailing-window rule, then peel the start back out.
                let range = crate::domain::DateRange::trailing_years(today, n);
                Some(ms_to_date(range.start))
            }
            None => {
                self.status = "range: max".to_string();
                NaiveDate::from_ymd_opt(1950, 1, 1)
            }
        };
        self.recompute();
    }

    fn reload_data(&mut self) -> Result<(), AppError> {
        let data = pipeline::load_dashboard_data(self.client.as_ref(), &self.config)?;
        let any_fallback = data.indicators.iter().any(|(_, l)| l.used_fallback);
        self.data = Some(data);
        self.status = if self.client.is_none() || self.config.offline {
            "Using bundled fallback data.".to_string()
        } else if any_fallback {
            "Some sources unavailable; fallback data substituted.".to_string()
        } else {
            "Data loaded from FRED.".to_string()
        };
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        let Some(data) = &self.data else {
            self.run = None;
            return;
        };
        self.run = Some(pipeline::run_dashboard(data, &self.config, today()));
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_chart(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("rlens", Style::default().fg(Color::Cyan)),
            Span::raw(" — recession indicators"),
        ]));

        let report = self
            .run
            .as_ref()
            .and_then(|run| run.report(self.selected_kind()));

        let probability = self
            .run
            .as_ref()
            .map(|r| format!("{}%", r.probability))
            .unwrap_or_else(|| "-".to_string());

        let (reading, badge_style, badge_text) = match report {
            Some(report) => {
                let decimals = report.kind.value_decimals(&self.config);
                let suffix = report.kind.unit_suffix(&self.config);
                let reading = match report.current_value {
                    Some(v) => format!("{v:.decimals$}{suffix} {}", trend_glyph(report)),
                    None => "-".to_string(),
                };
                (
                    reading,
                    risk_style(report.risk_level),
                    report.risk_level.label(),
                )
            }
            None => ("-".to_string(), Style::default().fg(Color::Gray), "-"),
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "[{}/{}] {}",
                    self.selected + 1,
                    IndicatorKind::ALL.len(),
                    self.selected_kind().display_name(&self.config)
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {reading}  ")),
            Span::styled(format!(" {badge_text} "), badge_style),
            Span::raw(format!("  recession probability: {probability}")),
        ]));

        if let Some(warning) = report.and_then(|r| r.warning.as_deref()) {
            lines.push(Line::from(Span::styled(
                warning.to_string(),
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(report) = report {
            lines.push(Line::from(Span::styled(
                format!(
                    "window: {} .. {}{}",
                    self.run
                        .as_ref()
                        .map(|r| ms_to_date(r.range.start).to_string())
                        .unwrap_or_default(),
                    self.run
                        .as_ref()
                        .map(|r| ms_to_date(r.range.end).to_string())
                        .unwrap_or_default(),
                    if report.used_fallback { " | fallback data" } else { "" },
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = self.selected_kind().display_name(&self.config);
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let report = self
            .run
            .as_ref()
            .and_then(|run| run.report(self.selected_kind()));
        let (Some(run), Some(report)) = (self.run.as_ref(), report) else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let Some(prep) = chart_series(run, report, &self.config) else {
            let msg = Paragraph::new("No drawable points in this window.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let widget = IndicatorChart {
            series: &prep.series,
            ma_line: &prep.ma_line,
            aux_line: &prep.aux_line,
            shaded: &prep.shaded,
            x_bounds: prep.x_bounds,
            y_bounds: prep.y_bounds,
            y_label: report.kind.unit_suffix(&self.config).trim().to_string(),
            series_color: risk_rgb(report.risk_level),
            fmt_x: fmt_axis_date,
            fmt_y: fmt_axis_value,
        };

        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help =
            "←/→ indicator  v variant  1/2/5/0/a range  o recessions  n index  r refresh  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn trend_glyph(report: &IndicatorReport) -> &'static str {
    match (report.current_value, report.previous_value) {
        (Some(c), Some(p)) if c > p => "▲",
        (Some(c), Some(p)) if c < p => "▼",
        _ => "",
    }
}

fn risk_style(level: RiskLevel) -> Style {
    let fg = match level {
        RiskLevel::Low => Color::Green,
        RiskLevel::Medium => Color::Yellow,
        RiskLevel::High => Color::Red,
    };
    Style::default().fg(Color::Black).bg(fg)
}

/// Risk badge colors shared with the chart's primary line.
fn risk_rgb(level: RiskLevel) -> (u8, u8, u8) {
    match level {
        RiskLevel::Low => (22, 163, 74),
        RiskLevel::Medium => (202, 138, 4),
        RiskLevel::High => (220, 38, 38),
    }
}

struct ChartPrep {
    series: Vec<(f64, f64)>,
    ma_line: Vec<(f64, f64)>,
    aux_line: Vec<(f64, f64)>,
    shaded: Vec<ShadedSpan>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters.
///
/// All gap points are dropped from the drawn line; the auxiliary index is
/// rescaled onto the primary y-axis since a terminal chart has one scale.
fn chart_series(run: &DashboardRun, report: &IndicatorReport, config: &DashConfig) -> Option<ChartPrep> {
    let series: Vec<(f64, f64)> = report
        .display_series
        .iter()
        .filter_map(|p| p.value.map(|v| (p.date as f64, v)))
        .collect();
    if series.is_empty() {
        return None;
    }

    let ma_line: Vec<(f64, f64)> = report
        .ma_line
        .iter()
        .map(|p| (p.date as f64, p.ma_value))
        .collect();

    let x0 = series.first().map(|&(x, _)| x)?;
    let x1 = series.last().map(|&(x, _)| x)?;
    if x1 <= x0 {
        return None;
    }
    let x_bounds = [x0, x1];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in series.iter().chain(ma_line.iter()) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return None;
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    // Recession spans, clipped to the visible x interval.
    let shaded: Vec<ShadedSpan> = if config.show_recessions {
        overlay::align_recession_periods(overlay::historical_recession_periods(), &run.range)
            .iter()
            .filter(|p| (p.end_date as f64) >= x0 && (p.start_date as f64) <= x1)
            .map(|p| ShadedSpan {
                from: (p.start_date as f64).max(x0),
                to: (p.end_date as f64).min(x1),
            })
            .collect()
    } else {
        Vec::new()
    };

    // Rescale the auxiliary index into the primary y-range.
    let aux_line: Vec<(f64, f64)> = if config.show_index && !run.aux_overlay.is_empty() {
        let values: Vec<(f64, f64)> = run
            .aux_overlay
            .iter()
            .filter_map(|p| p.value.map(|v| (p.date as f64, v)))
            .filter(|&(x, _)| x0 <= x && x <= x1)
            .collect();
        let (mut a_min, mut a_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &(_, v) in &values {
            a_min = a_min.min(v);
            a_max = a_max.max(v);
        }
        if values.is_empty() || a_max <= a_min {
            Vec::new()
        } else {
            values
                .into_iter()
                .map(|(x, v)| {
                    let u = (v - a_min) / (a_max - a_min);
                    (x, y_bounds[0] + u * (y_bounds[1] - y_bounds[0]))
                })
                .collect()
        }
    } else {
        Vec::new()
    };

    Some(ChartPrep {
        series,
        ma_line,
        aux_line,
        shaded,
        x_bounds,
        y_bounds,
    })
}

fn fmt_axis_date(v: f64) -> String {
    ms_to_date(v as i64).format("%Y-%m").to_string()
}

fn fmt_axis_value(v: f64) -> String {
    if v.abs() >= 1000.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
