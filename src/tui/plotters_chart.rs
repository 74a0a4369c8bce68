//! Plotters-powered indicator chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A shaded x-interval (a historical recession).
#[derive(Debug, Clone, Copy)]
pub struct ShadedSpan {
    pub from: f64,
    pub to: f64,
}

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and makes
/// it easy to test the data prep separately.
pub struct IndicatorChart<'a> {
    /// Primary indicator line (finite points only; gaps already removed).
    pub series: &'a [(f64, f64)],
    /// Moving-average line.
    pub ma_line: &'a [(f64, f64)],
    /// Auxiliary index overlay, already rescaled onto the primary y-axis.
    pub aux_line: &'a [(f64, f64)],
    /// Recession intervals, already clipped to the x bounds.
    pub shaded: &'a [ShadedSpan],
    /// X bounds (epoch milliseconds).
    pub x_bounds: [f64; 2],
    /// Y bounds (indicator units).
    pub y_bounds: [f64; 2],
    pub y_label: String,
    /// Primary line color tracks the indicator's risk level.
    pub series_color: (u8, u8, u8),
    /// Formatting of tick labels.
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for IndicatorChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels. Mesh lines are disabled to reduce visual
            // clutter in low-resolution terminal rendering.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(&self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // 1) Recession shading sits behind everything else.
            let shade = RGBColor(220, 53, 69);
            chart.draw_series(self.shaded.iter().map(|span| {
                Rectangle::new(
                    [(span.from, y0), (span.to, y1)],
                    shade.mix(0.25).filled(),
                )
            }))?;

            // 2) Auxiliary index overlay (rescaled onto the primary axis).
            if !self.aux_line.is_empty() {
                let aux_color = RGBColor(0, 128, 255);
                chart.draw_series(LineSeries::new(self.aux_line.iter().copied(), &aux_color))?;
            }

            // 3) Moving-average line.
            if !self.ma_line.is_empty() {
                let ma_color = RGBColor(200, 200, 200);
                chart.draw_series(LineSeries::new(self.ma_line.iter().copied(), &ma_color))?;
            }

            // 4) Primary indicator line, colored by risk.
            let (r, g, b) = self.series_color;
            let series_color = RGBColor(r, g, b);
            chart.draw_series(LineSeries::new(self.series.iter().copied(), &series_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
