//! Plotters-powered curve panel widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only description of one chart panel.
///
/// The widget is intentionally data-driven: all series and bounds are computed
/// outside the render call. Curve series arrive pre-split into finite
/// segments, so a non-finite sample (log family outside its domain) simply
/// breaks the plotted line.
pub struct CurvePanel<'a> {
    /// Finite line segments for the primary country.
    pub primary: &'a [Vec<(f64, f64)>],
    /// Finite, dash-chunked segments for the comparison country (empty when
    /// comparison mode is off).
    pub comparison: &'a [Vec<(f64, f64)>],
    /// x positions marked with a dashed vertical line (critical points).
    pub critical: &'a [f64],
    /// x positions marked with a dotted vertical line (inflection points).
    pub inflection: &'a [f64],
    /// X bounds (time).
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Bottom axis description; only the lowest panel carries one.
    pub x_label: Option<&'a str>,
    pub y_label: &'a str,
}

impl Widget for CurvePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 4 {
            buf.set_string(
                area.x,
                area.y,
                "Panel too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the panel readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(
                    LabelAreaPosition::Bottom,
                    if self.x_label.is_some() { 3 } else { 1 },
                )
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in low-resolution
            // terminal rendering; the axes + labels are usually enough here.
            let tick = |v: &f64| format!("{v:.1}");
            let mut mesh = chart.configure_mesh();
            mesh.disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(4)
                .x_label_formatter(&tick)
                .y_label_formatter(&tick)
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE);
            if let Some(label) = self.x_label {
                mesh.x_desc(label);
            }
            mesh.draw()?;

            // Series styling: keep the palette high-contrast for terminal readability.
            let primary_color = RGBColor(0, 255, 255); // cyan
            let comparison_color = RGBColor(255, 0, 255); // magenta
            let critical_color = RGBColor(255, 255, 0); // yellow
            let inflection_color = RGBColor(0, 255, 0); // green

            // 1) Vertical markers first, so the curves draw over them.
            for &cx in self.critical {
                chart.draw_series(
                    vertical_marker(cx, y0, y1, 4, 2)
                        .into_iter()
                        .map(|p| Pixel::new(p, critical_color)),
                )?;
            }
            for &ix in self.inflection {
                chart.draw_series(
                    vertical_marker(ix, y0, y1, 1, 3)
                        .into_iter()
                        .map(|p| Pixel::new(p, inflection_color)),
                )?;
            }

            // 2) Primary curve, one line per finite segment.
            for segment in self.primary {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &primary_color))?;
            }

            // 3) Comparison curve. The segments are pre-chunked into dashes,
            // which keeps the two countries distinguishable even without color.
            for segment in self.comparison {
                chart.draw_series(LineSeries::new(segment.iter().copied(), &comparison_color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Sample a vertical line at `x` into an on/off pixel pattern.
///
/// `on`/`off` control the dash cadence: (4, 2) reads as a dashed line,
/// (1, 3) as a dotted one.
fn vertical_marker(x: f64, y0: f64, y1: f64, on: usize, off: usize) -> Vec<(f64, f64)> {
    const STEPS: usize = 48;
    let mut points = Vec::new();
    let mut i = 0;
    while i < STEPS {
        for j in 0..on {
            let k = i + j;
            if k >= STEPS {
                break;
            }
            let y = y0 + (y1 - y0) * k as f64 / (STEPS - 1) as f64;
            points.push((x, y));
        }
        i += on + off;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashed_marker_has_gaps_and_spans_the_panel() {
        let pts = vertical_marker(2.0, 0.0, 1.0, 4, 2);
        assert!(pts.len() < 48);
        assert!(pts.iter().all(|&(x, _)| x == 2.0));
        assert_eq!(pts[0].1, 0.0);
        assert!(pts.last().unwrap().1 > 0.9);
    }

    #[test]
    fn dotted_marker_is_sparser_than_dashed() {
        let dashed = vertical_marker(1.0, 0.0, 1.0, 4, 2);
        let dotted = vertical_marker(1.0, 0.0, 1.0, 1, 3);
        assert!(dotted.len() < dashed.len());
    }
}
