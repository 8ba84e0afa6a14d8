//! Plotters-powered chart widget for Ratatui.
//!
//! Draws any cartesian `ChartSpec` (bar, histogram, horizontal bar, stem,
//! line, scatter). Categories sit at integer positions `0..n`; tick labels
//! map those positions back to series labels.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TuiColor, Style},
    widgets::Widget,
};

use crate::domain::{ChartSpec, ChartType};

/// Render-only wrapper around a chart spec.
pub struct DashPlottersChart<'a> {
    pub spec: &'a ChartSpec,
}

impl<'a> Widget for DashPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(TuiColor::Yellow),
            );
            return;
        }

        let spec = self.spec;
        let chart_type = spec.chart_type;
        let labels: Vec<String> = spec.series.iter().map(|p| p.label.clone()).collect();
        let values: Vec<f64> = spec.series.iter().map(|p| p.value).collect();
        let (category_bounds, value_bounds) = bounds(chart_type, &values);

        let [c0, c1] = category_bounds;
        let [v0, v1] = value_bounds;
        if !(c0.is_finite() && c1.is_finite() && v0.is_finite() && v1.is_finite()) || c1 <= c0 || v1 <= v0 {
            return;
        }

        let x_desc = spec.x_label.clone();
        let y_desc = spec.y_label.clone();
        let tick_count = labels.len().clamp(2, 8);

        // Series styling: keep the palette high-contrast for terminal readability.
        let bar_color = RGBColor(0, 255, 255); // cyan
        let point_color = RGBColor(255, 255, 0); // yellow

        let widget = widget_fn(move |root| {
            let fmt_category = |v: &f64| category_label(&labels, *v);
            let fmt_value = |v: &f64| format!("{v:.1}");

            if chart_type == ChartType::HorizontalBar {
                let mut chart = ChartBuilder::on(&root)
                    .margin(1)
                    .set_label_area_size(LabelAreaPosition::Left, 10)
                    .set_label_area_size(LabelAreaPosition::Bottom, 3)
                    .build_cartesian_2d(v0..v1, c0..c1)?;

                chart
                    .configure_mesh()
                    .disable_x_mesh()
                    .disable_y_mesh()
                    .x_desc(x_desc.as_str())
                    .y_desc(y_desc.as_str())
                    .x_labels(5)
                    .y_labels(tick_count)
                    .x_label_formatter(&fmt_value)
                    .y_label_formatter(&fmt_category)
                    .label_style(("sans-serif", 10).into_font().color(&WHITE))
                    .axis_style(&WHITE)
                    .bold_line_style(&WHITE)
                    .draw()?;

                chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
                    let y = i as f64;
                    Rectangle::new([(0.0, y - 0.4), (v, y + 0.4)], bar_color.filled())
                }))?;

                return Ok(());
            }

            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(c0..c1, v0..v1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(x_desc.as_str())
                .y_desc(y_desc.as_str())
                .x_labels(tick_count)
                .y_labels(5)
                .x_label_formatter(&fmt_category)
                .y_label_formatter(&fmt_value)
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            match chart_type {
                ChartType::Bar | ChartType::Histogram | ChartType::Pie | ChartType::HorizontalBar => {
                    // Histogram bins touch; category bars leave a gap.
                    let half = if chart_type == ChartType::Histogram { 0.5 } else { 0.4 };
                    chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
                        let x = i as f64;
                        Rectangle::new([(x - half, 0.0), (x + half, v)], bar_color.filled())
                    }))?;
                }
                ChartType::Stem => {
                    chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
                        let x = i as f64;
                        PathElement::new(vec![(x, 0.0), (x, v)], bar_color)
                    }))?;
                    chart.draw_series(
                        values
                            .iter()
                            .enumerate()
                            .map(|(i, &v)| Pixel::new((i as f64, v), point_color)),
                    )?;
                }
                ChartType::Line => {
                    chart.draw_series(LineSeries::new(
                        values.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                        &bar_color,
                    ))?;
                    chart.draw_series(
                        values
                            .iter()
                            .enumerate()
                            .map(|(i, &v)| Pixel::new((i as f64, v), point_color)),
                    )?;
                }
                ChartType::Scatter => {
                    // `Circle` radii are mis-scaled by the ratatui backend; a colored
                    // `Pixel` gives a clean dot.
                    chart.draw_series(
                        values
                            .iter()
                            .enumerate()
                            .map(|(i, &v)| Pixel::new((i as f64, v), point_color)),
                    )?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// `(category axis, value axis)` bounds for a chart.
fn bounds(chart_type: ChartType, values: &[f64]) -> ([f64; 2], [f64; 2]) {
    let n = values.len().max(1) as f64;
    let category = [-0.5, n - 0.5];

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        lo = 0.0;
        hi = 1.0;
    }

    let value = match chart_type {
        ChartType::Line | ChartType::Scatter => {
            if hi <= lo {
                [lo - 1.0, hi + 1.0]
            } else {
                let pad = (hi - lo) * 0.05;
                [lo - pad, hi + pad]
            }
        }
        // Bars and stems grow from zero.
        _ => {
            let lo = lo.min(0.0);
            let hi = hi.max(0.0);
            let span = (hi - lo).max(1.0);
            [lo, hi + span * 0.05]
        }
    };

    (category, value)
}

/// Series label at an integer tick position, empty between categories.
fn category_label(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_bounds_start_at_zero() {
        let (category, value) = bounds(ChartType::Bar, &[2.0, 10.0]);
        assert_eq!(category, [-0.5, 1.5]);
        assert_eq!(value[0], 0.0);
        assert!(value[1] > 10.0);
    }

    #[test]
    fn line_bounds_pad_around_values() {
        let (_, value) = bounds(ChartType::Line, &[5.0, 5.0]);
        assert_eq!(value, [4.0, 6.0]);
    }

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let labels = vec!["R1".to_string(), "R2".to_string()];
        assert_eq!(category_label(&labels, 1.0), "R2");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 5.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
