//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Categorical charts (bar, histogram, horizontal bar, pie) are drawn as
//! labelled horizontal bars. Ordinal charts (line, scatter, stem) use a grid:
//! - points: `o`
//! - line segments: `-`
//! - stems: `|`

use crate::domain::{ChartSpec, ChartType};
use crate::report::fmt_number;

const MAX_LABEL: usize = 24;
const MIN_BAR: usize = 10;

/// Render a chart spec as plain text.
pub fn render_chart(spec: &ChartSpec, width: usize, height: usize) -> String {
    let mut out = String::new();
    out.push_str(&spec.title);
    out.push('\n');

    match spec.chart_type {
        ChartType::Bar | ChartType::Histogram | ChartType::HorizontalBar => {
            out.push_str(&format!("x: {} | y: {}\n", spec.x_label, spec.y_label));
            out.push_str(&render_bars(spec, width));
        }
        ChartType::Pie => out.push_str(&render_pie(spec, width)),
        ChartType::Scatter | ChartType::Line | ChartType::Stem => {
            out.push_str(&render_grid(spec, width, height));
        }
    }

    out
}

fn render_bars(spec: &ChartSpec, width: usize) -> String {
    let label_w = label_width(spec);
    let values: Vec<String> = spec.series.iter().map(|p| fmt_number(p.value)).collect();
    let value_w = values.iter().map(|v| v.len()).max().unwrap_or(0);
    let bar_w = width.saturating_sub(label_w + value_w + 3).max(MIN_BAR);
    let max = spec.series.iter().map(|p| p.value).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for (p, value) in spec.series.iter().zip(values) {
        let len = if max > 0.0 {
            ((p.value.max(0.0) / max) * bar_w as f64).round() as usize
        } else {
            0
        };
        let line = format!(
            "{:<label_w$} |{:<bar_w$} {value}",
            truncate(&p.label, label_w),
            "#".repeat(len.min(bar_w)),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn render_pie(spec: &ChartSpec, width: usize) -> String {
    let label_w = label_width(spec);
    let bar_w = width.saturating_sub(label_w + 10).max(MIN_BAR);

    let mut out = String::new();
    for (label, pct) in spec.percentages() {
        let len = ((pct / 100.0) * bar_w as f64).round() as usize;
        let line = format!(
            "{:<label_w$} {:>5.1}% |{}",
            truncate(&label, label_w),
            pct,
            "#".repeat(len.min(bar_w)),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn render_grid(spec: &ChartSpec, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let n = spec.series.len();

    let (mut y_min, y_max) = spec.value_range().unwrap_or((0.0, 1.0));
    if spec.chart_type == ChartType::Stem {
        // Stems grow from zero.
        y_min = y_min.min(0.0);
    }
    let (y_min, y_max) = if y_max > y_min {
        pad_range(y_min, y_max, 0.05)
    } else {
        (y_min - 0.5, y_max + 0.5)
    };

    let mut grid = vec![vec![' '; width]; height];
    let points: Vec<(usize, usize)> = spec
        .series
        .iter()
        .enumerate()
        .map(|(i, p)| (map_x(i, n, width), map_y(p.value, y_min, y_max, height)))
        .collect();

    match spec.chart_type {
        ChartType::Line => {
            for pair in points.windows(2) {
                draw_line(&mut grid, pair[0].0, pair[0].1, pair[1].0, pair[1].1, '-');
            }
        }
        ChartType::Stem => {
            let base = map_y(0.0, y_min, y_max, height);
            for &(x, y) in &points {
                let (top, bottom) = if y <= base { (y, base) } else { (base, y) };
                for row in grid.iter_mut().take(bottom + 1).skip(top) {
                    row[x] = '|';
                }
            }
        }
        _ => {}
    }

    for &(x, y) in &points {
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!("Plot: n={n} | y=[{y_min:.2}, {y_max:.2}] {}\n", spec.y_label).trim_end());
    out.push('\n');

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let ticks: Vec<String> = if spec.chart_type == ChartType::Stem {
        spec.series
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{i}={}", p.label))
            .collect()
    } else {
        spec.series.iter().map(|p| p.label.clone()).collect()
    };
    out.push_str(&format!("x ({}): {}\n", spec.x_label, ticks.join(", ")));

    out
}

fn label_width(spec: &ChartSpec) -> usize {
    spec.series
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL)
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    let width = width.max(2);
    if n <= 1 {
        return width / 2;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
