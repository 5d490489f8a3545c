//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observations: one marker per series (`*`, `o`, `+`, ...)
//! - consecutive months joined by `.`; gaps in a series stay open

use crate::data::CategoryTable;
use crate::domain::Month;

const MARKERS: [char; 8] = ['*', 'o', '+', 'x', '#', '@', '%', '&'];

/// Render the series `ids` of `table` on one shared axis.
///
/// Meant for one scale group at a time, so every series has a comparable
/// magnitude. Identifiers missing from the table are skipped.
pub fn render_group_plot(table: &CategoryTable, ids: &[String], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let series: Vec<(&str, Vec<(f64, f64)>)> = ids
        .iter()
        .filter_map(|id| {
            let s = table.series(id)?;
            let points = s.points().iter().map(|(m, v)| (m.ordinal() as f64, *v)).collect();
            Some((id.as_str(), points))
        })
        .collect();

    let (x_min, x_max) = x_range(&series).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(&series).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so markers overlay them.
    for (_, points) in &series {
        for pair in points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if x1 - x0 > 1.0 {
                continue;
            }
            draw_line(
                &mut grid,
                map_x(x0, x_min, x_max, width),
                map_y(y0, y_min, y_max, height),
                map_x(x1, x_min, x_max, width),
                map_y(y1, y_min, y_max, height),
                '.',
            );
        }
    }

    for (i, (_, points)) in series.iter().enumerate() {
        let marker = MARKERS[i % MARKERS.len()];
        for &(x, y) in points {
            grid[map_y(y, y_min, y_max, height)][map_x(x, x_min, x_max, width)] = marker;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: months=[{}, {}] | y=[{y_min:.2}, {y_max:.2}]\n",
        Month::from_ordinal(x_min as i32),
        Month::from_ordinal(x_max as i32),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for (i, (id, _)) in series.iter().enumerate() {
        out.push_str(&format!("  {} {id}\n", MARKERS[i % MARKERS.len()]));
    }

    out
}

fn x_range(series: &[(&str, Vec<(f64, f64)>)]) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for (_, points) in series {
        for &(x, _) in points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
    }
    if !min_x.is_finite() || !max_x.is_finite() {
        return None;
    }
    // A single month still needs a non-empty axis.
    if max_x > min_x { Some((min_x, max_x)) } else { Some((min_x, min_x + 1.0)) }
}

fn y_range(series: &[(&str, Vec<(f64, f64)>)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (_, points) in series {
        for &(_, y) in points {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if !min_y.is_finite() || !max_y.is_finite() {
        None
    } else if max_y > min_y {
        Some((min_y, max_y))
    } else {
        Some((min_y - 1.0, max_y + 1.0))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
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
