//! ASCII grid primitives and the gift-ratio trend chart.
//!
//! This is intentionally "dumb" (fixed-size character grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Trend chart elements:
//! - one marker letter per department (`A`, `B`, ...), listed in a legend
//! - `.` segments joining a department's consecutive decades

use std::collections::BTreeMap;

use crate::domain::AggregateRow;

/// Marker letters assigned to departments in sorted order.
pub(crate) const MARKERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub(crate) fn marker(idx: usize) -> char {
    MARKERS[idx % MARKERS.len()] as char
}

/// Render gift ratio against decade, one series per department.
pub fn render_gift_ratio_trend(rows: &[AggregateRow], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let mut series: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for r in rows {
        series
            .entry(r.department.as_str())
            .or_default()
            .push((r.decade as f64, r.gift_ratio));
    }
    for points in series.values_mut() {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    let (x_min, x_max) = decade_range(rows).unwrap_or((1900.0, 2000.0));
    let (y_min, y_max) = (0.0, 1.0);

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so markers overlay them.
    for points in series.values() {
        let mut prev = None;
        for &(x, y) in points {
            let px = map_x(x, x_min, x_max, width);
            let py = map_y(y, y_min, y_max, height);
            if let Some((x0, y0)) = prev {
                draw_line(&mut grid, x0, y0, px, py, '.');
            }
            prev = Some((px, py));
        }
    }
    for (idx, points) in series.values().enumerate() {
        for &(x, y) in points {
            let px = map_x(x, x_min, x_max, width);
            let py = map_y(y, y_min, y_max, height);
            grid[py][px] = marker(idx);
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: decade=[{x_min:.0}, {x_max:.0}] | gift_ratio=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    for (idx, dept) in series.keys().enumerate() {
        out.push_str(&format!("  {} = {dept}\n", marker(idx)));
    }

    out
}

fn decade_range(rows: &[AggregateRow]) -> Option<(f64, f64)> {
    let min = rows.iter().map(|r| r.decade).min()? as f64;
    let max = rows.iter().map(|r| r.decade).max()? as f64;
    if max > min {
        Some((min, max))
    } else {
        Some(pad_range(min, max, 5.0))
    }
}

pub(crate) fn pad_range(min: f64, max: f64, pad: f64) -> (f64, f64) {
    (min - pad, max + pad)
}

pub(crate) fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

pub(crate) fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only writes into blank cells.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn row(dept: &str, decade: i64, gift_ratio: f64) -> AggregateRow {
        AggregateRow {
            department: dept.to_string(),
            decade,
            gift_count: 0,
            purchase_count: 0,
            total_count: 1,
            gift_ratio,
            purchase_ratio: 0.0,
        }
    }

    #[test]
    fn trend_golden_snapshot_small() {
        let rows = vec![row("Prints", 1990, 1.0), row("Prints", 1900, 0.0)];
        let txt = render_gift_ratio_trend(&rows, 10, 5);
        let expected = concat!(
            "Plot: decade=[1900, 1990] | gift_ratio=[0.00, 1.00]\n",
            "        .A\n",
            "      ..  \n",
            "    ..    \n",
            "  ..      \n",
            "A.        \n",
            "  A = Prints\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn single_decade_is_centered() {
        let rows = vec![row("A", 1950, 0.5), row("B", 1950, 0.0)];
        let txt = render_gift_ratio_trend(&rows, 11, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Plot: decade=[1945, 1955] | gift_ratio=[0.00, 1.00]");
        assert_eq!(lines[3], "     A     ");
        assert_eq!(lines[5], "     B     ");
        assert_eq!(lines[7], "  B = B");
    }

    #[test]
    fn empty_rows_render_blank_grid() {
        let txt = render_gift_ratio_trend(&[], 10, 5);
        assert_eq!(txt.lines().count(), 6);
    }
}
