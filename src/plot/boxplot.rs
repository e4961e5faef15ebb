//! Horizontal box plots of gift ratio per department.
//!
//! Each department's decades are one sample. The axis is fixed to `[0, 1]`.
//! `|` marks min/max, `-` the whiskers, `=` the interquartile box and `M` the median.

use std::collections::BTreeMap;

use crate::domain::AggregateRow;
use crate::plot::ascii::map_x;
use crate::report::truncate;

const LABEL_WIDTH: usize = 28;

/// Five-number summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl FiveNumber {
    /// Summary with linearly interpolated quartiles. `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Render one box per department.
pub fn render_gift_ratio_boxplot(rows: &[AggregateRow], width: usize) -> String {
    let width = width.max(5);
    let mut samples: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in rows {
        samples.entry(r.department.as_str()).or_default().push(r.gift_ratio);
    }

    let mut out = String::new();
    out.push_str(&format!("{:<LABEL_WIDTH$} 0{}1\n", "", " ".repeat(width - 2)));
    for (dept, values) in samples {
        let Some(s) = FiveNumber::from_values(&values) else {
            continue;
        };
        let pos = |v: f64| map_x(v, 0.0, 1.0, width);

        let mut line = vec![' '; width];
        for cell in &mut line[pos(s.min)..=pos(s.max)] {
            *cell = '-';
        }
        for cell in &mut line[pos(s.q1)..=pos(s.q3)] {
            *cell = '=';
        }
        line[pos(s.min)] = '|';
        line[pos(s.max)] = '|';
        line[pos(s.median)] = 'M';

        out.push_str(&format!(
            "{:<LABEL_WIDTH$} {} (n={}, median={:.3})\n",
            truncate(dept, LABEL_WIDTH),
            line.into_iter().collect::<String>(),
            values.len(),
            s.median
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_number_interpolates() {
        let s = FiveNumber::from_values(&[0.4, 0.0, 0.2, 1.0, 0.6]).unwrap();
        assert_eq!(s.min, 0.0);
        assert_eq!(s.max, 1.0);
        assert!((s.q1 - 0.2).abs() < 1e-12);
        assert!((s.median - 0.4).abs() < 1e-12);
        assert!((s.q3 - 0.6).abs() < 1e-12);

        let even = FiveNumber::from_values(&[0.1, 0.3]).unwrap();
        assert!((even.median - 0.2).abs() < 1e-12);
        assert!(FiveNumber::from_values(&[]).is_none());
    }

    #[test]
    fn boxplot_line_layout() {
        let rows: Vec<AggregateRow> = [0.0, 0.2, 0.4, 0.6, 1.0]
            .iter()
            .enumerate()
            .map(|(i, &g)| AggregateRow {
                department: "Arms".to_string(),
                decade: 1900 + 10 * i as i64,
                gift_count: 0,
                purchase_count: 0,
                total_count: 1,
                gift_ratio: g,
                purchase_ratio: 0.0,
            })
            .collect();

        let txt = render_gift_ratio_boxplot(&rows, 11);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 2);
        // min 0 -> col 0, q1 0.2 -> 2, median 0.4 -> 4, q3 0.6 -> 6, max 1 -> 10
        assert!(lines[1].contains(" |-==M==---| (n=5, median=0.400)"), "{}", lines[1]);
    }
}
