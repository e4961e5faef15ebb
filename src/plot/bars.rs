//! Bar charts over classified records.
//!
//! - acquisition-type distribution
//! - acquisition type by department (stacked, proportional)
//! - accessions per decade

use std::collections::BTreeMap;

use crate::domain::{AcquisitionType, ClassifiedRecord};
use crate::report::truncate;

const LABEL_WIDTH: usize = 28;

/// One bar per acquisition type, scaled to the largest count.
pub fn render_type_distribution(records: &[ClassifiedRecord], width: usize) -> String {
    let mut counts: BTreeMap<AcquisitionType, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.acquisition_type).or_default() += 1;
    }

    let total = records.len();
    let bars: Vec<(String, usize)> = AcquisitionType::ALL
        .iter()
        .map(|t| (t.display_name().to_string(), counts.get(t).copied().unwrap_or(0)))
        .collect();
    render_bars(&bars, total, width, 13)
}

/// One bar per decade with the number of accessions.
pub fn render_decade_histogram(records: &[ClassifiedRecord], width: usize) -> String {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.decade).or_default() += 1;
    }

    let bars: Vec<(String, usize)> = counts.into_iter().map(|(d, n)| (format!("{d}s"), n)).collect();
    render_bars(&bars, records.len(), width, 6)
}

fn render_bars(bars: &[(String, usize)], total: usize, width: usize, label_width: usize) -> String {
    let width = width.max(1);
    let max = bars.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);
    let total = total.max(1) as f64;

    let mut out = String::new();
    for (label, n) in bars {
        let len = scaled(*n, max, width);
        let line = format!(
            "{:<label_width$} |{}{} {:>8} ({:>5.1}%)",
            label,
            "#".repeat(len),
            " ".repeat(width - len),
            n,
            100.0 * *n as f64 / total
        );
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Stacked share of each acquisition type per department.
///
/// `G` = Philanthropy, `P` = Purchase, `.` = Other. Every bar has the same
/// width, so bars compare composition rather than volume.
pub fn render_type_by_department(records: &[ClassifiedRecord], width: usize) -> String {
    let width = width.max(1);
    let mut by_dept: BTreeMap<&str, [usize; 3]> = BTreeMap::new();
    for r in records {
        let slot = match r.acquisition_type {
            AcquisitionType::Philanthropy => 0,
            AcquisitionType::Purchase => 1,
            AcquisitionType::Other => 2,
        };
        by_dept.entry(r.department()).or_default()[slot] += 1;
    }

    let mut out = String::new();
    for (dept, [gift, purchase, other]) in by_dept {
        let total = gift + purchase + other;
        let gift_end = scaled(gift, total, width);
        let purchase_end = scaled(gift + purchase, total, width);
        let bar = format!(
            "{}{}{}",
            "G".repeat(gift_end),
            "P".repeat(purchase_end - gift_end),
            ".".repeat(width - purchase_end)
        );
        out.push_str(&format!(
            "{:<LABEL_WIDTH$} |{bar}| n={total}\n",
            truncate(dept, LABEL_WIDTH)
        ));
    }
    out.push_str("  G = Philanthropy, P = Purchase, . = Other\n");
    out
}

/// `round(n / max * width)`, clamped to `width`.
fn scaled(n: usize, max: usize, width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    (((n as f64 / max as f64) * width as f64).round() as usize).min(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NormalizedRecord;

    fn rec(dept: &str, year: i32, label: AcquisitionType) -> ClassifiedRecord {
        ClassifiedRecord {
            record: NormalizedRecord {
                object_id: String::new(),
                department: dept.to_string(),
                credit_line: String::new(),
                accession_year: year,
            },
            acquisition_type: label,
            decade: crate::transform::decade_of(year),
        }
    }

    fn sample() -> Vec<ClassifiedRecord> {
        use AcquisitionType::*;
        vec![
            rec("Arms", 1951, Philanthropy),
            rec("Arms", 1952, Philanthropy),
            rec("Arms", 1961, Purchase),
            rec("Arms", 1962, Other),
            rec("Prints", 1963, Purchase),
        ]
    }

    #[test]
    fn type_distribution_scales_to_max() {
        let txt = render_type_distribution(&sample(), 4);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Philanthropy  |####        2 ( 40.0%)");
        assert_eq!(lines[1], "Purchase      |####        2 ( 40.0%)");
        assert_eq!(lines[2], "Other         |##          1 ( 20.0%)");
    }

    #[test]
    fn stacked_bars_fill_width() {
        let txt = render_type_by_department(&sample(), 8);
        let lines: Vec<&str> = txt.lines().collect();
        assert!(lines[0].ends_with("|GGGGPP..| n=4"), "{}", lines[0]);
        assert!(lines[1].ends_with("|PPPPPPPP| n=1"), "{}", lines[1]);
    }

    #[test]
    fn decade_histogram_in_order() {
        let txt = render_decade_histogram(&sample(), 3);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1950s  |##  "));
        assert!(lines[1].starts_with("1960s  |###"));
    }

    #[test]
    fn empty_input_renders_zero_bars() {
        let txt = render_type_distribution(&[], 5);
        assert_eq!(txt.lines().count(), 3);
        assert!(txt.lines().all(|l| l.contains("|      ")));
    }
}
