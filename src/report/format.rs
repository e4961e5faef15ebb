//! Terminal formatting for run summaries, tables and test results.

use chrono::Local;

use crate::app::pipeline::RunOutput;
use crate::domain::{AcquisitionType, AggregateRow, AnalysisConfig};
use crate::error::StatsError;
use crate::stats::{AnovaTable, ChiSquareResult, RegressionResult, StatisticalReport, CONTINGENCY_COLUMNS};

/// Format the run summary (input counts + label distribution).
pub fn format_run_summary(run: &RunOutput, config: &AnalysisConfig) -> String {
    let mut out = String::new();
    let norm = &run.normalize_stats;

    out.push_str("=== acq - Acquisition Funding Analysis ===\n");
    out.push_str(&format!("Input: {}\n", config.csv_path.display()));
    out.push_str(&format!("Generated: {}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!(
        "Rows: read={} | unreadable={} | kept={} | dropped={} (missing year={}, invalid year={}, before {}={})\n",
        run.rows_read,
        run.row_errors.len(),
        norm.rows_kept,
        norm.rows_dropped(),
        norm.missing_year,
        norm.invalid_year,
        config.min_year,
        norm.before_min_year,
    ));

    let counts = run.label_counts();
    let total = run.classified.len().max(1) as f64;
    out.push_str("\nAcquisition types:\n");
    for label in AcquisitionType::ALL {
        let n = counts.get(&label).copied().unwrap_or(0);
        out.push_str(&format!(
            "  {:<13} {:>8} ({:>5.1}%)\n",
            label.display_name(),
            n,
            100.0 * n as f64 / total
        ));
    }
    out.push_str(&format!(
        "Groups: {} (department, decade) pairs\n",
        run.aggregate.len()
    ));

    out
}

/// Format the aggregate table.
pub fn format_aggregate_table(rows: &[AggregateRow]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<28} {:>6} {:>6} {:>8} {:>6} {:>10} {:>10}",
            "department", "decade", "gifts", "purchase", "total", "gift_ratio", "purch_ratio"
        ),
    );
    push_line(
        &mut out,
        format!(
            "{:-<28} {:-<6} {:-<6} {:-<8} {:-<6} {:-<10} {:-<10}",
            "", "", "", "", "", "", ""
        ),
    );

    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:<28} {:>6} {:>6} {:>8} {:>6} {:>10.3} {:>10.3}",
                truncate(&r.department, 28),
                r.decade,
                r.gift_count,
                r.purchase_count,
                r.total_count,
                r.gift_ratio,
                r.purchase_ratio,
            ),
        );
    }

    out
}

/// Format all three analyses, each as its table or its error.
pub fn format_statistics(report: &StatisticalReport) -> String {
    let mut out = String::new();

    out.push_str("ANOVA: gift_ratio ~ department\n");
    out.push_str(&or_error(&report.anova, format_anova));
    out.push('\n');

    out.push_str("OLS: gift_ratio ~ C(department) + decade\n");
    out.push_str(&or_error(&report.regression, format_regression));
    out.push('\n');

    out.push_str("Chi-square: department x acquisition type (Philanthropy, Purchase)\n");
    out.push_str(&or_error(&report.chi_square, format_chi_square));

    out
}

fn or_error<T>(outcome: &Result<T, StatsError>, fmt: fn(&T) -> String) -> String {
    match outcome {
        Ok(v) => fmt(v),
        Err(e) => format!("  (skipped: {}) {e}\n", e.kind()),
    }
}

pub fn format_anova(t: &AnovaTable) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!("{:<12} {:>12} {:>6} {:>12} {:>10} {:>10}", "source", "sum_sq", "df", "mean_sq", "F", "p"),
    );
    push_line(
        &mut out,
        format!(
            "{:<12} {:>12.6} {:>6} {:>12.6} {:>10.4} {:>10}",
            t.between.source,
            t.between.sum_sq,
            t.between.df,
            t.between.mean_sq,
            t.f_statistic,
            fmt_p(t.p_value)
        ),
    );
    push_line(
        &mut out,
        format!(
            "{:<12} {:>12.6} {:>6} {:>12.6}",
            t.within.source, t.within.sum_sq, t.within.df, t.within.mean_sq
        ),
    );
    out.push_str(&format!(
        "n={} groups={} eta^2={:.4}\n",
        t.n_obs,
        t.n_groups,
        t.eta_squared()
    ));
    out
}

pub fn format_regression(r: &RegressionResult) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!("{:<40} {:>12} {:>12} {:>9} {:>10}", "term", "estimate", "std_err", "t", "p"),
    );
    for c in &r.coefficients {
        push_line(
            &mut out,
            format!(
                "{:<40} {:>12.6} {:>12.6} {:>9.3} {:>10}",
                truncate(&c.term, 40),
                c.estimate,
                c.std_error,
                c.t_statistic,
                fmt_p(c.p_value)
            ),
        );
    }
    out.push_str(&format!(
        "reference department: {}\nR^2={:.4} adj R^2={:.4} F({}, {})={:.4} p={}\nn={}\n",
        r.reference_department,
        r.r_squared,
        r.adj_r_squared,
        r.df_model,
        r.df_resid,
        r.f_statistic,
        fmt_p(r.f_p_value),
        r.n_obs,
    ));
    out
}

pub fn format_chi_square(c: &ChiSquareResult) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!(
            "{:<28} {:>13} {:>13}",
            "department",
            CONTINGENCY_COLUMNS[0].display_name(),
            CONTINGENCY_COLUMNS[1].display_name()
        ),
    );
    for (dept, counts) in c.table.departments.iter().zip(&c.table.counts) {
        push_line(
            &mut out,
            format!("{:<28} {:>13} {:>13}", truncate(dept, 28), counts[0], counts[1]),
        );
    }
    out.push_str(&format!(
        "chi^2={:.4} df={} p={}{}\n",
        c.statistic,
        c.df,
        fmt_p(c.p_value),
        if c.yates_corrected { " (Yates)" } else { "" }
    ));
    if c.low_expected_cells > 0 {
        out.push_str(&format!(
            "warning: {} cell(s) with low expected count; approximation may be unreliable\n",
            c.low_expected_cells
        ));
    }
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_p(p: f64) -> String {
    if p.is_nan() {
        "nan".to_string()
    } else if p < 1e-4 {
        format!("{p:.2e}")
    } else {
        format!("{p:.4}")
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
