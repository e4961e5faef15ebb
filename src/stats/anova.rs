//! One-way analysis of variance: `gift_ratio ~ department`.
//!
//! Each aggregate row is one observation; its department is the factor level.
//! The decomposition is the classic one:
//!
//! ```text
//! SS_total   = Σ (y - ȳ)²
//! SS_between = Σ_g n_g (ȳ_g - ȳ)²        df = k - 1
//! SS_within  = Σ_g Σ_i (y_gi - ȳ_g)²      df = n - k
//! F          = (SS_between / (k-1)) / (SS_within / (n-k))
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::AggregateRow;
use crate::error::StatsError;
use crate::math::f_upper_tail;
use crate::stats::is_constant;

/// One row of an ANOVA table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaTerm {
    pub source: String,
    pub sum_sq: f64,
    pub df: usize,
    pub mean_sq: f64,
}

/// Result of a one-way ANOVA.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaTable {
    pub between: AnovaTerm,
    pub within: AnovaTerm,
    pub f_statistic: f64,
    pub p_value: f64,
    pub n_obs: usize,
    pub n_groups: usize,
}

impl AnovaTable {
    /// Share of total variance explained by department (η²).
    pub fn eta_squared(&self) -> f64 {
        let total = self.between.sum_sq + self.within.sum_sq;
        if total > 0.0 { self.between.sum_sq / total } else { 0.0 }
    }
}

/// Fit `gift_ratio ~ department` over the aggregate table.
pub fn anova_gift_ratio_by_department(rows: &[AggregateRow]) -> Result<AnovaTable, StatsError> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in rows {
        groups.entry(r.department.as_str()).or_default().push(r.gift_ratio);
    }
    one_way_anova(&groups)
}

fn one_way_anova(groups: &BTreeMap<&str, Vec<f64>>) -> Result<AnovaTable, StatsError> {
    let k = groups.len();
    if k < 2 {
        return Err(StatsError::InsufficientData(format!(
            "ANOVA needs at least two departments with observed rows, found {k}"
        )));
    }

    let n: usize = groups.values().map(Vec::len).sum();
    if n <= k {
        return Err(StatsError::InsufficientData(format!(
            "ANOVA has no within-group degrees of freedom ({n} rows across {k} departments)"
        )));
    }

    if is_constant(groups.values().flatten().copied()) {
        return Err(StatsError::DegenerateModel(
            "gift_ratio is constant across all rows".to_string(),
        ));
    }

    let grand_mean = groups.values().flatten().sum::<f64>() / n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for values in groups.values() {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        ss_between += values.len() as f64 * (mean - grand_mean).powi(2);
        ss_within += values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    }

    let df_between = k - 1;
    let df_within = n - k;
    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    let f_statistic = if ms_within > 0.0 { ms_between / ms_within } else { f64::INFINITY };
    let p_value = f_upper_tail(f_statistic, df_between as f64, df_within as f64)?;

    Ok(AnovaTable {
        between: AnovaTerm {
            source: "department".to_string(),
            sum_sq: ss_between,
            df: df_between,
            mean_sq: ms_between,
        },
        within: AnovaTerm {
            source: "residual".to_string(),
            sum_sq: ss_within,
            df: df_within,
            mean_sq: ms_within,
        },
        f_statistic,
        p_value,
        n_obs: n,
        n_groups: k,
    })
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
    fn anova_matches_hand_computation() {
        // A: [0.2, 0.4] mean 0.3; B: [0.6, 0.8, 1.0] mean 0.8; grand mean 0.6
        // SS_between = 2*0.09 + 3*0.04 = 0.30
        // SS_within  = 0.02 + 0.08 = 0.10
        // F = (0.30/1) / (0.10/3) = 9.0
        let rows = vec![
            row("A", 1950, 0.2),
            row("A", 1960, 0.4),
            row("B", 1950, 0.6),
            row("B", 1960, 0.8),
            row("B", 1970, 1.0),
        ];
        let t = anova_gift_ratio_by_department(&rows).unwrap();
        assert!((t.between.sum_sq - 0.30).abs() < 1e-12);
        assert!((t.within.sum_sq - 0.10).abs() < 1e-12);
        assert_eq!(t.between.df, 1);
        assert_eq!(t.within.df, 3);
        assert!((t.f_statistic - 9.0).abs() < 1e-9);
        // For F(1, 3) = 9, p = P(|t_3| > 3) ≈ 0.0577.
        assert!((t.p_value - 0.0577).abs() < 1e-3, "p={}", t.p_value);
        assert!((t.eta_squared() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn single_decade_department_still_contributes() {
        let rows = vec![row("A", 1950, 0.2), row("B", 1950, 0.5), row("B", 1960, 0.7)];
        let t = anova_gift_ratio_by_department(&rows).unwrap();
        assert_eq!(t.n_groups, 2);
        assert_eq!(t.n_obs, 3);
        assert_eq!(t.within.df, 1);
    }

    #[test]
    fn one_department_is_insufficient() {
        let rows = vec![row("A", 1950, 0.2), row("A", 1960, 0.4)];
        assert!(matches!(
            anova_gift_ratio_by_department(&rows),
            Err(StatsError::InsufficientData(_))
        ));
    }

    #[test]
    fn one_row_per_department_is_insufficient() {
        let rows = vec![row("A", 1950, 0.2), row("B", 1950, 0.4)];
        assert!(matches!(
            anova_gift_ratio_by_department(&rows),
            Err(StatsError::InsufficientData(_))
        ));
    }

    #[test]
    fn constant_ratio_is_degenerate() {
        let rows = vec![row("A", 1950, 0.5), row("A", 1960, 0.5), row("B", 1950, 0.5)];
        assert!(matches!(
            anova_gift_ratio_by_department(&rows),
            Err(StatsError::DegenerateModel(_))
        ));
    }

    #[test]
    fn non_dyadic_constant_ratio_is_degenerate() {
        // 0.1 has no exact binary form; group means pick up rounding error.
        let rows = vec![
            row("A", 1950, 0.1),
            row("A", 1960, 0.1),
            row("A", 1970, 0.1),
            row("B", 1950, 0.1),
            row("B", 1960, 0.1),
        ];
        assert!(matches!(
            anova_gift_ratio_by_department(&rows),
            Err(StatsError::DegenerateModel(_))
        ));
    }

    #[test]
    fn perfect_separation_has_infinite_f() {
        let rows = vec![
            row("A", 1950, 0.2),
            row("A", 1960, 0.2),
            row("B", 1950, 0.8),
            row("B", 1960, 0.8),
        ];
        let t = anova_gift_ratio_by_department(&rows).unwrap();
        assert!(t.f_statistic.is_infinite());
        assert_eq!(t.p_value, 0.0);
    }
}
