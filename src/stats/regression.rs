//! Multiple linear regression: `gift_ratio ~ C(department) + decade`.
//!
//! Design matrix columns, in order:
//!
//! - `intercept`
//! - one treatment dummy per non-reference department (`department[T.<name>]`);
//!   the alphabetically first department is the reference level
//! - `decade` as a continuous predictor
//!
//! The fit itself is plain OLS (`math::fit_ols`); this module owns encoding,
//! preconditions and the inference table.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use crate::aggregate::departments;
use crate::domain::AggregateRow;
use crate::error::StatsError;
use crate::math::{f_upper_tail, fit_ols, t_two_sided};
use crate::stats::is_constant;

/// One estimated coefficient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    pub term: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
}

/// OLS regression output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResult {
    pub coefficients: Vec<Coefficient>,
    pub reference_department: String,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_p_value: f64,
    pub df_model: usize,
    pub df_resid: usize,
    pub n_obs: usize,
    pub sse: f64,
}

impl RegressionResult {
    pub fn coefficient(&self, term: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.term == term)
    }
}

/// Term name used for a department dummy column.
pub fn department_term(department: &str) -> String {
    format!("department[T.{department}]")
}

/// Fit `gift_ratio ~ C(department) + decade` over the aggregate table.
pub fn regress_gift_ratio(rows: &[AggregateRow]) -> Result<RegressionResult, StatsError> {
    let depts = departments(rows);
    let Some(reference) = depts.first().cloned() else {
        return Err(StatsError::DegenerateModel("aggregate table is empty".to_string()));
    };

    let first_decade = rows[0].decade;
    if rows.iter().all(|r| r.decade == first_decade) {
        return Err(StatsError::DegenerateModel(format!(
            "decade is constant ({first_decade}) and collinear with the intercept"
        )));
    }

    let (x, terms) = design_matrix(rows, &depts);
    let y = DVector::from_iterator(rows.len(), rows.iter().map(|r| r.gift_ratio));

    if is_constant(rows.iter().map(|r| r.gift_ratio)) {
        return Err(StatsError::DegenerateModel(
            "gift_ratio is constant across all rows".to_string(),
        ));
    }

    let y_mean = y.mean();
    let sst: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();

    let fit = fit_ols(&x, &y)?;
    let df_resid = fit.df_resid();
    let df_model = fit.n_params - 1;

    let std_errors = fit.std_errors();
    let mut coefficients = Vec::with_capacity(terms.len());
    for (j, term) in terms.into_iter().enumerate() {
        let estimate = fit.beta[j];
        let std_error = std_errors[j];
        let t_statistic = ratio(estimate, std_error);
        let p_value = t_two_sided(t_statistic, df_resid as f64)?;
        coefficients.push(Coefficient {
            term,
            estimate,
            std_error,
            t_statistic,
            p_value,
        });
    }

    let r_squared = 1.0 - fit.sse / sst;
    let n = fit.n_obs as f64;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (n - 1.0) / df_resid as f64;

    let ms_model = (sst - fit.sse) / df_model as f64;
    let ms_resid = fit.sse / df_resid as f64;
    let f_statistic = ratio(ms_model, ms_resid);
    let f_p_value = f_upper_tail(f_statistic, df_model as f64, df_resid as f64)?;

    Ok(RegressionResult {
        coefficients,
        reference_department: reference,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_p_value,
        df_model,
        df_resid,
        n_obs: fit.n_obs,
        sse: fit.sse,
    })
}

/// Build the treatment-coded design matrix and its column names.
fn design_matrix(rows: &[AggregateRow], depts: &[String]) -> (DMatrix<f64>, Vec<String>) {
    let dummies = &depts[1..];
    let p = 2 + dummies.len();

    let mut terms = Vec::with_capacity(p);
    terms.push("intercept".to_string());
    terms.extend(dummies.iter().map(|d| department_term(d)));
    terms.push("decade".to_string());

    let x = DMatrix::from_fn(rows.len(), p, |i, j| {
        let r = &rows[i];
        if j == 0 {
            1.0
        } else if j == p - 1 {
            r.decade as f64
        } else if r.department == dummies[j - 1] {
            1.0
        } else {
            0.0
        }
    });

    (x, terms)
}

/// `num / den` with the exact-fit cases pinned down: `0/0 -> 0`, `x/0 -> ±inf`.
fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else if num == 0.0 {
        0.0
    } else {
        f64::INFINITY.copysign(num)
    }
}
