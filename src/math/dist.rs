//! Upper-tail probabilities for the test statistics we report.
//!
//! Thin wrappers over `statrs` that map construction failures (non-positive
//! degrees of freedom) into `StatsError` and pin down the infinite-statistic
//! case, which shows up whenever a model fits its data exactly.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT};

use crate::error::StatsError;

/// `P(F > f)` for an F distribution with `(d1, d2)` degrees of freedom.
pub fn f_upper_tail(f: f64, d1: f64, d2: f64) -> Result<f64, StatsError> {
    let dist = FisherSnedecor::new(d1, d2)
        .map_err(|e| StatsError::Distribution(format!("F({d1}, {d2}): {e}")))?;
    Ok(upper_tail(&dist, f))
}

/// Two-sided `P(|T| > |t|)` for Student's t with `df` degrees of freedom.
pub fn t_two_sided(t: f64, df: f64) -> Result<f64, StatsError> {
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| StatsError::Distribution(format!("t({df}): {e}")))?;
    Ok((2.0 * upper_tail(&dist, t.abs())).min(1.0))
}

/// `P(X² > x)` for a chi-square distribution with `df` degrees of freedom.
pub fn chi2_upper_tail(x: f64, df: f64) -> Result<f64, StatsError> {
    let dist = ChiSquared::new(df)
        .map_err(|e| StatsError::Distribution(format!("chi-square({df}): {e}")))?;
    Ok(upper_tail(&dist, x))
}

fn upper_tail<D: ContinuousCDF<f64, f64>>(dist: &D, x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 0.0;
    }
    dist.sf(x).clamp(0.0, 1.0)
}
