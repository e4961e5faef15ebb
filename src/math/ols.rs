//! Ordinary least squares.
//!
//! We solve small regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - SVD for both the solve and the coefficient covariance, so tall design
//!   matrices are handled without forming an explicit inverse.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Rank is decided from the singular values with a relative cutoff of
//!   `RANK_RTOL · σ_max`; rank-deficient designs are rejected up front instead
//!   of being solved with a pseudo-inverse.

use nalgebra::{DMatrix, DVector};

use crate::error::StatsError;

/// Singular values below `RANK_RTOL · σ_max` count as zero.
///
/// Loose enough that exact collinearity survives SVD round-off, tight enough
/// for raw decade columns (values near 2000) next to 0/1 dummies.
const RANK_RTOL: f64 = 1e-10;

/// A least-squares fit with the pieces needed for inference.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub beta: DVector<f64>,
    pub fitted: DVector<f64>,
    pub residuals: DVector<f64>,
    /// Residual sum of squares.
    pub sse: f64,
    /// `(XᵀX)⁻¹`; multiply by σ² for the coefficient covariance.
    pub xtx_inv: DMatrix<f64>,
    pub n_obs: usize,
    pub n_params: usize,
}

impl OlsFit {
    pub fn df_resid(&self) -> usize {
        self.n_obs - self.n_params
    }

    /// Unbiased residual variance estimate `SSE / (n - p)`.
    pub fn sigma2(&self) -> f64 {
        self.sse / self.df_resid() as f64
    }

    /// Standard errors of the coefficients.
    pub fn std_errors(&self) -> Vec<f64> {
        let s2 = self.sigma2();
        (0..self.n_params)
            .map(|j| (s2 * self.xtx_inv[(j, j)]).max(0.0).sqrt())
            .collect()
    }
}

/// Numerical rank of `x`.
pub fn numerical_rank(x: &DMatrix<f64>) -> usize {
    let sv = x.singular_values();
    let tol = rank_tolerance(x, &sv);
    sv.iter().filter(|&&s| s > tol).count()
}

fn rank_tolerance(x: &DMatrix<f64>, singular_values: &DVector<f64>) -> f64 {
    let s_max = singular_values.iter().cloned().fold(0.0, f64::max);
    let machine = x.nrows().max(x.ncols()) as f64 * f64::EPSILON;
    machine.max(RANK_RTOL) * s_max
}

/// Fit `y ~ X` by OLS.
///
/// Fails with `DegenerateModel` when there are no residual degrees of freedom
/// or `X` does not have full column rank.
pub fn fit_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<OlsFit, StatsError> {
    let (n, p) = x.shape();
    if y.len() != n {
        return Err(StatsError::DegenerateModel(format!(
            "response length {} does not match design rows {n}",
            y.len()
        )));
    }
    if n <= p {
        return Err(StatsError::DegenerateModel(format!(
            "{n} observations for {p} parameters (need more observations than parameters)"
        )));
    }

    let rank = numerical_rank(x);
    if rank < p {
        return Err(StatsError::DegenerateModel(format!(
            "design matrix is rank-deficient (rank {rank} < {p} columns)"
        )));
    }

    let svd = x.clone().svd(true, true);
    let tol = rank_tolerance(x, &svd.singular_values);
    let beta = svd
        .solve(y, tol)
        .map_err(|e| StatsError::DegenerateModel(format!("least squares solve failed: {e}")))?;
    if !beta.iter().all(|v| v.is_finite()) {
        return Err(StatsError::DegenerateModel("non-finite coefficients".to_string()));
    }

    let v_t = svd
        .v_t
        .as_ref()
        .ok_or_else(|| StatsError::DegenerateModel("SVD did not produce V".to_string()))?;
    let inv_s2 = DMatrix::from_diagonal(&svd.singular_values.map(|s| 1.0 / (s * s)));
    let xtx_inv = v_t.transpose() * inv_s2 * v_t;

    let fitted = x * &beta;
    let residuals = y - &fitted;
    let sse = residuals.norm_squared();

    Ok(OlsFit {
        beta,
        fitted,
        residuals,
        sse,
        xtx_inv,
        n_obs: n,
        n_params: p,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_ols_standard_errors_match_closed_form() {
        // Simple regression on x = [0,1,2,3], y = [1,3,2,5].
        // β1 = Sxy/Sxx = 5.5/5 = 1.1, β0 = 2.75 - 1.1*1.5 = 1.1
        // residuals: [-0.1, 0.8, -1.3, 0.6], SSE = 2.7, σ² = 1.35
        // se(β1) = sqrt(σ²/Sxx) = sqrt(0.27)
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let y = DVector::from_row_slice(&[1.0, 3.0, 2.0, 5.0]);

        let fit = fit_ols(&x, &y).unwrap();
        assert!((fit.beta[0] - 1.1).abs() < 1e-10);
        assert!((fit.beta[1] - 1.1).abs() < 1e-10);
        assert!((fit.sse - 2.7).abs() < 1e-10);
        assert_eq!(fit.df_resid(), 2);

        let se = fit.std_errors();
        assert!((se[1] - 0.27f64.sqrt()).abs() < 1e-10);
        // se(β0) = sqrt(σ² (1/n + x̄²/Sxx)) = sqrt(1.35 * (0.25 + 0.45))
        assert!((se[0] - (1.35f64 * 0.7).sqrt()).abs() < 1e-10);
    }

    #[test]
    fn fit_ols_rejects_collinear_columns() {
        // Third column equals the intercept.
        let x = DMatrix::from_row_slice(
            4,
            3,
            &[1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 3.0, 1.0],
        );
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0, 5.0]);
        assert!(matches!(fit_ols(&x, &y), Err(StatsError::DegenerateModel(_))));
        assert_eq!(numerical_rank(&x), 2);
    }

    #[test]
    fn fit_ols_needs_residual_degrees_of_freedom() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(matches!(fit_ols(&x, &y), Err(StatsError::DegenerateModel(_))));
    }
}
