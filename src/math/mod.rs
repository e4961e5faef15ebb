//! Numerical kernels: least squares and distribution tails.

pub mod dist;
pub mod ols;

pub use dist::*;
pub use ols::*;
