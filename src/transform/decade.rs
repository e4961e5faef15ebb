//! Decade buckets.

/// Width of a time bucket in years.
pub const DECADE_WIDTH: i64 = 10;

/// Round a year down to the nearest multiple of ten.
///
/// Uses floor division, so negative years bucket downwards too (`-5 -> -10`).
/// Widened to `i64` so every `i32` year has a bucket.
pub fn decade_of(year: i32) -> i64 {
    i64::from(year).div_euclid(DECADE_WIDTH) * DECADE_WIDTH
}
