//! Numeric constants shared across the engine.
//!
//! The original SWMM control interpreter hard-codes these directly in
//! `controls.c`; collecting them here keeps every module referencing the
//! same named constant instead of repeating the literal.

/// Depth of the RPN control stack (`MAX_STACK` in the original source).
pub const MAX_STACK: usize = 1000;

/// Sentinel result for divide-by-zero (non-zero dividend) and out-of-domain
/// `asin`/`acos` arguments.
pub const BIG_NUMBER: f64 = 1e32;

/// Tolerance used by stack equality comparisons (`[X=Y]`, `[X<>Y]`, ...).
pub const EPSILON: f64 = 1e-20;

/// Relative-error zeroing tolerance for PID controllers.
pub const TINY: f64 = 1e-4;

/// Below this absolute PID update, the update is treated as zero.
pub const PID_MIN_UPDATE: f64 = 1e-4;

/// Stack equality tolerance check.
pub fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}
