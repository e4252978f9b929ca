//! Floating-point money comparisons.
//!
//! Amounts are plain `f64` values. Two amounts are considered equal when
//! they differ by less than [`MONEY_TOLERANCE`].

/// Absolute tolerance for money equality, in currency units.
pub const MONEY_TOLERANCE: f64 = 0.01;

/// Whether `amount` counts as zero.
pub fn is_zero(amount: f64) -> bool {
    amount.abs() < MONEY_TOLERANCE
}

/// Whether two amounts differ by no more than the tolerance.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= MONEY_TOLERANCE
}
