//! Fixed-point amount arithmetic and exact price comparison.
//!
//! ## Overview
//!
//! Every amount in the engine is a `u64` counted in the asset's smallest
//! unit (wei-style). The engine never interprets decimals; callers pre-scale
//! to each asset's native precision. All intermediate products go through
//! `u128`, so `a * b / d` and rational price comparison are exact.
//!
//! ## Why No Floating Point?
//!
//! Floating-point arithmetic can produce different results on different
//! hardware, breaking determinism. Settlement must be bit-exact: the same
//! bid stream must always produce the same fills.
//!
//! ## Prices
//!
//! A price is the rational `amount1 / amount0`. It is never materialised as
//! a quotient; comparisons cross-multiply in `u128`:
//!
//! ```
//! use auction_house::types::amount::price_cmp;
//! use std::cmp::Ordering;
//!
//! // 3/2 > 10/7
//! assert_eq!(price_cmp(3, 2, 10, 7), Ordering::Greater);
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::cmp::Ordering;

use crate::error::PoolError;

/// Basis-point denominator for fee ratios (1 bp = 0.01%).
pub const BPS_DENOM: u64 = 10_000;

// ============================================================================
// Checked integer arithmetic
// ============================================================================

/// Compute `a * b / d` rounding down, exactly.
///
/// The product is formed in `u128` so it cannot overflow; the quotient must
/// fit back into `u64`.
///
/// # Errors
///
/// [`PoolError::AmountOverflow`] if `d == 0` or the quotient exceeds
/// `u64::MAX`.
///
/// # Example
///
/// ```
/// use auction_house::types::amount::mul_div_down;
///
/// // 20 * 10 / 40 = 5, the marginal sealed-bid fill rule
/// assert_eq!(mul_div_down(20, 10, 40).unwrap(), 5);
/// ```
pub fn mul_div_down(a: u64, b: u64, d: u64) -> Result<u64, PoolError> {
    if d == 0 {
        return Err(PoolError::AmountOverflow);
    }
    let q = (a as u128) * (b as u128) / (d as u128);
    u64::try_from(q).map_err(|_| PoolError::AmountOverflow)
}

/// Compute `a * b / d` rounding up, exactly.
pub fn mul_div_up(a: u64, b: u64, d: u64) -> Result<u64, PoolError> {
    if d == 0 {
        return Err(PoolError::AmountOverflow);
    }
    let p = (a as u128) * (b as u128);
    let q = p / (d as u128) + u128::from(p % (d as u128) != 0);
    u64::try_from(q).map_err(|_| PoolError::AmountOverflow)
}

/// Checked addition mapped onto the engine error type.
pub fn checked_add(a: u64, b: u64) -> Result<u64, PoolError> {
    a.checked_add(b).ok_or(PoolError::AmountOverflow)
}

/// Checked subtraction mapped onto the engine error type.
pub fn checked_sub(a: u64, b: u64) -> Result<u64, PoolError> {
    a.checked_sub(b).ok_or(PoolError::AmountOverflow)
}

/// Protocol fee on `amount` at `ratio_bps` basis points, rounding down.
///
/// ```
/// use auction_house::types::amount::fee_of;
///
/// assert_eq!(fee_of(10_000, 150).unwrap(), 150); // 1.5%
/// assert_eq!(fee_of(3, 150).unwrap(), 0);        // dust rounds to zero
/// ```
pub fn fee_of(amount: u64, ratio_bps: u64) -> Result<u64, PoolError> {
    mul_div_down(amount, ratio_bps, BPS_DENOM)
}

// ============================================================================
// Exact rational price comparison
// ============================================================================

/// Compare two prices `a1/a0` and `b1/b0` exactly.
///
/// Cross-multiplies in `u128`; `u64 * u64` always fits, so the comparison
/// is exact for every representable amount. Denominators must be non-zero
/// (bid validation rejects `amount0 == 0` before a price is ever formed).
#[inline]
pub fn price_cmp(a1: u64, a0: u64, b1: u64, b0: u64) -> Ordering {
    debug_assert!(a0 > 0 && b0 > 0, "price denominators must be non-zero");
    let lhs = (a1 as u128) * (b0 as u128);
    let rhs = (b1 as u128) * (a0 as u128);
    lhs.cmp(&rhs)
}

// ============================================================================
// Decimal conversions (display / test fixtures only)
// ============================================================================

/// Convert a decimal string to smallest units at the given precision.
///
/// # Example
///
/// ```
/// use auction_house::types::amount::to_units;
///
/// assert_eq!(to_units("1.5", 9), Some(1_500_000_000));
/// assert_eq!(to_units("0.000001", 6), Some(1));
/// assert_eq!(to_units("-1", 9), None);
/// ```
pub fn to_units(s: &str, decimals: u32) -> Option<u64> {
    let d = Decimal::from_str(s).ok()?;
    if d.is_sign_negative() {
        return None;
    }
    let scale = Decimal::from(10u64.checked_pow(decimals)?);
    let scaled = d.checked_mul(scale)?;
    scaled.round_dp(0).to_u64()
}

/// Render smallest units as a decimal string at the given precision.
///
/// # Example
///
/// ```
/// use auction_house::types::amount::from_units;
///
/// assert_eq!(from_units(1_500_000_000, 9), "1.500000000");
/// ```
pub fn from_units(value: u64, decimals: u32) -> String {
    let scale = Decimal::from(10u64.pow(decimals));
    let d = Decimal::from(value) / scale;
    format!("{:.prec$}", d, prec = decimals as usize)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_down_exact() {
        assert_eq!(mul_div_down(10, 20, 5).unwrap(), 40);
        assert_eq!(mul_div_down(7, 3, 2).unwrap(), 10); // 21/2 floors
        assert_eq!(mul_div_down(0, 999, 7).unwrap(), 0);
    }

    #[test]
    fn test_mul_div_down_wide_intermediate() {
        // a * b overflows u64 but the quotient fits
        let a = u64::MAX;
        assert_eq!(mul_div_down(a, 1_000, 1_000).unwrap(), a);
        assert_eq!(mul_div_down(a, 2, 4).unwrap(), a / 2);
    }

    #[test]
    fn test_mul_div_down_overflow() {
        assert!(matches!(
            mul_div_down(u64::MAX, 2, 1),
            Err(PoolError::AmountOverflow)
        ));
        assert!(matches!(
            mul_div_down(1, 1, 0),
            Err(PoolError::AmountOverflow)
        ));
    }

    #[test]
    fn test_mul_div_up() {
        assert_eq!(mul_div_up(7, 3, 2).unwrap(), 11); // 21/2 rounds up
        assert_eq!(mul_div_up(10, 4, 2).unwrap(), 20); // exact stays exact
        assert_eq!(mul_div_up(0, 5, 3).unwrap(), 0);
    }

    #[test]
    fn test_checked_add_sub() {
        assert_eq!(checked_add(1, 2).unwrap(), 3);
        assert!(checked_add(u64::MAX, 1).is_err());
        assert_eq!(checked_sub(3, 2).unwrap(), 1);
        assert!(checked_sub(0, 1).is_err());
    }

    #[test]
    fn test_fee_of() {
        assert_eq!(fee_of(1_000_000, 200).unwrap(), 20_000); // 2%
        assert_eq!(fee_of(1_000_000, 0).unwrap(), 0);
        assert_eq!(fee_of(1, 9_999).unwrap(), 0); // rounds down
        assert_eq!(fee_of(10_000, 10_000).unwrap(), 10_000); // 100%
    }

    #[test]
    fn test_price_cmp_orderings() {
        assert_eq!(price_cmp(1, 1, 1, 1), Ordering::Equal);
        assert_eq!(price_cmp(2, 1, 1, 1), Ordering::Greater);
        assert_eq!(price_cmp(1, 2, 1, 1), Ordering::Less);
        // 5/10 == 20/40 despite different magnitudes
        assert_eq!(price_cmp(5, 10, 20, 40), Ordering::Equal);
    }

    #[test]
    fn test_price_cmp_no_overflow() {
        // Cross products exceed u64 but stay exact in u128
        let big = u64::MAX;
        assert_eq!(price_cmp(big, 1, big, 1), Ordering::Equal);
        assert_eq!(price_cmp(big, 1, big - 1, 1), Ordering::Greater);
        assert_eq!(price_cmp(big - 1, big, big, big - 1), Ordering::Less);
    }

    #[test]
    fn test_to_units() {
        assert_eq!(to_units("1", 9), Some(1_000_000_000));
        assert_eq!(to_units("0.5", 6), Some(500_000));
        assert_eq!(to_units("0", 18), Some(0));
        assert_eq!(to_units("abc", 9), None);
        assert_eq!(to_units("-1.0", 9), None);
    }

    #[test]
    fn test_from_units_roundtrip() {
        for s in ["1.000000", "0.500000", "123.456789"] {
            let v = to_units(s, 6).unwrap();
            assert_eq!(from_units(v, 6), s);
        }
    }
}
