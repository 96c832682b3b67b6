//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In the browser:                                                        │
//! │    7500 * 0.09 = 675.0000000000001  ❌ CGST off by a hair               │
//! │                                                                         │
//! │  Two call sites rounding differently:                                   │
//! │    Form shows ₹17,700.00, PDF shows ₹17,699.99  → customer calls       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    750000 paise × 900 bps / 10000 = 67500 paise (exact)                │
//! │    Every rounding step is explicit and happens in one place            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use marbleops_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(75_000); // ₹750.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                          // ₹1500.00
//! let total = price + Money::from_rupees_paise(1, 50); // ₹751.50
//! assert_eq!(total.paise(), 75_150);
//! ```
//!
//! Quantities and slab dimensions are decimals (`rust_decimal::Decimal`);
//! [`Money::scale`] is the single bridge from a decimal factor back to paise.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Paise per rupee.
pub const PAISE_PER_RUPEE: i64 = 100;

/// Basis points in 100%.
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: round-off adjustments can be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as a plain integer**: the dashboard formats paise itself
///
/// ## Where Money Flows
/// ```text
/// LineItem.unit_price ──► scale(qty × area) ──► TaxBreakdown.taxable_value
///                                                    │
///                               calculate_tax(bps) ◄─┘
///                                                    │
///                    DocumentTotals.grand_total ◄── round_to_rupee()
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use marbleops_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use marbleops_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees_paise(10, 99).paise(), 1099);
    /// assert_eq!(Money::from_rupees_paise(-5, 50).paise(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the rupee part should be negative.
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * PAISE_PER_RUPEE - paise)
        } else {
            Money(rupees * PAISE_PER_RUPEE + paise)
        }
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * PAISE_PER_RUPEE)
    }

    /// Converts a decimal rupee amount, rounding to the nearest paisa.
    ///
    /// Returns `None` if the value does not fit in i64 paise.
    ///
    /// ## Example
    /// ```rust
    /// use marbleops_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::from_decimal_rupees(Decimal::new(12345, 3)).unwrap(); // 12.345
    /// assert_eq!(price.paise(), 1235);
    /// ```
    pub fn from_decimal_rupees(rupees: Decimal) -> Option<Self> {
        rupees
            .checked_mul(Decimal::from(PAISE_PER_RUPEE))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Money)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / PAISE_PER_RUPEE
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % PAISE_PER_RUPEE).abs()
    }

    /// Returns the value as a decimal rupee amount (exact).
    ///
    /// ## Example
    /// ```rust
    /// use marbleops_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(67_550).to_decimal_rupees().to_string(), "675.50");
    /// ```
    pub fn to_decimal_rupees(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates tax at a rate given in basis points, rounded to the paisa.
    ///
    /// ## Rounding
    /// Half away from zero: ₹0.005 becomes ₹0.01. This is the rounding Indian
    /// GST invoices are printed with.
    ///
    /// ## Implementation
    /// Integer math in i128: `(paise * bps ± 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use marbleops_core::money::Money;
    ///
    /// let taxable = Money::from_rupees(7500);
    ///
    /// // CGST at 9% (half of 18%)
    /// assert_eq!(taxable.calculate_tax(900), Money::from_rupees(675));
    ///
    /// // ₹10.05 at 2.5% = ₹0.25125 → ₹0.25
    /// assert_eq!(Money::from_paise(1005).calculate_tax(250).paise(), 25);
    /// ```
    pub fn calculate_tax(&self, rate_bps: u32) -> Money {
        let tax = div_round_half_away(self.0 as i128 * rate_bps as i128, BPS_SCALE);
        Money::from_paise(tax as i64)
    }

    /// Removes tax from a tax-inclusive amount, returning the pre-tax part.
    ///
    /// `gross × 10000 / (10000 + bps)`, rounded to the paisa.
    ///
    /// ## Example
    /// ```rust
    /// use marbleops_core::money::Money;
    ///
    /// // ₹1180 including 18% GST → ₹1000 taxable
    /// let taxable = Money::from_rupees(1180).exclude_tax(1800);
    /// assert_eq!(taxable, Money::from_rupees(1000));
    /// ```
    pub fn exclude_tax(&self, rate_bps: u32) -> Money {
        let base = div_round_half_away(self.0 as i128 * BPS_SCALE, BPS_SCALE + rate_bps as i128);
        Money::from_paise(base as i64)
    }

    /// Multiplies by a decimal factor (quantity, area), rounding to the paisa.
    ///
    /// Returns `None` if the product leaves the i64 paise range.
    ///
    /// ## Example
    /// ```rust
    /// use marbleops_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// // 2.5 sq ft at ₹99.99
    /// let value = Money::from_paise(9999).scale(Decimal::new(25, 1)).unwrap();
    /// assert_eq!(value.paise(), 24_998); // 24997.5 → 24998
    /// ```
    pub fn scale(&self, factor: Decimal) -> Option<Money> {
        Decimal::from(self.0)
            .checked_mul(factor)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Money)
    }

    /// Rounds to the nearest whole rupee (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use marbleops_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(17_749).round_to_rupee().paise(), 17_700);
    /// assert_eq!(Money::from_paise(17_750).round_to_rupee().paise(), 17_800);
    /// ```
    ///
    /// Never overflows: `i64::MAX` and `i64::MIN` both lie less than half a
    /// rupee from a whole rupee.
    pub fn round_to_rupee(&self) -> Money {
        let rupees = div_round_half_away(self.0 as i128, PAISE_PER_RUPEE as i128);
        Money::from_paise(rupees as i64 * PAISE_PER_RUPEE)
    }

    /// Checked addition.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked sum; `None` if any partial sum overflows.
    ///
    /// ```rust
    /// use marbleops_core::money::Money;
    ///
    /// let lines = [Money::from_rupees(10), Money::from_rupees(5)];
    /// assert_eq!(Money::checked_sum(lines), Some(Money::from_rupees(15)));
    /// assert_eq!(Money::checked_sum([Money::from_paise(i64::MAX), Money::from_paise(1)]), None);
    /// ```
    pub fn checked_sum<I>(values: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        values
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }
}

/// Integer division rounding halves away from zero. `denom` must be positive.
fn div_round_half_away(numer: i128, denom: i128) -> i128 {
    let half = denom / 2;
    if numer >= 0 {
        (numer + half) / denom
    } else {
        (numer - half) / denom
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `₹1234.50`.
///
/// ## Note
/// This is for logs and debugging. Lakh/crore grouping and locale rules
/// belong to the dashboard and the PDF layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(1099).to_string(), "₹10.99");
        assert_eq!(Money::from_paise(500).to_string(), "₹5.00");
        assert_eq!(Money::from_paise(-45).to_string(), "-₹0.45");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupees(10);
        let b = Money::from_rupees(5);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((-b).paise(), -500);
        assert_eq!((a * 3).paise(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total, Money::from_rupees(20));
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        // ₹1.00 at 2.5% = 2.5 paise → 3 paise
        assert_eq!(Money::from_paise(100).calculate_tax(250).paise(), 3);
        // ₹1.00 at 2.4% = 2.4 paise → 2 paise
        assert_eq!(Money::from_paise(100).calculate_tax(240).paise(), 2);
        // Negative amounts mirror positive ones
        assert_eq!(Money::from_paise(-100).calculate_tax(250).paise(), -3);
    }

    #[test]
    fn test_tax_on_large_amounts_does_not_overflow() {
        // ₹1 crore crore (10^14 rupees) at 28%
        let huge = Money::from_paise(10_i64.pow(16));
        assert_eq!(huge.calculate_tax(2800).paise(), 28 * 10_i64.pow(14));
    }

    #[test]
    fn test_exclude_tax() {
        assert_eq!(Money::from_rupees(1050).exclude_tax(500), Money::from_rupees(1000));
        // ₹100 including 12% → 89.2857... → ₹89.29
        assert_eq!(Money::from_rupees(100).exclude_tax(1200).paise(), 8929);
        assert_eq!(Money::from_rupees(100).exclude_tax(0), Money::from_rupees(100));
    }

    #[test]
    fn test_scale() {
        let unit = Money::from_rupees(100);
        assert_eq!(unit.scale(dec!(20)), Some(Money::from_rupees(2000)));
        assert_eq!(unit.scale(dec!(0.125)), Some(Money::from_paise(1250)));
        // ₹0.01 × 0.5 = 0.5 paise → 1 paisa
        assert_eq!(Money::from_paise(1).scale(dec!(0.5)), Some(Money::from_paise(1)));
        assert_eq!(Money::from_paise(i64::MAX).scale(dec!(2)), None);
    }

    #[test]
    fn test_round_to_rupee() {
        assert_eq!(Money::from_paise(17_700).round_to_rupee().paise(), 17_700);
        assert_eq!(Money::from_paise(17_749).round_to_rupee().paise(), 17_700);
        assert_eq!(Money::from_paise(17_750).round_to_rupee().paise(), 17_800);
        assert_eq!(Money::from_paise(-150).round_to_rupee().paise(), -200);
        assert_eq!(Money::from_paise(-149).round_to_rupee().paise(), -100);
        assert_eq!(Money::from_paise(i64::MAX).round_to_rupee().paise(), i64::MAX - 7);
        assert_eq!(Money::from_paise(i64::MIN).round_to_rupee().paise(), i64::MIN + 8);
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));
        assert_eq!(
            Money::checked_sum([Money::from_paise(5_000_000_000_000_000_000); 2]),
            None
        );
        assert_eq!(
            Money::checked_sum([Money::from_paise(i64::MAX), Money::from_paise(-1), Money::from_paise(1)]),
            Some(Money::from_paise(i64::MAX))
        );
    }

    #[test]
    fn test_decimal_conversions() {
        assert_eq!(Money::from_decimal_rupees(dec!(750)), Some(Money::from_rupees(750)));
        assert_eq!(Money::from_decimal_rupees(dec!(0.005)), Some(Money::from_paise(1)));
        assert_eq!(Money::from_paise(123_456).to_decimal_rupees(), dec!(1234.56));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_paise(1).is_positive());
        assert!(Money::from_paise(-1).is_negative());
        assert_eq!(Money::from_paise(-550).abs().paise(), 550);
    }

    #[test]
    fn test_serializes_as_integer_paise() {
        let json = serde_json::to_string(&Money::from_rupees(675)).unwrap();
        assert_eq!(json, "67500");
    }
}
