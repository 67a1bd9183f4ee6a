//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a jewelry shop the stakes are worse: a 22k gold set can run         │
//! │  hundreds of thousands of rupees, and a mis-rounded 0.5% discount       │
//! │  is real money.                                                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every price, discount, tax, and total is an i64 count of the        │
//! │    smallest currency unit. Rounding happens in exactly one place       │
//! │    (basis-point multiplication) and is half-up by policy.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aymur_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099);
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! let total = price + Money::from_cents(500);
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// CatalogItem.price_cents ──► CartItem.unit_price (frozen at add time)
///                                     │
///                                     ▼
/// line base ──► line discount ──► subtotal ──► order discount
///                                     │
///                                     ▼
///                         taxable base ──► tax ──► grand total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use aymur_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
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

    /// Returns the smaller of two amounts.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    /// Floors the value at zero.
    ///
    /// The pricing engine uses this as the final safety net on every derived
    /// amount: a discount may arithmetically exceed its base, the result of
    /// subtracting it never goes below zero.
    ///
    /// ## Example
    /// ```rust
    /// use aymur_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-50).clamp_non_negative().cents(), 0);
    /// assert_eq!(Money::from_cents(50).clamp_non_negative().cents(), 50);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(self) -> Money {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// Saturates at the i64 bounds; an absurd price × quantity pair clamps
    /// instead of overflowing, keeping the engine panic-free.
    ///
    /// ## Example
    /// ```rust
    /// use aymur_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// let line_base = unit_price.multiply_quantity(3);
    /// assert_eq!(line_base.cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns a basis-point portion of this amount, rounded half-up.
    ///
    /// This is the single place percentage arithmetic happens: percentage
    /// discounts and order-level percentage discounts all call through here.
    ///
    /// ## Implementation
    /// Integer math in a 128-bit intermediate: `(cents × bps + 5000) / 10000`.
    /// The +5000 provides half-up rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use aymur_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(10_000);
    /// assert_eq!(subtotal.portion_bps(1000).cents(), 1000); // 10%
    /// assert_eq!(Money::from_cents(999).portion_bps(825).cents(), 82); // 82.4 rounds down
    /// ```
    pub fn portion_bps(&self, bps: u32) -> Money {
        // i128 prevents overflow on large amounts
        let portion = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(portion as i64)
    }

    /// Calculates tax on this amount at the given rate.
    ///
    /// Callers are expected to pass the **post-discount taxable base**, never
    /// the raw subtotal; the engine enforces that ordering in
    /// [`crate::cart::Cart::totals`].
    ///
    /// ## Example
    /// ```rust
    /// use aymur_core::money::Money;
    /// use aymur_core::types::TaxRate;
    ///
    /// let base = Money::from_cents(1000);
    /// let rate = TaxRate::from_bps(825); // 8.25%
    ///
    /// // 1000 × 8.25% = 82.5 → rounds half-up to 83
    /// assert_eq!(base.calculate_tax(rate).cents(), 83);
    /// ```
    #[inline]
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.portion_bps(rate.bps())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a plain decimal format.
///
/// ## Note
/// This is for debugging and logs. Use `ShopConfig::format_currency` in the
/// state layer for user-facing display (currency symbol, grouping, decimals).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations). Saturating, like
/// [`Money::multiply_quantity`].
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

/// Multiplication by i64. Saturating, like [`Money::multiply_quantity`].
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_cents(-1).clamp_non_negative().cents(), 0);
        assert_eq!(Money::from_cents(0).clamp_non_negative().cents(), 0);
        assert_eq!(Money::from_cents(1).clamp_non_negative().cents(), 1);
    }

    #[test]
    fn test_portion_bps_exact() {
        // 10,000 at 10% = 1,000, no rounding involved
        assert_eq!(Money::from_cents(10_000).portion_bps(1000).cents(), 1000);
    }

    #[test]
    fn test_portion_bps_rounds_half_up() {
        // 1,000 at 8.25% = 82.5 → 83
        assert_eq!(Money::from_cents(1000).portion_bps(825).cents(), 83);
        // 999 at 8.25% = 82.4175 → 82
        assert_eq!(Money::from_cents(999).portion_bps(825).cents(), 82);
    }

    #[test]
    fn test_multiply_saturates_instead_of_overflowing() {
        // A maximal price times a maximal line quantity clamps, never panics
        let extreme = Money::from_cents(i64::MAX);
        assert_eq!(extreme.multiply_quantity(999).cents(), i64::MAX);
        assert_eq!((extreme * 999i64).cents(), i64::MAX);
        assert_eq!((extreme * 2i32).cents(), i64::MAX);
        assert_eq!(
            Money::from_cents(i64::MIN).multiply_quantity(2).cents(),
            i64::MIN
        );
    }

    #[test]
    fn test_portion_bps_large_amount_no_overflow() {
        // A billion-cent amount would overflow i64 multiplication without i128
        let big = Money::from_cents(5_000_000_000_000);
        assert_eq!(big.portion_bps(825).cents(), 412_500_000_000);
    }

    #[test]
    fn test_tax_calculation() {
        let amount = Money::from_cents(1000);
        assert_eq!(amount.calculate_tax(TaxRate::from_bps(1000)).cents(), 100);
        assert_eq!(amount.calculate_tax(TaxRate::from_bps(825)).cents(), 83);
        assert_eq!(amount.calculate_tax(TaxRate::zero()).cents(), 0);
    }

    #[test]
    fn test_min() {
        let a = Money::from_cents(300);
        let b = Money::from_cents(500);
        assert_eq!(a.min(b).cents(), 300);
        assert_eq!(b.min(a).cents(), 300);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }
}
