//! # Money
//!
//! Every price, discount, tax and total in Crema is a whole number of cents.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  f64:   0.10 + 0.20  →  0.30000000000000004                             │
//! │  cents: 3 × 475 = 1425, tax 1425 × 1000 bps = 142.5 → 143 (half-up)     │
//! │                                                                         │
//! │  Rounding happens in one place, `Money::percentage`. Sums, differences  │
//! │  and line totals are exact, so the dashboard revenue always equals      │
//! │  the sum of the receipts.                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust
//! use crema_core::money::Money;
//!
//! let flat_white = Money::from_cents(450);
//! let order = flat_white * 2 + Money::from_cents(325);
//! assert_eq!(order.to_string(), "$12.25");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::TaxRate;

/// 100% in basis points.
pub const BPS_SCALE: i64 = 10_000;

/// An amount in cents. Negative values only appear mid-calculation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `bps` basis points of this amount, rounded half-up to the cent.
    ///
    /// Computed in i128 so a large subtotal times 10 000 can't overflow. A
    /// result outside `i64` (only possible above 100%) saturates; pricing
    /// rejects such rates before getting here.
    ///
    /// ```rust
    /// use crema_core::money::Money;
    ///
    /// // 15% of $4.75 is 71.25 cents
    /// assert_eq!(Money::from_cents(475).percentage(1500).cents(), 71);
    /// // 10% of $0.05 is exactly half a cent
    /// assert_eq!(Money::from_cents(5).percentage(1000).cents(), 1);
    /// ```
    pub fn percentage(self, bps: i64) -> Money {
        let half = BPS_SCALE as i128 / 2;
        let scaled = (self.0 as i128 * bps as i128 + half) / BPS_SCALE as i128;
        let cents = i64::try_from(scaled).unwrap_or(if scaled < 0 { i64::MIN } else { i64::MAX });
        Money(cents)
    }

    /// Tax owed on this (already discounted) amount.
    ///
    /// ```rust
    /// use crema_core::money::Money;
    /// use crema_core::types::TaxRate;
    ///
    /// let taxable = Money::from_cents(990);
    /// assert_eq!(taxable.calculate_tax(TaxRate::from_bps(1000)).cents(), 99);
    /// ```
    #[inline]
    pub fn calculate_tax(self, rate: TaxRate) -> Money {
        self.percentage(i64::from(rate.bps()))
    }

    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    #[inline]
    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }
}

/// `$12.34` for receipts and the CLI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "${}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

/// Line total: unit price × quantity.
impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, quantity: i64) -> Money {
        Money(self.0 * quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}
