//! Whole-unit money type shared by the cash float, balances and withdrawals.
//!
//! Amounts are signed: a balance may sit below zero once a withdrawal has
//! dipped into the overdraft facility.

use std::fmt;
use std::num::ParseIntError;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// A signed integer amount of currency.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use atm_engine::Amount;
///
/// let amount = Amount::from_str("-50").unwrap();
/// assert_eq!(amount.to_string(), "-50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(0);

    pub const fn new(value: i64) -> Self {
        Amount(value)
    }

    /// Returns `true` if this value is below zero.
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, clamping at the `i64` bounds instead of wrapping.
    ///
    /// Used for the available-funds figure, where a huge balance plus a huge
    /// overdraft must still compare correctly against a withdrawal.
    pub fn saturating_add(self, rhs: Self) -> Self {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl FromStr for Amount {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(Amount::from_str("1000").unwrap().to_string(), "1000");
        assert_eq!(Amount::from_str("  -50 ").unwrap().to_string(), "-50");
        assert_eq!(Amount::from_str("0").unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_parse_rejects_non_integers() {
        assert!(Amount::from_str("10.5").is_err());
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let mut a = Amount::new(500);
        a -= Amount::new(550);
        assert_eq!(a, Amount::new(-50));
        assert!(a.is_negative());

        a += Amount::new(100);
        assert_eq!(a, Amount::new(50));
        assert_eq!(Amount::new(3) + Amount::new(4), Amount::new(7));
        assert_eq!(Amount::new(3) - Amount::new(4), Amount::new(-1));
    }

    #[test]
    fn test_saturating_add_does_not_wrap() {
        let big = Amount::new(i64::MAX);
        assert_eq!(big.saturating_add(Amount::new(1)), Amount::new(i64::MAX));
    }

    #[test]
    fn test_ordering() {
        assert!(Amount::new(-1) < Amount::ZERO);
        assert!(Amount::new(700) > Amount::new(600));
    }
}
