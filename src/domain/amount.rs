//! Amount type
//!
//! Domain primitives for monetary values. Both types are validated at
//! construction time, so an out-of-range value cannot reach the store.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Largest value that fits a NUMERIC(18, 2) column
const MAX_AMOUNT: &str = "9999999999999999.99";

/// Currency precision (cents)
const MAX_SCALE: u32 = 2;

fn max_amount() -> Decimal {
    Decimal::from_str(MAX_AMOUNT).expect("Invalid MAX_AMOUNT constant")
}

/// Amount represents the value moved by a single transfer.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - At most 2 decimal places
/// - Fits a NUMERIC(18, 2) column
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use minibank::domain::Amount;
///
/// let amount = Amount::new(Decimal::new(150000, 2)).unwrap();
/// assert_eq!(amount.value(), Decimal::new(1500, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

/// Errors that can occur when creating an Amount or a Balance
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(Decimal),

    #[error("Balance cannot be negative (got {0})")]
    Negative(Decimal),

    #[error("Amount has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Amount exceeds maximum allowed value ({MAX_AMOUNT})")]
    Overflow,
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    /// - `AmountError::TooManyDecimals` if more than 2 decimal places
    /// - `AmountError::Overflow` if value does not fit NUMERIC(18, 2)
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }

        // 1500.00 has scale 2 but 1500.000 should still be accepted
        let value = value.normalize();
        if value.scale() > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(value.scale()));
        }

        if value > max_amount() {
            return Err(AmountError::Overflow);
        }

        Ok(Self(value))
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Balance represents the funds held by a user. Unlike Amount, it can be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Balance(Decimal);

impl Balance {
    /// Create a new balance (zero or positive)
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value < Decimal::ZERO {
            return Err(AmountError::Negative(value));
        }

        let value = value.normalize();
        if value.scale() > MAX_SCALE {
            return Err(AmountError::TooManyDecimals(value.scale()));
        }

        if value > max_amount() {
            return Err(AmountError::Overflow);
        }

        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Check if balance is sufficient for withdrawal
    pub fn is_sufficient_for(&self, amount: &Amount) -> bool {
        self.0 >= amount.value()
    }

    /// Add amount to balance
    pub fn credit(&self, amount: &Amount) -> Result<Balance, AmountError> {
        Balance::new(self.0 + amount.value())
    }

    /// Subtract amount from balance
    pub fn debit(&self, amount: &Amount) -> Result<Balance, AmountError> {
        Balance::new(self.0 - amount.value())
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(dec!(100)).unwrap();
        assert_eq!(amount.value(), dec!(100));
    }

    #[test]
    fn test_amount_zero_rejected() {
        assert!(matches!(
            Amount::new(Decimal::ZERO),
            Err(AmountError::NotPositive(_))
        ));
    }

    #[test]
    fn test_amount_negative_rejected() {
        assert!(matches!(
            Amount::new(dec!(-0.01)),
            Err(AmountError::NotPositive(_))
        ));
    }

    #[test]
    fn test_amount_too_many_decimals() {
        assert!(matches!(
            Amount::new(dec!(10.001)),
            Err(AmountError::TooManyDecimals(3))
        ));
    }

    #[test]
    fn test_amount_trailing_zeros_accepted() {
        let amount = Amount::new(dec!(1500.000)).unwrap();
        assert_eq!(amount.value(), dec!(1500));
        assert_eq!(amount.to_string(), "1500.00");
    }

    #[test]
    fn test_amount_overflow() {
        assert!(matches!(
            Amount::new(dec!(10000000000000000)),
            Err(AmountError::Overflow)
        ));
        assert!(Amount::new(dec!(9999999999999999.99)).is_ok());
    }

    #[test]
    fn test_balance_zero_allowed_negative_rejected() {
        assert_eq!(Balance::new(Decimal::ZERO).unwrap(), Balance::zero());
        assert!(matches!(
            Balance::new(dec!(-1)),
            Err(AmountError::Negative(_))
        ));
    }

    #[test]
    fn test_balance_credit_debit() {
        let balance = Balance::new(dec!(5000)).unwrap();
        let amount = Amount::new(dec!(1500)).unwrap();

        let debited = balance.debit(&amount).unwrap();
        assert_eq!(debited.value(), dec!(3500));

        let credited = Balance::new(dec!(2000)).unwrap().credit(&amount).unwrap();
        assert_eq!(credited.value(), dec!(3500));
    }

    #[test]
    fn test_balance_insufficient() {
        let balance = Balance::new(dec!(50)).unwrap();
        let amount = Amount::new(dec!(100)).unwrap();

        assert!(!balance.is_sufficient_for(&amount));
        assert!(matches!(balance.debit(&amount), Err(AmountError::Negative(_))));
    }

    #[test]
    fn test_exact_balance_is_sufficient() {
        let balance = Balance::new(dec!(100)).unwrap();
        let amount = Amount::new(dec!(100)).unwrap();

        assert!(balance.is_sufficient_for(&amount));
        assert_eq!(balance.debit(&amount).unwrap(), Balance::zero());
    }
}
