//! Money Validation Module
//!
//! All caller-supplied amounts pass through here before any account is
//! touched. Balances and amounts are `rust_decimal::Decimal` end to end;
//! binary floating point never represents money.
//!
//! ## Rules
//! 1. Amounts must be strictly positive
//! 2. Precision is capped: no silent truncation of over-precise input
//! 3. Balance arithmetic is checked, overflow is an explicit error

use rust_decimal::Decimal;
use thiserror::Error;

/// Maximum number of decimal places accepted for a caller-supplied amount.
pub const MAX_AMOUNT_SCALE: u32 = 8;

/// Money validation and arithmetic errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount must be greater than 0")]
    NotPositive,

    #[error("amount precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("amount too large, balance would overflow")]
    Overflow,
}

/// Validate a caller-supplied operation amount.
///
/// # Errors
/// * `NotPositive` - zero or negative amount
/// * `PrecisionOverflow` - more than [`MAX_AMOUNT_SCALE`] decimal places
pub fn validate_amount(amount: Decimal) -> Result<(), MoneyError> {
    if amount <= Decimal::ZERO {
        return Err(MoneyError::NotPositive);
    }
    // normalize() drops trailing zeros, so "1.5000000000" still passes
    let scale = amount.normalize().scale();
    if scale > MAX_AMOUNT_SCALE {
        return Err(MoneyError::PrecisionOverflow {
            provided: scale,
            max: MAX_AMOUNT_SCALE,
        });
    }
    Ok(())
}

/// Checked balance credit
pub fn checked_add(balance: Decimal, amount: Decimal) -> Result<Decimal, MoneyError> {
    balance.checked_add(amount).ok_or(MoneyError::Overflow)
}

/// Checked balance debit
pub fn checked_sub(balance: Decimal, amount: Decimal) -> Result<Decimal, MoneyError> {
    balance.checked_sub(amount).ok_or(MoneyError::Overflow)
}

// ============================================================
// Unit Tests
// ============================================================
