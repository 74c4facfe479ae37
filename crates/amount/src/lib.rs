//! Conversion between raw token amounts and human-scaled decimals.
//!
//! Token contracts store balances as integers in their smallest unit and
//! publish a `decimals` exponent. This crate converts between the two
//! representations exactly:
//! - [`to_decimal`] turns a raw integer into a [`Decimal`]
//! - [`to_wei`] scales a decimal back to a raw integer, truncating excess digits
//!
//! No floating-point arithmetic is involved; `f64` inputs are converted through
//! their shortest round-trip decimal string first.

pub mod decimal;

pub use decimal::Decimal;

use alloy_primitives::U256;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Input is not a valid base-10 number
    #[error("Invalid number format: {0}")]
    InvalidNumberFormat(String),

    /// Value does not fit in 256 bits
    #[error("Amount exceeds 256-bit range")]
    Overflow,
}

/// Values accepted as a raw, smallest-unit token amount.
pub trait RawAmount {
    fn into_raw(self) -> Result<U256, AmountError>;
}

impl RawAmount for U256 {
    fn into_raw(self) -> Result<U256, AmountError> {
        Ok(self)
    }
}

impl RawAmount for u64 {
    fn into_raw(self) -> Result<U256, AmountError> {
        Ok(U256::from(self))
    }
}

impl RawAmount for &str {
    fn into_raw(self) -> Result<U256, AmountError> {
        if self.is_empty() || !self.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::InvalidNumberFormat(self.to_string()));
        }
        U256::from_str_radix(self, 10).map_err(|_| AmountError::Overflow)
    }
}

impl RawAmount for &String {
    fn into_raw(self) -> Result<U256, AmountError> {
        self.as_str().into_raw()
    }
}

/// Values accepted as a human-scaled token amount.
pub trait DecimalAmount {
    fn into_decimal(self) -> Result<Decimal, AmountError>;
}

impl DecimalAmount for Decimal {
    fn into_decimal(self) -> Result<Decimal, AmountError> {
        Ok(self)
    }
}

impl DecimalAmount for &Decimal {
    fn into_decimal(self) -> Result<Decimal, AmountError> {
        Ok(*self)
    }
}

impl DecimalAmount for &str {
    fn into_decimal(self) -> Result<Decimal, AmountError> {
        self.parse()
    }
}

impl DecimalAmount for &String {
    fn into_decimal(self) -> Result<Decimal, AmountError> {
        self.parse()
    }
}

impl DecimalAmount for f64 {
    fn into_decimal(self) -> Result<Decimal, AmountError> {
        Decimal::try_from(self)
    }
}

impl DecimalAmount for u64 {
    fn into_decimal(self) -> Result<Decimal, AmountError> {
        Ok(Decimal::from(self))
    }
}

/// Interpret `raw` as a fixed-point number with `decimals` fractional digits.
pub fn to_decimal(raw: impl RawAmount, decimals: u8) -> Result<Decimal, AmountError> {
    Ok(Decimal::new(raw.into_raw()?, u32::from(decimals)))
}

/// Scale `amount` by `10^decimals`, truncating toward zero.
pub fn to_wei(amount: impl DecimalAmount, decimals: u8) -> Result<U256, AmountError> {
    amount.into_decimal()?.rescale_truncate(u32::from(decimals))
}

/// Render a raw amount for display, e.g. `74605500.647409`.
pub fn format_units(raw: U256, decimals: u8) -> String {
    Decimal::new(raw, u32::from(decimals)).to_string()
}
