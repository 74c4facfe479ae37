//! Exact non-negative fixed-point decimal backed by a 256-bit mantissa.

use crate::AmountError;
use alloy_primitives::U256;
use std::{fmt, str::FromStr};

/// A non-negative decimal value equal to `mantissa / 10^scale`.
///
/// Values are kept normalized (no trailing zeros in the fraction), so two
/// decimals compare equal exactly when they denote the same number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    mantissa: U256,
    scale: u32,
}

/// Most fractional digits a [`Decimal`] keeps.
///
/// 255 token decimals plus the 78 digits of the largest `U256`; digits past
/// this point can never reach a converted amount and are truncated.
pub const MAX_SCALE: u32 = 255 + 78;

impl Decimal {
    pub const ZERO: Self = Self {
        mantissa: U256::ZERO,
        scale: 0,
    };

    /// Create a decimal from an integer mantissa and a number of fractional digits.
    ///
    /// Digits beyond [`MAX_SCALE`] fractional places are truncated.
    pub fn new(mantissa: U256, scale: u32) -> Self {
        if scale > MAX_SCALE {
            let mantissa = pow10(scale - MAX_SCALE).map_or(U256::ZERO, |factor| mantissa / factor);
            return Self {
                mantissa,
                scale: MAX_SCALE,
            }
            .normalized();
        }
        Self { mantissa, scale }.normalized()
    }

    pub const fn mantissa(&self) -> U256 {
        self.mantissa
    }

    /// Number of fractional digits.
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Multiply by `10^decimals` and drop any remaining fractional digits.
    pub fn rescale_truncate(&self, decimals: u32) -> Result<U256, AmountError> {
        if decimals >= self.scale {
            if self.mantissa.is_zero() {
                return Ok(U256::ZERO);
            }
            let factor = pow10(decimals - self.scale).ok_or(AmountError::Overflow)?;
            self.mantissa
                .checked_mul(factor)
                .ok_or(AmountError::Overflow)
        } else {
            // A divisor past 10^77 exceeds any U256 mantissa.
            Ok(pow10(self.scale - decimals).map_or(U256::ZERO, |factor| self.mantissa / factor))
        }
    }

    fn normalized(mut self) -> Self {
        if self.mantissa.is_zero() {
            return Self::ZERO;
        }

        let ten = U256::from(10u8);
        while self.scale > 0 {
            let (quotient, remainder) = self.mantissa.div_rem(ten);
            if !remainder.is_zero() {
                break;
            }
            self.mantissa = quotient;
            self.scale -= 1;
        }
        self
    }
}

/// `10^exp`, or `None` when it does not fit in 256 bits.
pub(crate) fn pow10(exp: u32) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}

impl From<U256> for Decimal {
    fn from(value: U256) -> Self {
        Self::new(value, 0)
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self::new(U256::from(value), 0)
    }
}

impl TryFrom<f64> for Decimal {
    type Error = AmountError;

    /// Converts through the shortest decimal string that round-trips to `value`,
    /// so `0.1` becomes exactly `0.1`.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(AmountError::InvalidNumberFormat(value.to_string()));
        }
        format!("{}", value.abs()).parse()
    }
}

impl FromStr for Decimal {
    type Err = AmountError;

    /// Parses `123`, `0.5`, `.5`, `1.` and exponent forms such as `1.5e3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AmountError::InvalidNumberFormat(s.to_string());

        let body = s.strip_prefix('+').unwrap_or(s);
        let (number, exponent) = match body.find(['e', 'E']) {
            Some(idx) => (
                &body[..idx],
                body[idx + 1..].parse::<i64>().map_err(|_| invalid())?,
            ),
            None => (body, 0),
        };

        let (int_part, frac_part) = number.split_once('.').unwrap_or((number, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part
            .bytes()
            .chain(frac_part.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let digits = format!("{int_part}{frac_part}");
        let digits = digits.trim_start_matches('0');
        let mantissa = if digits.is_empty() {
            U256::ZERO
        } else {
            U256::from_str_radix(digits, 10).map_err(|_| AmountError::Overflow)?
        };

        let scale = i64::try_from(frac_part.len())
            .ok()
            .and_then(|len| len.checked_sub(exponent))
            .ok_or_else(invalid)?;

        if scale >= 0 {
            // Anything past u32 is far beyond MAX_SCALE and truncates to zero.
            let scale = u32::try_from(scale).unwrap_or(u32::MAX);
            return Ok(Self::new(mantissa, scale));
        }

        if mantissa.is_zero() {
            return Ok(Self::ZERO);
        }
        let shift = u32::try_from(scale.unsigned_abs()).map_err(|_| AmountError::Overflow)?;
        let factor = pow10(shift).ok_or(AmountError::Overflow)?;
        let mantissa = mantissa.checked_mul(factor).ok_or(AmountError::Overflow)?;
        Ok(Self::new(mantissa, 0))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_string();
        if self.scale == 0 {
            return f.write_str(&digits);
        }

        let scale = self.scale as usize;
        if digits.len() > scale {
            let (integer, fraction) = digits.split_at(digits.len() - scale);
            write!(f, "{integer}.{fraction}")
        } else {
            write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_trailing_zeros() {
        let value = Decimal::new(U256::from(1_500u64), 3);
        assert_eq!(value.mantissa(), U256::from(15u64));
        assert_eq!(value.scale(), 1);
        assert_eq!(value, "1.5".parse().unwrap());
        assert_eq!(Decimal::new(U256::ZERO, 18), Decimal::ZERO);
    }

    #[test]
    fn test_tiny_values_truncate_to_zero() {
        assert_eq!("1e-5000000000".parse::<Decimal>().unwrap(), Decimal::ZERO);
        assert_eq!("1e-4000000000".parse::<Decimal>().unwrap(), Decimal::ZERO);
        assert_eq!("5e-334".parse::<Decimal>().unwrap(), Decimal::ZERO);
        assert_eq!(Decimal::new(U256::from(123u64), 400), Decimal::ZERO);

        let smallest = "5e-333".parse::<Decimal>().unwrap();
        assert_eq!(smallest.scale(), MAX_SCALE);
        assert_eq!(smallest.to_string().len(), 2 + MAX_SCALE as usize);
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!("100".parse::<Decimal>().unwrap(), Decimal::from(100u64));
        assert_eq!("+7".parse::<Decimal>().unwrap(), Decimal::from(7u64));
        assert_eq!(".5".parse::<Decimal>().unwrap().to_string(), "0.5");
        assert_eq!("1.".parse::<Decimal>().unwrap(), Decimal::from(1u64));
        assert_eq!("1.5e3".parse::<Decimal>().unwrap(), Decimal::from(1_500u64));
        assert_eq!("25E-3".parse::<Decimal>().unwrap().to_string(), "0.025");
        assert_eq!("000.000".parse::<Decimal>().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", ".", "-1", "1.2.3", "abc", "1e", "0x10", " 1", "1_000"] {
            assert!(
                matches!(
                    input.parse::<Decimal>(),
                    Err(AmountError::InvalidNumberFormat(_))
                ),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_overflow() {
        let too_long = "1".repeat(80);
        assert_eq!(too_long.parse::<Decimal>(), Err(AmountError::Overflow));
        assert_eq!("1e100".parse::<Decimal>(), Err(AmountError::Overflow));
        // Zero stays zero regardless of exponent.
        assert_eq!("0e100".parse::<Decimal>().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Decimal::new(U256::from(74_605_500_647_409u64), 6).to_string(),
            "74605500.647409"
        );
        assert_eq!(Decimal::new(U256::from(5u64), 4).to_string(), "0.0005");
        assert_eq!(Decimal::from(42u64).to_string(), "42");
        assert_eq!(Decimal::ZERO.to_string(), "0");
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Decimal::try_from(100.0).unwrap(), Decimal::from(100u64));
        assert_eq!(Decimal::try_from(0.1).unwrap().to_string(), "0.1");
        assert_eq!(Decimal::try_from(-0.0).unwrap(), Decimal::ZERO);
        assert!(Decimal::try_from(-1.5).is_err());
        assert!(Decimal::try_from(f64::NAN).is_err());
        assert!(Decimal::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_rescale_truncate() {
        let value: Decimal = "1.23456789".parse().unwrap();
        assert_eq!(value.rescale_truncate(2).unwrap(), U256::from(123u64));
        assert_eq!(value.rescale_truncate(0).unwrap(), U256::from(1u64));
        assert_eq!(
            value.rescale_truncate(10).unwrap(),
            U256::from(12_345_678_900u64)
        );

        let tiny = Decimal::new(U256::from(1u64), 200);
        assert_eq!(tiny.rescale_truncate(18).unwrap(), U256::ZERO);
        assert_eq!(
            Decimal::from(1u64).rescale_truncate(78),
            Err(AmountError::Overflow)
        );
        assert_eq!(Decimal::ZERO.rescale_truncate(255).unwrap(), U256::ZERO);
    }
}
