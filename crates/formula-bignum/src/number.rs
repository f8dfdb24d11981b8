use std::fmt;
use std::str::FromStr;

use crate::calculator::{default_calculator, CalculatorRef, MAX_POWER};
use crate::error::{NumberError, NumberResult};
use crate::parse::{self, append_zeros, normalize, Scanned};
use crate::rounding::RoundingMode;
use crate::{BigDecimal, BigInteger, BigRational};

/// Conversions shared by [`BigInteger`], [`BigDecimal`], [`BigRational`] and [`Number`].
///
/// Conversions that cannot represent the value exactly fail with
/// [`NumberError::RoundingNecessary`]; use [`BigNumber::to_scale`] to round explicitly.
pub trait BigNumber: fmt::Display {
    fn to_big_integer(&self) -> NumberResult<BigInteger>;

    fn to_big_decimal(&self) -> NumberResult<BigDecimal>;

    /// Always exact.
    fn to_big_rational(&self) -> BigRational;

    fn to_scale(&self, scale: u32, mode: RoundingMode) -> NumberResult<BigDecimal>;

    /// `-1`, `0` or `1`.
    fn signum(&self) -> i32;

    /// Nearest `f64`; very large magnitudes become infinite.
    fn to_f64(&self) -> f64;

    fn calculator(&self) -> &CalculatorRef;

    fn is_zero(&self) -> bool {
        self.signum() == 0
    }

    fn is_negative(&self) -> bool {
        self.signum() < 0
    }

    fn is_positive(&self) -> bool {
        self.signum() > 0
    }
}

/// A number of whichever concrete type the combined grammar produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Number {
    Integer(BigInteger),
    Decimal(BigDecimal),
    Rational(BigRational),
}

impl Number {
    /// Parse `text` with the process-wide calculator.
    pub fn parse(text: &str) -> NumberResult<Number> {
        Self::parse_with(text, &default_calculator())
    }

    /// Parse `text`, attaching `calculator` to the resulting value.
    pub fn parse_with(text: &str, calculator: &CalculatorRef) -> NumberResult<Number> {
        match parse::scan(text)? {
            Scanned::Integer { negative, digits } => Ok(Number::Integer(
                BigInteger::from_normalized(normalize(negative, digits), calculator.clone()),
            )),
            Scanned::Rational {
                negative,
                numerator,
                denominator,
            } => {
                let numerator =
                    BigInteger::from_normalized(normalize(negative, numerator), calculator.clone());
                let denominator =
                    BigInteger::from_normalized(normalize(false, denominator), calculator.clone());
                Ok(Number::Rational(BigRational::from_parts(
                    numerator,
                    denominator,
                )?))
            }
            Scanned::Decimal {
                negative,
                integral,
                fractional,
                exponent,
            } => {
                let mut unscaled = normalize(negative, &format!("{integral}{fractional}"));
                let scale = (fractional.len() as i64)
                    .checked_sub(exponent)
                    .ok_or_else(|| NumberError::NumberFormat(text.to_string()))?;

                let scale = if scale < 0 {
                    let zeros = scale.unsigned_abs();
                    if zeros > u64::from(MAX_POWER) {
                        return Err(NumberError::ExponentOutOfRange {
                            exponent,
                            max: MAX_POWER,
                        });
                    }
                    unscaled = append_zeros(&unscaled, zeros as u32);
                    0
                } else {
                    u32::try_from(scale)
                        .ok()
                        .filter(|s| *s <= MAX_POWER)
                        .ok_or(NumberError::ExponentOutOfRange {
                            exponent,
                            max: MAX_POWER,
                        })?
                };

                Ok(Number::Decimal(BigDecimal::from_parts(
                    BigInteger::from_normalized(unscaled, calculator.clone()),
                    scale,
                )))
            }
        }
    }

    fn as_dyn(&self) -> &dyn BigNumber {
        match self {
            Number::Integer(v) => v,
            Number::Decimal(v) => v,
            Number::Rational(v) => v,
        }
    }
}

impl BigNumber for Number {
    fn to_big_integer(&self) -> NumberResult<BigInteger> {
        self.as_dyn().to_big_integer()
    }

    fn to_big_decimal(&self) -> NumberResult<BigDecimal> {
        self.as_dyn().to_big_decimal()
    }

    fn to_big_rational(&self) -> BigRational {
        self.as_dyn().to_big_rational()
    }

    fn to_scale(&self, scale: u32, mode: RoundingMode) -> NumberResult<BigDecimal> {
        self.as_dyn().to_scale(scale, mode)
    }

    fn signum(&self) -> i32 {
        self.as_dyn().signum()
    }

    fn to_f64(&self) -> f64 {
        self.as_dyn().to_f64()
    }

    fn calculator(&self) -> &CalculatorRef {
        match self {
            Number::Integer(v) => v.calculator(),
            Number::Decimal(v) => v.calculator(),
            Number::Rational(v) => v.calculator(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(v) => v.fmt(f),
            Number::Decimal(v) => v.fmt(f),
            Number::Rational(v) => v.fmt(f),
        }
    }
}

impl FromStr for Number {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Number::parse(s)
    }
}

impl From<BigInteger> for Number {
    fn from(value: BigInteger) -> Self {
        Number::Integer(value)
    }
}

impl From<BigDecimal> for Number {
    fn from(value: BigDecimal) -> Self {
        Number::Decimal(value)
    }
}

impl From<BigRational> for Number {
    fn from(value: BigRational) -> Self {
        Number::Rational(value)
    }
}

/// Anything the `of` constructors accept: text in the combined grammar, native integers, or a
/// number that already exists (passed through unchanged).
pub trait IntoNumber {
    fn into_number(self, calculator: &CalculatorRef) -> NumberResult<Number>;
}

impl IntoNumber for &str {
    fn into_number(self, calculator: &CalculatorRef) -> NumberResult<Number> {
        Number::parse_with(self, calculator)
    }
}

impl IntoNumber for String {
    fn into_number(self, calculator: &CalculatorRef) -> NumberResult<Number> {
        Number::parse_with(&self, calculator)
    }
}

impl IntoNumber for &String {
    fn into_number(self, calculator: &CalculatorRef) -> NumberResult<Number> {
        Number::parse_with(self, calculator)
    }
}

macro_rules! native_integer_into_number {
    ($($ty:ty),*) => {
        $(
            impl IntoNumber for $ty {
                fn into_number(self, calculator: &CalculatorRef) -> NumberResult<Number> {
                    Ok(Number::Integer(BigInteger::from_normalized(
                        self.to_string(),
                        calculator.clone(),
                    )))
                }
            }
        )*
    };
}

native_integer_into_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl IntoNumber for Number {
    fn into_number(self, _calculator: &CalculatorRef) -> NumberResult<Number> {
        Ok(self)
    }
}

impl IntoNumber for BigInteger {
    fn into_number(self, _calculator: &CalculatorRef) -> NumberResult<Number> {
        Ok(Number::Integer(self))
    }
}

impl IntoNumber for &BigInteger {
    fn into_number(self, _calculator: &CalculatorRef) -> NumberResult<Number> {
        Ok(Number::Integer(self.clone()))
    }
}

impl IntoNumber for BigDecimal {
    fn into_number(self, _calculator: &CalculatorRef) -> NumberResult<Number> {
        Ok(Number::Decimal(self))
    }
}

impl IntoNumber for &BigDecimal {
    fn into_number(self, _calculator: &CalculatorRef) -> NumberResult<Number> {
        Ok(Number::Decimal(self.clone()))
    }
}

impl IntoNumber for BigRational {
    fn into_number(self, _calculator: &CalculatorRef) -> NumberResult<Number> {
        Ok(Number::Rational(self))
    }
}

impl IntoNumber for &BigRational {
    fn into_number(self, _calculator: &CalculatorRef) -> NumberResult<Number> {
        Ok(Number::Rational(self.clone()))
    }
}
