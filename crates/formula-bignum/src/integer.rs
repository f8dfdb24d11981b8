use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::calculator::{default_calculator, CalculatorRef};
use crate::error::{NumberError, NumberResult};
use crate::number::{BigNumber, IntoNumber};
use crate::parse::{append_zeros, power_of_ten};
use crate::rounding::RoundingMode;
use crate::{BigDecimal, BigRational};

/// An immutable arbitrary-precision integer.
#[derive(Clone)]
pub struct BigInteger {
    value: String,
    calculator: CalculatorRef,
}

impl BigInteger {
    /// `value` must already be a normalized digit string.
    pub(crate) fn from_normalized(value: String, calculator: CalculatorRef) -> Self {
        Self { value, calculator }
    }

    fn derive(&self, value: String) -> Self {
        Self::from_normalized(value, self.calculator.clone())
    }

    /// Convert `value` exactly, using the process-wide calculator for new values.
    pub fn of(value: impl IntoNumber) -> NumberResult<Self> {
        Self::of_with(value, &default_calculator())
    }

    pub fn of_with(value: impl IntoNumber, calculator: &CalculatorRef) -> NumberResult<Self> {
        value.into_number(calculator)?.to_big_integer()
    }

    pub fn zero() -> Self {
        Self::from_normalized("0".to_string(), default_calculator())
    }

    pub fn one() -> Self {
        Self::from_normalized("1".to_string(), default_calculator())
    }

    /// The same value, computed with `calculator` from now on.
    #[must_use]
    pub fn with_calculator(&self, calculator: &CalculatorRef) -> Self {
        Self::from_normalized(self.value.clone(), calculator.clone())
    }

    /// The normalized digit string.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn plus(&self, that: &BigInteger) -> BigInteger {
        self.derive(self.calculator.add(&self.value, &that.value))
    }

    #[must_use]
    pub fn minus(&self, that: &BigInteger) -> BigInteger {
        self.derive(self.calculator.sub(&self.value, &that.value))
    }

    #[must_use]
    pub fn multiplied_by(&self, that: &BigInteger) -> BigInteger {
        self.derive(self.calculator.mul(&self.value, &that.value))
    }

    /// Divide and round the quotient with `mode`.
    pub fn divided_by(&self, that: &BigInteger, mode: RoundingMode) -> NumberResult<BigInteger> {
        that.check_divisor()?;
        if that.value == "1" {
            return Ok(self.clone());
        }
        let q = self.calculator.div_round(&self.value, &that.value, mode)?;
        Ok(self.derive(q))
    }

    /// Truncating quotient.
    pub fn quotient(&self, that: &BigInteger) -> NumberResult<BigInteger> {
        that.check_divisor()?;
        Ok(self.derive(self.calculator.div_q(&self.value, &that.value)))
    }

    /// Remainder of the truncating division; carries the sign of `self`.
    pub fn remainder(&self, that: &BigInteger) -> NumberResult<BigInteger> {
        that.check_divisor()?;
        Ok(self.derive(self.calculator.div_r(&self.value, &that.value)))
    }

    pub fn quotient_and_remainder(
        &self,
        that: &BigInteger,
    ) -> NumberResult<(BigInteger, BigInteger)> {
        that.check_divisor()?;
        let (q, r) = self.calculator.div_q_r(&self.value, &that.value);
        Ok((self.derive(q), self.derive(r)))
    }

    /// Floored modulo; the result carries the sign of `that`.
    pub fn modulo(&self, that: &BigInteger) -> NumberResult<BigInteger> {
        let r = self.remainder(that)?;
        if !r.is_zero() && r.signum() != that.signum() {
            Ok(r.plus(that))
        } else {
            Ok(r)
        }
    }

    /// `self^exponent`; exponents above [`MAX_POWER`](crate::MAX_POWER) are rejected.
    pub fn power(&self, exponent: u32) -> NumberResult<BigInteger> {
        Ok(self.derive(self.calculator.pow(&self.value, exponent)?))
    }

    /// Greatest common divisor, always non-negative.
    #[must_use]
    pub fn gcd(&self, that: &BigInteger) -> BigInteger {
        self.derive(self.calculator.gcd(&self.value, &that.value))
    }

    #[must_use]
    pub fn abs(&self) -> BigInteger {
        self.derive(self.calculator.abs(&self.value))
    }

    #[must_use]
    pub fn negated(&self) -> BigInteger {
        self.derive(self.calculator.neg(&self.value))
    }

    pub fn compare_to(&self, that: &BigInteger) -> Ordering {
        self.calculator.compare(&self.value, &that.value)
    }

    pub fn is_even(&self) -> bool {
        self.value
            .as_bytes()
            .last()
            .is_some_and(|d| (d - b'0') % 2 == 0)
    }

    pub fn to_i64(&self) -> NumberResult<i64> {
        self.value
            .parse()
            .map_err(|_| NumberError::Overflow(self.value.clone()))
    }

    fn check_divisor(&self) -> NumberResult<()> {
        if self.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(())
        }
    }
}

impl BigNumber for BigInteger {
    fn to_big_integer(&self) -> NumberResult<BigInteger> {
        Ok(self.clone())
    }

    fn to_big_decimal(&self) -> NumberResult<BigDecimal> {
        Ok(BigDecimal::from_parts(self.clone(), 0))
    }

    fn to_big_rational(&self) -> BigRational {
        BigRational::from_normalized_parts(self.clone(), self.derive("1".to_string()))
    }

    fn to_scale(&self, scale: u32, _mode: RoundingMode) -> NumberResult<BigDecimal> {
        Ok(BigDecimal::from_parts(
            self.derive(append_zeros(&self.value, scale)),
            scale,
        ))
    }

    fn signum(&self) -> i32 {
        if self.value == "0" {
            0
        } else if self.value.starts_with('-') {
            -1
        } else {
            1
        }
    }

    fn to_f64(&self) -> f64 {
        self.value.parse().unwrap_or(f64::NAN)
    }

    fn calculator(&self) -> &CalculatorRef {
        &self.calculator
    }
}

/// `10^exponent` sharing `like`'s calculator.
pub(crate) fn ten_pow(like: &BigInteger, exponent: u32) -> BigInteger {
    like.derive(power_of_ten(exponent))
}

impl PartialEq for BigInteger {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for BigInteger {}

impl PartialOrd for BigInteger {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigInteger {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(other)
    }
}

impl Hash for BigInteger {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Debug for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInteger({})", self.value)
    }
}

impl FromStr for BigInteger {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s)
    }
}

impl From<i64> for BigInteger {
    fn from(value: i64) -> Self {
        Self::from_normalized(value.to_string(), default_calculator())
    }
}
