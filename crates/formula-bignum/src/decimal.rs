use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::calculator::{default_calculator, CalculatorRef, MAX_POWER};
use crate::error::{NumberError, NumberResult};
use crate::integer::ten_pow;
use crate::number::{BigNumber, IntoNumber};
use crate::parse::append_zeros;
use crate::rounding::RoundingMode;
use crate::{BigInteger, BigRational};

/// An immutable arbitrary-precision decimal: `unscaled × 10^-scale`.
///
/// Equality is scale-sensitive (`1.0 != 1.00`); use [`BigDecimal::compare_to`] for numeric
/// comparison.
#[derive(Clone)]
pub struct BigDecimal {
    unscaled: BigInteger,
    scale: u32,
}

impl BigDecimal {
    pub(crate) fn from_parts(unscaled: BigInteger, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    /// Convert `value` exactly, using the process-wide calculator for new values.
    pub fn of(value: impl IntoNumber) -> NumberResult<Self> {
        Self::of_with(value, &default_calculator())
    }

    pub fn of_with(value: impl IntoNumber, calculator: &CalculatorRef) -> NumberResult<Self> {
        value.into_number(calculator)?.to_big_decimal()
    }

    /// `unscaled × 10^-scale`, e.g. `of_unscaled_value(123, 2)` is `1.23`.
    pub fn of_unscaled_value(unscaled: impl IntoNumber, scale: u32) -> NumberResult<Self> {
        Ok(Self::from_parts(BigInteger::of(unscaled)?, scale))
    }

    pub fn zero() -> Self {
        Self::from_parts(BigInteger::zero(), 0)
    }

    #[must_use]
    pub fn with_calculator(&self, calculator: &CalculatorRef) -> Self {
        Self::from_parts(self.unscaled.with_calculator(calculator), self.scale)
    }

    pub fn unscaled_value(&self) -> &BigInteger {
        &self.unscaled
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// The unscaled value rescaled up to `scale` (which must be `>= self.scale`).
    fn unscaled_at(&self, scale: u32) -> BigInteger {
        debug_assert!(scale >= self.scale);
        let padded = append_zeros(self.unscaled.as_str(), scale - self.scale);
        BigInteger::from_normalized(padded, self.calculator().clone())
    }

    #[must_use]
    pub fn plus(&self, that: &BigDecimal) -> BigDecimal {
        let scale = self.scale.max(that.scale);
        let sum = self.unscaled_at(scale).plus(&that.unscaled_at(scale));
        Self::from_parts(sum, scale)
    }

    #[must_use]
    pub fn minus(&self, that: &BigDecimal) -> BigDecimal {
        let scale = self.scale.max(that.scale);
        let difference = self.unscaled_at(scale).minus(&that.unscaled_at(scale));
        Self::from_parts(difference, scale)
    }

    #[must_use]
    pub fn multiplied_by(&self, that: &BigDecimal) -> BigDecimal {
        Self::from_parts(
            self.unscaled.multiplied_by(&that.unscaled),
            self.scale + that.scale,
        )
    }

    /// Divide, producing a result with exactly `scale` fractional digits.
    pub fn divided_by(
        &self,
        that: &BigDecimal,
        scale: u32,
        mode: RoundingMode,
    ) -> NumberResult<BigDecimal> {
        if that.is_zero() {
            return Err(NumberError::DivisionByZero);
        }

        // result = (a·10^-sa) / (b·10^-sb) · 10^scale = a·10^(scale + sb - sa) / b
        let shift = i64::from(scale) + i64::from(that.scale) - i64::from(self.scale);
        let magnitude = u32::try_from(shift.unsigned_abs())
            .ok()
            .filter(|m| *m <= MAX_POWER)
            .ok_or(NumberError::ExponentOutOfRange {
                exponent: shift,
                max: MAX_POWER,
            })?;
        let (p, q) = if shift >= 0 {
            (
                self.unscaled.multiplied_by(&ten_pow(&self.unscaled, magnitude)),
                that.unscaled.clone(),
            )
        } else {
            (
                self.unscaled.clone(),
                that.unscaled.multiplied_by(&ten_pow(&that.unscaled, magnitude)),
            )
        };

        Ok(Self::from_parts(p.divided_by(&q, mode)?, scale))
    }

    /// Divide exactly, failing with [`NumberError::RoundingNecessary`] if the quotient has a
    /// non-terminating decimal expansion.
    pub fn exactly_divided_by(&self, that: &BigDecimal) -> NumberResult<BigDecimal> {
        self.to_big_rational()
            .divided_by(&that.to_big_rational())?
            .to_big_decimal()
    }

    pub fn power(&self, exponent: u32) -> NumberResult<BigDecimal> {
        let scale = self
            .scale
            .checked_mul(exponent)
            .filter(|s| *s <= MAX_POWER)
            .ok_or(NumberError::ExponentOutOfRange {
                exponent: i64::from(exponent),
                max: MAX_POWER,
            })?;
        Ok(Self::from_parts(self.unscaled.power(exponent)?, scale))
    }

    /// Remove trailing fractional zeros, e.g. `1.2300` becomes `1.23` and `5.000` becomes `5`.
    #[must_use]
    pub fn strip_trailing_zeros(&self) -> BigDecimal {
        if self.unscaled.is_zero() {
            return Self::from_parts(self.unscaled.clone(), 0);
        }
        let digits = self.unscaled.as_str();
        let trailing = digits.len() - digits.trim_end_matches('0').len();
        let strip = trailing.min(self.scale as usize);
        let kept = digits[..digits.len() - strip].to_string();
        Self::from_parts(
            BigInteger::from_normalized(kept, self.calculator().clone()),
            self.scale - strip as u32,
        )
    }

    /// The integral part, truncated towards zero.
    pub fn integral_part(&self) -> BigInteger {
        if self.scale == 0 {
            return self.unscaled.clone();
        }
        let divisor = ten_pow(&self.unscaled, self.scale);
        // The divisor is never zero.
        self.unscaled
            .quotient(&divisor)
            .unwrap_or_else(|_| self.unscaled.clone())
    }

    /// `self - integral_part()`, keeping the scale.
    #[must_use]
    pub fn fractional_part(&self) -> BigDecimal {
        let integral = Self::from_parts(self.integral_part(), 0);
        self.minus(&integral)
    }

    #[must_use]
    pub fn abs(&self) -> BigDecimal {
        Self::from_parts(self.unscaled.abs(), self.scale)
    }

    #[must_use]
    pub fn negated(&self) -> BigDecimal {
        Self::from_parts(self.unscaled.negated(), self.scale)
    }

    /// Numeric comparison, ignoring scale.
    pub fn compare_to(&self, that: &BigDecimal) -> Ordering {
        let scale = self.scale.max(that.scale);
        self.unscaled_at(scale).compare_to(&that.unscaled_at(scale))
    }

    /// Whether both values are numerically equal, ignoring scale.
    pub fn is_equal_to(&self, that: &BigDecimal) -> bool {
        self.compare_to(that) == Ordering::Equal
    }

    /// The numerically smaller value; `self` on a tie.
    #[must_use]
    pub fn min(&self, that: &BigDecimal) -> BigDecimal {
        if self.compare_to(that) == Ordering::Greater {
            that.clone()
        } else {
            self.clone()
        }
    }

    /// The numerically larger value; `self` on a tie.
    #[must_use]
    pub fn max(&self, that: &BigDecimal) -> BigDecimal {
        if self.compare_to(that) == Ordering::Less {
            that.clone()
        } else {
            self.clone()
        }
    }
}

impl BigNumber for BigDecimal {
    fn to_big_integer(&self) -> NumberResult<BigInteger> {
        Ok(self.to_scale(0, RoundingMode::Unnecessary)?.unscaled)
    }

    fn to_big_decimal(&self) -> NumberResult<BigDecimal> {
        Ok(self.clone())
    }

    fn to_big_rational(&self) -> BigRational {
        BigRational::from_normalized_parts(
            self.unscaled.clone(),
            ten_pow(&self.unscaled, self.scale),
        )
    }

    fn to_scale(&self, scale: u32, mode: RoundingMode) -> NumberResult<BigDecimal> {
        match scale.cmp(&self.scale) {
            Ordering::Equal => Ok(self.clone()),
            Ordering::Greater => Ok(Self::from_parts(self.unscaled_at(scale), scale)),
            Ordering::Less => {
                let divisor = ten_pow(&self.unscaled, self.scale - scale);
                Ok(Self::from_parts(
                    self.unscaled.divided_by(&divisor, mode)?,
                    scale,
                ))
            }
        }
    }

    fn signum(&self) -> i32 {
        self.unscaled.signum()
    }

    fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    fn calculator(&self) -> &CalculatorRef {
        self.unscaled.calculator()
    }
}

impl PartialEq for BigDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.scale == other.scale && self.unscaled == other.unscaled
    }
}

impl Eq for BigDecimal {}

impl Hash for BigDecimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unscaled.hash(state);
        self.scale.hash(state);
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.as_str();
        if self.scale == 0 {
            return f.write_str(digits);
        }

        let (sign, magnitude) = match digits.strip_prefix('-') {
            Some(magnitude) => ("-", magnitude),
            None => ("", digits),
        };
        let scale = self.scale as usize;
        let padded = if magnitude.len() <= scale {
            format!("{}{magnitude}", "0".repeat(scale + 1 - magnitude.len()))
        } else {
            magnitude.to_string()
        };
        let (integral, fractional) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{integral}.{fractional}")
    }
}

impl fmt::Debug for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigDecimal({self})")
    }
}

impl FromStr for BigDecimal {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s)
    }
}

impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        Self::from_parts(BigInteger::from(value), 0)
    }
}

impl From<BigInteger> for BigDecimal {
    fn from(value: BigInteger) -> Self {
        Self::from_parts(value, 0)
    }
}
