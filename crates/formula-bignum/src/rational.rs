use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::calculator::{default_calculator, CalculatorRef};
use crate::error::{NumberError, NumberResult};
use crate::integer::ten_pow;
use crate::number::{BigNumber, IntoNumber};
use crate::rounding::RoundingMode;
use crate::{BigDecimal, BigInteger};

/// An immutable arbitrary-precision fraction.
///
/// The denominator is always positive; the fraction is not reduced automatically (see
/// [`BigRational::simplified`]). Equality and ordering are numeric, so `2/4 == 1/2`.
#[derive(Clone)]
pub struct BigRational {
    numerator: BigInteger,
    denominator: BigInteger,
}

impl BigRational {
    /// Build `numerator / denominator`, moving the sign to the numerator.
    pub(crate) fn from_parts(
        numerator: BigInteger,
        denominator: BigInteger,
    ) -> NumberResult<Self> {
        if denominator.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        Ok(if denominator.is_negative() {
            Self::from_normalized_parts(numerator.negated(), denominator.negated())
        } else {
            Self::from_normalized_parts(numerator, denominator)
        })
    }

    /// `denominator` must already be positive.
    pub(crate) fn from_normalized_parts(numerator: BigInteger, denominator: BigInteger) -> Self {
        debug_assert!(denominator.is_positive());
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert `value` exactly, using the process-wide calculator for new values.
    pub fn of(value: impl IntoNumber) -> NumberResult<Self> {
        Self::of_with(value, &default_calculator())
    }

    pub fn of_with(value: impl IntoNumber, calculator: &CalculatorRef) -> NumberResult<Self> {
        Ok(value.into_number(calculator)?.to_big_rational())
    }

    /// `numerator / denominator` from anything [`BigInteger::of`] accepts.
    pub fn nd(numerator: impl IntoNumber, denominator: impl IntoNumber) -> NumberResult<Self> {
        Self::from_parts(BigInteger::of(numerator)?, BigInteger::of(denominator)?)
    }

    #[must_use]
    pub fn with_calculator(&self, calculator: &CalculatorRef) -> Self {
        Self::from_normalized_parts(
            self.numerator.with_calculator(calculator),
            self.denominator.with_calculator(calculator),
        )
    }

    pub fn numerator(&self) -> &BigInteger {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInteger {
        &self.denominator
    }

    #[must_use]
    pub fn plus(&self, that: &BigRational) -> BigRational {
        let numerator = self
            .numerator
            .multiplied_by(&that.denominator)
            .plus(&that.numerator.multiplied_by(&self.denominator));
        let denominator = self.denominator.multiplied_by(&that.denominator);
        Self::from_normalized_parts(numerator, denominator)
    }

    #[must_use]
    pub fn minus(&self, that: &BigRational) -> BigRational {
        self.plus(&that.negated())
    }

    #[must_use]
    pub fn multiplied_by(&self, that: &BigRational) -> BigRational {
        Self::from_normalized_parts(
            self.numerator.multiplied_by(&that.numerator),
            self.denominator.multiplied_by(&that.denominator),
        )
    }

    pub fn divided_by(&self, that: &BigRational) -> NumberResult<BigRational> {
        Self::from_parts(
            self.numerator.multiplied_by(&that.denominator),
            self.denominator.multiplied_by(&that.numerator),
        )
    }

    pub fn reciprocal(&self) -> NumberResult<BigRational> {
        Self::from_parts(self.denominator.clone(), self.numerator.clone())
    }

    /// `self^exponent`; a negative exponent raises the reciprocal.
    pub fn power(&self, exponent: i32) -> NumberResult<BigRational> {
        let base = if exponent < 0 {
            self.reciprocal()?
        } else {
            self.clone()
        };
        let e = exponent.unsigned_abs();
        Ok(Self::from_normalized_parts(
            base.numerator.power(e)?,
            base.denominator.power(e)?,
        ))
    }

    #[must_use]
    pub fn abs(&self) -> BigRational {
        Self::from_normalized_parts(self.numerator.abs(), self.denominator.clone())
    }

    #[must_use]
    pub fn negated(&self) -> BigRational {
        Self::from_normalized_parts(self.numerator.negated(), self.denominator.clone())
    }

    /// Reduce to lowest terms.
    #[must_use]
    pub fn simplified(&self) -> BigRational {
        let gcd = self.numerator.gcd(&self.denominator);
        if gcd.is_zero() || gcd == BigInteger::one() {
            return self.clone();
        }
        // gcd divides both exactly and is non-zero here.
        match (self.numerator.quotient(&gcd), self.denominator.quotient(&gcd)) {
            (Ok(numerator), Ok(denominator)) => {
                Self::from_normalized_parts(numerator, denominator)
            }
            _ => self.clone(),
        }
    }

    pub fn compare_to(&self, that: &BigRational) -> Ordering {
        // Denominators are positive, so cross-multiplying keeps the order.
        self.numerator
            .multiplied_by(&that.denominator)
            .compare_to(&that.numerator.multiplied_by(&self.denominator))
    }

    /// The smallest scale at which the simplified fraction terminates, if it does.
    fn terminating_scale(&self) -> Option<u32> {
        let mut denominator = self.simplified().denominator;
        let mut scale = [0u32; 2];
        for (slot, factor) in scale.iter_mut().zip([2i64, 5]) {
            let factor = BigInteger::of(factor).ok()?.with_calculator(denominator.calculator());
            loop {
                let (q, r) = denominator.quotient_and_remainder(&factor).ok()?;
                if !r.is_zero() {
                    break;
                }
                denominator = q;
                *slot += 1;
            }
        }
        (denominator.as_str() == "1").then(|| scale[0].max(scale[1]))
    }
}

impl BigNumber for BigRational {
    fn to_big_integer(&self) -> NumberResult<BigInteger> {
        self.numerator
            .divided_by(&self.denominator, RoundingMode::Unnecessary)
    }

    fn to_big_decimal(&self) -> NumberResult<BigDecimal> {
        let scale = self
            .terminating_scale()
            .ok_or(NumberError::RoundingNecessary)?;
        self.to_scale(scale, RoundingMode::Unnecessary)
    }

    fn to_big_rational(&self) -> BigRational {
        self.clone()
    }

    fn to_scale(&self, scale: u32, mode: RoundingMode) -> NumberResult<BigDecimal> {
        let scaled = self
            .numerator
            .multiplied_by(&ten_pow(&self.numerator, scale));
        Ok(BigDecimal::from_parts(
            scaled.divided_by(&self.denominator, mode)?,
            scale,
        ))
    }

    fn signum(&self) -> i32 {
        self.numerator.signum()
    }

    fn to_f64(&self) -> f64 {
        let (n, d) = (self.numerator.to_f64(), self.denominator.to_f64());
        if n.is_finite() && d.is_finite() {
            return n / d;
        }
        self.to_scale(20, RoundingMode::HalfEven)
            .map_or(f64::NAN, |d| d.to_f64())
    }

    fn calculator(&self) -> &CalculatorRef {
        self.numerator.calculator()
    }
}

impl PartialEq for BigRational {
    fn eq(&self, other: &Self) -> bool {
        self.compare_to(other) == Ordering::Equal
    }
}

impl Eq for BigRational {}

impl PartialOrd for BigRational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigRational {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(other)
    }
}

impl Hash for BigRational {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let simplified = self.simplified();
        simplified.numerator.hash(state);
        simplified.denominator.hash(state);
    }
}

impl fmt::Display for BigRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator.as_str() == "1" {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl fmt::Debug for BigRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigRational({}/{})", self.numerator, self.denominator)
    }
}

impl FromStr for BigRational {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s)
    }
}

impl From<BigInteger> for BigRational {
    fn from(value: BigInteger) -> Self {
        value.to_big_rational()
    }
}
