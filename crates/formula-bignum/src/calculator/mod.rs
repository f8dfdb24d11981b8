//! Digit-string arithmetic backends.
//!
//! Every backend operates on *normalized* digit strings: a non-empty run of ASCII digits with
//! no leading zero (except `"0"` itself), optionally preceded by a single `-` when the value is
//! non-zero. Backends may assume this form on input and must produce it on output; the number
//! types in this crate normalize on construction so callers never see a malformed string.
//!
//! Backends are chosen in priority order (`ibig` -> `num-bigint` -> native schoolbook) from the
//! set compiled into the crate. [`default_calculator`] performs that probe once per process; code
//! that needs a specific backend (tests comparing backends, hosts pinning behaviour) builds one
//! through [`CalculatorKind::build`] and passes it explicitly.

use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::error::{NumberError, NumberResult};
use crate::rounding::RoundingMode;

#[cfg(feature = "ibig")]
mod ibig_backend;
mod native;
#[cfg(feature = "num-bigint")]
mod num_backend;

#[cfg(feature = "ibig")]
pub use ibig_backend::IbigCalculator;
pub use native::NativeCalculator;
#[cfg(feature = "num-bigint")]
pub use num_backend::NumBigintCalculator;

/// Largest exponent accepted by [`Calculator::pow`].
pub const MAX_POWER: u32 = 1_000_000;

/// Shared handle to a backend.
pub type CalculatorRef = Arc<dyn Calculator>;

/// Arbitrary-precision integer arithmetic over normalized digit strings.
///
/// Implementations must be pure: no interior mutability, so one instance can be shared by
/// concurrent evaluations.
pub trait Calculator: fmt::Debug + Send + Sync {
    /// Short identifier used in logs and diagnostics.
    fn name(&self) -> &'static str;

    fn add(&self, a: &str, b: &str) -> String;

    fn sub(&self, a: &str, b: &str) -> String;

    fn mul(&self, a: &str, b: &str) -> String;

    /// Truncating division returning `(quotient, remainder)`.
    ///
    /// The quotient is rounded towards zero and the remainder carries the sign of the
    /// dividend. `b` must not be zero.
    fn div_q_r(&self, a: &str, b: &str) -> (String, String);

    /// `a` raised to `e`, with `e` already checked against [`MAX_POWER`].
    fn raise(&self, a: &str, e: u32) -> String;

    fn div_q(&self, a: &str, b: &str) -> String {
        self.div_q_r(a, b).0
    }

    fn div_r(&self, a: &str, b: &str) -> String {
        self.div_q_r(a, b).1
    }

    fn pow(&self, a: &str, e: u32) -> NumberResult<String> {
        if e > MAX_POWER {
            return Err(NumberError::ExponentOutOfRange {
                exponent: i64::from(e),
                max: MAX_POWER,
            });
        }
        Ok(self.raise(a, e))
    }

    /// Greatest common divisor; always non-negative, and `gcd(0, 0) == 0`.
    fn gcd(&self, a: &str, b: &str) -> String {
        let mut a = abs(a).to_string();
        let mut b = abs(b).to_string();
        while b != "0" {
            let r = self.div_r(&a, &b);
            a = b;
            b = r;
        }
        a
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        compare(a, b)
    }

    fn abs(&self, a: &str) -> String {
        abs(a).to_string()
    }

    fn neg(&self, a: &str) -> String {
        negate(a)
    }

    /// Divide `a` by `b` and round the quotient to an integer using `mode`.
    ///
    /// Fails with [`NumberError::RoundingNecessary`] when `mode` is
    /// [`RoundingMode::Unnecessary`] and the division is not exact. `b` must not be zero.
    fn div_round(&self, a: &str, b: &str, mode: RoundingMode) -> NumberResult<String> {
        let (quotient, remainder) = self.div_q_r(a, b);
        let has_discarded_fraction = remainder != "0";
        if mode == RoundingMode::Unnecessary && has_discarded_fraction {
            return Err(NumberError::RoundingNecessary);
        }

        let is_positive_or_zero = is_negative(a) == is_negative(b);
        let quotient_is_even = quotient
            .as_bytes()
            .last()
            .is_some_and(|d| (d - b'0') % 2 == 0);
        // Compare the discarded fraction against one half: |2r| vs |b|.
        let twice_remainder = self.mul(abs(&remainder), "2");
        let half_cmp = compare(&twice_remainder, abs(b));

        if mode.should_increment(
            has_discarded_fraction,
            is_positive_or_zero,
            quotient_is_even,
            half_cmp,
        ) {
            let unit = if is_positive_or_zero { "1" } else { "-1" };
            Ok(self.add(&quotient, unit))
        } else {
            Ok(quotient)
        }
    }
}

/// The backends this crate knows about, in autodetection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculatorKind {
    Ibig,
    NumBigint,
    Native,
}

impl CalculatorKind {
    pub const PRIORITY: [CalculatorKind; 3] = [
        CalculatorKind::Ibig,
        CalculatorKind::NumBigint,
        CalculatorKind::Native,
    ];

    /// Whether the backend was compiled into this build.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            CalculatorKind::Ibig => cfg!(feature = "ibig"),
            CalculatorKind::NumBigint => cfg!(feature = "num-bigint"),
            CalculatorKind::Native => true,
        }
    }

    /// Instantiate the backend, or `None` if it was compiled out.
    #[must_use]
    pub fn build(self) -> Option<CalculatorRef> {
        match self {
            CalculatorKind::Ibig => build_ibig(),
            CalculatorKind::NumBigint => build_num_bigint(),
            CalculatorKind::Native => Some(Arc::new(NativeCalculator)),
        }
    }

    /// Every backend available in this build, highest priority first.
    pub fn available() -> impl Iterator<Item = CalculatorKind> {
        Self::PRIORITY.into_iter().filter(|kind| kind.is_available())
    }

    /// The highest-priority available backend. The native backend is always available.
    #[must_use]
    pub fn detect() -> CalculatorKind {
        Self::available().next().unwrap_or(CalculatorKind::Native)
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CalculatorKind::Ibig => "ibig",
            CalculatorKind::NumBigint => "num-bigint",
            CalculatorKind::Native => "native",
        })
    }
}

#[cfg(feature = "ibig")]
fn build_ibig() -> Option<CalculatorRef> {
    Some(Arc::new(IbigCalculator))
}

#[cfg(not(feature = "ibig"))]
fn build_ibig() -> Option<CalculatorRef> {
    None
}

#[cfg(feature = "num-bigint")]
fn build_num_bigint() -> Option<CalculatorRef> {
    Some(Arc::new(NumBigintCalculator))
}

#[cfg(not(feature = "num-bigint"))]
fn build_num_bigint() -> Option<CalculatorRef> {
    None
}

/// Process-wide backend, autodetected on first use and immutable afterwards.
pub fn default_calculator() -> CalculatorRef {
    static DEFAULT: OnceLock<CalculatorRef> = OnceLock::new();
    DEFAULT
        .get_or_init(|| {
            let kind = CalculatorKind::detect();
            log::debug!("autodetected {kind} calculator backend");
            kind.build()
                .unwrap_or_else(|| Arc::new(NativeCalculator) as CalculatorRef)
        })
        .clone()
}

pub(crate) fn is_negative(a: &str) -> bool {
    a.starts_with('-')
}

/// Split a normalized digit string into `(is_negative, magnitude)`.
pub(crate) fn split_sign(a: &str) -> (bool, &str) {
    match a.strip_prefix('-') {
        Some(magnitude) => (true, magnitude),
        None => (false, a),
    }
}

pub(crate) fn abs(a: &str) -> &str {
    split_sign(a).1
}

pub(crate) fn negate(a: &str) -> String {
    match a.strip_prefix('-') {
        Some(magnitude) => magnitude.to_string(),
        None if a == "0" => "0".to_string(),
        None => format!("-{a}"),
    }
}

/// Attach a sign to a normalized magnitude, keeping zero unsigned.
pub(crate) fn with_sign(negative: bool, magnitude: String) -> String {
    if negative && magnitude != "0" {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

/// Compare two unsigned normalized magnitudes.
pub(crate) fn compare_magnitudes(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compare two signed normalized digit strings.
pub(crate) fn compare(a: &str, b: &str) -> Ordering {
    match (split_sign(a), split_sign(b)) {
        ((false, _), (true, _)) => Ordering::Greater,
        ((true, _), (false, _)) => Ordering::Less,
        ((false, x), (false, y)) => compare_magnitudes(x, y),
        ((true, x), (true, y)) => compare_magnitudes(y, x),
    }
}

/// Strip leading zeros from an unsigned digit buffer, producing `"0"` for an all-zero input.
pub(crate) fn strip_leading_zeros(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn compare_orders_by_sign_then_magnitude() {
        assert_eq!(compare("-10", "-9"), Ordering::Less);
        assert_eq!(compare("10", "9"), Ordering::Greater);
        assert_eq!(compare("-1", "0"), Ordering::Less);
        assert_eq!(compare("123", "123"), Ordering::Equal);
    }

    #[test]
    fn negate_keeps_zero_unsigned() {
        assert_eq!(negate("0"), "0");
        assert_eq!(negate("-7"), "7");
        assert_eq!(negate("7"), "-7");
    }

    #[test]
    fn native_backend_is_always_detectable() {
        assert!(CalculatorKind::Native.is_available());
        assert!(CalculatorKind::available().any(|k| k == CalculatorKind::Native));
        assert!(CalculatorKind::detect().build().is_some());
    }

    #[test]
    fn pow_rejects_exponents_above_the_cap() {
        let calc = NativeCalculator;
        assert_eq!(
            calc.pow("2", MAX_POWER + 1),
            Err(NumberError::ExponentOutOfRange {
                exponent: i64::from(MAX_POWER + 1),
                max: MAX_POWER,
            })
        );
        assert_eq!(calc.pow("1", MAX_POWER).as_deref(), Ok("1"));
    }

    #[test]
    fn default_calculator_is_stable() {
        let a = default_calculator();
        let b = default_calculator();
        assert_eq!(a.name(), b.name());
        assert!(Arc::ptr_eq(&a, &b));
    }
}
