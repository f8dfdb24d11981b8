//! Immutable arbitrary-precision numbers for the formula calculator.
//!
//! [`BigInteger`], [`BigDecimal`] and [`BigRational`] share one textual grammar (see
//! [`Number::parse`]) and delegate all digit arithmetic to a pluggable [`Calculator`] backend.
//! Every value carries the backend it was created with; operations on a value use that backend
//! and produce values carrying the same one.
//!
//! ```
//! use formula_bignum::{BigDecimal, BigNumber, RoundingMode};
//!
//! let third = BigDecimal::of("1")?.divided_by(&BigDecimal::of("3")?, 5, RoundingMode::HalfUp)?;
//! assert_eq!(third.to_string(), "0.33333");
//! assert!(third.is_positive());
//! # Ok::<(), formula_bignum::NumberError>(())
//! ```

pub mod calculator;
mod decimal;
mod error;
mod integer;
mod number;
mod parse;
mod rational;
mod rounding;

pub use calculator::{
    default_calculator, Calculator, CalculatorKind, CalculatorRef, NativeCalculator, MAX_POWER,
};
#[cfg(feature = "ibig")]
pub use calculator::IbigCalculator;
#[cfg(feature = "num-bigint")]
pub use calculator::NumBigintCalculator;
pub use decimal::BigDecimal;
pub use error::{NumberError, NumberResult};
pub use integer::BigInteger;
pub use number::{BigNumber, IntoNumber, Number};
pub use rational::BigRational;
pub use rounding::RoundingMode;
