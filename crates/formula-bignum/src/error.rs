use thiserror::Error;

pub type NumberResult<T> = Result<T, NumberError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    /// The text does not match the numeric grammar.
    #[error("invalid number: {0:?}")]
    NumberFormat(String),

    #[error("division by zero")]
    DivisionByZero,

    /// An exact conversion (or an `Unnecessary`-mode division) would lose precision.
    #[error("rounding is necessary to represent the result at the requested precision")]
    RoundingNecessary,

    #[error("exponent {exponent} is out of range (0..={max})")]
    ExponentOutOfRange { exponent: i64, max: u32 },

    #[error("{0} does not fit in a native integer")]
    Overflow(String),
}
