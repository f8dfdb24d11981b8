use formula_bignum::NumberError;
use thiserror::Error;

pub type CalcResult<T> = Result<T, CalcError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The expression text could not be split into tokens. `position` is a byte offset.
    #[error("{message} at position {position}")]
    Lexical { message: String, position: usize },

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("cannot register function: {0}")]
    FunctionRegistration(String),

    #[error(transparent)]
    Number(#[from] NumberError),
}

impl CalcError {
    pub(crate) fn lexical(message: impl Into<String>, position: usize) -> Self {
        CalcError::Lexical {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn evaluation(message: impl Into<String>) -> Self {
        CalcError::Evaluation(message.into())
    }
}
