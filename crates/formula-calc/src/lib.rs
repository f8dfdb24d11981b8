//! Arithmetic expression evaluation for form-calculation formulas.
//!
//! An expression goes through three stages: [`lexer::tokenize`] splits it into tokens,
//! [`postfix::to_postfix`] reorders them with the shunting-yard algorithm, and
//! [`rpn::evaluate`] runs the postfix program on a stack of exact decimals. [`Evaluator`] wires
//! the stages together with a [`FunctionRegistry`] and [`EvalSettings`].
//!
//! ```
//! use formula_calc::{Evaluator, Value};
//!
//! let evaluator = Evaluator::new();
//! assert_eq!(evaluator.evaluate("2(3+4)")?, Value::Int(14));
//! assert_eq!(evaluator.evaluate("0.1 + 0.2")?, Value::Float(0.3));
//! # Ok::<(), formula_calc::CalcError>(())
//! ```

mod error;
mod evaluator;
pub mod functions;
pub mod lexer;
pub mod postfix;
pub mod rpn;
mod settings;

pub use error::{CalcError, CalcResult};
pub use evaluator::{evaluate, Evaluator, Value};
pub use functions::{BuiltinFunction, FunctionContext, FunctionRegistry, RegisteredFunction};
pub use settings::{EvalSettings, Holiday};

pub use formula_bignum::{BigDecimal, CalculatorKind, CalculatorRef, RoundingMode};
