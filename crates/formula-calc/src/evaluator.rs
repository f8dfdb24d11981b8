use std::fmt;

use formula_bignum::{BigDecimal, BigNumber, CalculatorRef};
use serde::Serialize;

use crate::error::CalcResult;
use crate::functions::FunctionRegistry;
use crate::lexer::{tokenize, Token};
use crate::postfix::{to_postfix, PostfixItem};
use crate::rpn;
use crate::settings::EvalSettings;

/// The native result of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    /// Narrow an exact result: integral values that fit an `i64` stay integers.
    pub fn from_decimal(value: &BigDecimal) -> Self {
        let stripped = value.strip_trailing_zeros();
        if stripped.scale() == 0 {
            if let Ok(int) = stripped.unscaled_value().to_i64() {
                return Value::Int(int);
            }
        }
        Value::Float(value.to_f64())
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Evaluates expressions against a function registry.
///
/// Each call is independent; the evaluator only holds configuration, so a shared `&Evaluator`
/// can serve several threads at once.
#[derive(Debug, Clone)]
pub struct Evaluator {
    settings: EvalSettings,
    calculator: CalculatorRef,
    registry: FunctionRegistry,
}

impl Evaluator {
    /// Default settings, the autodetected calculator, and every built-in function.
    pub fn new() -> Self {
        let settings = EvalSettings::default();
        let calculator = formula_bignum::default_calculator();
        Self::with_calculator(settings, calculator)
    }

    /// Fails when `settings` pins a calculator backend that is not compiled in.
    pub fn with_settings(settings: EvalSettings) -> CalcResult<Self> {
        let calculator = settings.resolve_calculator()?;
        Ok(Self::with_calculator(settings, calculator))
    }

    /// Use `calculator` regardless of what `settings` names.
    pub fn with_calculator(settings: EvalSettings, calculator: CalculatorRef) -> Self {
        let registry = FunctionRegistry::with_builtins(&settings, &calculator);
        Self {
            settings,
            calculator,
            registry,
        }
    }

    pub fn settings(&self) -> &EvalSettings {
        &self.settings
    }

    pub fn calculator(&self) -> &CalculatorRef {
        &self.calculator
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Register, replace or remove functions for later evaluations.
    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    pub fn tokenize(&self, expression: &str) -> CalcResult<Vec<Token>> {
        tokenize(expression, self.registry.names())
    }

    pub fn to_postfix(&self, expression: &str) -> CalcResult<Vec<PostfixItem>> {
        to_postfix(&self.tokenize(expression)?, &self.calculator)
    }

    /// Evaluate `expression` without narrowing the result.
    pub fn evaluate_decimal(&self, expression: &str) -> CalcResult<BigDecimal> {
        let postfix = self.to_postfix(expression)?;
        rpn::evaluate(&postfix, &self.registry, &self.settings)
    }

    pub fn evaluate(&self, expression: &str) -> CalcResult<Value> {
        let exact = self.evaluate_decimal(expression)?;
        Ok(Value::from_decimal(&exact))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate `expression` with a default [`Evaluator`].
pub fn evaluate(expression: &str) -> CalcResult<Value> {
    Evaluator::new().evaluate(expression)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn narrows_to_the_smallest_native_type() {
        let dec = |s: &str| BigDecimal::of(s).unwrap();
        assert_eq!(Value::from_decimal(&dec("14.000")), Value::Int(14));
        assert_eq!(Value::from_decimal(&dec("-0.25")), Value::Float(-0.25));
        assert_eq!(
            Value::from_decimal(&dec("12345678901234567890")),
            Value::Float(12345678901234567890.0)
        );
    }

    #[test]
    fn values_print_and_serialize_naturally() {
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
        assert_eq!(serde_json::to_string(&Value::Int(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Value::Float(0.5)).unwrap(), "0.5");
    }

    #[test]
    fn custom_functions_join_the_builtins() {
        let mut evaluator = Evaluator::new();
        evaluator
            .registry_mut()
            .register_native("cube", 1, |a| a[0].powi(3))
            .unwrap();
        assert_eq!(evaluator.evaluate("cube(3) + sqrt(16)").unwrap(), Value::Int(31));
        assert!(evaluator.registry().contains("networkdays"));
    }
}
