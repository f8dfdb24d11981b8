//! Postfix stack machine.

use formula_bignum::{BigDecimal, BigNumber};

use crate::error::{CalcError, CalcResult};
use crate::functions::{decimal_from_f64, FunctionRegistry};
use crate::lexer::Operator;
use crate::postfix::PostfixItem;
use crate::settings::EvalSettings;

/// Run a postfix program and return the single value it leaves on the stack.
pub fn evaluate(
    postfix: &[PostfixItem],
    registry: &FunctionRegistry,
    settings: &EvalSettings,
) -> CalcResult<BigDecimal> {
    let mut stack: Vec<BigDecimal> = Vec::with_capacity(postfix.len());

    for item in postfix {
        match item {
            PostfixItem::Number(value) => stack.push(value.clone()),
            PostfixItem::Operator(op) => {
                let (Some(rhs), Some(lhs)) = (stack.pop(), stack.pop()) else {
                    return Err(CalcError::evaluation(format!(
                        "operator {op} expects two operands"
                    )));
                };
                stack.push(apply(*op, &lhs, &rhs, settings)?);
            }
            PostfixItem::Function { name, args } => {
                let function = registry
                    .get(name)
                    .ok_or_else(|| CalcError::evaluation(format!("unknown function {name}")))?;
                let arity = function.arity();
                if *args != arity {
                    return Err(CalcError::evaluation(format!(
                        "function {name} expects {arity} arguments, {args} given"
                    )));
                }
                if stack.len() < arity {
                    return Err(CalcError::evaluation(format!(
                        "function {name} expects {arity} arguments, {} available",
                        stack.len()
                    )));
                }
                // The operands are already in call order at the top of the stack.
                let args = stack.split_off(stack.len() - arity);
                stack.push(function.call(&args)?);
            }
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(result), true) => Ok(result),
        (None, _) => Err(CalcError::evaluation("expression produced no result")),
        (Some(_), false) => Err(CalcError::evaluation(format!(
            "expression produced {} values instead of one",
            stack.len() + 1
        ))),
    }
}

fn apply(
    op: Operator,
    lhs: &BigDecimal,
    rhs: &BigDecimal,
    settings: &EvalSettings,
) -> CalcResult<BigDecimal> {
    match op {
        Operator::Add => Ok(lhs.plus(rhs)),
        Operator::Sub => Ok(lhs.minus(rhs)),
        Operator::Mul => Ok(lhs.multiplied_by(rhs)),
        Operator::Div => {
            if rhs.is_zero() {
                return Err(CalcError::evaluation("division by zero"));
            }
            let quotient =
                lhs.divided_by(rhs, settings.division_scale, settings.division_rounding)?;
            Ok(quotient.strip_trailing_zeros())
        }
        // `%` and `^` run in f64, unlike the exact operators above.
        Operator::Rem => {
            if rhs.is_zero() {
                return Err(CalcError::evaluation("division by zero"));
            }
            decimal_from_f64(lhs.to_f64() % rhs.to_f64(), lhs.calculator())
        }
        Operator::Pow => decimal_from_f64(lhs.to_f64().powf(rhs.to_f64()), lhs.calculator()),
    }
}
