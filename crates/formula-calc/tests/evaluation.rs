use std::sync::Arc;

use formula_bignum::NativeCalculator;
use formula_calc::{
    evaluate, CalcError, CalculatorKind, EvalSettings, Evaluator, RoundingMode, Value,
};
use pretty_assertions::assert_eq;

fn eval(expression: &str) -> Value {
    evaluate(expression).unwrap_or_else(|err| panic!("{expression:?} failed: {err}"))
}

#[test]
fn operator_precedence() {
    assert_eq!(eval("3+4*2"), Value::Int(11));
    assert_eq!(eval("(3+4)*2"), Value::Int(14));
    assert_eq!(eval("10-4-3"), Value::Int(3));
    assert_eq!(eval("2*3^2"), Value::Int(18));
    assert_eq!(eval("1 + 10 % 4"), Value::Int(3));
}

#[test]
fn power_is_right_associative() {
    assert_eq!(eval("2^3^2"), Value::Int(512));
    assert_eq!(eval("(2^3)^2"), Value::Int(64));
}

#[test]
fn implicit_multiplication() {
    assert_eq!(eval("2(3+4)"), Value::Int(14));
    assert_eq!(eval("3sqrt(16)"), Value::Int(12));
    assert_eq!(eval("(1+1)(2+2)"), Value::Int(8));
    assert_eq!(eval("((2))"), Value::Int(2));
}

#[test]
fn unary_minus_depends_on_context() {
    assert_eq!(eval("3*-2"), Value::Int(-6));
    assert_eq!(eval("3--2"), Value::Int(5));
    assert_eq!(eval("-3+5"), Value::Int(2));
    assert_eq!(eval("2^-1"), Value::Float(0.5));
    assert_eq!(eval("max(-1, -2)"), Value::Int(-1));
}

#[test]
fn division_by_zero_is_an_evaluation_error() {
    assert_eq!(
        evaluate("5/0"),
        Err(CalcError::Evaluation("division by zero".to_string()))
    );
    assert_eq!(
        evaluate("5/(2-2)"),
        Err(CalcError::Evaluation("division by zero".to_string()))
    );
}

#[test]
fn decimal_results_are_exact_before_narrowing() {
    let evaluator = Evaluator::new();
    assert_eq!(evaluator.evaluate("0.1+0.2").unwrap(), Value::Float(0.3));
    assert_eq!(
        evaluator.evaluate_decimal("19.99*3").unwrap().to_string(),
        "59.97"
    );
    assert_eq!(
        evaluator
            .evaluate_decimal("123456789012345678901234567890 * 10")
            .unwrap()
            .to_string(),
        "1234567890123456789012345678900"
    );
    assert_eq!(evaluator.evaluate("10/4").unwrap(), Value::Float(2.5));
    assert_eq!(evaluator.evaluate("10/5").unwrap(), Value::Int(2));
}

#[test]
fn function_arity_is_enforced() {
    let mut evaluator = Evaluator::new();
    evaluator
        .registry_mut()
        .register("avg", 2, |args| {
            let two = formula_calc::BigDecimal::from(2);
            Ok(args[0]
                .plus(&args[1])
                .divided_by(&two, 8, RoundingMode::HalfUp)?
                .strip_trailing_zeros())
        })
        .unwrap();

    assert_eq!(evaluator.evaluate("avg(3, 4)").unwrap(), Value::Float(3.5));
    assert!(matches!(
        evaluator.evaluate("avg(3)"),
        Err(CalcError::Evaluation(_))
    ));
}

#[test]
fn errors_keep_their_kind() {
    assert!(matches!(evaluate("2 $ 3"), Err(CalcError::Lexical { position: 2, .. })));
    assert!(matches!(evaluate("1..2"), Err(CalcError::Lexical { .. })));
    assert!(matches!(evaluate("2 3"), Err(CalcError::Lexical { .. })));
    assert!(matches!(evaluate("(1+2"), Err(CalcError::Syntax(_))));
    assert!(matches!(evaluate("1+2)"), Err(CalcError::Syntax(_))));
    assert!(matches!(evaluate("sqrt(-4)"), Err(CalcError::Evaluation(_))));
}

#[test]
fn calls_never_borrow_operands_from_outside_their_parentheses() {
    assert_eq!(
        evaluate("(5)max(2)"),
        Err(CalcError::Syntax("missing operator before max".to_string()))
    );
    assert_eq!(
        evaluate("(2)log(8)"),
        Err(CalcError::Syntax("missing operator before log".to_string()))
    );
    assert_eq!(
        evaluate("max(2)"),
        Err(CalcError::Evaluation(
            "function max expects 2 arguments, 1 given".to_string()
        ))
    );
    assert_eq!(evaluate("2max(3, 1)"), Ok(Value::Int(6)));
    assert_eq!(evaluate("(5)*max(2, 1)"), Ok(Value::Int(10)));
}

#[test]
fn calendar_functions_are_built_in() {
    // 19782 is 2024-02-29.
    assert_eq!(eval("year(19782)"), Value::Int(2024));
    assert_eq!(eval("day_of_year(19782)"), Value::Int(60));
    assert_eq!(eval("weekday(19782)"), Value::Int(4));
    // A Monday-to-Friday week with no holidays in it.
    assert_eq!(eval("networkdays(19779, 19783)"), Value::Int(5));
}

#[test]
fn settings_change_division_and_backend() {
    let settings = EvalSettings {
        division_scale: 2,
        division_rounding: RoundingMode::Down,
        calculator: Some(CalculatorKind::Native),
        ..EvalSettings::default()
    };
    let evaluator = Evaluator::with_settings(settings).unwrap();
    assert_eq!(evaluator.calculator().name(), "native");
    assert_eq!(evaluator.evaluate_decimal("2/3").unwrap().to_string(), "0.66");
}

#[test]
fn every_backend_gives_the_same_answers() {
    let expressions = [
        "3+4*2",
        "2(3+4)/7",
        "99999999999999999999*99999999999999999999",
        "1/7",
        "-12345678901234567890/3",
    ];
    let reference = Evaluator::with_calculator(EvalSettings::default(), Arc::new(NativeCalculator));
    for kind in CalculatorKind::available() {
        let settings = EvalSettings {
            calculator: Some(kind),
            ..EvalSettings::default()
        };
        let evaluator = Evaluator::with_settings(settings).unwrap();
        for expression in expressions {
            assert_eq!(
                evaluator.evaluate_decimal(expression).unwrap(),
                reference.evaluate_decimal(expression).unwrap(),
                "{kind}: {expression}"
            );
        }
    }
}
