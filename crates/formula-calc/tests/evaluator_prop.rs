use formula_calc::{BigDecimal, Evaluator, Value};
use proptest::prelude::*;

/// Render a literal so that negative values are only ever placed where a sign is allowed.
fn lit(v: i64) -> String {
    if v < 0 {
        format!("({v})")
    } else {
        v.to_string()
    }
}

fn arb_decimal_text() -> impl Strategy<Value = String> {
    ("-?[1-9][0-9]{0,20}", "[0-9]{1,10}").prop_map(|(int, frac)| format!("{int}.{frac}"))
}

proptest! {
    #[test]
    fn integer_expressions_match_i128(
        a in -1_000_000i64..1_000_000,
        b in -1_000_000i64..1_000_000,
        c in -1_000_000i64..1_000_000,
    ) {
        let evaluator = Evaluator::new();
        let expression = format!("{} + {} * {} - {}", lit(a), lit(b), lit(c), lit(a));
        let expected = i128::from(a) + i128::from(b) * i128::from(c) - i128::from(a);
        let got = evaluator.evaluate(&expression).unwrap();
        prop_assert_eq!(got, Value::Int(i64::try_from(expected).unwrap()));
    }

    #[test]
    fn decimal_sums_are_exact(a in arb_decimal_text(), b in arb_decimal_text()) {
        let evaluator = Evaluator::new();
        // Folded minus is allowed after `+`, so the raw texts can be spliced in directly.
        let got = evaluator.evaluate_decimal(&format!("{a}+{b}")).unwrap();
        let expected = BigDecimal::of(a.as_str())
            .unwrap()
            .plus(&BigDecimal::of(b.as_str()).unwrap());
        prop_assert!(got.is_equal_to(&expected), "{} + {} gave {}", a, b, got);
    }

    #[test]
    fn parentheses_around_a_literal_change_nothing(v in -1_000_000i64..1_000_000) {
        let evaluator = Evaluator::new();
        let plain = evaluator.evaluate(&v.to_string()).unwrap();
        let wrapped = evaluator.evaluate(&format!("((({v})))")).unwrap();
        prop_assert_eq!(plain, wrapped);
        prop_assert_eq!(plain, Value::Int(v));
    }
}
