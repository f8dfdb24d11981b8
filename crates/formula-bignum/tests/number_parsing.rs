use std::sync::Arc;

use formula_bignum::{
    BigDecimal, BigInteger, BigNumber, BigRational, CalculatorKind, CalculatorRef,
    NativeCalculator, Number, NumberError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn grammar_picks_the_concrete_type() {
    assert!(matches!(Number::parse("42"), Ok(Number::Integer(_))));
    assert!(matches!(Number::parse("-0.5"), Ok(Number::Decimal(_))));
    assert!(matches!(Number::parse("2e3"), Ok(Number::Decimal(_))));
    assert!(matches!(Number::parse("22/7"), Ok(Number::Rational(_))));
    assert_eq!(
        Number::parse("1,5"),
        Err(NumberError::NumberFormat("1,5".to_string()))
    );
}

#[test]
fn conversions_between_types_are_exact_or_fail() {
    let half = Number::parse("1/2").unwrap();
    assert_eq!(half.to_big_decimal().unwrap().to_string(), "0.5");
    assert_eq!(half.to_big_integer(), Err(NumberError::RoundingNecessary));

    let decimal = Number::parse("-2.50").unwrap();
    assert_eq!(decimal.to_big_rational().simplified().to_string(), "-5/2");
    assert_eq!(decimal.to_f64(), -2.5);
    assert_eq!(
        Number::parse("1.5e2").unwrap().to_big_integer().unwrap(),
        BigInteger::of(150).unwrap()
    );
}

#[test]
fn values_keep_the_calculator_they_were_built_with() {
    let native: CalculatorRef = Arc::new(NativeCalculator);
    let a = BigInteger::of_with("123456789012345678901234567890", &native).unwrap();
    let b = BigInteger::of(3).unwrap();
    assert_eq!(a.calculator().name(), "native");

    // The receiver's calculator drives the operation.
    let product = a.multiplied_by(&b);
    assert_eq!(product.calculator().name(), "native");
    assert_eq!(product.to_string(), "370370367037037036703703703670");

    let decimal = BigDecimal::of_with("0.1", &native).unwrap();
    assert_eq!(decimal.plus(&BigDecimal::of("0.2").unwrap()).calculator().name(), "native");
}

#[test]
fn every_backend_parses_and_prints_the_same_way() {
    for kind in CalculatorKind::available() {
        let calc = kind.build().unwrap();
        let r = BigRational::of_with("-10/4", &calc).unwrap();
        assert_eq!(r.simplified().to_string(), "-5/2", "{kind}");
        let d = BigDecimal::of_with("-0.0625", &calc).unwrap();
        assert_eq!(d.to_big_rational().simplified().to_string(), "-1/16", "{kind}");
    }
}

fn brute_force_gcd(a: u64, b: u64) -> u64 {
    (1..=a.max(b))
        .rev()
        .find(|d| a % d == 0 && b % d == 0)
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn decimal_text_round_trips(
        negative in any::<bool>(),
        integral in "[1-9][0-9]{0,25}",
        fractional in "[0-9]{1,25}",
    ) {
        let text = format!("{}{integral}.{fractional}", if negative { "-" } else { "" });
        let value = BigDecimal::of(text.as_str()).unwrap();
        prop_assert_eq!(value.to_string(), text);
        prop_assert_eq!(value.scale() as usize, fractional.len());
    }

    #[test]
    fn gcd_matches_brute_force(a in 0u64..2_000, b in 0u64..2_000) {
        let g = BigInteger::of(a).unwrap().gcd(&BigInteger::of(b).unwrap());
        prop_assert_eq!(g.to_i64().unwrap() as u64, brute_force_gcd(a, b));
    }

    #[test]
    fn simplified_rationals_compare_equal(n in -500i64..500, d in 1i64..500, k in 1i64..50) {
        let scaled = BigRational::nd(n * k, d * k).unwrap();
        let base = BigRational::nd(n, d).unwrap();
        prop_assert_eq!(&scaled, &base);
        prop_assert_eq!(scaled.simplified().to_string(), base.simplified().to_string());
    }
}
