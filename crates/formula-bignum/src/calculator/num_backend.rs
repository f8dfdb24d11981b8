use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

use super::Calculator;

/// Backend delegating to `num-bigint`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumBigintCalculator;

fn parse(a: &str) -> BigInt {
    // Inputs are normalized digit strings, so parsing cannot fail.
    BigInt::parse_bytes(a.as_bytes(), 10).unwrap_or_else(BigInt::zero)
}

impl Calculator for NumBigintCalculator {
    fn name(&self) -> &'static str {
        "num-bigint"
    }

    fn add(&self, a: &str, b: &str) -> String {
        (parse(a) + parse(b)).to_string()
    }

    fn sub(&self, a: &str, b: &str) -> String {
        (parse(a) - parse(b)).to_string()
    }

    fn mul(&self, a: &str, b: &str) -> String {
        (parse(a) * parse(b)).to_string()
    }

    fn div_q_r(&self, a: &str, b: &str) -> (String, String) {
        let (q, r) = parse(a).div_rem(&parse(b));
        (q.to_string(), r.to_string())
    }

    fn raise(&self, a: &str, e: u32) -> String {
        parse(a).pow(e).to_string()
    }

    fn gcd(&self, a: &str, b: &str) -> String {
        parse(a).gcd(&parse(b)).to_string()
    }
}
