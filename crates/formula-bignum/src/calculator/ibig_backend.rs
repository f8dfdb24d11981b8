use ibig::IBig;

use super::Calculator;

/// Backend delegating to `ibig`.
#[derive(Debug, Default, Clone, Copy)]
pub struct IbigCalculator;

fn parse(a: &str) -> IBig {
    // Inputs are normalized digit strings, so parsing cannot fail.
    IBig::from_str_radix(a, 10).unwrap_or_else(|_| IBig::from(0u8))
}

impl Calculator for IbigCalculator {
    fn name(&self) -> &'static str {
        "ibig"
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
        let (x, y) = (parse(a), parse(b));
        // `/` rounds towards zero and `%` follows the dividend's sign.
        ((&x / &y).to_string(), (&x % &y).to_string())
    }

    fn raise(&self, a: &str, e: u32) -> String {
        parse(a).pow(e as usize).to_string()
    }
}
