use std::cmp::Ordering;

use super::{
    compare_magnitudes, negate, split_sign, strip_leading_zeros, with_sign, Calculator,
};

/// Operand width (in decimal digits) below which add/sub/div use machine integers.
const MAX_DIGITS: usize = if usize::BITS >= 64 { 18 } else { 9 };

/// Operand width below which the product of two operands still fits a machine integer.
const MAX_MUL_DIGITS: usize = MAX_DIGITS / 2;

/// Pure-Rust schoolbook arithmetic. Always available; the fallback of last resort.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCalculator;

/// Parse `a` into a machine integer when its magnitude has at most `max_digits` digits.
fn small(a: &str, max_digits: usize) -> Option<i64> {
    if split_sign(a).1.len() > max_digits {
        return None;
    }
    a.parse().ok()
}

impl Calculator for NativeCalculator {
    fn name(&self) -> &'static str {
        "native"
    }

    fn add(&self, a: &str, b: &str) -> String {
        if let (Some(x), Some(y)) = (small(a, MAX_DIGITS), small(b, MAX_DIGITS)) {
            return (x + y).to_string();
        }

        let (a_neg, a_mag) = split_sign(a);
        let (b_neg, b_mag) = split_sign(b);
        if a_neg == b_neg {
            return with_sign(a_neg, add_magnitudes(a_mag, b_mag));
        }

        match compare_magnitudes(a_mag, b_mag) {
            Ordering::Equal => "0".to_string(),
            Ordering::Greater => with_sign(a_neg, sub_magnitudes(a_mag, b_mag)),
            Ordering::Less => with_sign(b_neg, sub_magnitudes(b_mag, a_mag)),
        }
    }

    fn sub(&self, a: &str, b: &str) -> String {
        self.add(a, &negate(b))
    }

    fn mul(&self, a: &str, b: &str) -> String {
        if let (Some(x), Some(y)) = (small(a, MAX_MUL_DIGITS), small(b, MAX_MUL_DIGITS)) {
            return (x * y).to_string();
        }

        let (a_neg, a_mag) = split_sign(a);
        let (b_neg, b_mag) = split_sign(b);
        with_sign(a_neg != b_neg, mul_magnitudes(a_mag, b_mag))
    }

    fn div_q_r(&self, a: &str, b: &str) -> (String, String) {
        if let (Some(x), Some(y)) = (small(a, MAX_DIGITS), small(b, MAX_DIGITS)) {
            if y != 0 {
                return ((x / y).to_string(), (x % y).to_string());
            }
        }

        let (a_neg, a_mag) = split_sign(a);
        let (b_neg, b_mag) = split_sign(b);
        let (q, r) = div_magnitudes(a_mag, b_mag);
        (with_sign(a_neg != b_neg, q), with_sign(a_neg, r))
    }

    fn raise(&self, a: &str, e: u32) -> String {
        // Square-and-multiply, iteratively.
        let mut result = "1".to_string();
        let mut base = a.to_string();
        let mut e = e;
        while e > 0 {
            if e & 1 == 1 {
                result = self.mul(&result, &base);
            }
            e >>= 1;
            if e > 0 {
                base = self.mul(&base, &base);
            }
        }
        result
    }
}

/// Right-align both magnitudes to `len` digits, returning digit values (not ASCII).
fn padded_digits(a: &str, len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len - a.len()];
    out.extend(a.bytes().map(|b| b - b'0'));
    out
}

fn digits_to_string(digits: impl Iterator<Item = u8>) -> String {
    let s: String = digits.map(|d| char::from(b'0' + d)).collect();
    strip_leading_zeros(&s)
}

fn add_magnitudes(a: &str, b: &str) -> String {
    let len = a.len().max(b.len());
    let x = padded_digits(a, len);
    let y = padded_digits(b, len);

    let mut out = vec![0u8; len + 1];
    let mut carry = 0u8;
    for i in (0..len).rev() {
        let sum = x[i] + y[i] + carry;
        out[i + 1] = sum % 10;
        carry = sum / 10;
    }
    out[0] = carry;
    digits_to_string(out.into_iter())
}

/// `a - b` for magnitudes with `a >= b`.
fn sub_magnitudes(a: &str, b: &str) -> String {
    let len = a.len();
    let x = padded_digits(a, len);
    let y = padded_digits(b, len);

    let mut out = vec![0u8; len];
    let mut borrow = 0u8;
    for i in (0..len).rev() {
        let subtrahend = y[i] + borrow;
        if x[i] >= subtrahend {
            out[i] = x[i] - subtrahend;
            borrow = 0;
        } else {
            out[i] = x[i] + 10 - subtrahend;
            borrow = 1;
        }
    }
    debug_assert_eq!(borrow, 0, "sub_magnitudes requires a >= b");
    digits_to_string(out.into_iter())
}

fn mul_magnitudes(a: &str, b: &str) -> String {
    if a == "0" || b == "0" {
        return "0".to_string();
    }

    // Least-significant digit first.
    let x: Vec<u64> = a.bytes().rev().map(|d| u64::from(d - b'0')).collect();
    let y: Vec<u64> = b.bytes().rev().map(|d| u64::from(d - b'0')).collect();

    let mut acc = vec![0u64; x.len() + y.len()];
    for (i, &xd) in x.iter().enumerate() {
        if xd == 0 {
            continue;
        }
        let mut carry = 0u64;
        for (j, &yd) in y.iter().enumerate() {
            let cur = acc[i + j] + xd * yd + carry;
            acc[i + j] = cur % 10;
            carry = cur / 10;
        }
        let mut k = i + y.len();
        while carry > 0 {
            let cur = acc[k] + carry;
            acc[k] = cur % 10;
            carry = cur / 10;
            k += 1;
        }
    }

    // Every slot is already reduced below 10.
    digits_to_string(acc.into_iter().rev().map(|d| d as u8))
}

/// Long division of magnitudes.
///
/// A "focus window" grows one dividend digit at a time; each step subtracts the divisor from
/// the window as many times as it fits, which is the next quotient digit. What remains in the
/// window after the last digit is the remainder.
fn div_magnitudes(a: &str, b: &str) -> (String, String) {
    if b == "0" {
        debug_assert!(false, "div_magnitudes called with a zero divisor");
        return ("0".to_string(), a.to_string());
    }
    if compare_magnitudes(a, b) == Ordering::Less {
        return ("0".to_string(), a.to_string());
    }

    let mut quotient = String::with_capacity(a.len());
    let mut window = String::with_capacity(b.len() + 1);
    for digit in a.chars() {
        if window == "0" {
            window.clear();
        }
        window.push(digit);

        let mut count = 0u8;
        while compare_magnitudes(&window, b) != Ordering::Less {
            window = sub_magnitudes(&window, b);
            count += 1;
        }
        quotient.push(char::from(b'0' + count));
    }

    let remainder = if window.is_empty() {
        "0".to_string()
    } else {
        window
    };
    (strip_leading_zeros(&quotient), remainder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn adds_across_signs_and_widths() {
        let c = NativeCalculator;
        assert_eq!(c.add("999999999999999999999", "1"), "1000000000000000000000");
        assert_eq!(c.add("-1000000000000000000000", "1"), "-999999999999999999999");
        assert_eq!(c.add("12345678901234567890", "-12345678901234567890"), "0");
        assert_eq!(c.sub("5", "-5"), "10");
    }

    #[test]
    fn multiplies_large_operands() {
        let c = NativeCalculator;
        assert_eq!(
            c.mul("123456789012345678901234567890", "-987654321"),
            "-121932631124828532112482853211126352690"
        );
        assert_eq!(c.mul("0", "-123456789012345678901234567890"), "0");
    }

    #[test]
    fn divides_with_truncation_towards_zero() {
        let c = NativeCalculator;
        assert_eq!(
            c.div_q_r("1000000000000000000000000000007", "1000000000000"),
            ("1000000000000000000".to_string(), "7".to_string())
        );
        assert_eq!(
            c.div_q_r("-1000000000000000000000000000007", "1000000000000"),
            ("-1000000000000000000".to_string(), "-7".to_string())
        );
        assert_eq!(
            c.div_q_r("7", "-1000000000000000000000"),
            ("0".to_string(), "7".to_string())
        );
        assert_eq!(c.div_q_r("-7", "2"), ("-3".to_string(), "-1".to_string()));
    }

    #[test]
    fn long_division_handles_zero_digits_inside_the_dividend() {
        let c = NativeCalculator;
        assert_eq!(
            c.div_q_r("10000000000000000000000000000000", "25"),
            ("400000000000000000000000000000".to_string(), "0".to_string())
        );
        assert_eq!(
            c.div_q_r("100000000000000000000000000000001", "100000000000000000000"),
            ("1000000000000".to_string(), "1".to_string())
        );
    }

    #[test]
    fn raises_by_squaring() {
        let c = NativeCalculator;
        assert_eq!(c.raise("2", 100), "1267650600228229401496703205376");
        assert_eq!(c.raise("-3", 3), "-27");
        assert_eq!(c.raise("12345", 0), "1");
    }

    #[test]
    fn gcd_is_non_negative() {
        let c = NativeCalculator;
        assert_eq!(c.gcd("-12", "18"), "6");
        assert_eq!(c.gcd("0", "-5"), "5");
        assert_eq!(c.gcd("0", "0"), "0");
    }
}
