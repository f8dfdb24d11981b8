//! The combined numeric grammar shared by all number types.
//!
//! ```text
//! number   := sign? ( rational | decimal )
//! rational := digits '/' digits
//! decimal  := digits? '.'? digits? ( [eE] sign? digits )?     -- at least one digit before the exponent
//! ```
//!
//! Which optional group matched decides the concrete type: a denominator yields a rational, a
//! decimal point or an exponent yields a decimal, and a bare run of digits yields an integer.

use crate::error::{NumberError, NumberResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scanned<'a> {
    Integer {
        negative: bool,
        digits: &'a str,
    },
    Decimal {
        negative: bool,
        integral: &'a str,
        fractional: &'a str,
        exponent: i64,
    },
    Rational {
        negative: bool,
        numerator: &'a str,
        denominator: &'a str,
    },
}

fn take_digits(s: &str) -> (&str, &str) {
    let end = s.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

pub(crate) fn scan(text: &str) -> NumberResult<Scanned<'_>> {
    let invalid = || NumberError::NumberFormat(text.to_string());

    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (integral, rest) = take_digits(rest);

    if let Some(rest) = rest.strip_prefix('/') {
        let (denominator, rest) = take_digits(rest);
        if integral.is_empty() || denominator.is_empty() || !rest.is_empty() {
            return Err(invalid());
        }
        return Ok(Scanned::Rational {
            negative,
            numerator: integral,
            denominator,
        });
    }

    let (has_point, rest) = match rest.strip_prefix('.') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let (fractional, rest) = take_digits(rest);

    if integral.is_empty() && fractional.is_empty() {
        return Err(invalid());
    }

    let (exponent, rest) = match rest.strip_prefix(|c: char| c == 'e' || c == 'E') {
        Some(rest) => {
            let (exp_negative, rest) = match rest.as_bytes().first() {
                Some(b'-') => (true, &rest[1..]),
                Some(b'+') => (false, &rest[1..]),
                _ => (false, rest),
            };
            let (digits, rest) = take_digits(rest);
            if digits.is_empty() {
                return Err(invalid());
            }
            let magnitude: i64 = digits.parse().map_err(|_| invalid())?;
            (Some(if exp_negative { -magnitude } else { magnitude }), rest)
        }
        None => (None, rest),
    };

    if !rest.is_empty() {
        return Err(invalid());
    }

    if !has_point && exponent.is_none() {
        return Ok(Scanned::Integer {
            negative,
            digits: integral,
        });
    }

    Ok(Scanned::Decimal {
        negative,
        integral,
        fractional,
        exponent: exponent.unwrap_or(0),
    })
}

/// Build a normalized digit string from an unsigned digit run and a sign.
pub(crate) fn normalize(negative: bool, digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else if negative {
        format!("-{trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// Multiply a normalized digit string by `10^zeros` by appending zeros.
pub(crate) fn append_zeros(value: &str, zeros: u32) -> String {
    if value == "0" || zeros == 0 {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + zeros as usize);
    out.push_str(value);
    out.extend(std::iter::repeat('0').take(zeros as usize));
    out
}

/// `10^exponent` as a normalized digit string.
pub(crate) fn power_of_ten(exponent: u32) -> String {
    append_zeros("1", exponent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn picks_the_type_from_the_matched_group() {
        assert_eq!(
            scan("-0012").unwrap(),
            Scanned::Integer {
                negative: true,
                digits: "0012"
            }
        );
        assert_eq!(
            scan("1.50e-3").unwrap(),
            Scanned::Decimal {
                negative: false,
                integral: "1",
                fractional: "50",
                exponent: -3
            }
        );
        assert_eq!(
            scan("+3/4").unwrap(),
            Scanned::Rational {
                negative: false,
                numerator: "3",
                denominator: "4"
            }
        );
        assert!(matches!(scan(".5"), Ok(Scanned::Decimal { .. })));
        assert!(matches!(scan("7."), Ok(Scanned::Decimal { .. })));
        assert!(matches!(scan("1e5"), Ok(Scanned::Decimal { .. })));
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "-", ".", "1.2.3", "1e", "e5", "1/", "/2", "1.5/2", "1/2e3", "12a", " 1"] {
            assert_eq!(
                scan(text),
                Err(NumberError::NumberFormat(text.to_string())),
                "{text:?} should not parse"
            );
        }
    }

    #[test]
    fn normalize_strips_zeros_and_negative_zero() {
        assert_eq!(normalize(true, "000"), "0");
        assert_eq!(normalize(true, "0042"), "-42");
        assert_eq!(append_zeros("-7", 3), "-7000");
        assert_eq!(append_zeros("0", 3), "0");
        assert_eq!(power_of_ten(0), "1");
    }
}
