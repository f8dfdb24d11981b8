use formula_bignum::{default_calculator, CalculatorKind, CalculatorRef, RoundingMode, MAX_POWER};
use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// Per-evaluator settings.
///
/// Every field has a default, so a settings document only needs to name what it changes:
///
/// ```
/// use formula_calc::EvalSettings;
///
/// let settings = EvalSettings::from_json(r#"{ "division_scale": 4 }"#)?;
/// assert_eq!(settings.division_scale, 4);
/// assert_eq!(settings.holidays.len(), 3);
/// # Ok::<(), formula_calc::CalcError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalSettings {
    /// Fractional digits kept by the `/` operator.
    pub division_scale: u32,
    /// Rounding applied when `/` discards digits.
    pub division_rounding: RoundingMode,
    /// Pin a calculator backend instead of autodetecting one.
    pub calculator: Option<CalculatorKind>,
    /// Fixed-date holidays skipped by `networkdays`, recurring every year.
    pub holidays: Vec<Holiday>,
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            division_scale: 16,
            division_rounding: RoundingMode::HalfUp,
            calculator: None,
            holidays: vec![
                Holiday { month: 1, day: 1 },
                Holiday { month: 7, day: 4 },
                Holiday { month: 12, day: 25 },
            ],
        }
    }
}

impl EvalSettings {
    pub fn from_json(text: &str) -> CalcResult<Self> {
        let settings: Self = serde_json::from_str(text)
            .map_err(|err| CalcError::evaluation(format!("invalid settings: {err}")))?;
        if settings.division_scale > MAX_POWER {
            return Err(CalcError::evaluation(format!(
                "invalid settings: division_scale {} exceeds {MAX_POWER}",
                settings.division_scale
            )));
        }
        Ok(settings)
    }

    /// The calculator these settings select: the pinned backend, or the process-wide default.
    pub fn resolve_calculator(&self) -> CalcResult<CalculatorRef> {
        match self.calculator {
            None => Ok(default_calculator()),
            Some(kind) => kind.build().ok_or_else(|| {
                CalcError::evaluation(format!("calculator backend {kind} is not available"))
            }),
        }
    }
}

/// A month/day pair that is a holiday in every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holiday {
    pub month: u32,
    pub day: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn json_overrides_only_named_fields() {
        let settings = EvalSettings::from_json(
            r#"{ "division_rounding": "HALF_EVEN", "calculator": "native", "holidays": [] }"#,
        )
        .unwrap();
        assert_eq!(settings.division_scale, 16);
        assert_eq!(settings.division_rounding, RoundingMode::HalfEven);
        assert_eq!(settings.calculator, Some(CalculatorKind::Native));
        assert!(settings.holidays.is_empty());
        assert_eq!(settings.resolve_calculator().unwrap().name(), "native");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            EvalSettings::from_json("{ \"division_scale\": -1 }"),
            Err(CalcError::Evaluation(_))
        ));
        assert!(matches!(
            EvalSettings::from_json(r#"{ "calculator": "gmp" }"#),
            Err(CalcError::Evaluation(_))
        ));
    }

    #[test]
    fn oversized_division_scale_is_rejected() {
        assert_eq!(
            EvalSettings::from_json(r#"{ "division_scale": 4000000000 }"#),
            Err(CalcError::Evaluation(
                "invalid settings: division_scale 4000000000 exceeds 1000000".to_string()
            ))
        );
        let settings = EvalSettings::from_json(r#"{ "division_scale": 1000000 }"#).unwrap();
        assert_eq!(settings.division_scale, MAX_POWER);
    }

    #[test]
    fn unavailable_backends_are_rejected() {
        for kind in CalculatorKind::PRIORITY {
            let settings = EvalSettings {
                calculator: Some(kind),
                ..EvalSettings::default()
            };
            assert_eq!(settings.resolve_calculator().is_ok(), kind.is_available());
        }
    }
}
