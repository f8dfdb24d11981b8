#![no_main]

use libfuzzer_sys::fuzz_target;

use formula_calc::{CalculatorKind, EvalSettings, Evaluator};

/// Keep evaluation fuzzing bounded; `^` and long literals can otherwise build huge operands.
const MAX_EXPRESSION_CHARS: usize = 512;
const MAX_INPUT_BYTES: usize = MAX_EXPRESSION_CHARS * 4;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let rest = &rest[..rest.len().min(MAX_INPUT_BYTES)];
    let Ok(expression) = std::str::from_utf8(rest) else {
        return;
    };
    if expression.chars().count() > MAX_EXPRESSION_CHARS {
        return;
    }

    // The first byte picks a backend, so every compiled-in calculator gets exercised.
    let kinds: Vec<CalculatorKind> = CalculatorKind::available().collect();
    let kind = kinds[usize::from(selector) % kinds.len()];
    let settings = EvalSettings {
        calculator: Some(kind),
        division_scale: u32::from(selector >> 4),
        ..EvalSettings::default()
    };
    let Ok(evaluator) = Evaluator::with_settings(settings) else {
        return;
    };

    let _ = evaluator.evaluate(expression);
});
