#![no_main]

use libfuzzer_sys::fuzz_target;

use formula_calc::lexer::{tokenize, TokenKind};
use formula_calc::postfix::to_postfix;

const MAX_EXPRESSION_CHARS: usize = 4_096;
const MAX_INPUT_BYTES: usize = MAX_EXPRESSION_CHARS * 4; // max UTF-8 bytes per char

const FUNCTION_NAMES: [&str; 5] = ["sqrt", "log", "ln", "day", "day_of_year"];

fn truncate_to_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fuzz_target!(|data: &[u8]| {
    let data = &data[..data.len().min(MAX_INPUT_BYTES)];
    let input = String::from_utf8_lossy(data);
    let expression = truncate_to_chars(&input, MAX_EXPRESSION_CHARS);

    let Ok(tokens) = tokenize(expression, FUNCTION_NAMES) else {
        return;
    };

    for token in &tokens {
        // Spans must always slice the source on character boundaries.
        let text = &expression[token.span.start..token.span.end];
        match &token.kind {
            TokenKind::Function(name) => assert!(text.eq_ignore_ascii_case(name)),
            TokenKind::Number(literal) => assert_eq!(text, literal),
            _ => {}
        }
    }

    let _ = to_postfix(&tokens, &formula_bignum::default_calculator());
});
