#![no_main]

use libfuzzer_sys::fuzz_target;

use formula_bignum::{BigNumber, Number};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 256 {
        return;
    }

    let Ok(number) = Number::parse(text) else {
        return;
    };

    // Printing and reparsing must give back the same value.
    let printed = number.to_string();
    let reparsed = Number::parse(&printed).expect("printed numbers reparse");
    assert_eq!(number.to_big_rational(), reparsed.to_big_rational());
});
