#![no_main]

use libfuzzer_sys::fuzz_target;
use tscat_core::{ParseOptions, parse, parse_with, write};

fuzz_target!(|data: &[u8]| {
    // Arbitrary documents must parse or fail with an error, never panic.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(catalog) = parse(text) else {
        return;
    };

    // Anything that parsed must survive serialization unchanged.
    let reparsed = parse(&write(&catalog)).expect("written catalog must parse");
    assert_eq!(reparsed.len(), catalog.len());

    let trimmed = parse_with(
        text,
        ParseOptions {
            retain_vanished: false,
        },
    )
    .expect("dropping vanished entries cannot introduce errors");
    assert!(trimmed.len() <= catalog.len());
});
