#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tscat_core::{PlaceholderMode, format};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    template: &'a str,
    args: Vec<&'a str>,
    count: Option<i64>,
}

fuzz_target!(|input: Input<'_>| {
    let args: Vec<&str> = input.args.iter().copied().take(9).collect();

    // Lenient formatting never fails.
    let lenient = format(input.template, &args, input.count, PlaceholderMode::Lenient)
        .expect("lenient formatting is infallible");

    // Strict formatting either agrees with lenient or reports an index past
    // the supplied arguments.
    match format(input.template, &args, input.count, PlaceholderMode::Strict) {
        Ok(strict) => assert_eq!(strict, lenient),
        Err(err) => assert!(err.index > args.len()),
    }
});
