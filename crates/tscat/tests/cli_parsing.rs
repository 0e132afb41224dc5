//! Argument parsing and end-to-end dispatch through the public entry points.

use std::path::PathBuf;

use clap::Parser;
use tscat::telemetry::LogFormat;
use tscat::{Cli, CliError, Commands, run_to};

fn fixture() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tscat-core/tests/fixtures/bitcoin_zh_TW.ts")
        .display()
        .to_string()
}

fn run(argv: &[&str]) -> (Result<(), CliError>, String) {
    let cli = Cli::try_parse_from(argv).expect("arguments should parse");
    let mut out = Vec::new();
    let result = run_to(cli, &mut out);
    (result, String::from_utf8(out).expect("utf-8 output"))
}

// ── Parsing ───────────────────────────────────────────────────────────────

#[test]
fn lookup_flags_parse() {
    let cli = Cli::try_parse_from([
        "tscat",
        "lookup",
        "cat.ts",
        "--context",
        "Main",
        "--source",
        "%n file(s)",
        "--count",
        "-3",
        "--arg",
        "a",
        "--arg",
        "b",
        "--lenient",
    ])
    .unwrap();
    let Commands::Lookup(args) = cli.command else {
        panic!("expected lookup");
    };
    assert_eq!(args.file, PathBuf::from("cat.ts"));
    assert_eq!(args.count, Some(-3));
    assert_eq!(args.args, vec!["a", "b"]);
    assert!(args.lenient);
    assert_eq!(args.locale, None);
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "tscat",
        "stats",
        "cat.ts",
        "--log-format",
        "json",
        "--log-filter",
        "tscat=debug",
        "--config",
        "tscat.toml",
    ])
    .unwrap();
    assert_eq!(cli.log_format, LogFormat::Json);
    assert_eq!(cli.log_filter.as_deref(), Some("tscat=debug"));
    assert_eq!(cli.config, Some(PathBuf::from("tscat.toml")));
}

#[test]
fn lookup_requires_context_and_source() {
    assert!(Cli::try_parse_from(["tscat", "lookup", "cat.ts"]).is_err());
    assert!(Cli::try_parse_from(["tscat", "lookup", "cat.ts", "--context", "Main"]).is_err());
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["tscat", "translate", "cat.ts"]).is_err());
}

// ── End to end ────────────────────────────────────────────────────────────

#[test]
fn lookup_finished_message() {
    let file = fixture();
    let (result, out) = run(&[
        "tscat",
        "lookup",
        &file,
        "--context",
        "AddressBookPage",
        "--source",
        "&Copy",
    ]);
    result.unwrap();
    assert_eq!(out, "複製\n");
}

#[test]
fn lookup_unfinished_falls_back_to_source() {
    let file = fixture();
    let (result, out) = run(&[
        "tscat",
        "lookup",
        &file,
        "--context",
        "BitcoinGUI",
        "--source",
        "Send coins to a %1 address",
        "--arg",
        "Bitcoin",
    ]);
    result.unwrap();
    assert_eq!(out, "Send coins to a %1 address\n");
}

#[test]
fn plural_lookup_under_explicit_locale() {
    let file = fixture();
    let (result, out) = run(&[
        "tscat",
        "lookup",
        &file,
        "--locale",
        "zh_TW",
        "--context",
        "QObject",
        "--source",
        "%n day(s)",
        "--count",
        "3",
    ]);
    result.unwrap();
    assert_eq!(out, "3 天\n");
}

#[test]
fn check_reports_exit_code_two() {
    let file = fixture();
    let (result, out) = run(&["tscat", "check", &file]);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(out.contains("BitcoinGUI: \"Open a %1 URI or payment request\""));
}

#[test]
fn stats_json_totals() {
    let file = fixture();
    let (result, out) = run(&["tscat", "stats", &file, "--json"]);
    result.unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["totals"]["total"], 1085);
    assert_eq!(value["totals"]["vanished"], 75);
}

#[test]
fn malformed_catalog_is_reported_with_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.ts");
    std::fs::write(&path, "<TS version=\"2.1\">\n<context><name>A</name>\n</TS>").unwrap();
    let file = path.display().to_string();
    let (result, _) = run(&["tscat", "stats", &file]);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().starts_with("malformed catalog at line 3"), "{err}");
}
