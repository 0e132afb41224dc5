use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tscat_core::{EngineConfig, PluralRuleTable, lint, parse_file_with};

use crate::error::{CliError, Result};
use crate::lookup::resolve_locale;

/// Exit code when lint findings exist.
pub const FINDINGS_EXIT_CODE: i32 = 2;

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Catalog file.
    pub file: PathBuf,

    /// Locale whose plural rule is checked; defaults to the catalog's
    /// `language`.
    #[arg(long)]
    pub locale: Option<String>,

    /// Emit findings as a JSON array.
    #[arg(long)]
    pub json: bool,
}

pub fn run_check(args: &CheckArgs, config: &EngineConfig, out: &mut dyn Write) -> Result<()> {
    let catalog = parse_file_with(&args.file, config.parse_options())?;
    let locale = resolve_locale(args.locale.as_deref(), catalog.language.as_deref());
    let rule = PluralRuleTable::builtin().rule_or_default(&locale);
    let findings = lint(&catalog, rule);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &findings)?;
        writeln!(out)?;
    } else {
        for finding in &findings {
            writeln!(out, "{finding}")?;
        }
    }

    if findings.is_empty() {
        return Ok(());
    }
    Err(CliError::exit(
        FINDINGS_EXIT_CODE,
        format!("{}: {} finding(s)", args.file.display(), findings.len()),
    ))
}
