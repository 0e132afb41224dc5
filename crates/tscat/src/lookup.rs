use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tscat_core::{
    CatalogStore, EngineConfig, Lookup, PlaceholderMode, PluralRuleTable, parse_file_with,
};

use crate::error::{CliError, Result};

/// Highest positional placeholder, `%9`.
const MAX_ARGS: usize = 9;

#[derive(Debug, Clone, Args)]
pub struct LookupArgs {
    /// Catalog file.
    pub file: PathBuf,

    /// Locale for plural rules; defaults to the catalog's `language`.
    #[arg(long)]
    pub locale: Option<String>,

    #[arg(long)]
    pub context: String,

    /// Source text exactly as it appears in the catalog.
    #[arg(long)]
    pub source: String,

    #[arg(long)]
    pub disambiguation: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Positional argument for `%1`..`%9`; repeat in order.
    #[arg(long = "arg")]
    pub args: Vec<String>,

    /// Render out-of-range placeholders as empty instead of failing.
    #[arg(long)]
    pub lenient: bool,
}

pub fn run_lookup(args: &LookupArgs, config: &EngineConfig, out: &mut dyn Write) -> Result<()> {
    if args.args.len() > MAX_ARGS {
        return Err(CliError::invalid(format!(
            "--arg given {} times; at most {MAX_ARGS} positional arguments are used",
            args.args.len()
        )));
    }
    let catalog = parse_file_with(&args.file, config.parse_options())?;
    let locale = resolve_locale(args.locale.as_deref(), catalog.language.as_deref());

    let mut options = config.store_options();
    if args.lenient {
        options.placeholder_mode = PlaceholderMode::Lenient;
    }
    let store = CatalogStore::for_locale(catalog, &locale, &PluralRuleTable::builtin(), options);

    let mut lookup =
        Lookup::new(&args.context, &args.source).args(args.args.iter().map(String::as_str));
    if let Some(disambiguation) = &args.disambiguation {
        lookup = lookup.disambiguation(disambiguation);
    }
    if let Some(count) = args.count {
        lookup = lookup.count(count);
    }

    let text = store.translate(&lookup)?;
    writeln!(out, "{text}")?;
    Ok(())
}

/// Explicit locale, then the catalog's declared language, then `en`.
pub(crate) fn resolve_locale(explicit: Option<&str>, declared: Option<&str>) -> String {
    explicit
        .or(declared)
        .filter(|l| !l.trim().is_empty())
        .unwrap_or("en")
        .to_string()
}
