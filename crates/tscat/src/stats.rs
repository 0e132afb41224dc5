use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tscat_core::{CatalogReport, Counts, EngineConfig, parse_file_with};

use crate::error::Result;

#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    /// Catalog file.
    pub file: PathBuf,

    /// Emit the report as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run_stats(args: &StatsArgs, config: &EngineConfig, out: &mut dyn Write) -> Result<()> {
    let catalog = parse_file_with(&args.file, config.parse_options())?;
    let report = CatalogReport::from_catalog(&catalog);

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(
        out,
        "catalog: {} ({})",
        args.file.display(),
        report.language.as_deref().unwrap_or("unknown language")
    )?;
    writeln!(out, "{}", summary(&report.totals))?;
    writeln!(out)?;

    let width = report
        .contexts
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("CONTEXT".len());
    writeln!(
        out,
        "{:<width$}  {:>5}  {:>8}  {:>10}  {:>8}  {:>8}",
        "CONTEXT", "TOTAL", "FINISHED", "UNFINISHED", "VANISHED", "COMPLETE"
    )?;
    for ctx in &report.contexts {
        let c = &ctx.counts;
        writeln!(
            out,
            "{:<width$}  {:>5}  {:>8}  {:>10}  {:>8}  {:>7.1}%",
            ctx.name, c.total, c.finished, c.unfinished, c.vanished, c.completion_percent
        )?;
    }

    let untranslated: usize = report.contexts.iter().map(|c| c.untranslated.len()).sum();
    if untranslated > 0 {
        writeln!(out)?;
        writeln!(out, "untranslated ({untranslated}):")?;
        for ctx in report.contexts.iter().filter(|c| !c.untranslated.is_empty()) {
            for source in &ctx.untranslated {
                writeln!(out, "  {}: {source:?}", ctx.name)?;
            }
        }
    }
    Ok(())
}

fn summary(c: &Counts) -> String {
    format!(
        "total {}  finished {}  unfinished {}  vanished {}  plural {}  complete {:.1}%",
        c.total, c.finished, c.unfinished, c.vanished, c.plural, c.completion_percent
    )
}
