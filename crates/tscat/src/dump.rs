use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tscat_core::{EngineConfig, parse_file_with, write};

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Args)]
pub struct DumpArgs {
    /// Catalog file.
    pub file: PathBuf,

    /// Write here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Omit vanished entries from the output.
    #[arg(long = "drop-vanished")]
    pub drop_vanished: bool,
}

pub fn run_dump(args: &DumpArgs, config: &EngineConfig, out: &mut dyn Write) -> Result<()> {
    let mut catalog = parse_file_with(&args.file, config.parse_options())?;
    if args.drop_vanished {
        catalog = catalog.without_vanished();
    }
    let document = write(&catalog);

    match &args.output {
        Some(path) => {
            std::fs::write(path, document.as_bytes()).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::info!(
                target: "tscat.cli",
                output = %path.display(),
                messages = catalog.len(),
                "catalog written"
            );
        }
        None => out.write_all(document.as_bytes())?,
    }
    Ok(())
}
