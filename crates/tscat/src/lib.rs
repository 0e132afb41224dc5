#![forbid(unsafe_code)]

pub mod check;
pub mod cli;
pub mod dump;
pub mod error;
pub mod lookup;
pub mod stats;
pub mod telemetry;

pub use cli::{Cli, Commands, run, run_from_env, run_to};
pub use error::{CliError, Result};
