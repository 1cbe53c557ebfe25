//! rulesetctl
//!
//! Command-line front end for the ruleset store and the profile defaults.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use app::{defaults_json, execute, run, wait_for_signal, watch, Context};
pub use cli::{Cli, Command, FormatArg, GlobalArgs, Section, SourceArg};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use logging::{init_logging, LoggingConfig};
