//! Command-line interface definition

use clap::{Args, Parser, Subcommand, ValueEnum};
use ruleset_store::{RuleSetFormat, RuleSetSource};
use std::path::PathBuf;

/// Manage proxy client rulesets and print profile defaults
#[derive(Parser, Debug, Clone)]
#[command(name = "rulesetctl", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by every subcommand; unset flags fall back to the
/// environment, then the config file, then built-in defaults.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct GlobalArgs {
    /// JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory that relative ruleset paths and the snapshot resolve against
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Snapshot file name inside the data directory
    #[arg(long, global = true)]
    pub snapshot_file: Option<String>,

    /// Quiet period before a snapshot is written, in milliseconds
    #[arg(long, global = true)]
    pub save_debounce_ms: Option<u64>,

    /// Ruleset download timeout in seconds
    #[arg(long, global = true)]
    pub download_timeout: Option<u64>,

    /// JSON label table replacing the built-in outbound names
    #[arg(long, global = true)]
    pub labels: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Also write logs to this file, rotated daily
    #[arg(long, global = true)]
    pub log_file: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List rulesets in order
    List {
        /// Print the rulesets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one ruleset as JSON
    Show { id: String },

    /// Add a ruleset
    Add {
        #[arg(long)]
        tag: String,

        #[arg(long, value_enum)]
        source: SourceArg,

        #[arg(long, value_enum, default_value_t = FormatArg::Binary)]
        format: FormatArg,

        /// Local path of the ruleset file
        #[arg(long)]
        path: String,

        /// Download URL (http) or source file (file)
        #[arg(long, default_value = "")]
        url: String,

        #[arg(long)]
        disabled: bool,

        /// Refresh right after adding
        #[arg(long)]
        refresh: bool,
    },

    /// Change fields of a ruleset
    Edit {
        id: String,

        #[arg(long)]
        tag: Option<String>,

        #[arg(long, value_enum)]
        source: Option<SourceArg>,

        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        #[arg(long)]
        path: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        #[arg(long)]
        disable: bool,
    },

    /// Delete a ruleset
    Delete { id: String },

    /// Refresh one ruleset
    Refresh { id: String },

    /// Refresh every enabled ruleset
    RefreshAll,

    /// Refresh periodically until interrupted
    Watch {
        /// Seconds between sweeps; overrides the configured interval
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Print default profile settings as JSON
    Defaults {
        /// Profile name
        #[arg(long, default_value = "Default")]
        name: String,

        #[arg(long, value_enum, default_value_t = Section::Profile)]
        section: Section,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceArg {
    Http,
    File,
    Manual,
}

impl From<SourceArg> for RuleSetSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Http => RuleSetSource::Http,
            SourceArg::File => RuleSetSource::File,
            SourceArg::Manual => RuleSetSource::Manual,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Binary,
    Source,
}

impl From<FormatArg> for RuleSetFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Binary => RuleSetFormat::Binary,
            FormatArg::Source => RuleSetFormat::Source,
        }
    }
}

/// Which part of the default profile to print
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Profile,
    General,
    Advanced,
    Tun,
    Dns,
    Groups,
    Rules,
    DnsRules,
}
