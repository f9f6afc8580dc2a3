//! CLI argument definitions for docview.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "docview",
    version,
    about = "Inspect documentation versions and viewer addresses",
    long_about = "Inspect the published versions of a documentation project, resolve\n\
                  version tokens (including the \"latest\" alias), encode and decode\n\
                  viewer addresses, and replay navigation scripts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Viewer settings file (TOML).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the version service (overrides the settings file).
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Base URL the docs are served from (overrides the settings file).
    #[arg(long = "docs-url", value_name = "URL", global = true)]
    pub docs_url: Option<String>,

    /// Read version lists from a JSON file instead of the version service.
    #[arg(long = "versions-file", value_name = "PATH", global = true)]
    pub versions_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the published versions of a project, newest first.
    Versions {
        /// Project identifier.
        project: String,
    },

    /// Resolve a version token ("latest", a version name or a tag).
    Resolve {
        /// Project identifier.
        project: String,
        /// Version token to resolve.
        version: String,
    },

    /// Build a viewer address.
    Encode(EncodeArgs),

    /// Split a viewer address into its parts.
    Decode {
        /// Address to decode (`#/project/version/page`, a full URL, or a bare route).
        address: String,
    },

    /// Run a navigation script and print every effect.
    Replay(ReplayArgs),
}

#[derive(Parser)]
pub struct EncodeArgs {
    /// Project identifier.
    #[arg(long)]
    pub project: String,

    /// Version token.
    #[arg(long, default_value = "latest")]
    pub version: String,

    /// Page path (default: the configured default page).
    #[arg(long)]
    pub page: Option<String>,

    /// In-page fragment, with or without the leading '#'.
    #[arg(long, default_value = "")]
    pub hash: String,

    /// Mark the address as hide-ui.
    #[arg(long = "hide-ui")]
    pub hide_ui: bool,
}

#[derive(Parser)]
pub struct ReplayArgs {
    /// Script file (JSON).
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReplayFormatArg,
}

/// Replay output choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ReplayFormatArg {
    Text,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
