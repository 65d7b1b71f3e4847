//! CLI argument definitions for the connector rules validator.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use connector_rules::ConnectorType;

#[derive(Parser)]
#[command(
    name = "connector-rules",
    version,
    about = "Validate MongoDB/Kafka connector configurations against CSV rule tables",
    long_about = "Validate MongoDB/Kafka connector configurations against CSV rule tables.\n\n\
                  The general rule table is always applied; the source or sink table is\n\
                  chosen from connector.class and overrides it for shared fields."
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate connector configuration files.
    Validate(ValidateArgs),

    /// Show the effective rule set for a connector type.
    Rules(RulesArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// JSON configuration files, or folders containing them.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Connector type to validate as (default: detect from connector.class).
    #[arg(long = "connector-type", value_enum)]
    pub connector_type: Option<ConnectorTypeArg>,

    /// Directory containing the rule tables (default: $CONNECTOR_RULES_DIR or rules/).
    #[arg(long = "rules-dir", value_name = "DIR")]
    pub rules_dir: Option<PathBuf>,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Connector type whose rule set to show.
    #[arg(long = "connector-type", value_enum)]
    pub connector_type: ConnectorTypeArg,

    /// Directory containing the rule tables (default: $CONNECTOR_RULES_DIR or rules/).
    #[arg(long = "rules-dir", value_name = "DIR")]
    pub rules_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ConnectorTypeArg {
    Source,
    Sink,
}

impl From<ConnectorTypeArg> for ConnectorType {
    fn from(arg: ConnectorTypeArg) -> Self {
        match arg {
            ConnectorTypeArg::Source => ConnectorType::Source,
            ConnectorTypeArg::Sink => ConnectorType::Sink,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Table,
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
