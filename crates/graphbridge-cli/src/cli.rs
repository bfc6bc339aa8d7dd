//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use graphbridge_core::CompatDirection;
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Graphbridge CLI - Register data models, define bridges, translate records
///
/// A command-line tool for managing graph data models and the directional
/// bridges between them, and for running record translations through those
/// bridges.
#[derive(Parser, Debug)]
#[command(
    name = "graphbridge",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "GRAPHBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage translation bridges between data models
    Bridge(BridgeArgs),

    /// Translate, normalize, and explore data across the bridge graph
    Graph(GraphArgs),

    /// Manage registered data models
    Model(ModelArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the bridge command group
#[derive(Parser, Debug)]
pub struct BridgeArgs {
    #[command(subcommand)]
    pub action: BridgeAction,
}

/// Bridge management actions
#[derive(Subcommand, Debug)]
pub enum BridgeAction {
    /// List every registered bridge
    List,

    /// Show the full record of one bridge
    Show(BridgeShowArgs),

    /// Define and persist a new bridge
    Create(BridgeCreateArgs),

    /// Check the structural validity of a registered bridge
    Validate(BridgeValidateArgs),

    /// Run a bridge against sample data
    Test(BridgeTestArgs),
}

/// Arguments for bridge show
#[derive(Parser, Debug)]
pub struct BridgeShowArgs {
    /// Bridge identifier
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for bridge create
#[derive(Parser, Debug)]
#[command(disable_version_flag = true)]
pub struct BridgeCreateArgs {
    /// Bridge identifier
    #[arg(long)]
    pub id: String,

    /// Bridge version string
    #[arg(long)]
    pub version: String,

    /// Source model name
    #[arg(long)]
    pub source: String,

    /// Target model name
    #[arg(long)]
    pub target: String,

    /// Field mappings as inline JSON or @file (JSON or YAML)
    #[arg(long, value_name = "DATA")]
    pub mappings: String,

    /// Bridge-level transformations as inline JSON or @file
    #[arg(long, value_name = "DATA")]
    pub transformations: Option<String>,

    /// Efficiency score between 0 and 1
    #[arg(long, default_value = "1.0")]
    pub efficiency: f64,

    /// Confidence score between 0 and 1
    #[arg(long, default_value = "1.0")]
    pub confidence: f64,
}

/// Arguments for bridge validate
#[derive(Parser, Debug)]
pub struct BridgeValidateArgs {
    /// Bridge identifier
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for bridge test
#[derive(Parser, Debug)]
pub struct BridgeTestArgs {
    /// Bridge identifier
    #[arg(value_name = "ID")]
    pub id: String,

    /// Sample payload as inline JSON or @file (JSON or YAML)
    #[arg(long, value_name = "DATA")]
    pub data: String,
}

/// Arguments for the graph command group
#[derive(Parser, Debug)]
pub struct GraphArgs {
    #[command(subcommand)]
    pub action: GraphAction,
}

/// Graph-level actions
#[derive(Subcommand, Debug)]
pub enum GraphAction {
    /// Translate a payload from one model to another
    Translate(TranslateArgs),

    /// Normalize a payload into a standard model
    Normalize(NormalizeArgs),

    /// Discover which models are connected by registered bridges
    Discover(DiscoverArgs),
}

/// Arguments for graph translate
#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// Source model name
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Target model name
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Payload as inline JSON or @file (JSON or YAML)
    #[arg(long, value_name = "DATA")]
    pub input: String,

    /// Write the translated payload to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for graph normalize
#[derive(Parser, Debug)]
pub struct NormalizeArgs {
    /// Source model name
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Standard model to normalize into
    #[arg(value_name = "MODEL")]
    pub model: String,

    /// Payload as inline JSON or @file (JSON or YAML)
    #[arg(long, value_name = "DATA")]
    pub input: String,

    /// Write the normalized payload to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,

    /// Validate normalized records against the standard model's schema
    #[arg(long)]
    pub validate: bool,

    /// Entity to validate records as (required when the schema has several)
    #[arg(long, requires = "validate")]
    pub entity: Option<String>,
}

/// Arguments for graph discover
#[derive(Parser, Debug)]
pub struct DiscoverArgs {
    /// Model whose neighbors to list; all known models when omitted
    #[arg(long)]
    pub model: Option<String>,
}

/// Arguments for the model command group
#[derive(Parser, Debug)]
pub struct ModelArgs {
    #[command(subcommand)]
    pub action: ModelAction,
}

/// Model management actions
#[derive(Subcommand, Debug)]
pub enum ModelAction {
    /// List every registered model
    List,

    /// Show the full record of one model
    Show(ModelShowArgs),

    /// Validate a model file and add it to the model library
    Register(ModelRegisterArgs),

    /// List models a given model can translate with
    Compatible(ModelCompatibleArgs),
}

/// Arguments for model show
#[derive(Parser, Debug)]
pub struct ModelShowArgs {
    /// Model name
    #[arg(value_name = "NAME")]
    pub name: String,
}

/// Arguments for model register
#[derive(Parser, Debug)]
pub struct ModelRegisterArgs {
    /// Path to the model file (JSON or YAML)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Replace an already-registered model with the same name
    #[arg(long)]
    pub force: bool,
}

/// Arguments for model compatible
#[derive(Parser, Debug)]
pub struct ModelCompatibleArgs {
    /// Model name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Compatibility direction to consider
    #[arg(short, long, value_enum, default_value = "either")]
    pub direction: Direction,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl OutputFormat {
    /// Parse the configured format name, falling back to human
    pub fn from_config(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "json" => Self::Json,
            "json-pretty" => Self::JsonPretty,
            "yaml" => Self::Yaml,
            _ => Self::Human,
        }
    }
}

/// Compatibility direction accepted on the command line
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    /// Models this one can be translated from
    From,
    /// Models this one can be translated to
    To,
    /// Union of both directions
    Either,
}

impl From<Direction> for CompatDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::From => CompatDirection::From,
            Direction::To => CompatDirection::To,
            Direction::Either => CompatDirection::Either,
        }
    }
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }

    /// Resolve the output format from the flag or the configured default
    pub fn output_format(&self, configured: &str) -> OutputFormat {
        self.output
            .unwrap_or_else(|| OutputFormat::from_config(configured))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify that the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bridge_create_parsing() {
        let cli = Cli::parse_from([
            "graphbridge",
            "bridge",
            "create",
            "--id",
            "b1",
            "--version",
            "1.0",
            "--source",
            "content",
            "--target",
            "asset",
            "--mappings",
            r#"{"url": "content"}"#,
        ]);

        match cli.command {
            Commands::Bridge(BridgeArgs {
                action: BridgeAction::Create(args),
            }) => {
                assert_eq!(args.id, "b1");
                assert_eq!(args.source, "content");
                assert_eq!(args.efficiency, 1.0);
                assert!(args.transformations.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_translate_parsing() {
        let cli = Cli::parse_from([
            "graphbridge",
            "-vv",
            "graph",
            "translate",
            "content",
            "asset",
            "--input",
            "@records.json",
        ]);

        assert_eq!(cli.verbosity_level(), 2);
        match cli.command {
            Commands::Graph(GraphArgs {
                action: GraphAction::Translate(args),
            }) => {
                assert_eq!(args.source, "content");
                assert_eq!(args.target, "asset");
                assert_eq!(args.input, "@records.json");
                assert!(args.save_to.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_zeroes_verbosity() {
        let cli = Cli::parse_from(["graphbridge", "--quiet", "bridge", "list"]);
        assert_eq!(cli.verbosity_level(), 0);
        assert!(cli.quiet);
    }

    #[test]
    fn test_output_format_resolution() {
        let cli = Cli::parse_from(["graphbridge", "--output", "json", "bridge", "list"]);
        assert_eq!(cli.output_format("yaml"), OutputFormat::Json);

        let cli = Cli::parse_from(["graphbridge", "bridge", "list"]);
        assert_eq!(cli.output_format("json-pretty"), OutputFormat::JsonPretty);
        assert_eq!(cli.output_format("nonsense"), OutputFormat::Human);
    }

    #[test]
    fn test_compatible_direction_default() {
        let cli = Cli::parse_from(["graphbridge", "model", "compatible", "content"]);
        match cli.command {
            Commands::Model(ModelArgs {
                action: ModelAction::Compatible(args),
            }) => {
                assert_eq!(args.direction, Direction::Either);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
