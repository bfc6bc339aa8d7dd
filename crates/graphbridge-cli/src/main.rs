//! Graphbridge CLI - Command-line interface for graph data-model bridging
//!
//! This is the main entry point for the graphbridge CLI application,
//! providing commands for registering data models, defining bridges, and
//! translating records across the bridge graph.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod models;
mod output;
mod store;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use handlers::AppContext;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Load configuration first so the configured log level and colors apply
    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error::format_error(&e, cli.use_color()));
            process::exit(e.exit_code());
        }
    };

    // Set up colored output
    control::set_override(cli.use_color() && config.output.color);

    // Initialize logging
    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Run the application
    let result = run(cli, config).await;

    // Handle the result
    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!(
                "{}",
                error::format_error(&e, control::SHOULD_COLORIZE.should_colorize())
            );

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli, config), fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    // Create output writer
    let format = cli.output_format(&config.output.format);
    let mut output = OutputWriter::new(
        format,
        cli.use_color() && config.output.color,
        cli.quiet,
        cli.verbosity_level(),
    );

    // Hydrate registries from the store and the model library
    let ctx = {
        let _hydration_timer = Timer::new("context_hydration");
        AppContext::from_config(&config)?
    };

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    // Handle the subcommand
    match cli.command {
        Commands::Bridge(args) => handlers::handle_bridge(args, &ctx, &mut output).await,
        Commands::Graph(args) => handlers::handle_graph(args, &ctx, &mut output).await,
        Commands::Model(args) => handlers::handle_model(args, &ctx, &mut output).await,
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    // The configured level only applies when no verbosity flag was given
    if cli.verbosity_level() == 0 {
        if let Some(level) = &config.logging.level {
            logging_config.level = level.clone();
        }
    }

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    // Initialize the logging system
    logging::init_logging(logging_config)
}
