//! Shell completion generation

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;
use clap::CommandFactory;
use clap_complete::generate;
use std::io;

/// Write completions for the requested shell to stdout
pub fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(args.shell.to_clap_shell(), &mut cmd, name, &mut io::stdout());

    Ok(())
}
