//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`health`], or [`workflow_failure`].
//! Each handler lives in its own submodule.

pub mod health;
pub mod run;
pub mod workflow_failure;

use crate::cli::{Cli, Commands};
use crate::error::AlertdeskError;

pub async fn dispatch(cli: Cli) -> Result<(), AlertdeskError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Health(args)) => health::execute(args).await,
        Some(Commands::WorkflowFailure(args)) => workflow_failure::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  alertdesk v{version} \u{2014} alert enrichment API service\n\n  \
         No command provided. To get started:\n\n    \
         alertdesk run                     Start the API (in-memory backend)\n    \
         alertdesk run -p 8080 --pretty    Local dev mode\n    \
         alertdesk health                  Check a running instance\n    \
         alertdesk --help                  See all commands and options\n"
    );
}
