//! watchpoint - resume engine client for a streaming backend
//!
//! # Usage
//!
//! ```bash
//! # Catalog lookups
//! watchpoint seasons 42
//! watchpoint episodes 42 1
//!
//! # Resume resolution and persistence for user 7
//! watchpoint resolve 42 -s 1 -e 3 --video 901 -u 7
//! watchpoint finish 42 -s 1 -e 3 --video 901 -u 7 --json
//! ```

use clap::Parser;

use watchpoint::cli::{Cli, Command, ExitCode, Output};
use watchpoint::commands::{self, Backend};

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let exit_code = run(cli).await;
    std::process::exit(exit_code.into());
}

/// Dispatch the parsed command and return its exit code
async fn run(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let backend = Backend::from_cli(&cli);

    match cli.command {
        Command::Seasons(cmd) => commands::seasons_cmd(cmd, &backend, &output).await,
        Command::Episodes(cmd) => commands::episodes_cmd(cmd, &backend, &output).await,
        Command::Episode(cmd) => commands::episode_cmd(cmd, &backend, &output).await,
        Command::Next(cmd) => commands::next_cmd(cmd, &backend, &output).await,
        Command::Progress(cmd) => commands::progress_cmd(cmd, &backend, &output).await,
        Command::Resolve(cmd) => commands::resolve_cmd(cmd, &backend, &output).await,
        Command::Finish(cmd) => commands::finish_cmd(cmd, &backend, &output).await,
    }
}
