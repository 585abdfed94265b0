//! CLI - Command Line Interface for watchpoint
//!
//! Every resume-engine operation is scriptable. All output is
//! JSON-parseable, with semantic exit codes for automation.
//!
//! # Examples
//!
//! ```bash
//! # Catalog lookups
//! watchpoint seasons 42
//! watchpoint episodes 42 1
//!
//! # Resume resolution for user 7
//! watchpoint resolve 42 -s 1 -e 3 --video 901 -u 7
//!
//! # Persist a finished (or abandoned) viewing session
//! watchpoint finish 42 -s 1 -e 3 --video 901 -u 7
//! watchpoint finish 42 -s 1 -e 3 --video 901 -u 7 --abandoned
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network or server error
    NetworkError = 3,
    /// Entity, season or episode not found
    NotFound = 4,
    /// Malformed progress payload
    ValidationFailed = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// watchpoint - resume engine client for a streaming backend
#[derive(Parser, Debug)]
#[command(
    name = "watchpoint",
    version,
    author = "Gorka & Hermes",
    about = "Resume engine client for a self-hosted streaming backend",
    long_about = "Resolves what to watch, resume or offer next for a catalog \
                  entity, and persists per-user playback progress.\n\n\
                  Every operation is scriptable; output is JSON-parseable.",
    after_help = "EXAMPLES:\n\
                  watchpoint seasons 42                          List seasons\n\
                  watchpoint next 42 -s 1 -e 3                   Next-episode offer\n\
                  watchpoint resolve 42 -s 1 -e 3 --video 901    Resume resolution\n\
                  watchpoint finish 42 -s 1 -e 3 --video 901     Persist completion"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Backend base URL (overrides config)
    #[arg(long, short = 'b', global = true)]
    pub base_url: Option<String>,

    /// User id for progress operations (overrides config)
    #[arg(long, short = 'u', global = true)]
    pub user: Option<u64>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List an entity's seasons
    #[command(visible_alias = "s")]
    Seasons(SeasonsCmd),

    /// List a season's episodes
    #[command(visible_alias = "eps")]
    Episodes(EpisodesCmd),

    /// Resolve a single episode
    #[command(visible_alias = "ep")]
    Episode(EpisodeCmd),

    /// Show the next-episode offer after a given episode
    #[command(visible_alias = "n")]
    Next(NextCmd),

    /// Fetch a user's progress record for an entity
    #[command(visible_alias = "p")]
    Progress(ProgressCmd),

    /// Run full resume resolution for a playback request
    #[command(visible_alias = "r")]
    Resolve(ResolveCmd),

    /// End a viewing session and persist the progress record
    #[command(visible_alias = "f")]
    Finish(FinishCmd),
}

/// List an entity's seasons, ordered ascending
#[derive(Args, Debug)]
pub struct SeasonsCmd {
    /// Entity id
    #[arg(required = true)]
    pub entity_id: u64,
}

/// List a season's episodes, ordered ascending
#[derive(Args, Debug)]
pub struct EpisodesCmd {
    /// Entity id
    #[arg(required = true)]
    pub entity_id: u64,

    /// Season number
    #[arg(required = true)]
    pub season: u32,
}

/// Resolve one episode by (entity, season, episode)
#[derive(Args, Debug)]
pub struct EpisodeCmd {
    /// Entity id
    #[arg(required = true)]
    pub entity_id: u64,

    /// Season number
    #[arg(long, short = 's', required = true)]
    pub season: u32,

    /// Episode number
    #[arg(long, short = 'e', required = true)]
    pub episode: u32,
}

/// Next-episode offer after a given episode. An empty offer (content
/// complete) is a success, not an error.
#[derive(Args, Debug)]
pub struct NextCmd {
    /// Entity id
    #[arg(required = true)]
    pub entity_id: u64,

    /// Season number
    #[arg(long, short = 's', required = true)]
    pub season: u32,

    /// Episode number
    #[arg(long, short = 'e', required = true)]
    pub episode: u32,
}

/// Fetch a user's progress record for an entity
#[derive(Args, Debug)]
pub struct ProgressCmd {
    /// Entity id
    #[arg(required = true)]
    pub entity_id: u64,
}

/// Run resume resolution: resolved episode, next offer, baseline progress
#[derive(Args, Debug)]
pub struct ResolveCmd {
    /// Entity id
    #[arg(required = true)]
    pub entity_id: u64,

    /// Season number (ignored with --movie)
    #[arg(long, short = 's', default_value = "1")]
    pub season: u32,

    /// Episode number (ignored with --movie)
    #[arg(long, short = 'e', default_value = "1")]
    pub episode: u32,

    /// Id of the media file being played
    #[arg(long, required = true)]
    pub video: u64,

    /// The entity is a movie (no episode catalog)
    #[arg(long)]
    pub movie: bool,
}

/// Resolve, end the session, and persist the progress record
#[derive(Args, Debug)]
pub struct FinishCmd {
    /// Entity id
    #[arg(required = true)]
    pub entity_id: u64,

    /// Season number (ignored with --movie)
    #[arg(long, short = 's', default_value = "1")]
    pub season: u32,

    /// Episode number (ignored with --movie)
    #[arg(long, short = 'e', default_value = "1")]
    pub episode: u32,

    /// Id of the media file that was playing
    #[arg(long, required = true)]
    pub video: u64,

    /// The entity is a movie (no episode catalog)
    #[arg(long)]
    pub movie: bool,

    /// Session was torn down mid-content instead of reaching the end
    #[arg(long)]
    pub abandoned: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
