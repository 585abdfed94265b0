//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the catalog client, progress
//! client, or resume engine. Each handler takes CLI args and Output,
//! returns ExitCode.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::api::{build_http_client, CatalogClient, ProgressClient};
use crate::cli::{
    Cli, EpisodeCmd, EpisodesCmd, ExitCode, FinishCmd, NextCmd, Output, ProgressCmd, ResolveCmd,
    SeasonsCmd,
};
use crate::config::Config;
use crate::error::Error;
use crate::resume::{PlayRequest, PlaybackSession, ResumeEngine, SessionEnd};

// =============================================================================
// Backend Connection
// =============================================================================

/// Connection settings resolved from CLI flags and the config file
pub struct Backend {
    base_url: String,
    timeout: Duration,
    user: Option<u64>,
}

impl Backend {
    pub fn from_cli(cli: &Cli) -> Self {
        let config = Config::load();
        Self {
            base_url: cli.base_url.clone().unwrap_or_else(|| config.base_url()),
            timeout: config.timeout(),
            user: cli.user.or_else(|| config.user_id()),
        }
    }

    fn catalog(&self) -> CatalogClient {
        CatalogClient::new(build_http_client(self.timeout), &self.base_url)
    }

    fn progress(&self) -> ProgressClient {
        ProgressClient::new(build_http_client(self.timeout), &self.base_url)
    }

    fn engine(&self) -> ResumeEngine {
        let http = build_http_client(self.timeout);
        ResumeEngine::new(
            CatalogClient::new(http.clone(), &self.base_url),
            ProgressClient::new(http, &self.base_url),
        )
    }

    fn user(&self, output: &Output) -> Result<u64, ExitCode> {
        self.user.ok_or_else(|| {
            output.error(
                "No user id: pass --user or set user_id in the config file",
                ExitCode::InvalidArgs,
            )
        })
    }
}

/// Map library errors onto semantic exit codes
fn exit_code(err: &Error) -> ExitCode {
    match err {
        Error::NotFound => ExitCode::NotFound,
        Error::Validation(_) => ExitCode::ValidationFailed,
        Error::Request(_) | Error::Server(_) => ExitCode::NetworkError,
        _ => ExitCode::Error,
    }
}

// =============================================================================
// Catalog Commands
// =============================================================================

pub async fn seasons_cmd(cmd: SeasonsCmd, backend: &Backend, output: &Output) -> ExitCode {
    output.info(format!("Listing seasons for entity {}", cmd.entity_id));

    match backend.catalog().list_seasons(cmd.entity_id).await {
        Ok(seasons) => {
            if let Err(e) = output.print(&seasons) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Season list failed: {}", e), exit_code(&e)),
    }
}

pub async fn episodes_cmd(cmd: EpisodesCmd, backend: &Backend, output: &Output) -> ExitCode {
    output.info(format!(
        "Listing episodes for entity {} season {}",
        cmd.entity_id, cmd.season
    ));

    match backend.catalog().list_episodes(cmd.entity_id, cmd.season).await {
        Ok(episodes) => {
            if let Err(e) = output.print(&episodes) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Episode list failed: {}", e), exit_code(&e)),
    }
}

pub async fn episode_cmd(cmd: EpisodeCmd, backend: &Backend, output: &Output) -> ExitCode {
    match backend
        .catalog()
        .get_episode(cmd.entity_id, cmd.season, cmd.episode)
        .await
    {
        Ok(episode) => {
            if let Err(e) = output.print(&episode) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Episode lookup failed: {}", e), exit_code(&e)),
    }
}

// =============================================================================
// Resume Commands
// =============================================================================

pub async fn next_cmd(cmd: NextCmd, backend: &Backend, output: &Output) -> ExitCode {
    match backend
        .engine()
        .next_episode(cmd.entity_id, cmd.season, cmd.episode)
        .await
    {
        // An empty offer serializes as null data: the content is complete.
        Ok(next) => {
            if let Err(e) = output.print(&next) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Next-episode lookup failed: {}", e), exit_code(&e)),
    }
}

pub async fn progress_cmd(cmd: ProgressCmd, backend: &Backend, output: &Output) -> ExitCode {
    let user = match backend.user(output) {
        Ok(user) => user,
        Err(code) => return code,
    };

    match backend.progress().get(user, cmd.entity_id).await {
        Ok(record) => {
            if let Err(e) = output.print(&record) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Progress fetch failed: {}", e), exit_code(&e)),
    }
}

pub async fn resolve_cmd(cmd: ResolveCmd, backend: &Backend, output: &Output) -> ExitCode {
    let user = match backend.user(output) {
        Ok(user) => user,
        Err(code) => return code,
    };

    let request = if cmd.movie {
        PlayRequest::movie(user, cmd.entity_id, cmd.video)
    } else {
        PlayRequest::episode(user, cmd.entity_id, cmd.video, cmd.season, cmd.episode)
    };

    output.info(format!("Resolving playback for entity {}", cmd.entity_id));

    let cancel = CancellationToken::new();
    match backend.engine().resolve(&request, &cancel).await {
        Ok(resolution) => {
            if let Err(e) = output.print(&resolution) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Resolution failed: {}", e), exit_code(&e)),
    }
}

pub async fn finish_cmd(cmd: FinishCmd, backend: &Backend, output: &Output) -> ExitCode {
    let user = match backend.user(output) {
        Ok(user) => user,
        Err(code) => return code,
    };

    let request = if cmd.movie {
        PlayRequest::movie(user, cmd.entity_id, cmd.video)
    } else {
        PlayRequest::episode(user, cmd.entity_id, cmd.video, cmd.season, cmd.episode)
    };
    let end = if cmd.abandoned {
        SessionEnd::Abandoned
    } else {
        SessionEnd::Completed
    };

    let engine = backend.engine();
    let mut session = PlaybackSession::new(request, CancellationToken::new());

    if let Err(e) = engine.start(&mut session).await {
        return output.error(format!("Resolution failed: {}", e), exit_code(&e));
    }

    match engine.finish(&mut session, end).await {
        Ok(record) => {
            output.info(format!("Persisted {}", record));
            if let Err(e) = output.print(&record) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Persisting progress failed: {}", e), exit_code(&e)),
    }
}
