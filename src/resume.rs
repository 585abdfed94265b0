//! Resume decision engine
//!
//! Combines catalog and progress data to decide where playback starts and
//! what to offer next, and persists the user's resumption state when a
//! viewing session ends.
//!
//! A session walks `NotStarted -> Resolving -> Playing -> {Completed,
//! Abandoned}`. Resolving is the only phase that can fail; both terminal
//! transitions persist progress. Duplicate end signals are tolerated: the
//! record identifier is cached on the session after the first persist, so a
//! repeated signal updates the same record instead of creating a second one.

use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::api::{build_http_client, CatalogClient, ProgressClient};
use crate::error::{Error, Result};
use crate::models::{Entity, Episode, ProgressRecord};

// =============================================================================
// Play Request
// =============================================================================

/// What the user asked to play, as known by the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub user_id: u64,
    pub entity_id: u64,
    /// The media file about to be played (the host knows this from the
    /// playback page; the catalog does not expose it)
    pub video_id: u64,
    pub season: u32,
    pub episode: u32,
    /// Movies have no catalog entry at episode granularity
    pub movie: bool,
}

impl PlayRequest {
    /// Request a series episode
    pub fn episode(user_id: u64, entity_id: u64, video_id: u64, season: u32, episode: u32) -> Self {
        Self {
            user_id,
            entity_id,
            video_id,
            season,
            episode,
            movie: false,
        }
    }

    /// Request a movie. Season/episode take the backend's movie convention
    /// (0 and 1).
    pub fn movie(user_id: u64, entity_id: u64, video_id: u64) -> Self {
        Self {
            user_id,
            entity_id,
            video_id,
            season: 0,
            episode: 1,
            movie: true,
        }
    }

    /// Build a request from a catalog entity, branching on its kind
    pub fn for_entity(
        user_id: u64,
        entity: &Entity,
        video_id: u64,
        season: u32,
        episode: u32,
    ) -> Self {
        if entity.is_movie {
            Self::movie(user_id, entity.id, video_id)
        } else {
            Self::episode(user_id, entity.id, video_id, season, episode)
        }
    }

    /// Baseline record for a user starting this entity fresh
    fn fresh_record(&self) -> ProgressRecord {
        ProgressRecord::fresh(
            self.user_id,
            self.entity_id,
            self.video_id,
            self.season,
            self.episode,
        )
    }

    fn validate(&self) -> Result<()> {
        let reason = if self.user_id == 0 {
            Some("user id must be non-zero")
        } else if self.entity_id == 0 {
            Some("entity id must be non-zero")
        } else if self.video_id == 0 {
            Some("video id must be non-zero")
        } else if !self.movie && (self.season == 0 || self.episode == 0) {
            Some("season and episode must be at least 1 for series")
        } else {
            None
        };

        match reason {
            Some(reason) => {
                log::error!("rejecting malformed play request: {}", reason);
                Err(Error::Validation(reason.into()))
            }
            None => Ok(()),
        }
    }
}

// =============================================================================
// Session State Machine
// =============================================================================

/// Lifecycle of one viewing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    /// Catalog and progress lookups in flight; the only state that may fail
    Resolving,
    Playing,
    /// End of content reached
    Completed,
    /// Torn down before the end; progress is still persisted so mid-episode
    /// resume works
    Abandoned,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Abandoned)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::NotStarted => write!(f, "not started"),
            SessionState::Resolving => write!(f, "resolving"),
            SessionState::Playing => write!(f, "playing"),
            SessionState::Completed => write!(f, "completed"),
            SessionState::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// How a playing session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Playback reached the end of the content
    Completed,
    /// Session torn down mid-content
    Abandoned,
}

// =============================================================================
// Resolution
// =============================================================================

/// Outcome of resume resolution: where playback starts and what comes next
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// The resolved episode; `None` for movies
    pub episode: Option<Episode>,
    /// The "what's next" offer; `None` means the content is complete,
    /// which is not an error
    pub next: Option<Episode>,
    /// Baseline for resume-position UI; fresh when the user has never
    /// started this entity
    pub progress: ProgressRecord,
}

// =============================================================================
// Playback Session
// =============================================================================

/// One continuous playback attempt for a (user, entity)
#[derive(Debug)]
pub struct PlaybackSession {
    pub id: Uuid,
    request: PlayRequest,
    state: SessionState,
    resolution: Option<Resolution>,
    /// Record identifier carried across the whole session so repeated end
    /// signals never create a second record
    progress_id: Option<u64>,
    cancel: CancellationToken,
}

impl PlaybackSession {
    pub fn new(request: PlayRequest, cancel: CancellationToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            state: SessionState::NotStarted,
            resolution: None,
            progress_id: None,
            cancel,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn request(&self) -> &PlayRequest {
        &self.request
    }

    /// Available once the session has reached `Playing`
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn progress_id(&self) -> Option<u64> {
        self.progress_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

// =============================================================================
// Resume Engine
// =============================================================================

/// The decision engine over the catalog and progress clients
pub struct ResumeEngine {
    catalog: CatalogClient,
    progress: ProgressClient,
}

impl ResumeEngine {
    pub fn new(catalog: CatalogClient, progress: ProgressClient) -> Self {
        Self { catalog, progress }
    }

    /// Build an engine whose clients share one HTTP client with a bounded
    /// request timeout
    pub fn connect(base_url: &str, timeout: Duration) -> Self {
        let http = build_http_client(timeout);
        Self::new(
            CatalogClient::new(http.clone(), base_url),
            ProgressClient::new(http, base_url),
        )
    }

    /// Run resume resolution for a request.
    ///
    /// The episode lookup gates everything else: it validates the request
    /// and supplies the default progress values. The progress and
    /// next-episode lookups are independent of each other and run
    /// concurrently. The token is checked before any fetched result is
    /// applied, so a discarded session is never mutated late.
    pub async fn resolve(
        &self,
        request: &PlayRequest,
        cancel: &CancellationToken,
    ) -> Result<Resolution> {
        request.validate()?;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        if request.movie {
            let existing = tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                r = self.progress.get(request.user_id, request.entity_id) => r?,
            };
            return Ok(Resolution {
                episode: None,
                next: None,
                progress: existing.unwrap_or_else(|| request.fresh_record()),
            });
        }

        let episode = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            r = self.catalog.get_episode(request.entity_id, request.season, request.episode) => r?,
        };

        let lookups = async {
            tokio::try_join!(
                self.progress.get(request.user_id, request.entity_id),
                self.next_episode(request.entity_id, request.season, request.episode),
            )
        };
        let (existing, next) = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            r = lookups => r?,
        };

        Ok(Resolution {
            episode: Some(episode),
            next,
            progress: existing.unwrap_or_else(|| request.fresh_record()),
        })
    }

    /// The "what's next" candidate after (season, episode): episode+1 in
    /// the same season, else the first episode of season+1, else nothing
    /// (the content is complete).
    pub async fn next_episode(
        &self,
        entity_id: u64,
        season: u32,
        episode: u32,
    ) -> Result<Option<Episode>> {
        let current = self.catalog.list_episodes(entity_id, season).await?;
        if let Some(next) = current.into_iter().find(|e| e.episode == episode + 1) {
            return Ok(Some(next));
        }

        match self.catalog.list_episodes(entity_id, season + 1).await {
            Ok(episodes) => Ok(episodes.into_iter().next()),
            Err(Error::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Take a fresh session through `Resolving` into `Playing`.
    ///
    /// On failure the session stays in `Resolving` and is expected to be
    /// discarded; the error is the caller's to surface.
    pub async fn start(&self, session: &mut PlaybackSession) -> Result<()> {
        if session.state != SessionState::NotStarted {
            return Err(Error::InvalidTransition(format!(
                "cannot start a session that is {}",
                session.state
            )));
        }

        session.state = SessionState::Resolving;
        let resolution = self.resolve(&session.request, &session.cancel).await?;

        session.progress_id = resolution.progress.id;
        session.resolution = Some(resolution);
        session.state = SessionState::Playing;
        log::debug!("session {} playing ({})", session.id, session.request.entity_id);
        Ok(())
    }

    /// End a playing session and persist the updated progress record.
    ///
    /// The create/update choice branches on the identifier cached on the
    /// session, never on a fresh lookup. A `Conflict` from create means
    /// someone already created the record; it is absorbed by fetching the
    /// stored record and updating it. Persistence failures are surfaced so
    /// the host can queue its own retry; calling again with the same end
    /// state is safe.
    pub async fn finish(
        &self,
        session: &mut PlaybackSession,
        end: SessionEnd,
    ) -> Result<ProgressRecord> {
        if !matches!(session.state, SessionState::Playing)
            && !session.state.is_terminal()
        {
            return Err(Error::InvalidTransition(format!(
                "cannot finish a session that is {}",
                session.state
            )));
        }
        let resolution = match session.resolution.as_ref() {
            Some(r) => r,
            None => {
                return Err(Error::InvalidTransition(
                    "session was never resolved".into(),
                ))
            }
        };

        let record = end_record(&session.request, resolution, end);
        session.state = match end {
            SessionEnd::Completed => SessionState::Completed,
            SessionEnd::Abandoned => SessionState::Abandoned,
        };
        self.persist(session, record).await
    }

    async fn persist(
        &self,
        session: &mut PlaybackSession,
        mut record: ProgressRecord,
    ) -> Result<ProgressRecord> {
        if let Some(id) = session.progress_id {
            record.id = Some(id);
            self.progress.update(id, &record).await?;
            return Ok(record);
        }

        record.id = None;
        match self.progress.create(&record).await {
            Ok(stored) => {
                session.progress_id = stored.id;
                Ok(stored)
            }
            Err(Error::Conflict) => {
                // A record already exists (duplicate end signal racing the
                // create, or another device). Fetch it and update instead.
                log::warn!("create conflicted for {}; updating existing record", record);
                let existing = self
                    .progress
                    .get(record.user_id, record.entity_id)
                    .await?
                    .ok_or_else(|| {
                        Error::InvalidResponse("conflict reported but no record found".into())
                    })?;
                let id = existing.id.ok_or_else(|| {
                    Error::InvalidResponse("stored record is missing an id".into())
                })?;

                record.id = Some(id);
                self.progress.update(id, &record).await?;
                session.progress_id = Some(id);
                Ok(record)
            }
            Err(e) => Err(e),
        }
    }
}

/// Compute the record to persist when a session ends.
///
/// Completion advances the record to the next episode, or marks the entity
/// watched when there is nothing further. Abandonment keeps the last known
/// position with `watched` unset. Skip flags from the baseline are
/// preserved either way.
fn end_record(request: &PlayRequest, resolution: &Resolution, end: SessionEnd) -> ProgressRecord {
    let mut record = resolution.progress.clone();
    record.user_id = request.user_id;
    record.entity_id = request.entity_id;
    record.video_id = request.video_id;

    match end {
        SessionEnd::Completed => match &resolution.next {
            Some(next) => {
                record.current_season = next.season;
                record.current_episode = next.episode;
                record.watched = false;
            }
            None => {
                record.current_season = request.season;
                record.current_episode = request.episode;
                record.watched = true;
            }
        },
        SessionEnd::Abandoned => {
            record.current_season = request.season;
            record.current_episode = request.episode;
            record.watched = false;
        }
    }

    record
}

// =============================================================================
// Unit Tests
// =============================================================================
