//! Data structures and types for watchpoint
//!
//! Contains the shared models used across the crate organized by domain:
//! - **Catalog**: entities, seasons and episodes served by the backend
//! - **Progress**: per-user resumption records and their wire encoding

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Catalog Models
// =============================================================================

/// A playable catalog title: a movie or a series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: u64,
    pub name: String,
    /// Movie vs. series discriminator
    pub is_movie: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_url: Option<String>,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_movie { "Movie" } else { "Series" };
        write!(f, "{} [{}]", self.name, kind)
    }
}

/// A season of a series, unique within its entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// Season number (positive, unique within the entity)
    pub number: u32,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Season {}", self.number)
    }
}

/// A single episode within a (entity, season)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub season: u32,
    pub episode: u32,
    pub title: String,
    pub description: String,
    /// Thumbnail URL (the backend calls this field `miniatura`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Runtime in minutes, when the backend provides it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02} - {}", self.season, self.episode, self.title)
    }
}

// =============================================================================
// Progress Models
// =============================================================================

/// One user's resumption state for one entity.
///
/// This struct is the wire shape: camelCase field names and the three flag
/// fields encoded as JSON integers 0/1, exactly as the backend stores them.
/// `id` is absent until the record has been persisted once; its presence is
/// what distinguishes an update from a create.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub user_id: u64,
    pub entity_id: u64,
    /// The episode or movie file currently tracked for this entity
    pub video_id: u64,
    /// Meaningless for movies, conventionally 0
    pub current_season: u32,
    /// Meaningless for movies, conventionally 1
    pub current_episode: u32,
    #[serde(with = "int_flag")]
    pub skip_intro: bool,
    #[serde(with = "int_flag")]
    pub skip_outro: bool,
    #[serde(with = "int_flag")]
    pub watched: bool,
}

impl ProgressRecord {
    /// Baseline record for a user who has never started this entity
    pub fn fresh(user_id: u64, entity_id: u64, video_id: u64, season: u32, episode: u32) -> Self {
        Self {
            id: None,
            user_id,
            entity_id,
            video_id,
            current_season: season,
            current_episode: episode,
            skip_intro: false,
            skip_outro: false,
            watched: false,
        }
    }

    /// Reject malformed records before they reach the wire.
    ///
    /// A zero user, entity or video id is never valid. `current_episode`
    /// must be at least 1; `current_season` may be 0 only under the movie
    /// convention.
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id == 0 {
            return Err("userId must be non-zero".into());
        }
        if self.entity_id == 0 {
            return Err("entityId must be non-zero".into());
        }
        if self.video_id == 0 {
            return Err("videoId must be non-zero".into());
        }
        if self.current_episode == 0 {
            return Err("currentEpisode must be at least 1".into());
        }
        Ok(())
    }
}

impl fmt::Display for ProgressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user {} @ entity {} S{:02}E{:02}{}",
            self.user_id,
            self.entity_id,
            self.current_season,
            self.current_episode,
            if self.watched { " (watched)" } else { "" }
        )
    }
}

/// Serde codec for the backend's 0/1 integer flags.
///
/// The backend stores these as integers, not JSON booleans, and existing
/// rows depend on that. Values other than 0 or 1 are rejected.
mod int_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(flag: &bool, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.serialize_u8(u8::from(*flag))
    }

    pub fn deserialize<'de, D>(de: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match u8::deserialize(de)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "flag must be 0 or 1, got {}",
                other
            ))),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
