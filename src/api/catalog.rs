//! Episode catalog client
//!
//! Resolves season lists and episode lists for an entity from the backend's
//! `/api/episodes` endpoints.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{Episode, Season};

/// Client for the season/episode catalog endpoints
pub struct CatalogClient {
    base_url: String,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a catalog client over a shared HTTP client
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Create a client with its own default HTTP client (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(reqwest::Client::new(), base_url)
    }

    /// GET a JSON payload, mapping HTTP statuses onto the error taxonomy
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        log::debug!("catalog GET {}", url);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| Error::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            StatusCode::NOT_FOUND => Err(Error::NotFound),
            status => Err(Error::Server(status.as_u16())),
        }
    }

    /// List an entity's seasons, ordered by season number ascending.
    ///
    /// `NotFound` means the entity itself is unknown.
    pub async fn list_seasons(&self, entity_id: u64) -> Result<Vec<Season>> {
        let endpoint = format!("/api/episodes/{}/seasons", entity_id);
        let raw: Vec<SeasonRaw> = self.get(&endpoint).await?;

        let mut seasons: Vec<Season> = raw.into_iter().map(SeasonRaw::into_season).collect();
        seasons.sort_by_key(|s| s.number);
        Ok(seasons)
    }

    /// List a season's episodes, ordered by episode number ascending.
    ///
    /// An empty list is valid (season exists but is not yet populated);
    /// `NotFound` means the season itself does not exist.
    pub async fn list_episodes(&self, entity_id: u64, season: u32) -> Result<Vec<Episode>> {
        let endpoint = format!("/api/episodes/{}/seasons/{}", entity_id, season);
        let raw: Vec<EpisodeRaw> = self.get(&endpoint).await?;

        let mut episodes: Vec<Episode> = raw.into_iter().map(EpisodeRaw::into_episode).collect();
        episodes.sort_by_key(|e| e.episode);
        Ok(episodes)
    }

    /// Resolve one episode; `NotFound` if the (season, episode) pair is not
    /// cataloged.
    pub async fn get_episode(&self, entity_id: u64, season: u32, episode: u32) -> Result<Episode> {
        let episodes = self.list_episodes(entity_id, season).await?;
        episodes
            .into_iter()
            .find(|e| e.episode == episode)
            .ok_or(Error::NotFound)
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct SeasonRaw {
    season: u32,
}

impl SeasonRaw {
    fn into_season(self) -> Season {
        Season {
            number: self.season,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeRaw {
    season: u32,
    episode: u32,
    title: Option<String>,
    description: Option<String>,
    // The backend names the thumbnail field "miniatura"
    miniatura: Option<String>,
    duration: Option<u32>,
}

impl EpisodeRaw {
    fn into_episode(self) -> Episode {
        Episode {
            season: self.season,
            episode: self.episode,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            thumbnail: self.miniatura,
            duration: self.duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_raw_maps_miniatura() {
        let raw = EpisodeRaw {
            season: 1,
            episode: 2,
            title: Some("Cat's in the Bag...".to_string()),
            description: None,
            miniatura: Some("/thumbs/1x2.jpg".to_string()),
            duration: Some(48),
        };

        let episode = raw.into_episode();
        assert_eq!(episode.thumbnail.as_deref(), Some("/thumbs/1x2.jpg"));
        assert_eq!(episode.description, "");
        assert_eq!(episode.duration, Some(48));
    }

    #[test]
    fn test_season_raw_maps_number() {
        let season = SeasonRaw { season: 4 }.into_season();
        assert_eq!(season.number, 4);
    }
}
