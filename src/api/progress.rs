//! Progress store client
//!
//! Reads and writes a user's per-entity resumption record against the
//! backend's `/api/user_progress` endpoints. At most one record exists per
//! (user, entity) pair; the backend answers a duplicate create with 409.

use reqwest::StatusCode;

use crate::error::{Error, Result};
use crate::models::ProgressRecord;

/// Client for the user-progress endpoints
pub struct ProgressClient {
    base_url: String,
    client: reqwest::Client,
}

impl ProgressClient {
    /// Create a progress client over a shared HTTP client
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

    /// Fetch the record for (user, entity). `None` means the user has never
    /// started this entity; that is not an error.
    pub async fn get(&self, user_id: u64, entity_id: u64) -> Result<Option<ProgressRecord>> {
        let url = format!("{}/api/user_progress/{}/{}", self.base_url, user_id, entity_id);
        log::debug!("progress GET {}", url);

        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                let record: ProgressRecord = serde_json::from_str(&body)
                    .map_err(|e| Error::InvalidResponse(format!("JSON parse error: {}", e)))?;
                Ok(Some(record))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(Error::Server(status.as_u16())),
        }
    }

    /// Create the first record for a (user, entity) pair.
    ///
    /// The record must not carry an identifier; the server assigns one and
    /// the stored record is returned. A 409 answer maps to `Conflict`: a
    /// record already exists and the caller must update it instead.
    pub async fn create(&self, record: &ProgressRecord) -> Result<ProgressRecord> {
        if record.id.is_some() {
            return Err(Error::Validation(
                "create must not carry an id; use update".into(),
            ));
        }
        self.validate(record)?;

        let url = format!("{}/api/user_progress", self.base_url);
        log::debug!("progress POST {} ({})", url, record);

        let response = self.client.post(&url).json(record).send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let body = response.text().await?;
                serde_json::from_str(&body)
                    .map_err(|e| Error::InvalidResponse(format!("JSON parse error: {}", e)))
            }
            StatusCode::CONFLICT => Err(Error::Conflict),
            StatusCode::NOT_FOUND => Err(Error::NotFound),
            status => Err(Error::Server(status.as_u16())),
        }
    }

    /// Overwrite the record with the given identifier.
    ///
    /// Idempotent: re-sending an identical payload leaves the stored state
    /// unchanged. `NotFound` if the id is unknown.
    pub async fn update(&self, id: u64, record: &ProgressRecord) -> Result<()> {
        self.validate(record)?;

        let url = format!("{}/api/user_progress/{}", self.base_url, id);
        log::debug!("progress PUT {} ({})", url, record);

        let response = self.client.put(&url).json(record).send().await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => Err(Error::NotFound),
            status => Err(Error::Server(status.as_u16())),
        }
    }

    /// Malformed payloads are fatal: logged and rejected without touching
    /// the network.
    fn validate(&self, record: &ProgressRecord) -> Result<()> {
        record.validate().map_err(|reason| {
            log::error!("rejecting malformed progress record: {}", reason);
            Error::Validation(reason)
        })
    }
}
