//! Remote note source.
//!
//! [`NoteSource`] is the seam between the timeline and the backend API.
//! [`HttpNoteSource`] talks to the note-listing endpoints over HTTP; tests
//! and embedders can supply their own implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::note::{Nid, Note, NoteId, NoteSummary};

/// Errors that can occur while fetching notes.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A fetch was issued without a cache key. Carries no reason.
    #[error("")]
    MissingKey,

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body was not the expected JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Backend collaborator providing note data.
#[async_trait]
pub trait NoteSource: Send + Sync {
    /// Fetch the window of `size` notes surrounding the note `id`, in display order.
    async fn neighbor_notes(&self, id: &NoteId, size: usize)
        -> Result<Vec<NoteSummary>, FetchError>;

    /// Fetch a single note by its numeric identifier.
    async fn note_by_nid(&self, nid: Nid) -> Result<Note, FetchError>;
}

#[derive(Deserialize)]
struct ListResponse {
    data: Vec<NoteSummary>,
}

#[derive(Deserialize)]
struct NoteResponse {
    data: Note,
}

/// [`NoteSource`] backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpNoteSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpNoteSource {
    /// Create a source for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, client })
    }

    /// Create a source from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    /// API root this source talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response.json::<T>().await.map_err(FetchError::Decode)
    }
}

#[async_trait]
impl NoteSource for HttpNoteSource {
    async fn neighbor_notes(
        &self,
        id: &NoteId,
        size: usize,
    ) -> Result<Vec<NoteSummary>, FetchError> {
        if id.is_empty() {
            return Err(FetchError::MissingKey);
        }
        let url = format!("{}/notes/list/{}?size={}", self.base_url, id, size);
        let body: ListResponse = self.get_json(url).await?;
        Ok(body.data)
    }

    async fn note_by_nid(&self, nid: Nid) -> Result<Note, FetchError> {
        let url = format!("{}/notes/nid/{}", self.base_url, nid);
        let body: NoteResponse = self.get_json(url).await?;
        Ok(body.data)
    }
}
