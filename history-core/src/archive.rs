use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::model::{DateRange, ISO_DATE, Measurement};

/// Default historical weather endpoint.
pub const OPEN_METEO_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Parameters of one archive request.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveQuery {
    pub latitude: String,
    pub longitude: String,
    pub range: DateRange,
}

impl ArchiveQuery {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>, range: DateRange) -> Self {
        Self { latitude: latitude.into(), longitude: longitude.into(), range }
    }

    /// Query-string pairs in the order the archive documents them.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let daily = Measurement::all().iter().map(Measurement::as_str).collect::<Vec<_>>().join(",");

        vec![
            ("latitude", self.latitude.clone()),
            ("longitude", self.longitude.clone()),
            ("start_date", self.range.start.format(ISO_DATE).to_string()),
            ("end_date", self.range.end.format(ISO_DATE).to_string()),
            ("daily", daily),
            ("timezone", "auto".to_string()),
        ]
    }
}

/// Status and body of an archive response, not yet interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No response could be obtained.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to send request to the weather archive")]
    Send(#[source] reqwest::Error),

    #[error("Failed to read weather archive response body")]
    Body(#[source] reqwest::Error),
}

/// Source of archive responses; the only await point of a fetch.
#[async_trait]
pub trait ArchiveClient: Send + Sync + Debug {
    async fn get_daily(&self, query: &ArchiveQuery) -> Result<RawResponse, TransportError>;
}

/// HTTP client for the Open-Meteo archive.
#[derive(Debug, Clone)]
pub struct OpenMeteoArchive {
    base_url: String,
    http: Client,
}

impl Default for OpenMeteoArchive {
    fn default() -> Self {
        Self::new(OPEN_METEO_ARCHIVE_URL)
    }
}

impl OpenMeteoArchive {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ArchiveClient for OpenMeteoArchive {
    async fn get_daily(&self, query: &ArchiveQuery) -> Result<RawResponse, TransportError> {
        tracing::debug!(url = %self.base_url, range = %query.range, "requesting daily archive data");

        let res = self
            .http
            .get(&self.base_url)
            .query(&query.pairs())
            .send()
            .await
            .map_err(TransportError::Send)?;

        let status = res.status().as_u16();
        let body = res.text().await.map_err(TransportError::Body)?;

        tracing::debug!(status, bytes = body.len(), "archive responded");

        Ok(RawResponse { status, body })
    }
}
