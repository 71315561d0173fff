//! Request / validate / store pipeline around the archive call.
//!
//! [`Session`] is the single owner of the current dataset. A fetch validates
//! the inputs, skips itself when the parameters match the last successful
//! request, and otherwise replaces or clears the dataset depending on how
//! the archive answered. Every failure ends up as a [`FetchError`] stored on
//! the session; nothing is propagated to the caller.

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    archive::{ArchiveClient, ArchiveQuery, RawResponse},
    model::{Coordinate, DailySeries, DailyUnits, DateRange, FetchKey, WeatherDataset},
    validate::{self, Axis},
};

/// A failure the front end can display as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Please fill in all fields with valid values")]
    InvalidInput,

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("{}", .0.as_deref().unwrap_or("Failed to fetch weather data"))]
    Reported(Option<String>),

    #[error("No weather data available for the selected period")]
    NoData,

    #[error("Incomplete weather data received for the selected period")]
    Incomplete,

    #[error("Failed to fetch weather data. Please check your internet connection and try again.")]
    Connectivity,
}

/// What a call to [`Session::fetch`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Parameters matched the last successful request; nothing changed.
    Skipped,
    Loaded { days: usize },
    Failed(FetchError),
}

/// Archive body, tolerant of both the data shape and the error envelope.
#[derive(Debug, Deserialize)]
struct ArchivePayload {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
    daily: Option<DailyPayload>,
    #[serde(default)]
    daily_units: DailyUnits,
}

#[derive(Debug, Deserialize)]
struct DailyPayload {
    time: Option<Vec<NaiveDate>>,
    #[serde(flatten)]
    series: SeriesPayload,
}

#[derive(Debug, Default, Deserialize)]
struct SeriesPayload {
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature_max: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature_min: Vec<Option<f64>>,
    #[serde(default)]
    apparent_temperature_mean: Vec<Option<f64>>,
}

/// Turn a raw archive response into a dataset or the error to show.
pub fn interpret(response: &RawResponse) -> Result<WeatherDataset, FetchError> {
    if !response.is_success() {
        return Err(FetchError::Status(response.status));
    }

    let payload: ArchivePayload = serde_json::from_str(&response.body).map_err(|err| {
        tracing::warn!(error = %err, "malformed archive payload");
        FetchError::Connectivity
    })?;

    if payload.error {
        return Err(FetchError::Reported(payload.reason.filter(|r| !r.is_empty())));
    }

    let Some(daily) = payload.daily else {
        return Err(FetchError::NoData);
    };
    let time = match daily.time {
        Some(time) if !time.is_empty() => time,
        _ => return Err(FetchError::NoData),
    };

    let series = daily.series;
    let dataset = WeatherDataset {
        latitude: payload.latitude.unwrap_or_default(),
        longitude: payload.longitude.unwrap_or_default(),
        timezone: payload.timezone.unwrap_or_default(),
        daily: DailySeries {
            time,
            temperature_2m_max: series.temperature_2m_max,
            temperature_2m_min: series.temperature_2m_min,
            temperature_2m_mean: series.temperature_2m_mean,
            apparent_temperature_max: series.apparent_temperature_max,
            apparent_temperature_min: series.apparent_temperature_min,
            apparent_temperature_mean: series.apparent_temperature_mean,
        },
        daily_units: payload.daily_units,
    };

    if !dataset.is_complete() {
        return Err(FetchError::Incomplete);
    }

    Ok(dataset)
}

/// Mutable state behind one dashboard: the inputs being edited and the
/// result of the latest fetch.
///
/// `fetch` and `refresh` hold `&mut self` across their single await, so
/// requests on one session never overlap and nothing outside the running
/// future can observe the loading flag set.
#[derive(Debug, Clone, Default)]
pub struct Session {
    latitude: String,
    longitude: String,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    loading: bool,
    error: Option<FetchError>,
    dataset: Option<WeatherDataset>,
    last_key: Option<FetchKey>,
}

impl Session {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>, range: DateRange) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
            start: Some(range.start),
            end: Some(range.end),
            ..Self::default()
        }
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Apply an edit to the latitude field. Returns false if the edit was refused.
    pub fn set_latitude(&mut self, text: &str) -> bool {
        let accepted = validate::accept_coordinate_edit(text, Axis::Latitude);
        if accepted {
            self.latitude = text.to_string();
        }
        accepted
    }

    /// Apply an edit to the longitude field. Returns false if the edit was refused.
    pub fn set_longitude(&mut self, text: &str) -> bool {
        let accepted = validate::accept_coordinate_edit(text, Axis::Longitude);
        if accepted {
            self.longitude = text.to_string();
        }
        accepted
    }

    pub fn set_dates(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start = start;
        self.end = end;
    }

    pub fn can_submit(&self) -> bool {
        validate::can_submit(&self.latitude, &self.longitude, self.start, self.end)
    }

    /// Currently submittable inputs as a range and dedup key.
    pub fn fetch_key(&self) -> Option<FetchKey> {
        self.range().map(|range| FetchKey::new(&self.latitude, &self.longitude, &range))
    }

    fn range(&self) -> Option<DateRange> {
        if !self.can_submit() {
            return None;
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(DateRange { start, end }),
            _ => None,
        }
    }

    /// Only ever true from inside a running fetch; callers see it cleared
    /// once the returned future resolves, on success and failure alike.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn dataset(&self) -> Option<&WeatherDataset> {
        self.dataset.as_ref()
    }

    pub fn last_key(&self) -> Option<&FetchKey> {
        self.last_key.as_ref()
    }

    /// "{lat}°, {lon}°" of the typed inputs, once a dataset is held.
    pub fn location_label(&self) -> Option<String> {
        self.dataset.as_ref()?;
        Coordinate::parse(&self.latitude, &self.longitude).ok().map(|c| c.to_string())
    }

    /// Fetch data for the current inputs unless they match the last
    /// successful request.
    pub async fn fetch(&mut self, client: &dyn ArchiveClient) -> FetchOutcome {
        self.run(client, false).await
    }

    /// Like [`Session::fetch`] but always issues the request.
    pub async fn refresh(&mut self, client: &dyn ArchiveClient) -> FetchOutcome {
        self.run(client, true).await
    }

    async fn run(&mut self, client: &dyn ArchiveClient, force: bool) -> FetchOutcome {
        let Some(range) = self.range() else {
            self.error = Some(FetchError::InvalidInput);
            return FetchOutcome::Failed(FetchError::InvalidInput);
        };

        let key = FetchKey::new(&self.latitude, &self.longitude, &range);
        if !force && self.last_key.as_ref() == Some(&key) {
            tracing::debug!(%key, "inputs unchanged since last fetch, skipping");
            return FetchOutcome::Skipped;
        }

        self.loading = true;
        self.error = None;

        let query = ArchiveQuery::new(self.latitude.clone(), self.longitude.clone(), range);
        let result = match client.get_daily(&query).await {
            Ok(response) => interpret(&response),
            Err(err) => {
                tracing::warn!(error = %err, "archive request failed");
                Err(FetchError::Connectivity)
            }
        };

        self.loading = false;

        match result {
            Ok(dataset) => {
                let days = dataset.day_count();
                tracing::info!(%key, days, "weather dataset replaced");
                self.dataset = Some(dataset);
                self.last_key = Some(key);
                FetchOutcome::Loaded { days }
            }
            Err(err) => {
                tracing::warn!(%key, error = %err, "fetch failed");
                self.dataset = None;
                self.last_key = None;
                self.error = Some(err.clone());
                FetchOutcome::Failed(err)
            }
        }
    }
}
