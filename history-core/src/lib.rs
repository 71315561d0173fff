//! Core library for the `weather-history` dashboard.
//!
//! This crate defines:
//! - Input validation for coordinates and date ranges
//! - The archive client abstraction and its Open-Meteo implementation
//! - The fetch pipeline and the session state it owns
//! - Derived statistics, chart series, table paging and CSV export
//! - User configuration
//!
//! It is used by `history-cli`, but holds no terminal code of its own.

pub mod archive;
pub mod chart;
pub mod config;
pub mod export;
pub mod model;
pub mod pipeline;
pub mod stats;
pub mod table;
pub mod validate;

pub use archive::{ArchiveClient, ArchiveQuery, OpenMeteoArchive, RawResponse, TransportError};
pub use config::Config;
pub use model::{Coordinate, DateRange, FetchKey, Measurement, WeatherDataset};
pub use pipeline::{FetchError, FetchOutcome, Session};
pub use stats::DerivedStats;
