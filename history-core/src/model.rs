use std::fmt;

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::validate::{self, Axis, ValidationError};

/// A validated geographic coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Parse both components from the text the user typed.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self, ValidationError> {
        let lat = validate::parse_in_range(latitude, Axis::Latitude)
            .ok_or_else(|| ValidationError::Latitude(latitude.to_string()))?;
        let lon = validate::parse_in_range(longitude, Axis::Longitude)
            .ok_or_else(|| ValidationError::Longitude(longitude.to_string()))?;

        Ok(Self { latitude: lat, longitude: lon })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}°, {:.4}°", self.latitude, self.longitude)
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if !validate::validate_date_range(Some(start), Some(end)) {
            return Err(ValidationError::DateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days` days ending on `end`, both inclusive of `end`.
    pub fn ending_on(end: NaiveDate, days: i64) -> Self {
        let start = end - TimeDelta::days(days.max(1) - 1);
        Self { start, end }
    }

    /// Difference `end - start` in whole days.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Number of calendar days covered, counting both endpoints.
    pub fn days(&self) -> i64 {
        self.span_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start.format("%b %d, %Y"), self.end.format("%b %d, %Y"))
    }
}

/// Serialized identity of a request, used to skip repeated fetches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey(String);

impl FetchKey {
    pub fn new(latitude: &str, longitude: &str, range: &DateRange) -> Self {
        Self(format!(
            "{latitude},{longitude},{},{}",
            range.start.format(ISO_DATE),
            range.end.format(ISO_DATE)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const ISO_DATE: &str = "%Y-%m-%d";

/// The six daily series requested from the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    TemperatureMax,
    TemperatureMin,
    TemperatureMean,
    ApparentMax,
    ApparentMin,
    ApparentMean,
}

impl Measurement {
    pub const fn all() -> &'static [Measurement] {
        &[
            Measurement::TemperatureMax,
            Measurement::TemperatureMin,
            Measurement::TemperatureMean,
            Measurement::ApparentMax,
            Measurement::ApparentMin,
            Measurement::ApparentMean,
        ]
    }

    /// Field name used by the archive API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Measurement::TemperatureMax => "temperature_2m_max",
            Measurement::TemperatureMin => "temperature_2m_min",
            Measurement::TemperatureMean => "temperature_2m_mean",
            Measurement::ApparentMax => "apparent_temperature_max",
            Measurement::ApparentMin => "apparent_temperature_min",
            Measurement::ApparentMean => "apparent_temperature_mean",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Measurement::TemperatureMax => "Max Temp",
            Measurement::TemperatureMin => "Min Temp",
            Measurement::TemperatureMean => "Mean Temp",
            Measurement::ApparentMax => "Max Apparent",
            Measurement::ApparentMin => "Min Apparent",
            Measurement::ApparentMean => "Mean Apparent",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parallel per-day sequences. The archive emits `null` for missing days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<NaiveDate>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_mean: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature_max: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature_min: Vec<Option<f64>>,
    #[serde(default)]
    pub apparent_temperature_mean: Vec<Option<f64>>,
}

impl DailySeries {
    pub fn values(&self, measurement: Measurement) -> &[Option<f64>] {
        match measurement {
            Measurement::TemperatureMax => &self.temperature_2m_max,
            Measurement::TemperatureMin => &self.temperature_2m_min,
            Measurement::TemperatureMean => &self.temperature_2m_mean,
            Measurement::ApparentMax => &self.apparent_temperature_max,
            Measurement::ApparentMin => &self.apparent_temperature_min,
            Measurement::ApparentMean => &self.apparent_temperature_mean,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Unit string reported for each daily series, e.g. "°C".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyUnits {
    #[serde(default)]
    pub temperature_2m_max: String,
    #[serde(default)]
    pub temperature_2m_min: String,
    #[serde(default)]
    pub temperature_2m_mean: String,
    #[serde(default)]
    pub apparent_temperature_max: String,
    #[serde(default)]
    pub apparent_temperature_min: String,
    #[serde(default)]
    pub apparent_temperature_mean: String,
}

impl DailyUnits {
    pub fn unit(&self, measurement: Measurement) -> &str {
        match measurement {
            Measurement::TemperatureMax => &self.temperature_2m_max,
            Measurement::TemperatureMin => &self.temperature_2m_min,
            Measurement::TemperatureMean => &self.temperature_2m_mean,
            Measurement::ApparentMax => &self.apparent_temperature_max,
            Measurement::ApparentMin => &self.apparent_temperature_min,
            Measurement::ApparentMean => &self.apparent_temperature_mean,
        }
    }
}

/// A successfully fetched archive payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDataset {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub daily: DailySeries,
    pub daily_units: DailyUnits,
}

impl WeatherDataset {
    /// True when every daily series has one entry per day in `time`.
    pub fn is_complete(&self) -> bool {
        let days = self.daily.len();
        Measurement::all().iter().all(|m| self.daily.values(*m).len() == days)
    }

    pub fn day_count(&self) -> usize {
        self.daily.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.daily.time.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.daily.time.last().copied()
    }

    /// Row view over the parallel series.
    pub fn rows(&self) -> impl Iterator<Item = DailyRow> + '_ {
        self.daily.time.iter().enumerate().map(move |(i, date)| {
            let at = |m: Measurement| self.daily.values(m).get(i).copied().flatten();
            DailyRow {
                date: *date,
                temperature_max: at(Measurement::TemperatureMax),
                temperature_min: at(Measurement::TemperatureMin),
                temperature_mean: at(Measurement::TemperatureMean),
                apparent_max: at(Measurement::ApparentMax),
                apparent_min: at(Measurement::ApparentMin),
                apparent_mean: at(Measurement::ApparentMean),
            }
        })
    }
}

/// One day across all six measurements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub temperature_mean: Option<f64>,
    pub apparent_max: Option<f64>,
    pub apparent_min: Option<f64>,
    pub apparent_mean: Option<f64>,
}

impl DailyRow {
    pub fn value(&self, measurement: Measurement) -> Option<f64> {
        match measurement {
            Measurement::TemperatureMax => self.temperature_max,
            Measurement::TemperatureMin => self.temperature_min,
            Measurement::TemperatureMean => self.temperature_mean,
            Measurement::ApparentMax => self.apparent_max,
            Measurement::ApparentMin => self.apparent_min,
            Measurement::ApparentMean => self.apparent_mean,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn fetch_key_uses_typed_text_and_iso_dates() {
        let range = DateRange::new(date("2024-03-01"), date("2024-03-31")).unwrap();
        let key = FetchKey::new("40.7128", "-74.0060", &range);
        assert_eq!(key.as_str(), "40.7128,-74.0060,2024-03-01,2024-03-31");
    }

    #[test]
    fn date_range_rejects_reversed_endpoints() {
        let err = DateRange::new(date("2024-03-02"), date("2024-03-01")).unwrap_err();
        assert!(matches!(err, ValidationError::DateRange { .. }));
    }

    #[test]
    fn ending_on_counts_end_day() {
        let range = DateRange::ending_on(date("2024-01-31"), 30);
        assert_eq!(range.start, date("2024-01-02"));
        assert_eq!(range.days(), 30);
        assert_eq!(range.span_days(), 29);
    }

    #[test]
    fn coordinate_parse_reports_offending_axis() {
        assert!(Coordinate::parse("40.7128", "-74.0060").is_ok());
        assert!(matches!(Coordinate::parse("91", "0"), Err(ValidationError::Latitude(_))));
        assert!(matches!(Coordinate::parse("0", "-181"), Err(ValidationError::Longitude(_))));
    }

    #[test]
    fn deserializes_archive_payload_with_nulls() {
        let body = r#"{
            "latitude": 40.710335, "longitude": -73.99307, "timezone": "America/New_York",
            "daily_units": {"time": "iso8601", "temperature_2m_max": "°C", "temperature_2m_min": "°C",
                "temperature_2m_mean": "°C", "apparent_temperature_max": "°C",
                "apparent_temperature_min": "°C", "apparent_temperature_mean": "°C"},
            "daily": {"time": ["2024-01-01", "2024-01-02"],
                "temperature_2m_max": [5.1, null], "temperature_2m_min": [-1.0, 0.2],
                "temperature_2m_mean": [2.0, 1.1], "apparent_temperature_max": [1.0, 0.5],
                "apparent_temperature_min": [-5.0, -4.0], "apparent_temperature_mean": [-2.0, -1.5]}
        }"#;

        let dataset: WeatherDataset = serde_json::from_str(body).unwrap();
        assert!(dataset.is_complete());
        assert_eq!(dataset.day_count(), 2);
        assert_eq!(dataset.daily.temperature_2m_max, vec![Some(5.1), None]);
        assert_eq!(dataset.daily_units.unit(Measurement::ApparentMean), "°C");
    }

    #[test]
    fn unequal_series_are_incomplete() {
        let mut dataset = dataset(&[Some(1.0), Some(2.0)], &[Some(0.0), Some(1.0)], &[Some(0.5), Some(1.5)]);
        assert!(dataset.is_complete());

        dataset.daily.apparent_temperature_min.pop();
        assert!(!dataset.is_complete());
    }

    #[test]
    fn rows_line_up_series_by_day() {
        let dataset = dataset(&[Some(10.0), None], &[Some(0.0), Some(5.0)], &[Some(5.0), Some(12.0)]);
        let rows: Vec<DailyRow> = dataset.rows().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].date, date("2024-01-02"));
        assert_eq!(rows[1].temperature_max, None);
        assert_eq!(rows[1].value(Measurement::TemperatureMin), Some(5.0));
    }
}
