//! Pure input checks used to gate the fetch action and to show field hints.
//!
//! Nothing in here touches session state; the front end queries these
//! functions whenever an input changes.

use chrono::NaiveDate;
use thiserror::Error;

/// Longest accepted range, in days between start and end.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Earliest day the archive serves.
pub const ARCHIVE_START: NaiveDate = match NaiveDate::from_ymd_opt(1940, 1, 1) {
    Some(date) => date,
    None => panic!("invalid archive start date"),
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid latitude '{0}': expected a number between -90 and 90")]
    Latitude(String),

    #[error("Invalid longitude '{0}': expected a number between -180 and 180")]
    Longitude(String),

    #[error("Invalid date range {start} .. {end}: end must not precede start and the span is at most 366 days")]
    DateRange { start: NaiveDate, end: NaiveDate },

    #[error("Date {0} is outside the archive (1940-01-01 to today)")]
    OutOfArchive(NaiveDate),
}

/// Which coordinate component a text field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn bound(&self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Axis::Latitude => "Invalid latitude",
            Axis::Longitude => "Invalid longitude",
        }
    }
}

/// Read the longest numeric prefix of `text`, ignoring leading whitespace.
///
/// "40.7abc" reads as 40.7 and "-" reads as nothing.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Parsed value of `text` if it is finite and within the axis bound.
pub fn parse_in_range(text: &str, axis: Axis) -> Option<f64> {
    let bound = axis.bound();
    parse_leading_number(text).filter(|v| v.is_finite() && (-bound..=bound).contains(v))
}

pub fn validate_latitude(text: &str) -> bool {
    parse_in_range(text, Axis::Latitude).is_some()
}

pub fn validate_longitude(text: &str) -> bool {
    parse_in_range(text, Axis::Longitude).is_some()
}

/// Both endpoints present, `end >= start`, and at most [`MAX_RANGE_DAYS`] apart.
pub fn validate_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => {
            let span = (end - start).num_days();
            (0..=MAX_RANGE_DAYS).contains(&span)
        }
        _ => false,
    }
}

/// True when `date` lies within [1940-01-01, today].
pub fn date_within_archive(date: NaiveDate, today: NaiveDate) -> bool {
    (ARCHIVE_START..=today).contains(&date)
}

/// Relative bounds of [`validate_date_range`] plus the absolute archive bounds.
pub fn validate_date_range_at(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> bool {
    validate_date_range(start, end)
        && start.is_some_and(|d| date_within_archive(d, today))
        && end.is_some_and(|d| date_within_archive(d, today))
}

pub fn can_submit(
    latitude: &str,
    longitude: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> bool {
    !latitude.is_empty()
        && !longitude.is_empty()
        && validate_latitude(latitude)
        && validate_longitude(longitude)
        && validate_date_range(start, end)
}

/// Whether an in-progress edit of a coordinate field should be kept.
///
/// Empty text and a lone "-" are let through so the user can keep typing.
pub fn accept_coordinate_edit(text: &str, axis: Axis) -> bool {
    text.is_empty() || text == "-" || parse_in_range(text, axis).is_some()
}

/// Field-level hint for a coordinate input, shown only for non-empty invalid text.
pub fn coordinate_hint(text: &str, axis: Axis) -> Option<&'static str> {
    (!text.is_empty() && parse_in_range(text, axis).is_none()).then(|| axis.hint())
}

/// Field-level hint for the date range, shown only once both ends are picked.
pub fn date_range_hint(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<&'static str> {
    (start.is_some() && end.is_some() && !validate_date_range(start, end))
        .then_some("Invalid date range")
}
