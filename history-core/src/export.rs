use thiserror::Error;

use crate::model::{ISO_DATE, Measurement, WeatherDataset};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write CSV record")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV writer")]
    Flush(#[from] std::io::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Column headers: the date, then each measurement labelled with its unit.
pub fn csv_headers(dataset: &WeatherDataset) -> Vec<String> {
    std::iter::once("Date".to_string())
        .chain(Measurement::all().iter().map(|m| {
            format!("{} ({})", m.label(), dataset.daily_units.unit(*m))
        }))
        .collect()
}

/// Render the whole dataset as CSV, one row per day. Missing values are
/// left as empty fields.
pub fn to_csv(dataset: &WeatherDataset) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(vec![]);

    wtr.write_record(csv_headers(dataset))?;

    for row in dataset.rows() {
        let mut record = vec![row.date.format(ISO_DATE).to_string()];
        record.extend(
            Measurement::all()
                .iter()
                .map(|m| row.value(*m).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// `weather-data-{first}-to-{last}.csv`
pub fn export_file_name(dataset: &WeatherDataset) -> String {
    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| d.format(ISO_DATE).to_string()).unwrap_or_default()
    };
    format!(
        "weather-data-{}-to-{}.csv",
        date(dataset.first_date()),
        date(dataset.last_date())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::dataset;

    fn sample() -> WeatherDataset {
        dataset(
            &[Some(10.0), Some(20.5), None],
            &[Some(0.0), Some(5.0), Some(2.0)],
            &[Some(5.0), Some(12.0), Some(8.0)],
        )
    }

    #[test]
    fn one_line_per_day_plus_header() {
        let data = sample();
        let csv = to_csv(&data).unwrap();

        assert!(csv.ends_with('\n'));
        assert_eq!(csv.lines().count(), data.day_count() + 1);
    }

    #[test]
    fn header_and_rows_share_column_order() {
        let csv = to_csv(&sample()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some(
                "Date,Max Temp (°C),Min Temp (°C),Mean Temp (°C),\
                 Max Apparent (°C),Min Apparent (°C),Mean Apparent (°C)"
            )
        );
        assert_eq!(lines.next(), Some("2024-01-01,10,0,5,10,0,5"));
        assert_eq!(lines.next(), Some("2024-01-02,20.5,5,12,20.5,5,12"));
        assert_eq!(lines.next(), Some("2024-01-03,,2,8,,2,8"));
    }

    #[test]
    fn file_name_spans_first_and_last_day() {
        assert_eq!(export_file_name(&sample()), "weather-data-2024-01-01-to-2024-01-03.csv");
    }
}
