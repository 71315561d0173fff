//! Plain-text rendering of a fetched dataset for the terminal.

use std::fmt::Write;

use history_core::{
    DateRange, DerivedStats, Measurement, Session, WeatherDataset,
    chart::{self, ChartStyle, ChartTab},
    table::{self, Pager},
};

/// Rows used for each series in the chart.
const CHART_HEIGHT: usize = 3;

pub fn summary(session: &Session, range: &DateRange) -> String {
    let Some(dataset) = session.dataset() else {
        return String::new();
    };

    let location = session.location_label().unwrap_or_default();
    format!(
        "Weather Data Retrieved\n\
         Location: {location} • Timezone: {}\n\
         Period: {range}\n\
         {} days of data\n",
        dataset.timezone,
        dataset.day_count()
    )
}

pub fn stat_cards(dataset: &WeatherDataset) -> String {
    let Some(stats) = DerivedStats::compute(dataset) else {
        return String::new();
    };

    let mut out = String::new();
    for card in stats.cards(dataset) {
        let _ = write!(out, "{:<22} {:>10}", card.title, card.value);
        if let Some(note) = card.note {
            let _ = write!(out, "  ({note})");
        }
        out.push('\n');
    }
    out
}

pub fn chart(dataset: &WeatherDataset, tab: ChartTab, style: ChartStyle) -> String {
    let series = chart::chart_series(dataset, tab);
    let Some((lo, hi)) = chart::value_bounds(&series) else {
        return String::new();
    };

    let mut out = String::new();
    let unit = dataset.daily_units.unit(Measurement::TemperatureMax);
    let _ = writeln!(out, "{} ({lo:.1}{unit} .. {hi:.1}{unit})", tab.title());

    for s in &series {
        let rows = chart::render_rows(&s.values(), lo, hi, CHART_HEIGHT, style);
        for (i, row) in rows.iter().enumerate() {
            let label = if i == 0 { s.label() } else { "" };
            let _ = writeln!(out, "{label:<14}│{row}");
        }
    }

    if let (Some(first), Some(last)) = (series[0].points.first(), series[0].points.last()) {
        let width = series[0].points.len();
        let first = first.label();
        let last = last.label();
        let gap = width.saturating_sub(first.chars().count() + last.chars().count());
        let _ = writeln!(out, "{:<14} {first}{}{last}", "", " ".repeat(gap));
    }

    out
}

pub fn table(dataset: &WeatherDataset, pager: &Pager) -> String {
    let headers: Vec<String> = std::iter::once("Date".to_string())
        .chain(
            Measurement::all()
                .iter()
                .map(|m| format!("{} ({})", m.label(), dataset.daily_units.unit(*m))),
        )
        .collect();

    let rows: Vec<Vec<String>> = dataset
        .rows()
        .skip(pager.bounds().start)
        .take(pager.bounds().len())
        .map(|row| {
            std::iter::once(table::format_table_date(row.date))
                .chain(Measurement::all().iter().map(|m| {
                    table::format_temperature(row.value(*m), dataset.daily_units.unit(*m))
                }))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .map(|r| r[col].chars().count())
                .chain(std::iter::once(headers[col].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{cell}{}", " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" │ ")
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} total records", pager.total());
    let _ = writeln!(out, "{}", line(headers.as_slice()));
    let _ = writeln!(
        out,
        "{}",
        widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("─┼─")
    );
    for row in &rows {
        let _ = writeln!(out, "{}", line(row.as_slice()));
    }
    let _ = writeln!(out, "{}  ·  Page {} of {}", pager.summary(), pager.page(), pager.total_pages());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use history_core::model::{DailySeries, DailyUnits};

    fn dataset(days: usize) -> WeatherDataset {
        let start: chrono::NaiveDate = "2024-01-01".parse().unwrap();
        let time: Vec<_> = (0..days as i64).map(|i| start + chrono::TimeDelta::days(i)).collect();
        let series = |offset: f64| (0..days).map(|i| Some(i as f64 + offset)).collect::<Vec<_>>();
        let unit = "°C".to_string();

        WeatherDataset {
            latitude: 40.71,
            longitude: -74.0,
            timezone: "America/New_York".into(),
            daily: DailySeries {
                time,
                temperature_2m_max: series(10.0),
                temperature_2m_min: series(0.0),
                temperature_2m_mean: series(5.0),
                apparent_temperature_max: series(8.0),
                apparent_temperature_min: series(-2.0),
                apparent_temperature_mean: series(3.0),
            },
            daily_units: DailyUnits {
                temperature_2m_max: unit.clone(),
                temperature_2m_min: unit.clone(),
                temperature_2m_mean: unit.clone(),
                apparent_temperature_max: unit.clone(),
                apparent_temperature_min: unit.clone(),
                apparent_temperature_mean: unit,
            },
        }
    }

    #[test]
    fn table_prints_current_page_only() {
        let data = dataset(25);
        let mut pager = Pager::new(data.day_count());
        pager.last();

        let out = table(&data, &pager);

        assert!(out.contains("Showing 21 to 25 of 25 entries"));
        assert!(out.contains("Page 3 of 3"));
        assert!(out.contains("Thu, Jan 25, 2024"));
        assert!(!out.contains("Mon, Jan 1, 2024"));
        assert!(out.contains("Max Temp (°C)"));
    }

    #[test]
    fn stat_cards_list_all_four() {
        let out = stat_cards(&dataset(3));
        for title in ["Highest Temperature", "Lowest Temperature", "Average Temperature", "Temperature Range"] {
            assert!(out.contains(title), "missing {title}");
        }
        assert!(out.contains("3 days analyzed"));
    }

    #[test]
    fn chart_has_one_block_per_series() {
        let out = chart(&dataset(5), ChartTab::Apparent, ChartStyle::Line);
        assert!(out.starts_with("Apparent Temperature Trends"));
        assert!(out.contains("Max Apparent"));
        assert!(out.contains("Mean Apparent"));
        assert!(!out.contains("Max Temp"));
    }

    #[test]
    fn summary_is_empty_without_dataset() {
        let range = DateRange::new("2024-01-01".parse().unwrap(), "2024-01-05".parse().unwrap()).unwrap();
        let session = Session::new("40.71", "-74.0", range);
        assert_eq!(summary(&session, &range), "");
    }
}
