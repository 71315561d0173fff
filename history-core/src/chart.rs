//! Chart series and a text sparkline renderer for terminals.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::model::{Measurement, WeatherDataset};

/// Block characters from lowest to highest.
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    Temperature,
    Apparent,
    All,
}

impl ChartTab {
    pub fn title(&self) -> &'static str {
        match self {
            ChartTab::Temperature => "Temperature Trends",
            ChartTab::Apparent => "Apparent Temperature Trends",
            ChartTab::All => "All Temperature Data",
        }
    }

    pub fn measurements(&self) -> &'static [Measurement] {
        match self {
            ChartTab::Temperature => &Measurement::all()[..3],
            ChartTab::Apparent => &Measurement::all()[3..],
            ChartTab::All => Measurement::all(),
        }
    }
}

impl FromStr for ChartTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "temperature" => Ok(ChartTab::Temperature),
            "apparent" => Ok(ChartTab::Apparent),
            "all" => Ok(ChartTab::All),
            _ => Err(format!("Unknown chart '{s}'. Supported charts: temperature, apparent, all.")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartStyle {
    #[default]
    Line,
    Area,
}

impl FromStr for ChartStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "line" => Ok(ChartStyle::Line),
            "area" => Ok(ChartStyle::Area),
            _ => Err(format!("Unknown chart style '{s}'. Supported styles: line, area.")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl ChartPoint {
    /// Axis label such as "Jan 5".
    pub fn label(&self) -> String {
        self.date.format("%b %-d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub measurement: Measurement,
    pub unit: String,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn label(&self) -> &'static str {
        self.measurement.label()
    }

    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }
}

pub fn chart_series(dataset: &WeatherDataset, tab: ChartTab) -> Vec<ChartSeries> {
    tab.measurements()
        .iter()
        .map(|m| ChartSeries {
            measurement: *m,
            unit: dataset.daily_units.unit(*m).to_string(),
            points: dataset
                .rows()
                .map(|row| ChartPoint { date: row.date, value: row.value(*m) })
                .collect(),
        })
        .collect()
}

/// Shared vertical scale for a set of series, so sparklines are comparable.
pub fn value_bounds(series: &[ChartSeries]) -> Option<(f64, f64)> {
    series
        .iter()
        .flat_map(|s| s.points.iter().filter_map(|p| p.value))
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn level(value: f64, lo: f64, hi: f64) -> usize {
    let span = hi - lo;
    if span <= 0.0 {
        return BLOCKS.len() / 2;
    }
    let normalized = ((value - lo) / span).clamp(0.0, 1.0);
    ((normalized * 7.0).round() as usize).min(7)
}

/// One character per value between `lo` and `hi`; missing values are blank.
pub fn sparkline(values: &[Option<f64>], lo: f64, hi: f64) -> String {
    values
        .iter()
        .map(|v| v.map_or(' ', |v| BLOCKS[level(v, lo, hi)]))
        .collect()
}

/// Multi-row rendering. `Line` marks only the row holding each value,
/// `Area` fills everything below it.
pub fn render_rows(values: &[Option<f64>], lo: f64, hi: f64, height: usize, style: ChartStyle) -> Vec<String> {
    let height = height.max(1);
    let cells = (height * BLOCKS.len()) - 1;
    let scaled: Vec<Option<usize>> = values
        .iter()
        .map(|v| {
            v.map(|v| {
                let span = hi - lo;
                let normalized = if span <= 0.0 { 0.5 } else { ((v - lo) / span).clamp(0.0, 1.0) };
                (normalized * cells as f64).round() as usize
            })
        })
        .collect();

    (0..height)
        .rev()
        .map(|row| {
            scaled
                .iter()
                .map(|cell| match cell {
                    None => ' ',
                    Some(c) => {
                        let row_of_value = c / BLOCKS.len();
                        if row_of_value == row {
                            BLOCKS[c % BLOCKS.len()]
                        } else if style == ChartStyle::Area && row_of_value > row {
                            '█'
                        } else {
                            ' '
                        }
                    }
                })
                .collect()
        })
        .collect()
}
