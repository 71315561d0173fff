use std::path::PathBuf;

use anyhow::{Context, anyhow};
use chrono::{Local, NaiveDate, TimeDelta};
use clap::{Args, Parser, Subcommand};
use history_core::{
    Config, DateRange, FetchOutcome, Session,
    chart::{ChartStyle, ChartTab},
    export,
    table::Pager,
    validate::{self, Axis, ValidationError},
};

use crate::{explore, render};

/// Length of the range used when no dates are given.
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-history", version, about = "Historical daily temperatures for any coordinate")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the archive endpoint, default coordinate and table size.
    Configure,

    /// Fetch one date range and print statistics, chart and table.
    Fetch(FetchArgs),

    /// Interactive dashboard: edit inputs, fetch, page through results.
    Explore,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Latitude in degrees, -90 to 90. Defaults to the configured value.
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<String>,

    /// Longitude in degrees, -180 to 180. Defaults to the configured value.
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<String>,

    /// First day, YYYY-MM-DD. Defaults to 30 days before --end.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day, YYYY-MM-DD. Defaults to yesterday.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Table page to print.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per table page: 10, 20 or 50.
    #[arg(long)]
    pub rows: Option<usize>,

    /// Which series to chart: temperature, apparent or all.
    #[arg(long, default_value = "temperature")]
    pub chart: ChartTab,

    /// Chart style: line or area.
    #[arg(long, default_value = "line")]
    pub style: ChartStyle,

    /// Write the data as CSV, to PATH or to the default file name.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<Option<PathBuf>>,
}

impl FetchArgs {
    /// Resolve the requested range against `today`, filling in defaults.
    pub fn date_range(&self, today: NaiveDate) -> Result<DateRange, ValidationError> {
        let end = self.end.unwrap_or(today - TimeDelta::days(1));
        let start = self
            .start
            .unwrap_or_else(|| DateRange::ending_on(end, DEFAULT_RANGE_DAYS).start);

        for date in [start, end] {
            if !validate::date_within_archive(date, today) {
                return Err(ValidationError::OutOfArchive(date));
            }
        }

        DateRange::new(start, end)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Fetch(args) => fetch(args).await,
            Command::Explore => {
                let cfg = Config::load()?;
                explore::run(&cfg).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let current = Config::load()?;
    let cfg = explore::prompt_config(&current)?;
    cfg.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn fetch(args: FetchArgs) -> anyhow::Result<()> {
    for (text, axis) in [(&args.latitude, Axis::Latitude), (&args.longitude, Axis::Longitude)] {
        let hint = text.as_deref().and_then(|t| validate::coordinate_hint(t, axis));
        if let (Some(hint), Some(text)) = (hint, text) {
            return Err(anyhow!("{hint}: '{text}'"));
        }
    }

    // Defaults from the config file were checked when it was loaded.
    let cfg = Config::load()?;
    let latitude = args.latitude.clone().unwrap_or_else(|| cfg.default_latitude.clone());
    let longitude = args.longitude.clone().unwrap_or_else(|| cfg.default_longitude.clone());

    let today = Local::now().date_naive();
    let range = args.date_range(today)?;
    tracing::debug!(%latitude, %longitude, %range, archive = %cfg.archive_url, "one-shot fetch");

    let mut session = Session::new(latitude, longitude, range);
    let archive = cfg.archive();

    if let FetchOutcome::Failed(err) = session.fetch(&archive).await {
        return Err(anyhow!(err));
    }

    let Some(dataset) = session.dataset() else {
        return Err(anyhow!("No weather data available for the selected period"));
    };

    let mut pager = Pager::with_rows_per_page(dataset.day_count(), args.rows.unwrap_or(cfg.rows_per_page));
    pager.go_to(args.page);

    println!("{}", render::summary(&session, &range));
    println!("{}", render::stat_cards(dataset));
    println!("{}", render::chart(dataset, args.chart, args.style));
    println!("{}", render::table(dataset, &pager));

    if let Some(path) = args.csv {
        let path = path.unwrap_or_else(|| PathBuf::from(export::export_file_name(dataset)));
        write_csv(dataset, &path)?;
        println!("CSV written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn write_csv(dataset: &history_core::WeatherDataset, path: &std::path::Path) -> anyhow::Result<()> {
    let csv = export::to_csv(dataset).context("Failed to render CSV export")?;
    std::fs::write(path, csv)
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))
}
