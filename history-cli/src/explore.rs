//! Interactive dashboard loop and configuration prompts.

use std::{fmt, path::PathBuf};

use anyhow::Result;
use chrono::{Local, NaiveDate, TimeDelta};
use history_core::{
    ArchiveClient, Config, DateRange, FetchError, FetchOutcome, Session,
    chart::{ChartStyle, ChartTab},
    export,
    table::{Pager, ROWS_PER_PAGE_OPTIONS},
    validate::{self, ARCHIVE_START, Axis},
};
use inquire::{
    CustomUserError, DateSelect, InquireError, Select, Text, validator::Validation,
};

use crate::{cli::DEFAULT_RANGE_DAYS, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Latitude,
    Longitude,
    Dates,
    Fetch,
    Refresh,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    RowsPerPage,
    Chart,
    ExportCsv,
    Quit,
}

impl Action {
    fn available(has_data: bool) -> Vec<Action> {
        let mut actions = vec![Action::Fetch, Action::Latitude, Action::Longitude, Action::Dates];
        if has_data {
            actions.extend([
                Action::NextPage,
                Action::PrevPage,
                Action::FirstPage,
                Action::LastPage,
                Action::RowsPerPage,
                Action::Chart,
                Action::ExportCsv,
                Action::Refresh,
            ]);
        }
        actions.push(Action::Quit);
        actions
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Latitude => "Edit latitude",
            Action::Longitude => "Edit longitude",
            Action::Dates => "Pick date range",
            Action::Fetch => "Fetch weather data",
            Action::Refresh => "Refresh (fetch again even if unchanged)",
            Action::NextPage => "Next page",
            Action::PrevPage => "Previous page",
            Action::FirstPage => "First page",
            Action::LastPage => "Last page",
            Action::RowsPerPage => "Rows per page",
            Action::Chart => "Change chart",
            Action::ExportCsv => "Export CSV",
            Action::Quit => "Quit",
        })
    }
}

/// Run the interactive dashboard until the user quits.
pub async fn run(cfg: &Config) -> Result<()> {
    let archive = cfg.archive();
    let today = Local::now().date_naive();
    let range = DateRange::ending_on(today - TimeDelta::days(1), DEFAULT_RANGE_DAYS);

    let mut session = Session::new(cfg.default_latitude.clone(), cfg.default_longitude.clone(), range);
    let mut pager = Pager::with_rows_per_page(0, cfg.rows_per_page);
    let mut tab = ChartTab::default();
    let mut style = ChartStyle::default();

    loop {
        print_inputs(&session);

        let action = match Select::new("Action:", Action::available(session.dataset().is_some())).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        match action {
            Action::Quit => return Ok(()),
            Action::Latitude => edit_coordinate(&mut session, Axis::Latitude)?,
            Action::Longitude => edit_coordinate(&mut session, Axis::Longitude)?,
            Action::Dates => pick_dates(&mut session, today)?,
            Action::Fetch | Action::Refresh => {
                if let Some(problem) = date_problem(session.start(), session.end(), today) {
                    println!("{problem}");
                    continue;
                }
                let outcome = submit(&mut session, &archive, action == Action::Refresh).await;
                if let FetchOutcome::Loaded { days } = outcome {
                    pager = Pager::with_rows_per_page(days, pager.rows_per_page());
                }
            }
            Action::NextPage => pager.next(),
            Action::PrevPage => pager.prev(),
            Action::FirstPage => pager.first(),
            Action::LastPage => pager.last(),
            Action::RowsPerPage => {
                let rows = Select::new("Rows per page:", ROWS_PER_PAGE_OPTIONS.to_vec()).prompt()?;
                pager.set_rows_per_page(rows);
            }
            Action::Chart => {
                tab = Select::new("Chart:", vec!["temperature", "apparent", "all"])
                    .prompt()?
                    .parse()
                    .unwrap_or_default();
                style = Select::new("Style:", vec!["line", "area"])
                    .prompt()?
                    .parse()
                    .unwrap_or_default();
            }
            Action::ExportCsv => {
                if let Some(dataset) = session.dataset() {
                    let path = PathBuf::from(export::export_file_name(dataset));
                    crate::cli::write_csv(dataset, &path)?;
                    println!("CSV written to {}", path.display());
                }
            }
        }

        if let (Some(dataset), Some(start), Some(end)) = (session.dataset(), session.start(), session.end()) {
            if matches!(action, Action::Fetch | Action::Refresh) {
                println!("{}", render::summary(&session, &DateRange { start, end }));
                println!("{}", render::stat_cards(dataset));
            }
            if matches!(action, Action::Fetch | Action::Refresh | Action::Chart) {
                println!("{}", render::chart(dataset, tab, style));
            }
            println!("{}", render::table(dataset, &pager));
        }
    }
}

/// One pipeline run. The prompt loop does not continue until it resolves,
/// so a second fetch can never overlap it.
async fn submit(session: &mut Session, archive: &dyn ArchiveClient, force: bool) -> FetchOutcome {
    println!("Fetching Data...");
    let outcome = if force { session.refresh(archive).await } else { session.fetch(archive).await };

    match &outcome {
        FetchOutcome::Skipped => println!("Inputs unchanged; showing the data already loaded."),
        FetchOutcome::Loaded { days } => println!("{days} days of data loaded."),
        FetchOutcome::Failed(err) => println!("Error: {err}"),
    }
    outcome
}

fn print_inputs(session: &Session) {
    let show = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    println!(
        "Latitude {} · Longitude {} · {} to {}",
        session.latitude(),
        session.longitude(),
        show(session.start()),
        show(session.end())
    );

    let hints = [
        validate::coordinate_hint(session.latitude(), Axis::Latitude),
        validate::coordinate_hint(session.longitude(), Axis::Longitude),
        validate::date_range_hint(session.start(), session.end()),
    ];
    for hint in hints.into_iter().flatten() {
        println!("  ! {hint}");
    }
    if let Some(err) = session.error() {
        println!("  Error: {err}");
    }
}

/// Prompt validator that applies the same edit filter as the session.
fn coordinate_validator(axis: Axis) -> impl Fn(&str) -> Result<Validation, CustomUserError> + Clone {
    move |input: &str| {
        if validate::accept_coordinate_edit(input, axis) {
            Ok(Validation::Valid)
        } else {
            let bound = axis.bound();
            Ok(Validation::Invalid(format!("{}: range -{bound} to {bound}", axis.hint()).into()))
        }
    }
}

fn edit_coordinate(session: &mut Session, axis: Axis) -> Result<()> {
    let (label, current) = match axis {
        Axis::Latitude => ("Latitude:", session.latitude().to_string()),
        Axis::Longitude => ("Longitude:", session.longitude().to_string()),
    };

    let text = Text::new(label)
        .with_initial_value(&current)
        .with_validator(coordinate_validator(axis))
        .prompt()?;

    let accepted = match axis {
        Axis::Latitude => session.set_latitude(&text),
        Axis::Longitude => session.set_longitude(&text),
    };
    if !accepted {
        println!("{}", axis.hint());
    }
    Ok(())
}

/// Why the picked dates cannot be submitted, if they cannot.
fn date_problem(start: Option<NaiveDate>, end: Option<NaiveDate>, today: NaiveDate) -> Option<String> {
    if !validate::validate_date_range(start, end) {
        let message = validate::date_range_hint(start, end)
            .map(|hint| format!("{hint}: at most one year, end not before start"))
            .unwrap_or_else(|| FetchError::InvalidInput.to_string());
        return Some(message);
    }
    if !validate::validate_date_range_at(start, end, today) {
        return Some(format!("Dates must lie between {ARCHIVE_START} and {today}."));
    }
    None
}

fn date_prompt(label: &str, starting: NaiveDate, min: NaiveDate, max: NaiveDate) -> DateSelect<'_> {
    DateSelect::new(label)
        .with_starting_date(starting.clamp(min, max))
        .with_min_date(min)
        .with_max_date(max)
}

fn pick_dates(session: &mut Session, today: NaiveDate) -> Result<()> {
    let start = date_prompt("Start date:", session.start().unwrap_or(today), ARCHIVE_START, today).prompt()?;
    let end = date_prompt("End date:", session.end().unwrap_or(today), start, today).prompt()?;

    session.set_dates(Some(start), Some(end));
    if let Some(hint) = validate::date_range_hint(Some(start), Some(end)) {
        println!("{hint}: at most one year");
    }
    Ok(())
}

/// Prompt for every config field, starting from `current`.
pub fn prompt_config(current: &Config) -> Result<Config> {
    let archive_url = Text::new("Archive URL:").with_initial_value(&current.archive_url).prompt()?;

    let default_latitude = Text::new("Default latitude:")
        .with_initial_value(&current.default_latitude)
        .with_validator(coordinate_validator(Axis::Latitude))
        .prompt()?;

    let default_longitude = Text::new("Default longitude:")
        .with_initial_value(&current.default_longitude)
        .with_validator(coordinate_validator(Axis::Longitude))
        .prompt()?;

    let starting = ROWS_PER_PAGE_OPTIONS
        .iter()
        .position(|n| *n == current.rows_per_page)
        .unwrap_or(0);
    let rows_per_page = Select::new("Rows per page:", ROWS_PER_PAGE_OPTIONS.to_vec())
        .with_starting_cursor(starting)
        .prompt()?;

    Ok(Config { archive_url, default_latitude, default_longitude, rows_per_page })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_actions_need_data() {
        let without = Action::available(false);
        assert!(!without.contains(&Action::NextPage));
        assert!(!without.contains(&Action::Refresh));
        assert_eq!(without.last(), Some(&Action::Quit));

        let with = Action::available(true);
        assert!(with.contains(&Action::ExportCsv));
        assert!(with.contains(&Action::Refresh));
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn over_long_span_is_reported_as_range_error() {
        let today = date("2026-10-16");
        let problem = date_problem(Some(date("2023-01-01")), Some(date("2024-06-01")), today).unwrap();
        assert!(problem.starts_with("Invalid date range"), "{problem}");
        assert!(!problem.contains("1940-01-01"));
    }

    #[test]
    fn archive_bounds_reported_only_when_they_fail() {
        let today = date("2026-10-16");
        let problem = date_problem(Some(date("1939-12-20")), Some(date("1940-01-10")), today).unwrap();
        assert_eq!(problem, "Dates must lie between 1940-01-01 and 2026-10-16.");

        assert_eq!(date_problem(Some(date("2026-09-01")), Some(date("2026-10-01")), today), None);
    }

    #[test]
    fn missing_dates_use_the_invalid_input_message() {
        let problem = date_problem(None, Some(date("2024-01-01")), date("2026-10-16")).unwrap();
        assert_eq!(problem, "Please fill in all fields with valid values");
    }

    #[test]
    fn date_prompt_is_bounded_to_the_archive() {
        let today = date("2026-10-16");
        let prompt = date_prompt("Start date:", date("1900-01-01"), ARCHIVE_START, today);

        assert_eq!(prompt.min_date, Some(ARCHIVE_START));
        assert_eq!(prompt.max_date, Some(today));
        assert_eq!(prompt.starting_date, ARCHIVE_START);
    }

    #[test]
    fn validator_follows_edit_filter() {
        let check = coordinate_validator(Axis::Latitude);
        assert!(matches!(check("-"), Ok(Validation::Valid)));
        assert!(matches!(check("45.5"), Ok(Validation::Valid)));
        assert!(matches!(check("95"), Ok(Validation::Invalid(_))));
    }
}
