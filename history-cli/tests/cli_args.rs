//! Argument parsing and binary smoke tests.

use std::process::Command;

use clap::Parser;
use history_cli::cli::{Cli, Command as Sub};
use history_core::chart::{ChartStyle, ChartTab};

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_weather-history"))
        .args(args)
        .output()
        .expect("Failed to execute weather-history")
}

#[test]
fn help_lists_subcommands() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["fetch", "explore", "configure"] {
        assert!(stdout.contains(sub), "help should mention {sub}");
    }
}

#[test]
fn fetch_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "weather-history",
        "fetch",
        "--latitude",
        "-33.8688",
        "--longitude",
        "-151.2093",
        "--start",
        "2024-01-01",
        "--end",
        "2024-01-31",
    ])
    .expect("arguments should parse");

    let Sub::Fetch(args) = cli.command else {
        panic!("expected fetch subcommand");
    };
    assert_eq!(args.latitude.as_deref(), Some("-33.8688"));
    assert_eq!(args.longitude.as_deref(), Some("-151.2093"));
    assert_eq!(args.start.map(|d| d.to_string()).as_deref(), Some("2024-01-01"));
    assert_eq!(args.page, 1);
    assert_eq!(args.chart, ChartTab::Temperature);
    assert_eq!(args.style, ChartStyle::Line);
    assert!(args.csv.is_none());
}

#[test]
fn csv_flag_takes_optional_path() {
    let cli = Cli::try_parse_from(["weather-history", "fetch", "--csv"]).unwrap();
    let Sub::Fetch(args) = cli.command else { panic!("expected fetch") };
    assert_eq!(args.csv, Some(None));

    let cli = Cli::try_parse_from(["weather-history", "fetch", "--csv", "out.csv"]).unwrap();
    let Sub::Fetch(args) = cli.command else { panic!("expected fetch") };
    assert_eq!(args.csv, Some(Some("out.csv".into())));
}

#[test]
fn chart_options_are_parsed() {
    let cli = Cli::try_parse_from(["weather-history", "fetch", "--chart", "all", "--style", "area"]).unwrap();
    let Sub::Fetch(args) = cli.command else { panic!("expected fetch") };
    assert_eq!(args.chart, ChartTab::All);
    assert_eq!(args.style, ChartStyle::Area);
}

#[test]
fn bad_dates_and_chart_names_are_rejected() {
    assert!(Cli::try_parse_from(["weather-history", "fetch", "--start", "01/02/2024"]).is_err());
    assert!(Cli::try_parse_from(["weather-history", "fetch", "--chart", "bars"]).is_err());
}

#[test]
fn invalid_latitude_fails_before_any_request() {
    let output = run_cli(&["fetch", "--latitude", "123", "--longitude", "0"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid latitude"), "unexpected stderr: {stderr}");
}
