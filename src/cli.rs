use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    config::Settings,
    feed::FeedSource,
    fetch::Downloader,
    layout::{EventView, Layout, PlaceStyle},
    style::{ColorChoice, Style},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Report on and search the USGS recent earthquakes feed", long_about = None)]
pub struct Cli {
    /// YAML settings file (feed location, columns, display and cost options)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download the feed CSV to its local path
    Fetch(FetchArgs),
    /// Print the event table and aggregate statistics
    Report(ReportArgs),
    /// Search event places by substring (interactive unless --query is given)
    Search(SearchArgs),
    /// Fetch, report, then start an interactive search session
    Run(RunArgs),
    /// Print the effective settings as YAML
    Config,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Feed CSV file to read (defaults to the configured feed path)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Character encoding of the feed file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Longest line in bytes before truncation (0 = unlimited)
    #[arg(long = "max-line-bytes")]
    pub max_line_bytes: Option<usize>,
}

impl SourceArgs {
    pub fn path(&self, settings: &Settings) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| settings.feed.path.clone())
    }

    pub fn feed_source(&self, settings: &Settings) -> Result<FeedSource> {
        let encoding = settings.encoding(self.input_encoding.as_deref())?;
        Ok(FeedSource::new(self.path(settings))
            .with_columns(settings.columns)
            .with_encoding(encoding)
            .with_max_line_bytes(
                self.max_line_bytes
                    .unwrap_or(settings.feed.max_line_bytes),
            ))
    }
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Column ordering of event tables
    #[arg(long, value_enum)]
    pub layout: Option<Layout>,
    /// Show the short place (after the last " of ") or the full description
    #[arg(long, value_enum)]
    pub place: Option<PlaceStyle>,
    /// When to color output
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorChoice,
}

impl ViewArgs {
    pub fn event_view(&self, settings: &Settings) -> EventView {
        EventView {
            layout: self.layout.unwrap_or(settings.report.layout),
            place: self.place.unwrap_or(settings.report.place),
            style: Style::new(settings.palette.clone(), self.color.enabled()),
        }
    }
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Feed URL (defaults to the configured feed URL)
    #[arg(long)]
    pub url: Option<String>,
    /// Destination file (defaults to the configured feed path)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Download with the built-in HTTP client or an external curl
    #[arg(long, value_enum, default_value = "http")]
    pub downloader: Downloader,
    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub view: ViewArgs,
    /// Maximum rows to display (statistics always cover every valid row)
    #[arg(short = 'n', long = "max-rows")]
    pub max_rows: Option<usize>,
    /// Also write the displayed rows to this CSV file ("-" prints the CSV in place of the report)
    #[arg(long)]
    pub export: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub view: ViewArgs,
    /// Query to run instead of reading from stdin (repeatable)
    #[arg(short = 'q', long = "query", action = clap::ArgAction::Append)]
    pub queries: Vec<String>,
    /// Parse the feed once and answer every query from memory
    #[arg(long)]
    pub cache: bool,
    /// Output format for --query results
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub view: ViewArgs,
    /// Maximum rows to display in the report
    #[arg(short = 'n', long = "max-rows")]
    pub max_rows: Option<usize>,
    /// Use the existing local file instead of downloading first
    #[arg(long = "skip-fetch")]
    pub skip_fetch: bool,
    /// Feed URL (defaults to the configured feed URL)
    #[arg(long)]
    pub url: Option<String>,
    /// Download with the built-in HTTP client or an external curl
    #[arg(long, value_enum, default_value = "http")]
    pub downloader: Downloader,
    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,
    /// Stop after the report instead of prompting for searches
    #[arg(long = "no-search")]
    pub no_search: bool,
    /// Parse the feed once for the search session
    #[arg(long)]
    pub cache: bool,
    /// Keep the process open for N seconds before exiting (no pause unless given)
    #[arg(long, value_name = "SECS", conflicts_with = "wait")]
    pub hold: Option<u64>,
    /// Wait for Enter before exiting (no pause unless given)
    #[arg(long)]
    pub wait: bool,
}
