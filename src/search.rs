//! Place search over the feed, one query at a time.
//!
//! By default every query re-reads the feed file from disk; `--cache` loads
//! the valid records once and searches them in memory instead.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde_json::json;

use crate::{
    cli::{OutputFormat, SearchArgs},
    config::Settings,
    error::FeedError,
    feed::FeedSource,
    layout::{EventRow, EventView},
    place,
    record::Record,
    stats::CostModel,
};

pub const QUIT_COMMAND: &str = "quit";
pub const PROMPT: &str = "\nsearch for a city: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Quit,
    Empty,
    Text(String),
}

impl Query {
    /// Interprets one input line. Only the line terminator is removed.
    pub fn parse(line: &str) -> Self {
        let text = line
            .strip_suffix('\n')
            .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
            .unwrap_or(line);
        if text == QUIT_COMMAND {
            Query::Quit
        } else if text.is_empty() {
            Query::Empty
        } else {
            Query::Text(text.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Quit,
    /// Empty query: nothing was scanned.
    Skipped,
    Matches { query: String, records: Vec<Record> },
}

/// Where searches read their records from.
#[derive(Debug, Clone)]
pub enum Catalog {
    Live(FeedSource),
    Cached(Vec<Record>),
}

impl Catalog {
    pub fn cached(source: &FeedSource) -> Result<Self, FeedError> {
        let records = source.load()?;
        info!("Cached {} valid row(s) from {:?}", records.len(), source.path());
        Ok(Catalog::Cached(records))
    }

    /// Every record whose short place contains `needle`, in file order.
    pub fn search(&self, needle: &str) -> Result<Vec<Record>, FeedError> {
        match self {
            Catalog::Live(source) => {
                let mut matches = Vec::new();
                for record in source.open()? {
                    let record = record?;
                    if place::matches_query(&record.place, needle) {
                        matches.push(record);
                    }
                }
                Ok(matches)
            }
            Catalog::Cached(records) => Ok(records
                .iter()
                .filter(|record| place::matches_query(&record.place, needle))
                .cloned()
                .collect()),
        }
    }

    pub fn run_query(&self, query: &Query) -> Result<QueryOutcome, FeedError> {
        match query {
            Query::Quit => Ok(QueryOutcome::Quit),
            Query::Empty => Ok(QueryOutcome::Skipped),
            Query::Text(text) => {
                let matches = self.search(text)?;
                debug!("Query {text:?} matched {} row(s)", matches.len());
                Ok(QueryOutcome::Matches {
                    query: text.clone(),
                    records: matches,
                })
            }
        }
    }
}

/// Renders the outcome of one text query the way the interactive prompt shows it.
pub fn render_matches(
    query: &str,
    matches: &[Record],
    view: &EventView,
    cost_model: &dyn CostModel,
) -> String {
    if matches.is_empty() {
        return format!("No results for \"{query}\".\n");
    }
    let rows = matches
        .iter()
        .map(|record| EventRow {
            index: None,
            record,
            cost: cost_model.estimate(record.magnitude),
        })
        .collect::<Vec<_>>();
    let mut output = String::from("\n");
    output.push_str(&view.style.paint("Results:", &view.style.palette.header));
    output.push('\n');
    output.push_str(&view.render(&rows, false));
    output
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub queries: usize,
    pub failures: usize,
}

/// Prompts on `output` and answers queries read from `input` until `quit`
/// or end of input. Feed errors are reported and the session continues.
pub fn run_session<R, W>(
    catalog: &Catalog,
    mut input: R,
    output: &mut W,
    view: &EventView,
    cost_model: &dyn CostModel,
) -> Result<SessionSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = SessionSummary::default();
    let mut line = String::new();
    loop {
        write!(output, "{PROMPT}").context("Writing prompt")?;
        output.flush().context("Flushing prompt")?;
        line.clear();
        if input.read_line(&mut line).context("Reading query")? == 0 {
            break;
        }
        match catalog.run_query(&Query::parse(&line)) {
            Ok(QueryOutcome::Quit) => break,
            Ok(QueryOutcome::Skipped) => continue,
            Ok(QueryOutcome::Matches { query, records }) => {
                summary.queries += 1;
                write!(output, "{}", render_matches(&query, &records, view, cost_model))
                    .context("Writing results")?;
            }
            Err(err) => {
                summary.queries += 1;
                summary.failures += 1;
                warn!("Search failed: {err}");
                writeln!(output, "{err}").context("Writing search error")?;
            }
        }
    }
    Ok(summary)
}

pub fn execute(args: &SearchArgs, settings: &Settings) -> Result<()> {
    let source = args.source.feed_source(settings)?;
    let catalog = if args.cache {
        Catalog::cached(&source).with_context(|| format!("Loading {:?}", source.path()))?
    } else {
        Catalog::Live(source)
    };
    let view = args.view.event_view(settings);
    let mut stdout = std::io::stdout().lock();

    if args.queries.is_empty() {
        let stdin = std::io::stdin().lock();
        let summary = run_session(&catalog, stdin, &mut stdout, &view, &settings.cost)?;
        info!("Search session answered {} query(ies)", summary.queries);
        return Ok(());
    }

    let mut results = Vec::new();
    for raw in &args.queries {
        let outcome = catalog
            .run_query(&Query::parse(raw))
            .with_context(|| format!("Searching for {raw:?}"))?;
        match outcome {
            QueryOutcome::Quit => break,
            QueryOutcome::Skipped => {}
            QueryOutcome::Matches { query, records } => match args.format {
                OutputFormat::Table => {
                    write!(stdout, "{}", render_matches(&query, &records, &view, &settings.cost))
                        .context("Writing results")?;
                }
                OutputFormat::Json => results.push(json!({
                    "query": query,
                    "matches": records,
                })),
            },
        }
    }
    if args.format == OutputFormat::Json {
        let rendered = serde_json::to_string_pretty(&results)?;
        writeln!(stdout, "{rendered}").context("Writing results")?;
    }
    Ok(())
}
