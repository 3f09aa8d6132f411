pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod field;
pub mod io_utils;
pub mod layout;
pub mod place;
pub mod record;
pub mod report;
pub mod search;
pub mod severity;
pub mod stats;
pub mod style;
pub mod table;

use std::{
    env,
    io::{self, BufRead, Write},
    sync::OnceLock,
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};

use crate::{
    cli::{Cli, Commands, RunArgs},
    config::Settings,
    search::Catalog,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("quake_feed", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let settings = Settings::resolve(cli.config.as_deref())?;
    match cli.command {
        Commands::Fetch(args) => fetch::execute(&args, &settings),
        Commands::Report(args) => report::execute(&args, &settings),
        Commands::Search(args) => search::execute(&args, &settings),
        Commands::Run(args) => handle_run(&args, &settings),
        Commands::Config => {
            print!("{}", settings.to_yaml()?);
            Ok(())
        }
    }
}

fn handle_run(args: &RunArgs, settings: &Settings) -> Result<()> {
    let source = args.source.feed_source(settings)?;

    if !args.skip_fetch {
        let url = args.url.as_deref().unwrap_or(&settings.feed.url);
        let fetcher = args.downloader.fetcher(Duration::from_secs(args.timeout));
        if let Err(err) = fetcher.fetch(url, source.path()) {
            warn!("Failed to download feed: {err:#}");
            warn!("Continuing with existing file {:?}", source.path());
        }
    }

    let view = args.view.event_view(settings);
    let outcome = report::build_report(
        &source,
        args.max_rows.or(settings.report.max_rows),
        &settings.cost,
    )
    .with_context(|| format!("Reporting on {:?}", source.path()));

    let result = outcome.and_then(|report| {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", report.render(&view)).context("Writing report")?;
        if args.no_search {
            return Ok(());
        }
        let catalog = if args.cache {
            Catalog::cached(&source)?
        } else {
            Catalog::Live(source.clone())
        };
        let summary = search::run_session(
            &catalog,
            io::stdin().lock(),
            &mut stdout,
            &view,
            &settings.cost,
        )?;
        info!("Search session answered {} query(ies)", summary.queries);
        Ok(())
    });

    pause_before_exit(args.hold, args.wait);
    result
}

fn pause_before_exit(hold: Option<u64>, wait: bool) {
    if let Some(seconds) = hold.filter(|seconds| *seconds > 0) {
        println!("\nHolding for {seconds} seconds before exit...");
        let _ = io::stdout().flush();
        thread::sleep(Duration::from_secs(seconds));
    } else if wait {
        print!("\nPress Enter to exit...");
        let _ = io::stdout().flush();
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
    }
}
