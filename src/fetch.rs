//! Downloading the feed file.
//!
//! Reporting and search only ever see a local path; this module is the
//! collaborator that puts a fresh copy there. Downloads land in a sibling
//! `.part` file first and are renamed over the destination on success, so a
//! failed fetch leaves any previous copy intact.

use std::{
    env,
    ffi::OsString,
    fs::{self, File},
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
    process::Command,
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use log::{debug, info};

use crate::{cli::FetchArgs, config::Settings};

/// Environment variable naming the program used by [`CommandFetcher`].
pub const CURL_PROGRAM_ENV: &str = "QUAKE_FEED_CURL";

pub trait FeedFetcher {
    /// Stores the document at `url` in `destination` and returns that path.
    fn fetch(&self, url: &str, destination: &Path) -> Result<PathBuf>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Downloader {
    #[default]
    Http,
    Curl,
}

impl Downloader {
    pub fn fetcher(self, timeout: Duration) -> Box<dyn FeedFetcher> {
        match self {
            Downloader::Http => Box::new(HttpFetcher::new(timeout)),
            Downloader::Curl => Box::new(CommandFetcher::from_env()),
        }
    }
}

pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl FeedFetcher for HttpFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<PathBuf> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| anyhow!("Requesting {url}: {err}"))?;
        let staging = staging_path(destination);
        let bytes = match write_staging(&mut response.into_reader(), &staging, url) {
            Ok(bytes) => bytes,
            Err(err) => {
                let _ = fs::remove_file(&staging);
                return Err(err);
            }
        };
        debug!("Downloaded {bytes} byte(s) from {url}");
        promote(&staging, destination)
    }
}

fn write_staging(body: &mut impl Read, staging: &Path, url: &str) -> Result<u64> {
    let mut writer = BufWriter::new(
        File::create(staging).with_context(|| format!("Creating {staging:?}"))?,
    );
    let bytes = io::copy(body, &mut writer).with_context(|| format!("Downloading {url}"))?;
    writer.flush().with_context(|| format!("Flushing {staging:?}"))?;
    Ok(bytes)
}

/// Runs an external downloader (`curl` unless overridden).
pub struct CommandFetcher {
    program: OsString,
}

impl CommandFetcher {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_env() -> Self {
        match env::var_os(CURL_PROGRAM_ENV) {
            Some(program) if !program.is_empty() => Self::new(program),
            _ => Self::new("curl"),
        }
    }
}

impl FeedFetcher for CommandFetcher {
    fn fetch(&self, url: &str, destination: &Path) -> Result<PathBuf> {
        let staging = staging_path(destination);
        let status = Command::new(&self.program)
            .arg("-s")
            .arg("-f")
            .arg("-L")
            .arg(url)
            .arg("-o")
            .arg(&staging)
            .status()
            .with_context(|| format!("Failed to spawn {:?}", self.program))?;
        if !status.success() {
            let _ = fs::remove_file(&staging);
            return Err(anyhow!(
                "{:?} exited with status {status} while fetching {url}",
                self.program
            ));
        }
        promote(&staging, destination)
    }
}

fn staging_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("feed"));
    name.push(".part");
    destination.with_file_name(name)
}

fn promote(staging: &Path, destination: &Path) -> Result<PathBuf> {
    fs::rename(staging, destination)
        .with_context(|| format!("Moving {staging:?} to {destination:?}"))?;
    Ok(destination.to_path_buf())
}

pub fn execute(args: &FetchArgs, settings: &Settings) -> Result<()> {
    let url = args.url.as_deref().unwrap_or(&settings.feed.url);
    let destination = args
        .output
        .as_deref()
        .unwrap_or(settings.feed.path.as_path());
    let fetcher = args.downloader.fetcher(Duration::from_secs(args.timeout));
    info!("Fetching {url} into {destination:?}");
    let path = fetcher.fetch(url, destination)?;
    info!("Feed stored at {path:?}");
    Ok(())
}
