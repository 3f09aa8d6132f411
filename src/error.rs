use std::{io, path::PathBuf};

use thiserror::Error;

/// Conditions that stop a report or search pass over the feed file.
///
/// Invalid rows are not represented here: they are skipped silently.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Data source {path:?} is unavailable")]
    DataSourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Data source {path:?} is empty")]
    EmptySource { path: PathBuf },
    #[error("Reading line {line} of {path:?}")]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: io::Error,
    },
}

impl FeedError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FeedError::DataSourceUnavailable { .. })
    }
}
