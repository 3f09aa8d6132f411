//! The on-disk feed file as a source of records.
//!
//! Every pass opens the file afresh, consumes the header line without
//! parsing it, and yields only valid records (magnitude > 0). A missing file
//! and a file without a header are reported as distinct [`FeedError`]s.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use encoding_rs::{Encoding, UTF_8};
use log::{debug, trace};

use crate::{
    error::FeedError,
    io_utils::{DEFAULT_MAX_LINE_BYTES, LineReader},
    record::{FeedColumns, Record},
};

#[derive(Debug, Clone)]
pub struct FeedSource {
    path: PathBuf,
    columns: FeedColumns,
    encoding: &'static Encoding,
    max_line_bytes: Option<usize>,
}

impl FeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            columns: FeedColumns::default(),
            encoding: UTF_8,
            max_line_bytes: Some(DEFAULT_MAX_LINE_BYTES),
        }
    }

    pub fn with_columns(mut self, columns: FeedColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// A limit of 0 disables truncation.
    pub fn with_max_line_bytes(mut self, limit: usize) -> Self {
        self.max_line_bytes = (limit > 0).then_some(limit);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file and consumes its header line.
    pub fn open(&self) -> Result<Records, FeedError> {
        let file = File::open(&self.path).map_err(|source| FeedError::DataSourceUnavailable {
            path: self.path.clone(),
            source,
        })?;
        let mut lines = LineReader::new(BufReader::new(file), self.encoding, self.max_line_bytes);
        let header = lines.next_line().map_err(|source| FeedError::Read {
            path: self.path.clone(),
            line: 1,
            source,
        })?;
        match header {
            Some(header) => debug!("Skipping header of {:?}: {header}", self.path),
            None => {
                return Err(FeedError::EmptySource {
                    path: self.path.clone(),
                });
            }
        }
        Ok(Records {
            lines,
            path: self.path.clone(),
            columns: self.columns,
            skipped: 0,
        })
    }

    /// Reads every valid record of the file into memory.
    pub fn load(&self) -> Result<Vec<Record>, FeedError> {
        self.open()?.collect()
    }
}

/// Iterator over the valid records of one pass.
pub struct Records {
    lines: LineReader<BufReader<File>>,
    path: PathBuf,
    columns: FeedColumns,
    skipped: usize,
}

impl Records {
    /// Rows dropped so far because their magnitude was missing or not positive.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for Records {
    type Item = Result<Record, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(source) => {
                    return Some(Err(FeedError::Read {
                        path: self.path.clone(),
                        line: self.lines.lines_read() + 1,
                        source,
                    }));
                }
            };
            match Record::from_line(&line, &self.columns) {
                Some(record) => return Some(Ok(record)),
                None => {
                    self.skipped += 1;
                    trace!("Skipping line {}: no positive magnitude", self.lines.lines_read());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    const HEADER: &str = "time,latitude,longitude,depth,mag,magType,nst,gap,dmin,rms,net,id,updated,place,type";

    #[test]
    fn header_only_file_has_no_records() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("feed.csv");
        fs::write(&path, format!("{HEADER}\n")).expect("write feed");
        let records = FeedSource::new(&path).load().expect("load");
        assert!(records.is_empty());
    }

    #[test]
    fn zero_byte_file_is_empty_source() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("feed.csv");
        fs::write(&path, "").expect("write feed");
        let err = FeedSource::new(&path).open().err().expect("empty source");
        assert!(matches!(err, FeedError::EmptySource { .. }));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempdir().expect("temp dir");
        let err = FeedSource::new(dir.path().join("absent.csv"))
            .open()
            .err()
            .expect("unavailable");
        assert!(err.is_unavailable());
    }

    #[test]
    fn skipped_rows_are_counted() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("feed.csv");
        let body = [
            HEADER,
            "t1,0,0,1,2.5,ml,,,,,ci,a,u,\"3km N of Alpha, CA\",earthquake",
            "t2,0,0,1,,ml,,,,,ci,b,u,\"Beta\",earthquake",
            "t3,0,0,1,-0.3,ml,,,,,ci,c,u,\"Gamma\",earthquake",
        ]
        .join("\n");
        fs::write(&path, body).expect("write feed");
        let mut records = FeedSource::new(&path).open().expect("open");
        let first = records.next().expect("one record").expect("valid");
        assert_eq!(first.short_place(), "Alpha, CA");
        assert!(records.next().is_none());
        assert_eq!(records.skipped(), 2);
    }
}
