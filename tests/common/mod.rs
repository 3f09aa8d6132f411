#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const SAMPLE_FEED: &str = "all_month_sample.csv";

pub const FEED_HEADER: &str = "time,latitude,longitude,depth,mag,magType,nst,gap,dmin,rms,net,id,updated,place,type,horizontalError,depthError,magError,magNst,status,locationSource,magSource";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Formats one feed line with the given time, magnitude and (quoted) place.
pub fn feed_line(time: &str, magnitude: &str, place: &str) -> String {
    format!(
        "{time},33.49,-116.49,4.1,{magnitude},ml,41,58,0.04,0.19,ci,ci0001,{time},\"{place}\",earthquake,0.18,0.42,0.15,25,automatic,ci,ci"
    )
}

/// Header followed by one feed line per `(time, magnitude, place)` entry.
pub fn feed_document(rows: &[(&str, &str, &str)]) -> String {
    let mut document = String::from(FEED_HEADER);
    document.push('\n');
    for (time, magnitude, place) in rows {
        document.push_str(&feed_line(time, magnitude, place));
        document.push('\n');
    }
    document
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
