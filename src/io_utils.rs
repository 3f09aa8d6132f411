//! I/O utilities for reading feed lines and writing CSV exports.
//!
//! All file access in quake-feed flows through this module:
//!
//! - **Line reading**: [`LineReader`] yields one decoded line at a time with
//!   the trailing `\n`/`\r\n` removed, truncating anything beyond the
//!   configured byte ceiling (4096 by default, the longest line the feed
//!   format promises).
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Export**: `open_csv_writer` builds a `csv::Writer` for file or stdout.

use std::{
    fs::File,
    io::{self, BufRead, BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

pub const DEFAULT_MAX_LINE_BYTES: usize = 4096;

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Decodes `bytes`, substituting U+FFFD for malformed sequences.
///
/// A truncated line can end mid-character, so decoding never fails here.
pub fn decode_lossy(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        debug!(
            "Replaced malformed {} sequence(s) while decoding a line",
            encoding.name()
        );
    }
    text.into_owned()
}

/// Line-at-a-time reader with a byte ceiling per line.
pub struct LineReader<R> {
    inner: R,
    encoding: &'static Encoding,
    max_line_bytes: Option<usize>,
    buffer: Vec<u8>,
    lines_read: usize,
}

impl<R: BufRead> LineReader<R> {
    /// `max_line_bytes` of `None` disables truncation.
    pub fn new(inner: R, encoding: &'static Encoding, max_line_bytes: Option<usize>) -> Self {
        Self {
            inner,
            encoding,
            max_line_bytes,
            buffer: Vec::new(),
            lines_read: 0,
        }
    }

    /// Number of physical lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Reads the next line, or `None` at end of input.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buffer.clear();
        let read = self.inner.read_until(b'\n', &mut self.buffer)?;
        if read == 0 {
            return Ok(None);
        }
        self.lines_read += 1;
        if self.buffer.last() == Some(&b'\n') {
            self.buffer.pop();
            if self.buffer.last() == Some(&b'\r') {
                self.buffer.pop();
            }
        }
        if let Some(limit) = self.max_line_bytes
            && self.buffer.len() > limit
        {
            debug!(
                "Line {} is {} bytes; truncating to {limit}",
                self.lines_read,
                self.buffer.len()
            );
            self.buffer.truncate(limit);
        }
        let bytes = if self.lines_read == 1 {
            strip_utf8_bom(&self.buffer)
        } else {
            &self.buffer
        };
        Ok(Some(decode_lossy(bytes, self.encoding)))
    }
}

fn strip_utf8_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

pub fn open_csv_writer(path: Option<&Path>) -> Result<csv::Writer<Box<dyn Write>>> {
    let base: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout()),
    };

    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    Ok(builder.from_writer(base))
}
