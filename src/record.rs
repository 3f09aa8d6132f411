//! Feed rows reduced to the three fields the reporter and search care about.

use serde::{Deserialize, Serialize};

use crate::{field, place};

/// Zero-based positions of the fields we read from each feed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedColumns {
    pub time: usize,
    pub magnitude: usize,
    pub place: usize,
}

impl Default for FeedColumns {
    fn default() -> Self {
        // USGS summary feed: time,latitude,longitude,depth,mag,...,place,...
        Self {
            time: 0,
            magnitude: 4,
            place: 13,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub time: String,
    pub magnitude: f64,
    pub place: String,
}

impl Record {
    /// Builds a record from a raw data line, or `None` when the row is not valid.
    pub fn from_line(line: &str, columns: &FeedColumns) -> Option<Self> {
        let magnitude = parse_magnitude(&field::extract(line, columns.magnitude));
        if !is_valid_magnitude(magnitude) {
            return None;
        }
        Some(Self {
            time: field::extract(line, columns.time).into_owned(),
            magnitude,
            place: field::extract(line, columns.place).into_owned(),
        })
    }

    pub fn short_place(&self) -> &str {
        place::short_place(&self.place)
    }
}

pub fn is_valid_magnitude(magnitude: f64) -> bool {
    magnitude.is_finite() && magnitude > 0.0
}

/// Parses the leading decimal number of `raw`, returning 0 when there is none.
///
/// Trailing garbage is ignored (`"4.5 ml"` parses as 4.5) and an empty or
/// non-numeric field is 0, which callers treat as an invalid row.
pub fn parse_magnitude(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let end = numeric_prefix_len(trimmed);
    if end == 0 {
        return 0.0;
    }
    trimmed[..end].parse::<f64>().unwrap_or(0.0)
}

fn numeric_prefix_len(value: &str) -> usize {
    let bytes = value.as_bytes();
    let digits_from = |start: usize| {
        let mut idx = start;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        idx
    };

    let mut idx = 0usize;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        idx += 1;
    }
    let int_end = digits_from(idx);
    let mut digits = int_end - idx;
    idx = int_end;
    if bytes.get(idx) == Some(&b'.') {
        let frac_end = digits_from(idx + 1);
        digits += frac_end - (idx + 1);
        idx = frac_end;
    }
    if digits == 0 {
        return 0;
    }
    if matches!(bytes.get(idx), Some(b'e' | b'E')) {
        let mut exp = idx + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            idx = exp_end;
        }
    }
    idx
}
