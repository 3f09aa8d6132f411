//! Quote-aware field extraction for single feed lines.
//!
//! The feed is scanned one line at a time and only a handful of columns are
//! ever needed, so instead of splitting the whole row this module walks the
//! line once and stops at the requested column. Every `"` toggles the quoted
//! state and is dropped from the output; commas inside quotes are data.

use std::borrow::Cow;

pub const DELIMITER: u8 = b',';
pub const QUOTE: u8 = b'"';

/// Returns the value of `column` (zero-based) within `line`.
///
/// Missing columns yield an empty string. The result borrows from `line`
/// unless the field carried quote characters that had to be removed.
pub fn extract(line: &str, column: usize) -> Cow<'_, str> {
    let Some(span) = locate(line, column) else {
        return Cow::Borrowed("");
    };
    let raw = &line[span.start..span.end];
    if span.quoted {
        Cow::Owned(raw.chars().filter(|ch| *ch != QUOTE as char).collect())
    } else {
        Cow::Borrowed(raw)
    }
}

/// Number of columns the extractor sees in `line`.
pub fn column_count(line: &str) -> usize {
    let mut inside = false;
    let mut count = 1;
    for byte in line.bytes() {
        match byte {
            QUOTE => inside = !inside,
            DELIMITER if !inside => count += 1,
            _ => {}
        }
    }
    count
}

struct Span {
    start: usize,
    end: usize,
    quoted: bool,
}

// Quotes and commas are ASCII, so every byte offset we stop at is a char boundary.
fn locate(line: &str, column: usize) -> Option<Span> {
    let mut current = 0usize;
    let mut start = 0usize;
    let mut inside = false;
    let mut quoted = false;

    for (idx, byte) in line.bytes().enumerate() {
        match byte {
            QUOTE => {
                inside = !inside;
                if current == column {
                    quoted = true;
                }
            }
            DELIMITER if !inside => {
                if current == column {
                    return Some(Span {
                        start,
                        end: idx,
                        quoted,
                    });
                }
                current += 1;
                start = idx + 1;
            }
            _ => {}
        }
    }

    (current == column).then_some(Span {
        start,
        end: line.len(),
        quoted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_borrow_from_line() {
        let line = "2024-05-01T10:00:00Z,35.1,-117.2,8.5,2.3";
        let value = extract(line, 4);
        assert_eq!(value, "2.3");
        assert!(matches!(value, Cow::Borrowed(_)));
    }

    #[test]
    fn quoted_comma_does_not_split() {
        let line = r#"a,"10 km N of Elsinore, CA",b"#;
        assert_eq!(extract(line, 1), "10 km N of Elsinore, CA");
        assert_eq!(extract(line, 2), "b");
        assert_eq!(column_count(line), 3);
    }

    #[test]
    fn empty_and_trailing_columns() {
        assert_eq!(extract("a,,c,", 1), "");
        assert_eq!(extract("a,,c,", 3), "");
        assert_eq!(extract("a,,c,", 4), "");
        assert_eq!(extract("", 0), "");
        assert_eq!(column_count("a,,c,"), 4);
    }

    #[test]
    fn unterminated_quote_swallows_the_rest() {
        let line = r#"a,"b,c,d"#;
        assert_eq!(extract(line, 1), "b,c,d");
        assert_eq!(extract(line, 2), "");
    }

    #[test]
    fn multibyte_text_is_kept_intact() {
        let line = "t,\"12 km SO de Ciudad de México, México\",5";
        assert_eq!(extract(line, 1), "12 km SO de Ciudad de México, México");
        assert_eq!(extract(line, 2), "5");
    }
}
