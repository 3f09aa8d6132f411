use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Renders an aligned table: header, dashed separator, then one line per row.
///
/// Cells may carry ANSI escapes; they do not count toward column widths.
/// `paint` is applied to the header and separator lines only.
pub fn render_table(
    headers: &[String],
    rows: &[Vec<String>],
    aligns: &[Align],
    paint: impl Fn(&str) -> String,
) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }

    let mut output = String::new();

    let header_line = format_row(headers, &widths, &[]);
    let _ = writeln!(output, "{}", paint(&header_line));

    let separator_width = widths.iter().sum::<usize>() + 2 * column_count.saturating_sub(1);
    let _ = writeln!(output, "{}", paint(&"-".repeat(separator_width.max(3))));

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, aligns));
    }

    output
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        let Some(width) = widths.get(idx).copied() else {
            break;
        };
        let sanitized = sanitize_cell(value);
        let padding = " ".repeat(width.saturating_sub(display_width(sanitized.as_ref())));
        let cell = match aligns.get(idx).copied().unwrap_or(Align::Left) {
            Align::Left => format!("{sanitized}{padding}"),
            Align::Right => format!("{padding}{sanitized}"),
        };
        cells.push(cell);
    }
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn right_aligned_cells_pad_on_the_left() {
        let headers = strings(&["#", "mag"]);
        let rows = vec![strings(&["1", "5.20"]), strings(&["10", "0.90"])];
        let rendered = render_table(&headers, &rows, &[Align::Right, Align::Right], |s| {
            s.to_string()
        });
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec!["#   mag", "--------", " 1  5.20", "10  0.90"]);
    }

    #[test]
    fn ansi_escapes_do_not_widen_columns() {
        let headers = strings(&["mag", "place"]);
        let rows = vec![strings(&["\u{1b}[1;31m5.20\u{1b}[0m", "Elsinore"])];
        let rendered = render_table(&headers, &rows, &[], |s| s.to_string());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "mag   place");
        assert_eq!(lines[2], "\u{1b}[1;31m5.20\u{1b}[0m  Elsinore");
    }

    #[test]
    fn control_characters_become_spaces() {
        let headers = strings(&["place"]);
        let rows = vec![strings(&["line1\nline2\tvalue"])];
        let rendered = render_table(&headers, &rows, &[], |s| s.to_string());
        assert_eq!(rendered.lines().nth(2), Some("line1 line2 value"));
    }
}
