//! Column ordering and cell formatting for event tables.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    record::Record,
    severity::SeverityBand,
    style::Style,
    table::{self, Align},
};

/// Where the place column sits relative to the numeric columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum Layout {
    #[default]
    PlaceFirst,
    PlaceLast,
}

/// Whether tables show the short place or the full feed description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum PlaceStyle {
    #[default]
    Short,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventColumn {
    Index,
    Time,
    Place,
    Magnitude,
    Cost,
}

impl EventColumn {
    fn header(self) -> &'static str {
        match self {
            EventColumn::Index => "#",
            EventColumn::Time => "Time",
            EventColumn::Place => "Place",
            EventColumn::Magnitude => "Magnitude",
            EventColumn::Cost => "Damage Cost",
        }
    }

    fn align(self) -> Align {
        match self {
            EventColumn::Index | EventColumn::Magnitude | EventColumn::Cost => Align::Right,
            EventColumn::Time | EventColumn::Place => Align::Left,
        }
    }
}

impl Layout {
    pub fn columns(self, numbered: bool) -> Vec<EventColumn> {
        let mut columns = Vec::with_capacity(5);
        if numbered {
            columns.push(EventColumn::Index);
        }
        match self {
            Layout::PlaceFirst => columns.extend([
                EventColumn::Time,
                EventColumn::Place,
                EventColumn::Magnitude,
                EventColumn::Cost,
            ]),
            Layout::PlaceLast => columns.extend([
                EventColumn::Time,
                EventColumn::Magnitude,
                EventColumn::Cost,
                EventColumn::Place,
            ]),
        }
        columns
    }
}

/// One table line: a record with its display position and estimated cost.
#[derive(Debug, Clone, Copy)]
pub struct EventRow<'a> {
    pub index: Option<usize>,
    pub record: &'a Record,
    pub cost: f64,
}

/// Everything rendering needs besides the rows themselves.
#[derive(Debug, Clone)]
pub struct EventView {
    pub layout: Layout,
    pub place: PlaceStyle,
    pub style: Style,
}

impl EventView {
    pub fn place_text<'r>(&self, record: &'r Record) -> &'r str {
        match self.place {
            PlaceStyle::Short => record.short_place(),
            PlaceStyle::Full => &record.place,
        }
    }

    pub fn render(&self, rows: &[EventRow<'_>], numbered: bool) -> String {
        let columns = self.layout.columns(numbered);
        let headers = columns
            .iter()
            .map(|column| column.header().to_string())
            .collect::<Vec<_>>();
        let aligns = columns.iter().map(|column| column.align()).collect::<Vec<_>>();
        let cells = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| self.cell(*column, row))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        let palette = &self.style.palette;
        table::render_table(&headers, &cells, &aligns, |line| {
            self.style.paint(line, &palette.header)
        })
    }

    fn cell(&self, column: EventColumn, row: &EventRow<'_>) -> String {
        let palette = &self.style.palette;
        match column {
            EventColumn::Index => row
                .index
                .map(|index| self.style.paint(&index.to_string(), &palette.index))
                .unwrap_or_default(),
            EventColumn::Time => row.record.time.clone(),
            EventColumn::Place => self.place_text(row.record).to_string(),
            EventColumn::Magnitude => {
                let band = SeverityBand::from_magnitude(row.record.magnitude);
                self.style
                    .paint(&format_magnitude(row.record.magnitude), palette.band(band))
            }
            EventColumn::Cost => self.style.paint(&format_cost(row.cost), &palette.cost),
        }
    }
}

pub fn format_magnitude(magnitude: f64) -> String {
    format!("{magnitude:.2}")
}

pub fn format_cost(cost: f64) -> String {
    format!("${cost:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            time: "2024-05-01T10:00:00Z".to_string(),
            magnitude: 4.25,
            place: "7 km SSE of Ridgecrest, CA".to_string(),
        }
    }

    fn view(layout: Layout, place: PlaceStyle) -> EventView {
        EventView {
            layout,
            place,
            style: Style::plain(),
        }
    }

    #[test]
    fn place_last_moves_place_to_the_end() {
        let record = record();
        let rows = [EventRow {
            index: Some(1),
            record: &record,
            cost: 4_250_000.0,
        }];
        let rendered = view(Layout::PlaceLast, PlaceStyle::Full).render(&rows, true);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("#  Time"));
        assert!(lines[0].ends_with("Damage Cost  Place"));
        assert!(lines[2].ends_with("$4250000  7 km SSE of Ridgecrest, CA"));
    }

    #[test]
    fn unnumbered_rows_omit_index_column() {
        let record = record();
        let rows = [EventRow {
            index: None,
            record: &record,
            cost: 4_250_000.0,
        }];
        let rendered = view(Layout::PlaceFirst, PlaceStyle::Short).render(&rows, false);
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("Time"));
        assert!(lines[2].contains("Ridgecrest, CA"));
        assert!(lines[2].contains("4.25"));
        assert!(!lines[2].contains("SSE"));
    }

    #[test]
    fn numbers_use_fixed_precision() {
        assert_eq!(format_magnitude(5.2), "5.20");
        assert_eq!(format_cost(5_200_000.0), "$5200000");
    }
}
