//! Single pass over the feed: statistics over every valid row, table rows
//! for the first `max_rows` of them.

use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use serde_json::json;

use crate::{
    cli::{OutputFormat, ReportArgs},
    config::Settings,
    error::FeedError,
    feed::FeedSource,
    io_utils,
    layout::{self, EventRow, EventView},
    record::Record,
    severity::SeverityBand,
    stats::{CostModel, Statistics},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub index: usize,
    #[serde(flatten)]
    pub record: Record,
    pub cost: f64,
    pub band: SeverityBand,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub statistics: Statistics,
}

/// Reads `source` once. `max_rows` of `None` keeps every valid row.
pub fn build_report(
    source: &FeedSource,
    max_rows: Option<usize>,
    cost_model: &dyn CostModel,
) -> Result<Report, FeedError> {
    let mut report = Report::default();
    let mut records = source.open()?;
    for record in records.by_ref() {
        let record = record?;
        let cost = cost_model.estimate(record.magnitude);
        report.statistics.ingest(record.magnitude, cost);
        if max_rows.is_none_or(|cap| report.rows.len() < cap) {
            report.rows.push(ReportRow {
                index: report.rows.len() + 1,
                band: SeverityBand::from_magnitude(record.magnitude),
                record,
                cost,
            });
        }
    }
    info!(
        "Read {} valid row(s) from {:?}; skipped {}",
        report.statistics.count,
        source.path(),
        records.skipped()
    );
    Ok(report)
}

impl Report {
    pub fn render(&self, view: &EventView) -> String {
        let rows = self
            .rows
            .iter()
            .map(|row| EventRow {
                index: Some(row.index),
                record: &row.record,
                cost: row.cost,
            })
            .collect::<Vec<_>>();
        let mut output = view.render(&rows, true);
        output.push_str(&view.style.paint(&"-".repeat(60), &view.style.palette.header));
        output.push('\n');
        output.push_str(&render_summary(&self.statistics));
        output
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "rows": self.rows,
            "statistics": {
                "count": self.statistics.count,
                "sum_magnitude": self.statistics.sum_magnitude,
                "sum_cost": self.statistics.sum_cost,
                "average_magnitude": self.statistics.average_magnitude(),
                "average_cost": self.statistics.average_cost(),
            },
        })
    }

    /// Writes the displayed rows as CSV.
    pub fn export(&self, path: &Path) -> Result<()> {
        let mut writer = io_utils::open_csv_writer(Some(path))?;
        writer
            .write_record(["index", "time", "magnitude", "cost", "place", "band"])
            .context("Writing export headers")?;
        for row in &self.rows {
            writer
                .write_record([
                    row.index.to_string(),
                    row.record.time.clone(),
                    layout::format_magnitude(row.record.magnitude),
                    format!("{:.0}", row.cost),
                    row.record.place.clone(),
                    row.band.to_string(),
                ])
                .with_context(|| format!("Writing export row {}", row.index))?;
        }
        writer.flush().context("Flushing export writer")?;
        Ok(())
    }
}

pub fn render_summary(stats: &Statistics) -> String {
    match (stats.average_magnitude(), stats.average_cost()) {
        (Some(average_magnitude), Some(average_cost)) => format!(
            "Count (mag > 0): {}\nSum Magnitude   : {:.2}\nAvg Magnitude   : {:.2}\nAvg Damage Cost : ${:.0}\n",
            stats.count, stats.sum_magnitude, average_magnitude, average_cost
        ),
        _ => "No earthquakes with magnitude > 0.\n".to_string(),
    }
}

pub fn execute(args: &ReportArgs, settings: &Settings) -> Result<()> {
    let source = args.source.feed_source(settings)?;
    let max_rows = args.max_rows.or(settings.report.max_rows);
    let report = build_report(&source, max_rows, &settings.cost)
        .with_context(|| format!("Reporting on {:?}", source.path()))?;

    if let Some(path) = &args.export {
        report.export(path)?;
        info!("Exported {} row(s) to {:?}", report.rows.len(), path);
        if io_utils::is_dash(path) {
            return Ok(());
        }
    }

    let mut stdout = std::io::stdout().lock();
    match args.format {
        OutputFormat::Table => {
            let view = args.view.event_view(settings);
            write!(stdout, "{}", report.render(&view)).context("Writing report")?;
        }
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&report.to_json())?;
            writeln!(stdout, "{rendered}").context("Writing report")?;
        }
    }
    Ok(())
}
