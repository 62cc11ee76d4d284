//! CSV export of interval records.

use thiserror::Error;

use crate::interval::Interval;
use crate::ranking::Enrichment;
use crate::snapshot::Snapshot;

/// Header row of every export.
pub const CSV_HEADER: [&str; 5] = ["Formatted Time", "Player", "Team", "Heat", "Heat Year"];

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv buffer error: {0}")]
    Io(#[from] std::io::Error),
    #[error("export is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Renders records as CSV text, one row per record in input order.
///
/// Fields holding a comma, double quote or line break are quoted with
/// embedded quotes doubled. Rows end in `\n`.
pub fn to_csv<'a, I>(records: I, snapshot: &Snapshot) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Interval>,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    let mut rows = 0usize;
    for record in records {
        let names = Enrichment::resolve(snapshot, record);
        writer.write_record([
            record.formatted_duration.clone(),
            names.player_name,
            names.team_name,
            names.heat_number.map(|n| n.to_string()).unwrap_or_default(),
            names.heat_year.map(|y| y.to_string()).unwrap_or_default(),
        ])?;
        rows += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()))?;
    tracing::debug!(rows, "rendered csv export");
    Ok(String::from_utf8(bytes)?)
}
