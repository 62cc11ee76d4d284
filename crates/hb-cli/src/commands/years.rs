//! Competition years.

use std::io::Write;

use anyhow::Result;
use hb_core::{Snapshot, get_unique_years_given_heats};
use serde::Serialize;

use super::util::write_json;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub heats: usize,
}

/// Years with at least one heat, most recent first.
pub fn summarize(snapshot: &Snapshot) -> Vec<YearSummary> {
    get_unique_years_given_heats(&snapshot.heats)
        .into_iter()
        .map(|year| YearSummary {
            year,
            heats: snapshot.heats.iter().filter(|h| h.year() == year).count(),
        })
        .collect()
}

/// Runs `hb years`.
pub fn run<W: Write>(writer: &mut W, snapshot: &Snapshot, json: bool) -> Result<()> {
    let years = summarize(snapshot);
    if json {
        return write_json(writer, &years);
    }

    if years.is_empty() {
        writeln!(writer, "No heats yet.")?;
    }
    for summary in years {
        let noun = if summary.heats == 1 { "heat" } else { "heats" };
        writeln!(writer, "{}  {} {noun}", summary.year, summary.heats)?;
    }
    Ok(())
}
