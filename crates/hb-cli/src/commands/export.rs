//! CSV export of best times.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use hb_core::ranking::activity_intervals;
use hb_core::{ActivityKind, Snapshot, best_per_player, to_csv};

use super::util::resolve_year;

/// Renders one row per player, fastest first.
///
/// With `limit` only the leaderboard entries are exported; otherwise every
/// player with a completed attempt is.
pub fn render(
    snapshot: &Snapshot,
    activity: ActivityKind,
    year: i32,
    limit: Option<usize>,
) -> Result<String> {
    let intervals = activity_intervals(snapshot, activity, year)?;
    let records = best_per_player(&intervals, limit);
    tracing::debug!(%activity, year, rows = records.len(), "exporting best times");
    Ok(to_csv(&records, snapshot)?)
}

/// Runs `hb export`, writing to `output` when given.
pub fn run<W: Write>(
    writer: &mut W,
    snapshot: &Snapshot,
    activity: ActivityKind,
    year: Option<i32>,
    limit: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let year = resolve_year(snapshot, year)?;
    let csv = render(snapshot, activity, year, limit)?;

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            writeln!(writer, "Wrote {}", path.display())?;
        }
        None => write!(writer, "{csv}")?,
    }
    Ok(())
}
