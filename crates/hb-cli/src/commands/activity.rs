//! Activity type listing.

use std::io::Write;

use anyhow::Result;
use hb_core::{ActivityKind, PerformanceScale, Snapshot};

use super::util::write_json;

/// Formats activity types with their radar calibration.
pub fn format_list(snapshot: &Snapshot) -> String {
    if snapshot.time_types.is_empty() {
        return "No activity types. Run `hb init` first.\n".to_string();
    }

    let mut output = String::new();
    for time_type in &snapshot.time_types {
        let scale = match PerformanceScale::for_key(&time_type.key) {
            Some(scale) => format!("{}s-{}s", scale.min_seconds, scale.max_seconds),
            None => "uncalibrated".to_string(),
        };
        let known = if time_type.key.parse::<ActivityKind>().is_ok() {
            ""
        } else {
            " (unknown key)"
        };
        output.push_str(&format!(
            "{} [{}] radar {scale}{known}\n",
            time_type.name, time_type.key
        ));
    }
    output
}

/// Runs `hb type list`.
pub fn list<W: Write>(writer: &mut W, snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        write_json(writer, &snapshot.time_types)
    } else {
        write!(writer, "{}", format_list(snapshot))?;
        Ok(())
    }
}
