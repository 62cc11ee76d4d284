//! Heat management commands.
//!
//! Only one heat is current at a time; `hb log` records into it by default.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use hb_core::{Heat, Snapshot, current_heat, next_heat};
use hb_db::{Collection, Database, NewHeat};

use super::util::{find_heat, write_json};

fn heat_label(heat: &Heat) -> String {
    match &heat.name {
        Some(name) => format!("Heat {} \"{name}\"", heat.number),
        None => format!("Heat {}", heat.number),
    }
}

/// Runs `hb heat add`.
pub fn add<W: Write>(
    writer: &mut W,
    db: &mut Database,
    number: u32,
    date: NaiveDate,
    name: Option<String>,
    make_current: bool,
) -> Result<()> {
    let id = db.insert_heat(&NewHeat { name, number, date })?;
    if make_current {
        db.set_current_heat(&id)?;
    }
    write!(writer, "Added heat {number} on {date} ({id})")?;
    if make_current {
        write!(writer, ", now current")?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Formats heats grouped by year, most recent year first.
pub fn format_list(snapshot: &Snapshot) -> String {
    if snapshot.heats.is_empty() {
        return "No heats yet.\n".to_string();
    }

    let mut output = String::new();
    for year in hb_core::get_unique_years_given_heats(&snapshot.heats) {
        writeln!(output, "{year}").unwrap();
        let mut heats: Vec<&Heat> = snapshot.heats.iter().filter(|h| h.year() == year).collect();
        heats.sort_by_key(|h| (h.number, h.date));
        for heat in heats {
            let marker = if heat.is_current { "*" } else { " " };
            writeln!(
                output,
                "{marker} {}  {}  {}",
                heat_label(heat),
                heat.date,
                heat.id
            )
            .unwrap();
        }
    }
    output
}

/// Runs `hb heat list`.
pub fn list<W: Write>(writer: &mut W, snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        write_json(writer, &snapshot.heats)
    } else {
        write!(writer, "{}", format_list(snapshot))?;
        Ok(())
    }
}

/// Runs `hb heat current`: shows, sets or clears the current heat.
pub fn current<W: Write>(
    writer: &mut W,
    db: &mut Database,
    snapshot: &Snapshot,
    target: Option<&str>,
    clear: bool,
) -> Result<()> {
    if clear {
        db.clear_current_heat()?;
        writeln!(writer, "No heat is current")?;
        return Ok(());
    }

    match target {
        Some(query) => {
            let heat = find_heat(snapshot, query)?;
            db.set_current_heat(&heat.id)?;
            writeln!(writer, "Current: {} ({})", heat_label(heat), heat.year())?;
        }
        None => match current_heat(&snapshot.heats) {
            Some(heat) => writeln!(writer, "Current: {} ({})", heat_label(heat), heat.year())?,
            None => writeln!(writer, "No heat is current")?,
        },
    }
    Ok(())
}

/// Runs `hb heat advance`: the next heat of the same year becomes current.
pub fn advance<W: Write>(writer: &mut W, db: &mut Database, snapshot: &Snapshot) -> Result<()> {
    let current = current_heat(&snapshot.heats)
        .context("no heat is current; pick one with `hb heat current <heat>`")?;
    let next = next_heat(&snapshot.heats, current).with_context(|| {
        format!(
            "heat {} is the last heat of {}",
            current.number,
            current.year()
        )
    })?;

    db.set_current_heat(&next.id)?;
    tracing::debug!(from = %current.id, to = %next.id, "advanced heat");
    writeln!(writer, "Current: {} ({})", heat_label(next), next.year())?;
    Ok(())
}

/// Runs `hb heat rm`. Time logs recorded in the heat are removed too.
pub fn remove<W: Write>(
    writer: &mut W,
    db: &mut Database,
    snapshot: &Snapshot,
    query: &str,
) -> Result<()> {
    let heat = find_heat(snapshot, query)?;
    db.delete(Collection::Heats, heat.id.as_str())?;
    writeln!(writer, "Removed {} ({})", heat_label(heat), heat.year())?;
    Ok(())
}
