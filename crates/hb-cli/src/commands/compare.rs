//! Radar comparison of two players or teams.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use hb_core::ranking::SubjectCard;
use hb_core::{Comparison, Snapshot, UNMEASURED, format_duration};

use super::util::{resolve_year, subject_id, write_json};
use crate::cli::ViewArgs;

fn format_card(output: &mut String, card: &SubjectCard) {
    writeln!(output, "{}", card.name).unwrap();
    if let Some(fact) = &card.fact {
        writeln!(output, "  \"{fact}\"").unwrap();
    }
    for point in &card.points {
        let time = point
            .duration_ms
            .map_or_else(|| UNMEASURED.to_string(), format_duration);
        writeln!(output, "  {:<6}{:>10}{:>5}", point.label, time, point.score).unwrap();
    }
}

/// Formats both cards, left first.
pub fn format_comparison(comparison: &Comparison) -> String {
    let mut output = String::new();
    writeln!(
        output,
        "Comparison {}: {} vs {}",
        comparison.year, comparison.left.name, comparison.right.name
    )
    .unwrap();
    writeln!(output).unwrap();
    format_card(&mut output, &comparison.left);
    writeln!(output).unwrap();
    format_card(&mut output, &comparison.right);
    output
}

/// Runs `hb compare`.
pub fn run<W: Write>(
    writer: &mut W,
    snapshot: &Snapshot,
    left: &str,
    right: &str,
    view: ViewArgs,
) -> Result<()> {
    let year = resolve_year(snapshot, view.year)?;
    let left = subject_id(snapshot, left)?;
    let right = subject_id(snapshot, right)?;
    let comparison = hb_core::compare(snapshot, &left, &right, year)?;

    if view.json {
        write_json(writer, &comparison)
    } else {
        write!(writer, "{}", format_comparison(&comparison))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    use crate::commands::util::fixtures::{event, regatta};

    fn raced() -> Snapshot {
        let mut snapshot = regatta();
        event(&mut snapshot, "ann", "h1", "beer", "10:00:00");
        event(&mut snapshot, "ann", "h1", "beer", "10:00:02");
        event(&mut snapshot, "bob", "h1", "sail", "10:00:00");
        event(&mut snapshot, "bob", "h1", "sail", "10:00:35");
        snapshot
    }

    #[test]
    fn player_against_team() {
        let mut output = Vec::new();
        run(&mut output, &raced(), "Bob", "Gulls", ViewArgs::default()).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Comparison 2024: Bob vs Gulls

        Bob
          Beer   --:--:---    0
          Sail   00:35:000   50
          Spin   --:--:---    0

        Gulls
          Beer   00:02:000  100
          Sail   --:--:---    0
          Spin   --:--:---    0
        ");
    }

    #[test]
    fn player_card_carries_team_and_fact() {
        let comparison = hb_core::compare(&raced(), "ann", "bob", 2024).unwrap();
        let text = format_comparison(&comparison);
        assert!(text.starts_with("Comparison 2024: Ann (Gulls) vs Bob\n"));
        assert!(text.contains("Ann (Gulls)\n  \"Rows to work\"\n"));
    }

    #[test]
    fn unknown_subject_fails() {
        let err = run(&mut Vec::new(), &raced(), "Ann", "Nobody", ViewArgs::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "no player or team with id or name \"Nobody\""
        );
    }
}
