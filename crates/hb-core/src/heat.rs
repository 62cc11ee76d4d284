//! Heat and competition-year helpers.

use std::collections::{BTreeSet, HashMap};

use crate::model::{Heat, TimeLog};
use crate::types::HeatId;

/// Distinct heat years, most recent first.
pub fn get_unique_years_given_heats(heats: &[Heat]) -> Vec<i32> {
    let years: BTreeSet<i32> = heats.iter().map(Heat::year).collect();
    years.into_iter().rev().collect()
}

/// Most recent competition year, if any heat exists.
pub fn latest_year(heats: &[Heat]) -> Option<i32> {
    heats.iter().map(Heat::year).max()
}

/// Keeps logs whose heat falls in `year`, preserving order.
///
/// Logs pointing at a heat missing from `heats` are dropped.
pub fn logs_for_year<'a>(logs: &'a [TimeLog], heats: &[Heat], year: i32) -> Vec<&'a TimeLog> {
    let years: HashMap<&HeatId, i32> = heats.iter().map(|h| (&h.id, h.year())).collect();
    logs.iter()
        .filter(|log| match years.get(&log.heat_id) {
            Some(&y) => y == year,
            None => {
                tracing::warn!(log = %log.id, heat = %log.heat_id, "time log references unknown heat");
                false
            }
        })
        .collect()
}

/// The heat flagged current.
///
/// The store keeps at most one; if that was violated the first wins.
pub fn current_heat(heats: &[Heat]) -> Option<&Heat> {
    let mut current = heats.iter().filter(|h| h.is_current);
    let first = current.next();
    if current.next().is_some() {
        tracing::warn!("more than one heat is flagged current");
    }
    first
}

/// The heat after `current` in the same year, by heat number.
pub fn next_heat<'a>(heats: &'a [Heat], current: &Heat) -> Option<&'a Heat> {
    heats
        .iter()
        .filter(|h| h.year() == current.year() && h.number > current.number)
        .min_by_key(|h| h.number)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::types::{PlayerId, TimeLogId, TimeTypeId};

    fn heat(id: &str, number: u32, year: i32, is_current: bool) -> Heat {
        Heat {
            id: HeatId::new(id).unwrap(),
            name: None,
            number,
            date: NaiveDate::from_ymd_opt(year, 7, 1).unwrap(),
            is_current,
        }
    }

    fn log(id: &str, heat: &str) -> TimeLog {
        TimeLog {
            id: TimeLogId::new(id).unwrap(),
            player_id: PlayerId::new("p1").unwrap(),
            team_id: None,
            heat_id: HeatId::new(heat).unwrap(),
            time_type_id: TimeTypeId::new("spin").unwrap(),
            seconds: 0.0,
            time: "00:00:00".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn unique_years_are_descending_without_duplicates() {
        let heats = vec![
            heat("a", 1, 2022, false),
            heat("b", 2, 2024, false),
            heat("c", 1, 2023, false),
            heat("d", 1, 2024, false),
            heat("e", 3, 2022, false),
        ];
        assert_eq!(get_unique_years_given_heats(&heats), vec![2024, 2023, 2022]);
        assert_eq!(latest_year(&heats), Some(2024));
    }

    #[test]
    fn no_heats_no_years() {
        assert!(get_unique_years_given_heats(&[]).is_empty());
        assert_eq!(latest_year(&[]), None);
    }

    #[test]
    fn logs_filtered_by_heat_year() {
        let heats = vec![heat("old", 1, 2023, false), heat("new", 1, 2024, false)];
        let logs = vec![log("l1", "old"), log("l2", "new"), log("l3", "gone")];

        let kept: Vec<&str> = logs_for_year(&logs, &heats, 2024)
            .iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(kept, vec!["l2"]);
    }

    #[test]
    fn current_heat_is_found() {
        let heats = vec![heat("a", 1, 2024, false), heat("b", 2, 2024, true)];
        assert_eq!(current_heat(&heats).unwrap().id.as_str(), "b");
        assert!(current_heat(&heats[..1]).is_none());
    }

    #[test]
    fn next_heat_stays_in_year() {
        let heats = vec![
            heat("a", 1, 2024, true),
            heat("c", 3, 2024, false),
            heat("b", 2, 2024, false),
            heat("x", 2, 2025, false),
        ];
        let next = next_heat(&heats, &heats[0]).unwrap();
        assert_eq!(next.id.as_str(), "b");
        assert!(next_heat(&heats, &heats[1]).is_none());
    }
}
