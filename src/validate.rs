//! Strict contract check for canonical output. Collaborators that feed
//! downstream analytics opt into this; the pipeline itself never calls it.

use crate::error::{Error, Result};
use crate::event::CanonicalEvent;

/// Columns downstream consumers assume are present in the output.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "event",
    "event_team",
    "x",
    "y",
    "period",
    "elapsed_seconds",
    "score_home",
    "score_away",
];

/// A required column counts as missing when no row in the slice carries a
/// value for it, the typed analog of an absent column.
pub fn check_contract(rows: &[CanonicalEvent]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !column_populated(rows, col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation {
            missing_columns: missing,
        })
    }
}

fn column_populated(rows: &[CanonicalEvent], column: &str) -> bool {
    match column {
        "event" => true,
        "event_team" => rows.iter().any(|r| r.event_team.is_some()),
        "x" => rows.iter().any(|r| r.x.is_some()),
        "y" => rows.iter().any(|r| r.y.is_some()),
        "period" => rows.iter().any(|r| r.period.is_some()),
        "elapsed_seconds" => rows.iter().any(|r| r.elapsed_seconds.is_some()),
        "score_home" => rows.iter().any(|r| r.score_home.is_some()),
        "score_away" => rows.iter().any(|r| r.score_away.is_some()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::league::League;
    use chrono::Utc;

    #[test]
    fn empty_output_is_vacuously_valid() {
        assert!(check_contract(&[]).is_ok());
    }

    #[test]
    fn reports_wholly_absent_columns() {
        let mut ev = CanonicalEvent::new(1, League::Qmjhl, EventKind::Shot, 0, Utc::now());
        ev.event_team = Some("RIM".to_string());
        ev.period = Some(1);
        ev.elapsed_seconds = Some(12);
        let err = check_contract(&[ev]).unwrap_err();
        match err {
            Error::Validation { missing_columns } => {
                assert_eq!(missing_columns, vec!["x", "y", "score_home", "score_away"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn one_populated_row_satisfies_a_column() {
        let mut a = CanonicalEvent::new(1, League::Qmjhl, EventKind::Shot, 0, Utc::now());
        a.event_team = Some("RIM".to_string());
        a.period = Some(1);
        a.elapsed_seconds = Some(12);
        a.x = Some(1.0);
        a.y = Some(2.0);
        a.score_home = Some(0);
        a.score_away = Some(0);
        let b = CanonicalEvent::new(1, League::Qmjhl, EventKind::Faceoff, 1, Utc::now());
        assert!(check_contract(&[a, b]).is_ok());
    }
}
