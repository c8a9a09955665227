use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use hockey_pbp::{CanonicalizeOptions, Error, EventKind, League, canonicalize_game, validate};

fn read_fixture(name: &str) -> Value {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    serde_json::from_str(&raw).expect("fixture should be valid json")
}

fn canonicalize_fixture(nhlify: bool) -> Vec<hockey_pbp::CanonicalEvent> {
    let raw = read_fixture("ahl_statview.json");
    let opts = CanonicalizeOptions { nhlify };
    canonicalize_game(&raw, League::Ahl, 1028297, &opts).expect("fixture should canonicalize")
}

#[test]
fn scoring_shot_retypes_to_goal_without_losing_rows() {
    let rows = canonicalize_fixture(true);
    assert_eq!(rows.len(), 4);
    let goals: Vec<_> = rows.iter().filter(|r| r.event == EventKind::Goal).collect();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].players[0].as_ref().unwrap().id, Some(502));
    assert_eq!(goals[0].is_goal, Some(true));
}

#[test]
fn without_nhlify_scoring_shots_stay_shots() {
    let rows = canonicalize_fixture(false);
    assert!(rows.iter().all(|r| r.event != EventKind::Goal));
    assert_eq!(
        rows.iter().filter(|r| r.is_goal == Some(true)).count(),
        1
    );
}

#[test]
fn elapsed_time_comes_straight_from_the_feed_clock() {
    let rows = canonicalize_fixture(true);
    let elapsed: Vec<Option<i64>> = rows.iter().map(|r| r.elapsed_seconds).collect();
    assert_eq!(elapsed, vec![Some(0), Some(312), Some(1540), Some(2710)]);
    let periods: Vec<Option<u8>> = rows.iter().map(|r| r.period).collect();
    assert_eq!(periods, vec![Some(1), Some(1), Some(2), Some(3)]);
}

#[test]
fn pixel_coordinates_convert_to_feet() {
    let rows = canonicalize_fixture(true);
    let shot = &rows[1];
    assert_eq!(shot.x, Some(94.12));
    assert_eq!(shot.y, Some(31.88));
    assert_eq!(shot.x_norm, Some(94.12 - 100.0));
    let dist = shot.shot_distance_ft.expect("distance derived");
    let angle = shot.shot_angle_deg.expect("angle derived");
    assert!(dist > 0.0);
    assert!((0.0..=90.0).contains(&angle));
    // No attack mirroring in this frame: raw x stays put.
    assert_eq!(shot.x_location, Some(400.0));
}

#[test]
fn shot_quality_maps_to_codes() {
    let rows = canonicalize_fixture(true);
    let codes: Vec<Option<u8>> = rows.iter().map(|r| r.shot_quality_code).collect();
    assert_eq!(codes, vec![None, Some(2), Some(3), Some(1)]);
}

#[test]
fn goalie_swap_uses_participant_slots() {
    let rows = canonicalize_fixture(true);
    let change = rows
        .iter()
        .find(|r| r.event == EventKind::GoalieChange)
        .expect("goalie change present");
    assert_eq!(change.players[0].as_ref().unwrap().id, Some(450));
    assert_eq!(change.event_team_id, Some(330));
}

#[test]
fn feeds_without_side_indicator_keep_null_scores() {
    let rows = canonicalize_fixture(true);
    assert!(rows.iter().all(|r| r.score_home.is_none()));
    assert!(rows.iter().all(|r| r.score_away.is_none()));
}

#[test]
fn strict_contract_reports_what_these_feeds_cannot_fill() {
    let rows = canonicalize_fixture(true);
    let err = validate::check_contract(&rows).expect_err("statview output lacks contract columns");
    match err {
        Error::Validation { missing_columns } => {
            assert!(missing_columns.contains(&"event_team".to_string()));
            assert!(missing_columns.contains(&"score_home".to_string()));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn wrapped_payloads_are_rejected_for_this_family() {
    let raw: Value = serde_json::json!({"GC": {"Pxpverbose": []}});
    let err = canonicalize_game(&raw, League::Pwhl, 77, &CanonicalizeOptions::default());
    assert!(matches!(err, Err(Error::Parsing { game_id: 77, .. })));
}
