//! The "nhlify" step: collapse a shot row immediately followed by a goal
//! row at the same timestamp into one goal row, NHL-style. Statview games
//! that never emit distinct goal rows instead retype their scoring shots
//! in place.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::event::{CanonicalEvent, EventKind, Participant};
use crate::league::WireFamily;

pub fn nhlify(rows: &mut Vec<CanonicalEvent>) {
    retype_undeclared_goals(rows);

    let donors = find_donors(rows);
    if donors.is_empty() {
        return;
    }
    debug!(merged = donors.len(), "absorbing shot rows into goal rows");

    for &idx in &donors {
        let (left, right) = rows.split_at_mut(idx + 1);
        merge_missing(&mut right[0], &left[idx]);
    }

    let donor_set: HashSet<usize> = donors.into_iter().collect();
    let mut idx = 0;
    rows.retain(|_| {
        let keep = !donor_set.contains(&idx);
        idx += 1;
        keep
    });
    for (new_idx, ev) in rows.iter_mut().enumerate() {
        ev.order_idx = new_idx;
    }
}

/// Statview leagues may flag goals on the shot row instead of emitting a
/// separate goal event; only games with no goal rows at all get retyped.
fn retype_undeclared_goals(rows: &mut [CanonicalEvent]) {
    let mut has_goal_rows: HashMap<i64, bool> = HashMap::new();
    for ev in rows.iter() {
        if ev.league.wire_family() != WireFamily::Statview {
            continue;
        }
        let entry = has_goal_rows.entry(ev.game_id).or_insert(false);
        if ev.event == EventKind::Goal {
            *entry = true;
        }
    }

    for ev in rows.iter_mut() {
        if ev.league.wire_family() == WireFamily::Statview
            && ev.is_goal == Some(true)
            && !has_goal_rows.get(&ev.game_id).copied().unwrap_or(false)
        {
            ev.event = EventKind::Goal;
        }
    }
}

/// Donor indices on the sorted frame: a shot-like row whose immediate
/// successor is a goal in the same game at the same (known) elapsed time.
/// Computed before any deletion, so each donor feeds exactly one goal and
/// merges never cascade.
fn find_donors(rows: &[CanonicalEvent]) -> Vec<usize> {
    let mut donors = Vec::new();
    for idx in 0..rows.len().saturating_sub(1) {
        let donor = &rows[idx];
        let goal = &rows[idx + 1];
        if donor.game_id == goal.game_id
            && donor.event.is_shot_like()
            && goal.event == EventKind::Goal
            && donor.elapsed_seconds.is_some()
            && donor.elapsed_seconds == goal.elapsed_seconds
        {
            donors.push(idx);
        }
    }
    donors
}

/// Copy every scalar the goal row is missing from the donor shot row.
/// The on-ice list fields are goal-only and skipped outright.
fn merge_missing(goal: &mut CanonicalEvent, donor: &CanonicalEvent) {
    fill(&mut goal.event_detail, &donor.event_detail);
    fill(&mut goal.period, &donor.period);
    fill(&mut goal.seconds_in_period, &donor.seconds_in_period);
    fill(&mut goal.event_team, &donor.event_team);
    fill(&mut goal.event_team_id, &donor.event_team_id);
    fill(&mut goal.is_home, &donor.is_home);
    for slot in 0..goal.players.len() {
        fill_participant(&mut goal.players[slot], &donor.players[slot]);
    }
    fill_participant(&mut goal.goalie, &donor.goalie);
    fill(&mut goal.n_plus, &donor.n_plus);
    fill(&mut goal.n_minus, &donor.n_minus);
    fill(&mut goal.home_skaters, &donor.home_skaters);
    fill(&mut goal.away_skaters, &donor.away_skaters);
    fill(&mut goal.x_location, &donor.x_location);
    fill(&mut goal.y_location, &donor.y_location);
    fill(&mut goal.x, &donor.x);
    fill(&mut goal.y, &donor.y);
    fill(&mut goal.x_norm, &donor.x_norm);
    fill(&mut goal.y_norm, &donor.y_norm);
    fill(&mut goal.shot_distance_ft, &donor.shot_distance_ft);
    fill(&mut goal.shot_angle_deg, &donor.shot_angle_deg);
    fill(&mut goal.shot_type, &donor.shot_type);
    fill(&mut goal.shot_quality, &donor.shot_quality);
    fill(&mut goal.shot_quality_code, &donor.shot_quality_code);
    fill(&mut goal.goal_type, &donor.goal_type);
    fill(&mut goal.is_goal, &donor.is_goal);
    fill(&mut goal.score_home, &donor.score_home);
    fill(&mut goal.score_away, &donor.score_away);
}

fn fill<T: Clone>(dst: &mut Option<T>, src: &Option<T>) {
    if dst.is_none() && src.is_some() {
        *dst = src.clone();
    }
}

fn fill_participant(dst: &mut Option<Participant>, src: &Option<Participant>) {
    match (dst.as_mut(), src.as_ref()) {
        (None, Some(participant)) => *dst = Some(participant.clone()),
        (Some(d), Some(s)) => {
            fill(&mut d.id, &s.id);
            fill(&mut d.jersey_number, &s.jersey_number);
            fill(&mut d.first_name, &s.first_name);
            fill(&mut d.last_name, &s.last_name);
            fill(&mut d.team, &s.team);
            fill(&mut d.team_id, &s.team_id);
        }
        _ => {}
    }
}
