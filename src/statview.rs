//! Adapter for the statview feed (AHL, PWHL). Every raw event nests its
//! payload under a single `details` object with camelCase keys.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::event::{CanonicalEvent, EventKind, Participant};
use crate::league::League;
use crate::pick::{pick_bool, pick_f64, pick_i64, pick_str, sub_object};

static QUALITY_CODES: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    HashMap::from([
        ("Quality on net", 3),
        ("Standard", 2),
        ("Not on net", 1),
    ])
});

pub fn extract_events(
    raw: &Value,
    league: League,
    game_id: i64,
    scraped_on: DateTime<Utc>,
) -> Result<Vec<CanonicalEvent>> {
    let entries = raw.as_array().ok_or_else(|| {
        Error::parsing(league, game_id, "expected a top-level event array")
    })?;

    let rows = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| flatten_one(entry, league, game_id, idx, scraped_on))
        .collect();
    Ok(rows)
}

fn flatten_one(
    entry: &Value,
    league: League,
    game_id: i64,
    order_idx: usize,
    scraped_on: DateTime<Utc>,
) -> CanonicalEvent {
    let kind = EventKind::parse(&pick_str(entry, &["event"]).unwrap_or_default());
    let mut ev = CanonicalEvent::new(game_id, league, kind, order_idx, scraped_on);

    let Some(details) = sub_object(entry, "details") else {
        return ev;
    };

    // The feed defaults an id-less (or empty) period object to the first
    // period.
    if let Some(period) = details.get("period").filter(|v| v.is_object()) {
        ev.period_label = pick_str(period, &["id"]).or_else(|| Some("1".to_string()));
    }
    ev.elapsed_seconds = elapsed_of(details);
    ev.event_team_id = pick_i64(details, &["shooterTeamId", "team_id"]);
    ev.x_location = pick_f64(details, &["xLocation"]);
    ev.y_location = pick_f64(details, &["yLocation"]);
    ev.shot_type = pick_str(details, &["shotType"]);
    ev.shot_quality = pick_str(details, &["shotQuality"]);
    ev.shot_quality_code = ev
        .shot_quality
        .as_deref()
        .and_then(|text| QUALITY_CODES.get(text).copied());
    ev.is_goal = pick_bool(details, &["isGoal"]);

    if let Some(shooter) = participant(details, "shooter") {
        ev.players[0] = Some(shooter);
    }
    ev.goalie = participant(details, "goalie");
    if let Some(coming_in) = participant(details, "goalieComingIn") {
        ev.players[0] = Some(coming_in);
    }
    if let Some(going_out) = participant(details, "goalieGoingOut") {
        ev.players[1] = Some(going_out);
    }

    ev
}

/// `details.time` arrives either as a clock string ("13:42") or a bare
/// number of seconds.
fn elapsed_of(details: &Value) -> Option<i64> {
    if let Some(raw) = details.get("time") {
        if let Some(num) = raw.as_i64() {
            return Some(num);
        }
        if let Some(text) = raw.as_str() {
            return clock_to_seconds(text);
        }
    }
    None
}

fn clock_to_seconds(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once(':') {
        Some((minutes, seconds)) => {
            let m = minutes.trim().parse::<i64>().ok()?;
            let s = seconds.trim().parse::<i64>().ok()?;
            Some(m * 60 + s)
        }
        None => trimmed.parse::<i64>().ok(),
    }
}

fn participant(details: &Value, key: &str) -> Option<Participant> {
    let obj = sub_object(details, key)?;
    let p = Participant {
        id: pick_i64(obj, &["id"]),
        jersey_number: pick_i64(obj, &["jerseyNumber"]),
        first_name: pick_str(obj, &["firstName"]),
        last_name: pick_str(obj, &["lastName"]),
        team: None,
        team_id: None,
    };
    if p.is_empty() { None } else { Some(p) }
}
