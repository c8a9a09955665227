//! Adapter for the verbose gc feed (QMJHL, OHL, WHL). Each raw event is a
//! flat object whose participant sub-objects depend on the event type.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::event::{CanonicalEvent, EventKind, Participant};
use crate::league::League;
use crate::pick::{pick_f64, pick_i64, pick_str, sub_object};

pub fn extract_events(
    raw: &Value,
    league: League,
    game_id: i64,
    scraped_on: DateTime<Utc>,
) -> Result<Vec<CanonicalEvent>> {
    let entries = event_array(raw).ok_or_else(|| {
        Error::parsing(
            league,
            game_id,
            "expected an event array or a GC.Pxpverbose wrapper",
        )
    })?;

    let rows = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| extract_one(entry, league, game_id, idx, scraped_on))
        .collect();
    Ok(rows)
}

fn event_array(raw: &Value) -> Option<&Vec<Value>> {
    if let Some(list) = raw.as_array() {
        return Some(list);
    }
    raw.get("GC")?.get("Pxpverbose")?.as_array()
}

fn extract_one(
    entry: &Value,
    league: League,
    game_id: i64,
    order_idx: usize,
    scraped_on: DateTime<Utc>,
) -> CanonicalEvent {
    let kind = EventKind::parse(&pick_str(entry, &["event"]).unwrap_or_default());
    let mut ev = CanonicalEvent::new(game_id, league, kind, order_idx, scraped_on);

    ev.period_label = pick_str(entry, &["period"]);
    ev.period_id = pick_i64(entry, &["period_id"]).and_then(|p| u8::try_from(p).ok());
    ev.seconds_in_period = pick_i64(entry, &["s"]);
    ev.is_home = match pick_i64(entry, &["home"]) {
        Some(1) => Some(true),
        Some(0) => Some(false),
        _ => None,
    };
    ev.x_location = pick_f64(entry, &["x_location"]);
    ev.y_location = pick_f64(entry, &["y_location"]);
    ev.shot_type = pick_str(entry, &["shot_type"]);
    ev.goal_type = goal_type_of(entry);

    match ev.event.clone() {
        EventKind::GoalieChange => {
            ev.event_team = pick_str(entry, &["team_code"]);
            ev.event_team_id = pick_i64(entry, &["team_id"]);
            // A row can carry both ids during a swap; "out" wins.
            if pick_i64(entry, &["goalie_out_id"]).is_some() {
                ev.event_detail = Some("out".to_string());
                ev.players[0] = participant(entry, "goalie_out_info");
            } else if pick_i64(entry, &["goalie_in_id"]).is_some() {
                ev.event_detail = Some("in".to_string());
                ev.players[0] = participant(entry, "goalie_in_info");
            }
        }
        EventKind::Faceoff => {
            let home = participant(entry, "player_home");
            let visitor = participant(entry, "player_visitor");
            match pick_i64(entry, &["home_win"]) {
                Some(1) => {
                    ev.event_team = home.as_ref().and_then(|p| p.team.clone());
                    ev.event_team_id = home.as_ref().and_then(|p| p.team_id);
                    ev.players[0] = home;
                    ev.players[1] = visitor;
                }
                Some(0) => {
                    ev.event_team = visitor.as_ref().and_then(|p| p.team.clone());
                    ev.event_team_id = visitor.as_ref().and_then(|p| p.team_id);
                    ev.players[0] = visitor;
                    ev.players[1] = home;
                }
                _ => {}
            }
        }
        EventKind::Hit => {
            ev.players[0] = participant(entry, "hitter");
            ev.event_team = ev.players[0].as_ref().and_then(|p| p.team.clone());
            ev.event_team_id = ev.players[0].as_ref().and_then(|p| p.team_id);
        }
        EventKind::Shot | EventKind::PenaltyShot => {
            ev.players[0] = participant(entry, "player");
            ev.event_team = ev.players[0].as_ref().and_then(|p| p.team.clone());
            ev.event_team_id = ev.players[0].as_ref().and_then(|p| p.team_id);
            ev.goalie = participant(entry, "goalie");
        }
        EventKind::Penalty => {
            ev.players[0] = participant(entry, "player_penalized_info");
            ev.players[1] = participant(entry, "player_served_info");
            ev.event_team = ev.players[0].as_ref().and_then(|p| p.team.clone());
            ev.event_team_id = ev.players[0].as_ref().and_then(|p| p.team_id);
            // Penalty rows carry a free-text period ("2nd", "OT 1"); only
            // the leading digit run survives.
            ev.period_label = ev.period_label.as_deref().and_then(first_digit_run);
        }
        EventKind::Goal => {
            ev.players[0] = participant(entry, "goal_scorer");
            ev.players[1] = participant(entry, "assist1_player");
            ev.players[2] = participant(entry, "assist2_player");
            ev.event_team = ev.players[0].as_ref().and_then(|p| p.team.clone());
            ev.event_team_id = ev.players[0].as_ref().and_then(|p| p.team_id);
            ev.plus_list = participant_list(entry, "plus");
            ev.minus_list = participant_list(entry, "minus");
        }
        EventKind::Shootout => {
            ev.players[0] = participant(entry, "shooter");
            ev.event_team = ev.players[0].as_ref().and_then(|p| p.team.clone());
            ev.event_team_id = ev.players[0].as_ref().and_then(|p| p.team_id);
            ev.goalie = participant(entry, "goalie");
        }
        EventKind::Other(_) => {}
    }

    ev
}

fn participant(entry: &Value, key: &str) -> Option<Participant> {
    let obj = sub_object(entry, key)?;
    let p = Participant {
        id: pick_i64(obj, &["player_id"]),
        jersey_number: pick_i64(obj, &["jersey_number"]),
        first_name: pick_str(obj, &["first_name"]),
        last_name: pick_str(obj, &["last_name"]),
        team: pick_str(obj, &["team_code"]),
        team_id: pick_i64(obj, &["team_id"]),
    };
    if p.is_empty() { None } else { Some(p) }
}

fn participant_list(entry: &Value, key: &str) -> Option<Vec<Participant>> {
    let list = entry.get(key)?.as_array()?;
    Some(
        list.iter()
            .filter_map(|item| {
                let p = Participant {
                    id: pick_i64(item, &["player_id"]),
                    jersey_number: pick_i64(item, &["jersey_number"]),
                    first_name: pick_str(item, &["first_name"]),
                    last_name: pick_str(item, &["last_name"]),
                    team: pick_str(item, &["team_code"]),
                    team_id: pick_i64(item, &["team_id"]),
                };
                if p.is_empty() { None } else { Some(p) }
            })
            .collect(),
    )
}

fn goal_type_of(entry: &Value) -> Option<String> {
    let raw = entry.get("goal_type_name").or_else(|| entry.get("goal_type"))?;
    let text = raw.as_str()?.trim();
    Some(match text {
        "" => "EV".to_string(),
        "EN" => "EN.EV".to_string(),
        other => other.to_string(),
    })
}

fn first_digit_run(text: &str) -> Option<String> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let run: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Some(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(entries: serde_json::Value) -> Vec<CanonicalEvent> {
        extract_events(&entries, League::Qmjhl, 31171, Utc::now()).expect("array should parse")
    }

    #[test]
    fn rejects_payload_without_event_array() {
        let err = extract_events(&json!("jsonp junk"), League::Qmjhl, 1, Utc::now());
        assert!(matches!(err, Err(Error::Parsing { game_id: 1, .. })));
    }

    #[test]
    fn unwraps_gc_pxpverbose_object() {
        let raw = json!({"GC": {"Pxpverbose": [{"event": "hit"}]}});
        let rows = extract(raw);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].event, EventKind::Hit);
    }

    #[test]
    fn faceoff_winner_takes_slot_one() {
        let raw = json!([{
            "event": "faceoff",
            "home_win": "0",
            "player_home": {"player_id": 10, "team_code": "HOM", "team_id": 1},
            "player_visitor": {"player_id": 20, "team_code": "VIS", "team_id": 2}
        }]);
        let rows = extract(raw);
        let ev = &rows[0];
        assert_eq!(ev.event_team.as_deref(), Some("VIS"));
        assert_eq!(ev.players[0].as_ref().unwrap().id, Some(20));
        assert_eq!(ev.players[1].as_ref().unwrap().id, Some(10));
    }

    #[test]
    fn goalie_change_out_wins_over_in() {
        let raw = json!([{
            "event": "goalie_change",
            "team_code": "RIM",
            "team_id": 7,
            "goalie_in_id": 1,
            "goalie_out_id": 2,
            "goalie_in_info": {"player_id": 1, "last_name": "Arriving"},
            "goalie_out_info": {"player_id": 2, "last_name": "Leaving"}
        }]);
        let rows = extract(raw);
        let ev = &rows[0];
        assert_eq!(ev.event_detail.as_deref(), Some("out"));
        assert_eq!(ev.players[0].as_ref().unwrap().id, Some(2));
        assert_eq!(ev.event_team.as_deref(), Some("RIM"));
    }

    #[test]
    fn penalty_period_reduces_to_digits() {
        let raw = json!([{
            "event": "penalty",
            "period": "2nd period",
            "player_penalized_info": {"player_id": 3, "team_code": "VIS"}
        }]);
        let rows = extract(raw);
        assert_eq!(rows[0].period_label.as_deref(), Some("2"));
    }

    #[test]
    fn goal_collects_assists_and_on_ice_lists() {
        let raw = json!([{
            "event": "goal",
            "home": 1,
            "goal_type_name": "",
            "goal_scorer": {"player_id": 9, "team_code": "HOM", "team_id": 1},
            "assist1_player": {"player_id": 11},
            "assist2_player": {"player_id": 12},
            "plus": [{"player_id": 9}, {"player_id": 11}],
            "minus": [{"player_id": 21}]
        }]);
        let rows = extract(raw);
        let ev = &rows[0];
        assert_eq!(ev.players[0].as_ref().unwrap().id, Some(9));
        assert_eq!(ev.players[2].as_ref().unwrap().id, Some(12));
        assert_eq!(ev.plus_list.as_ref().unwrap().len(), 2);
        assert_eq!(ev.minus_list.as_ref().unwrap().len(), 1);
        assert_eq!(ev.goal_type.as_deref(), Some("EV"));
        assert_eq!(ev.is_home, Some(true));
    }

    #[test]
    fn empty_net_goal_type_normalizes() {
        let raw = json!([{
            "event": "goal",
            "goal_type_name": "EN",
            "goal_scorer": {"player_id": 5, "team_code": "CHI", "team_id": 2}
        }]);
        let rows = extract(raw);
        assert_eq!(rows[0].goal_type.as_deref(), Some("EN.EV"));
    }

    #[test]
    fn empty_sub_objects_stay_null() {
        let raw = json!([{"event": "shot", "player": {}, "goalie": ""}]);
        let rows = extract(raw);
        assert!(rows[0].players[0].is_none());
        assert!(rows[0].goalie.is_none());
        assert!(rows[0].event_team.is_none());
    }

    #[test]
    fn unknown_events_keep_scalars_only() {
        let raw = json!([{"event": "icing", "period": "3", "s": 100, "home": 0, "team_code": "X"}]);
        let rows = extract(raw);
        let ev = &rows[0];
        assert_eq!(ev.event, EventKind::Other("icing".to_string()));
        assert_eq!(ev.period_label.as_deref(), Some("3"));
        assert!(ev.event_team.is_none());
        assert_eq!(ev.is_home, Some(false));
    }
}
