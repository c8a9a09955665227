use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::league::League;

/// Hard cap on expanded on-ice slots per side (six attackers with the
/// goalie pulled is the most a feed can legitimately report).
pub const MAX_ON_ICE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    GoalieChange,
    Faceoff,
    Hit,
    Shot,
    PenaltyShot,
    Penalty,
    Goal,
    Shootout,
    Other(String),
}

impl EventKind {
    pub fn parse(raw: &str) -> EventKind {
        match raw.trim().to_lowercase().as_str() {
            "goalie_change" => EventKind::GoalieChange,
            "faceoff" => EventKind::Faceoff,
            "hit" => EventKind::Hit,
            "shot" => EventKind::Shot,
            "penaltyshot" => EventKind::PenaltyShot,
            "penalty" => EventKind::Penalty,
            "goal" => EventKind::Goal,
            "shootout" => EventKind::Shootout,
            other => EventKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::GoalieChange => "goalie_change",
            EventKind::Faceoff => "faceoff",
            EventKind::Hit => "hit",
            EventKind::Shot => "shot",
            EventKind::PenaltyShot => "penaltyshot",
            EventKind::Penalty => "penalty",
            EventKind::Goal => "goal",
            EventKind::Shootout => "shootout",
            EventKind::Other(name) => name,
        }
    }

    /// Shot-like rows are merge donors when a goal follows at the same time.
    pub fn is_shot_like(&self) -> bool {
        matches!(self, EventKind::Shot | EventKind::PenaltyShot)
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Participant {
    pub id: Option<i64>,
    pub jersey_number: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub team: Option<String>,
    pub team_id: Option<i64>,
}

impl Participant {
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.jersey_number.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.team.is_none()
            && self.team_id.is_none()
    }
}

/// One unified play-by-play row, independent of the source wire shape.
/// Fields a league never emits stay `None`; downstream consumers see the
/// same column superset for all five leagues.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalEvent {
    pub game_id: i64,
    pub league: League,
    pub event: EventKind,
    pub event_detail: Option<String>,

    pub period: Option<u8>,
    pub elapsed_seconds: Option<i64>,
    // Raw temporal inputs consumed by the clock stage.
    #[serde(skip)]
    pub period_label: Option<String>,
    #[serde(skip)]
    pub period_id: Option<u8>,
    #[serde(skip)]
    pub seconds_in_period: Option<i64>,

    pub event_team: Option<String>,
    pub event_team_id: Option<i64>,
    pub is_home: Option<bool>,

    pub players: [Option<Participant>; 3],
    pub goalie: Option<Participant>,

    // On-ice source lists (goal rows only) and their expanded slots.
    #[serde(skip)]
    pub plus_list: Option<Vec<Participant>>,
    #[serde(skip)]
    pub minus_list: Option<Vec<Participant>>,
    pub plus: [Option<Participant>; MAX_ON_ICE],
    pub minus: [Option<Participant>; MAX_ON_ICE],
    pub n_plus: Option<usize>,
    pub n_minus: Option<usize>,
    pub home_skaters: Option<usize>,
    pub away_skaters: Option<usize>,

    pub x_location: Option<f64>,
    pub y_location: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub x_norm: Option<f64>,
    pub y_norm: Option<f64>,
    pub shot_distance_ft: Option<f64>,
    pub shot_angle_deg: Option<f64>,

    pub shot_type: Option<String>,
    pub shot_quality: Option<String>,
    pub shot_quality_code: Option<u8>,
    pub goal_type: Option<String>,
    pub is_goal: Option<bool>,

    pub score_home: Option<u32>,
    pub score_away: Option<u32>,

    pub order_idx: usize,
    pub scraped_on: DateTime<Utc>,
}

impl CanonicalEvent {
    pub fn new(
        game_id: i64,
        league: League,
        event: EventKind,
        order_idx: usize,
        scraped_on: DateTime<Utc>,
    ) -> Self {
        CanonicalEvent {
            game_id,
            league,
            event,
            event_detail: None,
            period: None,
            elapsed_seconds: None,
            period_label: None,
            period_id: None,
            seconds_in_period: None,
            event_team: None,
            event_team_id: None,
            is_home: None,
            players: [None, None, None],
            goalie: None,
            plus_list: None,
            minus_list: None,
            plus: Default::default(),
            minus: Default::default(),
            n_plus: None,
            n_minus: None,
            home_skaters: None,
            away_skaters: None,
            x_location: None,
            y_location: None,
            x: None,
            y: None,
            x_norm: None,
            y_norm: None,
            shot_distance_ft: None,
            shot_angle_deg: None,
            shot_type: None,
            shot_quality: None,
            shot_quality_code: None,
            goal_type: None,
            is_goal: None,
            score_home: None,
            score_away: None,
            order_idx,
            scraped_on,
        }
    }
}
