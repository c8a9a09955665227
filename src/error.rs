use thiserror::Error;

use crate::league::League;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unsupported league: {0}")]
    UnsupportedLeague(String),

    #[error("{league} game {game_id}: unexpected feed shape: {reason}")]
    Parsing {
        league: League,
        game_id: i64,
        reason: String,
    },

    #[error("canonical output is missing required columns: {}", missing_columns.join(", "))]
    Validation { missing_columns: Vec<String> },
}

impl Error {
    pub(crate) fn parsing(league: League, game_id: i64, reason: impl Into<String>) -> Self {
        Error::Parsing {
            league,
            game_id,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
