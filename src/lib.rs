//! Canonicalization engine for hockey play-by-play feeds.
//!
//! Five leagues publish events in two wire shapes: the verbose gc format
//! (QMJHL, OHL, WHL) and the statview format (AHL, PWHL). This crate turns
//! an already-decoded raw event payload for one game into a single ordered
//! schema with unified time/period semantics, rink-relative coordinates,
//! running scores, and optional NHL-style shot+goal merging. Fetching,
//! caching and batch orchestration live with the callers.

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

pub mod clock;
pub mod error;
pub mod event;
pub mod export;
pub mod league;
pub mod merge;
pub mod on_ice;
pub mod options;
mod pick;
pub mod pxp_verbose;
pub mod rink;
pub mod score;
pub mod statview;
pub mod validate;

pub use error::{Error, Result};
pub use event::{CanonicalEvent, EventKind, MAX_ON_ICE, Participant};
pub use league::{League, WireFamily};
pub use options::CanonicalizeOptions;

/// Run the full pipeline for one game: adapter, on-ice expansion, period
/// and clock normalization, canonical sort, coordinates, running scores,
/// and (when enabled) the shot+goal merge. All-or-nothing per game: an
/// adapter failure returns an error and no rows.
pub fn canonicalize_game(
    raw: &Value,
    league: League,
    game_id: i64,
    opts: &CanonicalizeOptions,
) -> Result<Vec<CanonicalEvent>> {
    let scraped_on = Utc::now();
    let mut rows = match league.wire_family() {
        WireFamily::GcVerbose => pxp_verbose::extract_events(raw, league, game_id, scraped_on)?,
        WireFamily::Statview => statview::extract_events(raw, league, game_id, scraped_on)?,
    };
    debug!(league = %league, game_id, rows = rows.len(), "extracted raw events");

    on_ice::expand_on_ice(&mut rows);
    clock::resolve_periods(&mut rows);
    clock::fill_missing_periods(&mut rows);
    clock::compute_elapsed(&mut rows);
    clock::sort_events(&mut rows);
    rink::normalize_coordinates(&mut rows);
    score::track_scores(&mut rows);
    if opts.nhlify {
        merge::nhlify(&mut rows);
    }

    debug!(league = %league, game_id, rows = rows.len(), "canonicalized game");
    Ok(rows)
}
