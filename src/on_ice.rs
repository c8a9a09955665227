//! Expands the on-ice participant lists goal rows carry into the fixed
//! per-side slot arrays, and derives the skater counts from them.

use tracing::warn;

use crate::event::{CanonicalEvent, MAX_ON_ICE, Participant};

pub fn expand_on_ice(rows: &mut [CanonicalEvent]) {
    for ev in rows.iter_mut() {
        expand_row(ev);
    }
}

/// Rows without either source list are untouched, so re-running the
/// expansion is a no-op.
fn expand_row(ev: &mut CanonicalEvent) {
    let n_plus = ev.plus_list.as_ref().map(Vec::len);
    let n_minus = ev.minus_list.as_ref().map(Vec::len);
    if n_plus.is_none() && n_minus.is_none() {
        return;
    }

    ev.n_plus = n_plus;
    ev.n_minus = n_minus;
    // The scoring side's count belongs to the event's own side; with an
    // unknown side the defending count is all that can be attributed.
    ev.home_skaters = if ev.is_home == Some(true) && n_plus.is_some() && n_minus.is_some() {
        n_plus
    } else {
        n_minus
    };
    ev.away_skaters = if ev.is_home == Some(false) && n_plus.is_some() && n_minus.is_some() {
        n_plus
    } else {
        n_minus
    };

    fill_slots(
        ev.plus_list.as_deref(),
        &mut ev.plus,
        ev.game_id,
        "plus",
    );
    fill_slots(
        ev.minus_list.as_deref(),
        &mut ev.minus,
        ev.game_id,
        "minus",
    );
}

fn fill_slots(
    list: Option<&[Participant]>,
    slots: &mut [Option<Participant>; MAX_ON_ICE],
    game_id: i64,
    side: &str,
) {
    let Some(list) = list else {
        return;
    };
    if list.len() > MAX_ON_ICE {
        warn!(
            game_id,
            side,
            reported = list.len(),
            kept = MAX_ON_ICE,
            "on-ice list exceeds slot capacity; extra entries dropped"
        );
    }
    for (slot, participant) in slots.iter_mut().zip(list.iter()) {
        *slot = Some(participant.clone());
    }
}
