//! Running per-team score as of each event, computed over the already
//! sorted, pre-merge sequence so a goal's own snapshot counts itself.

use std::collections::{HashMap, HashSet};

use crate::event::{CanonicalEvent, EventKind};

pub fn track_scores(rows: &mut [CanonicalEvent]) {
    // Feeds without a home/away indicator cannot attribute goals; their
    // games keep null scores instead of a fabricated 0-0.
    let tracked: HashSet<i64> = rows
        .iter()
        .filter(|ev| ev.is_home.is_some())
        .map(|ev| ev.game_id)
        .collect();

    let mut totals: HashMap<i64, (u32, u32)> = HashMap::new();
    for ev in rows.iter_mut() {
        if !tracked.contains(&ev.game_id) {
            continue;
        }
        let (home, away) = totals.entry(ev.game_id).or_insert((0, 0));
        if ev.event == EventKind::Goal {
            match ev.is_home {
                Some(true) => *home += 1,
                Some(false) => *away += 1,
                None => {}
            }
        }
        ev.score_home = Some(*home);
        ev.score_away = Some(*away);
    }
}
