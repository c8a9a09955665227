//! Period resolution, gap filling, absolute elapsed time, and the
//! canonical sort order.

use std::cmp::Ordering;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::event::{CanonicalEvent, EventKind};

/// Overtime labels map monotonically onto periods 4..=12.
static OT_PERIODS: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    HashMap::from([
        ("1st OT", 4),
        ("2nd OT", 5),
        ("3rd OT", 6),
        ("4th OT", 7),
        ("5th OT", 8),
        ("6th OT", 9),
        ("7th OT", 10),
        ("8th OT", 11),
        ("9th OT", 12),
    ])
});

const REGULATION_PERIOD_SECS: i64 = 20 * 60;

/// Resolve each row's period from its raw label, falling back to the
/// feed's numeric period id only when the label is absent entirely.
/// Unparseable labels coerce to null.
pub fn resolve_periods(rows: &mut [CanonicalEvent]) {
    for ev in rows.iter_mut() {
        ev.period = match ev.period_label.as_deref() {
            Some(label) => parse_period_label(label),
            None => ev.period_id,
        };
    }
}

fn parse_period_label(label: &str) -> Option<u8> {
    let trimmed = label.trim();
    if let Some(period) = OT_PERIODS.get(trimmed) {
        return Some(*period);
    }
    if let Ok(period) = trimmed.parse::<u8>() {
        return Some(period);
    }
    // Feeds occasionally emit floats ("2.0").
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0 && *f <= f64::from(u8::MAX))
        .map(|f| f as u8)
}

/// Forward-fill null periods from the previous event in the same game,
/// then backward-fill leading gaps. Shootout rows neither receive nor
/// donate fill values. Residual nulls stay null and are flagged; guessing
/// a shootout sentinel here would mislabel genuinely unresolvable gaps.
pub fn fill_missing_periods(rows: &mut [CanonicalEvent]) {
    let mut last_seen: HashMap<i64, u8> = HashMap::new();
    for ev in rows.iter_mut() {
        if ev.event == EventKind::Shootout {
            continue;
        }
        match ev.period {
            Some(period) => {
                last_seen.insert(ev.game_id, period);
            }
            None => {
                if let Some(period) = last_seen.get(&ev.game_id) {
                    ev.period = Some(*period);
                }
            }
        }
    }

    let mut next_seen: HashMap<i64, u8> = HashMap::new();
    for ev in rows.iter_mut().rev() {
        if ev.event == EventKind::Shootout {
            continue;
        }
        match ev.period {
            Some(period) => {
                next_seen.insert(ev.game_id, period);
            }
            None => {
                if let Some(period) = next_seen.get(&ev.game_id) {
                    ev.period = Some(*period);
                }
            }
        }
    }

    let mut unresolved: HashMap<i64, usize> = HashMap::new();
    for ev in rows.iter() {
        if ev.event != EventKind::Shootout && ev.period.is_none() {
            *unresolved.entry(ev.game_id).or_insert(0) += 1;
        }
    }
    for (game_id, count) in unresolved {
        warn!(game_id, rows = count, "period unresolved after gap filling; left null");
    }
}

/// Absolute elapsed seconds for rows that report seconds-within-period.
/// The period offset clips at the fourth-period boundary so deep overtime
/// does not inflate it. Rows that arrived with elapsed time keep it.
pub fn compute_elapsed(rows: &mut [CanonicalEvent]) {
    for ev in rows.iter_mut() {
        if ev.elapsed_seconds.is_some() {
            continue;
        }
        if let (Some(period), Some(secs)) = (ev.period, ev.seconds_in_period) {
            let offset = i64::from(period.saturating_sub(1)).min(4);
            ev.elapsed_seconds = Some(secs + offset * REGULATION_PERIOD_SECS);
        }
    }
}

/// Stable canonical sort: `(game_id, elapsed_seconds, order_idx)`, rows
/// without elapsed time last within their game.
pub fn sort_events(rows: &mut [CanonicalEvent]) {
    rows.sort_by(|a, b| {
        a.game_id
            .cmp(&b.game_id)
            .then_with(|| cmp_elapsed(a.elapsed_seconds, b.elapsed_seconds))
            .then_with(|| a.order_idx.cmp(&b.order_idx))
    });
}

fn cmp_elapsed(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
