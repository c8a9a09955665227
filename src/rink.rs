//! Maps raw per-league coordinates into one rink-relative frame and
//! derives shot distance and angle. Null inputs stay null throughout.

use crate::event::CanonicalEvent;
use crate::league::WireFamily;

pub fn normalize_coordinates(rows: &mut [CanonicalEvent]) {
    for ev in rows.iter_mut() {
        match ev.league.wire_family() {
            WireFamily::GcVerbose => half_rink(ev),
            WireFamily::Statview => pixel_rink(ev),
        }
    }
}

/// Verbose feeds report a 600x300-unit half-rink plane. Home events mirror
/// x so the attacking direction always increases, then the frame converts
/// to feet around rink center; distance and angle are relative to the
/// attacking goal at (600, 150) in the mirrored frame.
fn half_rink(ev: &mut CanonicalEvent) {
    if let Some(x_raw) = ev.x_location {
        let x_norm = if ev.is_home == Some(true) {
            600.0 - x_raw
        } else {
            x_raw
        };
        ev.x_norm = Some(x_norm);
        ev.x = Some((x_norm - 300.0) / 3.0);
    }
    if let Some(y_raw) = ev.y_location {
        ev.y_norm = Some(y_raw);
        ev.y = Some((y_raw - 150.0) / 3.0);
    }
    if let (Some(x_norm), Some(y_norm)) = (ev.x_norm, ev.y_norm) {
        let dx = 600.0 - x_norm;
        let dy = 150.0 - y_norm;
        ev.shot_distance_ft = Some(dx.hypot(dy) / 3.0);
        ev.shot_angle_deg = Some(dy.atan2(dx).to_degrees().abs());
    }
}

/// Statview feeds report pixels on a ~850x400 canvas covering the full
/// 200x85 ft rink, with no attack-direction mirroring; normalized
/// coordinates are offset from rink center before deriving distance and
/// angle. Outputs keep the feed's two-decimal precision.
fn pixel_rink(ev: &mut CanonicalEvent) {
    if let Some(x_px) = ev.x_location {
        let x = round2(x_px / 850.0 * 200.0);
        ev.x = Some(x);
        ev.x_norm = Some(x - 100.0);
    }
    if let Some(y_px) = ev.y_location {
        let y = round2(y_px / 400.0 * 85.0);
        ev.y = Some(y);
        ev.y_norm = Some(y - 42.5);
    }
    if let (Some(x_norm), Some(y_norm)) = (ev.x_norm, ev.y_norm) {
        ev.shot_distance_ft = Some(round2(x_norm.hypot(y_norm)));
        ev.shot_angle_deg = Some(round2(y_norm.abs().atan2(x_norm.abs()).to_degrees()));
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
