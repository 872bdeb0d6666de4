//! Pull-back aiming
//!
//! The player drags away from the striker and releases; the striker fires in
//! the opposite direction. Power depends on how far the pull went relative to
//! a maximum that grows as the pull tilts away from vertical, so sideways
//! shots need a longer drag for full power.

use glam::DVec2;

use crate::consts::MIN_PULL_DISTANCE;

/// Max pull distance as a fraction of board size, straight down
const STRAIGHT_PULL_FRACTION: f64 = 0.13;
/// Extra fraction added for a fully sideways pull
const SIDEWAYS_PULL_EXTRA: f64 = 0.22;

/// Aim power in percent (0-100) for a pull-back point, or `None` if the pull
/// is too short to fire
pub fn aim_power(striker: DVec2, pull_point: DVec2, board_size: f64) -> Option<f64> {
    let pull = pull_point - striker;
    let distance = pull.length();
    if !(distance > MIN_PULL_DISTANCE) {
        return None;
    }

    // 0 for a vertical pull, π/2 for a horizontal one
    let tilt = pull.x.abs().atan2(pull.y.abs());
    let fraction =
        STRAIGHT_PULL_FRACTION + (tilt / std::f64::consts::FRAC_PI_2) * SIDEWAYS_PULL_EXTRA;
    let max_pull = board_size * fraction;

    Some((distance / max_pull * 100.0).min(100.0))
}

/// Integer percentage for display
pub fn power_percent(striker: DVec2, pull_point: DVec2, board_size: f64) -> Option<u8> {
    aim_power(striker, pull_point, board_size).map(|p| p.floor() as u8)
}

/// Launch velocity for a release at `pull_point`
pub fn strike_velocity(
    striker: DVec2,
    pull_point: DVec2,
    board_size: f64,
    max_speed: f64,
) -> Option<DVec2> {
    let power = aim_power(striker, pull_point, board_size)?;
    let direction = (striker - pull_point).normalize_or_zero();
    Some(direction * (power / 100.0) * max_speed)
}

/// Clamp a requested striker x onto the allowed baseline span.
///
/// An empty span (`lo > hi`, tiny boards) pins the striker to its midpoint.
pub fn clamp_placement(x: f64, range: (f64, f64)) -> f64 {
    let (lo, hi) = range;
    if x.is_nan() || !(lo <= hi) {
        return (lo + hi) / 2.0;
    }
    x.clamp(lo, hi)
}
