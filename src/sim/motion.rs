//! Motion integration
//!
//! One tick per body: friction decay, rest zeroing, explicit Euler step,
//! wall reflection, then the pocket capture test. Inactive bodies are skipped.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::body::{Body, BodyKind};
use crate::consts::SPIN_REST_THRESHOLD;
use crate::settings::PhysicsTuning;

/// Spin retained after hitting a cushion
const WALL_SPIN_DAMPING: f64 = 0.7;

/// A body captured by a pocket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub body_id: u32,
    pub kind: BodyKind,
    /// Index into `Board::pockets()`
    pub pocket: usize,
}

/// What happened to a single body during one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepResult {
    pub bounced: bool,
    pub pocket: Option<usize>,
}

/// Everything the integrator observed in one tick, in body order
#[derive(Debug, Clone, Default)]
pub struct MotionReport {
    pub captures: Vec<Capture>,
    pub bounces: Vec<u32>,
}

/// Advance one body by one tick
pub fn step_body(body: &mut Body, board: &Board, tuning: &PhysicsTuning) -> StepResult {
    if !body.active {
        return StepResult::default();
    }

    update_spin(body, tuning);

    body.vel *= tuning.friction;
    if body.vel.x.abs() < tuning.rest_threshold {
        body.vel.x = 0.0;
    }
    if body.vel.y.abs() < tuning.rest_threshold {
        body.vel.y = 0.0;
    }

    body.pos += body.vel;

    let bounced = reflect_off_walls(body, board, tuning.restitution);
    if bounced {
        body.angular_vel *= WALL_SPIN_DAMPING;
    }

    // First pocket wins; a captured body is never tested again
    let pocket = board.pocket_at(body.pos);
    if pocket.is_some() {
        body.active = false;
        body.vel = DVec2::ZERO;
        body.angular_vel = 0.0;
    }

    StepResult { bounced, pocket }
}

/// Advance every body in iteration order and collect captures and bounces
pub fn advance<'a>(
    bodies: impl IntoIterator<Item = &'a mut Body>,
    board: &Board,
    tuning: &PhysicsTuning,
) -> MotionReport {
    let mut report = MotionReport::default();
    for body in bodies {
        let step = step_body(body, board, tuning);
        if step.bounced {
            report.bounces.push(body.id);
        }
        if let Some(pocket) = step.pocket {
            log::debug!("{:?} #{} captured by pocket {}", body.kind, body.id, pocket);
            report.captures.push(Capture {
                body_id: body.id,
                kind: body.kind,
                pocket,
            });
        }
    }
    report
}

/// Clamp the body inside the playing surface, bouncing off any wall it crossed.
/// Returns true if at least one wall was hit.
fn reflect_off_walls(body: &mut Body, board: &Board, restitution: f64) -> bool {
    let lo = board.inner_min() + body.radius;
    let hi = board.inner_max() - body.radius;
    let mut bounced = false;

    if body.pos.x < lo {
        body.pos.x = lo;
        body.vel.x *= -restitution;
        bounced = true;
    }
    if body.pos.x > hi {
        body.pos.x = hi;
        body.vel.x *= -restitution;
        bounced = true;
    }
    if body.pos.y < lo {
        body.pos.y = lo;
        body.vel.y *= -restitution;
        bounced = true;
    }
    if body.pos.y > hi {
        body.pos.y = hi;
        body.vel.y *= -restitution;
        bounced = true;
    }

    bounced
}

/// Rolling spin follows linear speed and decays with friction
fn update_spin(body: &mut Body, tuning: &PhysicsTuning) {
    let speed = body.vel.length();
    if speed > tuning.rest_threshold {
        body.angular_vel = speed / body.radius * 0.5;
    }
    body.angular_vel *= tuning.friction;
    body.rotation += body.angular_vel;
    if body.angular_vel.abs() < SPIN_REST_THRESHOLD {
        body.angular_vel = 0.0;
    }
}

/// True if any active body is still moving
pub fn any_moving<'a>(bodies: impl IntoIterator<Item = &'a Body>, rest_threshold: f64) -> bool {
    bodies
        .into_iter()
        .any(|b| b.active && b.is_moving(rest_threshold))
}
