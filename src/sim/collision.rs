//! Body-body collision detection and response
//!
//! Pairs are resolved sequentially with a mass-weighted impulse followed by a
//! positional correction that removes the overlap. Sequential resolution is not
//! commutative when three or more bodies touch at once, so the pair order is
//! fixed: `(i, j)` with `i < j` in the order the bodies are passed in.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::settings::PhysicsTuning;

/// Fraction of the relative speed turned into cosmetic spin on contact
const SPIN_TRANSFER: f64 = 0.1;

/// A resolved contact between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub a: u32,
    pub b: u32,
    /// Unit normal pointing from `a` toward `b`
    pub normal: DVec2,
    /// Penetration removed by the positional correction (0 inside the buffer zone)
    pub overlap: f64,
    /// Impulse scalar (per unit of the other body's mass)
    pub impulse: f64,
}

/// Resolve a single pair. Returns `None` if the bodies don't touch, are
/// coincident, or are already separating.
pub fn resolve_pair(a: &mut Body, b: &mut Body, tuning: &PhysicsTuning) -> Option<Contact> {
    let delta = b.pos - a.pos;
    let distance = delta.length();
    let contact_distance = a.radius + b.radius;

    // Coincident centers have no normal
    if distance == 0.0 || distance >= contact_distance + tuning.collision_buffer {
        return None;
    }

    let normal = delta / distance;
    let relative_vel = b.vel - a.vel;
    let dvn = relative_vel.dot(normal);

    // Already separating (resolved on an earlier tick)
    if dvn > 0.0 {
        return None;
    }

    let total_mass = a.mass + b.mass;
    let impulse = -(1.0 + tuning.restitution) * dvn / total_mass;
    let overlap = (contact_distance - distance).max(0.0);

    if impulse == 0.0 && overlap == 0.0 {
        return None;
    }

    a.vel -= normal * impulse * b.mass;
    b.vel += normal * impulse * a.mass;

    exchange_spin(a, b, relative_vel, normal);

    // Each body moves by the other's mass share, so the overlap is removed exactly
    let share = overlap / total_mass;
    a.pos -= normal * share * b.mass;
    b.pos += normal * share * a.mass;

    Some(Contact {
        a: a.id,
        b: b.id,
        normal,
        overlap,
        impulse,
    })
}

/// Resolve every unordered pair once, in stable input order
pub fn resolve_all(bodies: &mut [&mut Body], tuning: &PhysicsTuning) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut *head[i];
        if !a.active {
            continue;
        }
        for b in tail.iter_mut() {
            if !b.active {
                continue;
            }
            if let Some(contact) = resolve_pair(a, b, tuning) {
                contacts.push(contact);
            }
        }
    }

    contacts
}

/// Glancing hits spin the bodies in opposite directions
fn exchange_spin(a: &mut Body, b: &mut Body, relative_vel: DVec2, normal: DVec2) {
    let tangent = DVec2::new(-normal.y, normal.x);
    let side = relative_vel.dot(tangent);
    if side == 0.0 {
        return;
    }
    let kick = relative_vel.length() * SPIN_TRANSFER * side.signum();
    a.angular_vel += kick * 0.5;
    b.angular_vel -= kick * 0.5;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::board::Board;
    use crate::sim::body::PieceColor;
    use proptest::prelude::*;

    fn piece(id: u32, x: f64, y: f64) -> Body {
        Body::piece(id, DVec2::new(x, y), PieceColor::White, &Board::default())
    }

    #[test]
    fn test_head_on_equal_mass() {
        let tuning = PhysicsTuning::default();
        let mut a = piece(0, 100.0, 100.0);
        let mut b = piece(1, 129.0, 100.0);
        a.vel = DVec2::new(10.0, 0.0);

        let contact = resolve_pair(&mut a, &mut b, &tuning).unwrap();
        assert_eq!(contact.normal, DVec2::X);
        assert!((contact.overlap - 1.0).abs() < 1e-12);

        // e = 0.88: a keeps 6% of its speed, b takes 94%
        assert!((a.vel.x - 10.0 * (1.0 - RESTITUTION) / 2.0).abs() < 1e-9);
        assert!((b.vel.x - 10.0 * (1.0 + RESTITUTION) / 2.0).abs() < 1e-9);

        // Overlap fully removed
        assert!((b.pos.distance(a.pos) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_heavier_body_moves_less() {
        let tuning = PhysicsTuning::default();
        let board = Board::default();
        let mut striker = Body::striker(9, &board);
        striker.pos = DVec2::new(100.0, 100.0);
        let mut target = piece(0, 130.0, 100.0);

        resolve_pair(&mut striker, &mut target, &tuning).unwrap();
        // Stationary and overlapping: pure positional correction
        let striker_shift = 100.0 - striker.pos.x;
        let target_shift = target.pos.x - 130.0;
        assert!(striker_shift < target_shift);
        assert!((striker_shift + target_shift - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_separating_pair_skipped() {
        let tuning = PhysicsTuning::default();
        let mut a = piece(0, 100.0, 100.0);
        let mut b = piece(1, 125.0, 100.0);
        a.vel = DVec2::new(-3.0, 0.0);
        b.vel = DVec2::new(3.0, 0.0);

        assert!(resolve_pair(&mut a, &mut b, &tuning).is_none());
        assert_eq!(a.pos.x, 100.0);
        assert_eq!(b.vel.x, 3.0);
    }

    #[test]
    fn test_coincident_centers_skipped() {
        let tuning = PhysicsTuning::default();
        let mut a = piece(0, 100.0, 100.0);
        let mut b = piece(1, 100.0, 100.0);
        a.vel = DVec2::new(5.0, 0.0);

        assert!(resolve_pair(&mut a, &mut b, &tuning).is_none());
        assert!(a.pos.is_finite() && b.pos.is_finite());
    }

    #[test]
    fn test_buffer_zone_approach_transfers_without_pushing() {
        let tuning = PhysicsTuning::default();
        // 31 apart: outside contact (30) but inside the buffer (32)
        let mut a = piece(0, 100.0, 100.0);
        let mut b = piece(1, 131.0, 100.0);
        a.vel = DVec2::new(4.0, 0.0);

        let contact = resolve_pair(&mut a, &mut b, &tuning).unwrap();
        assert_eq!(contact.overlap, 0.0);
        assert!(b.vel.x > 0.0);
        assert_eq!(b.pos.x, 131.0);
    }

    #[test]
    fn test_far_apart_no_contact() {
        let tuning = PhysicsTuning::default();
        let mut a = piece(0, 100.0, 100.0);
        let mut b = piece(1, 200.0, 100.0);
        a.vel = DVec2::new(10.0, 0.0);
        assert!(resolve_pair(&mut a, &mut b, &tuning).is_none());
    }

    #[test]
    fn test_resolve_all_skips_inactive_and_keeps_order() {
        let tuning = PhysicsTuning::default();
        let mut bodies = vec![
            piece(0, 100.0, 100.0),
            piece(1, 128.0, 100.0),
            piece(2, 100.0, 128.0),
        ];
        bodies[0].vel = DVec2::new(2.0, 2.0);
        bodies[2].active = false;

        let mut refs: Vec<&mut Body> = bodies.iter_mut().collect();
        let contacts = resolve_all(&mut refs, &tuning);
        assert_eq!(contacts.len(), 1);
        assert_eq!((contacts[0].a, contacts[0].b), (0, 1));
        assert_eq!(bodies[2].pos, DVec2::new(100.0, 128.0));
    }

    fn mass_strategy() -> impl Strategy<Value = f64> {
        prop_oneof![Just(PIECE_MASS), Just(QUEEN_MASS), Just(STRIKER_MASS)]
    }

    proptest! {
        #[test]
        fn prop_momentum_conserved(
            angle in 0.0f64..std::f64::consts::TAU,
            gap in 1.0f64..31.0,
            v1 in (-30.0f64..30.0, -30.0f64..30.0),
            v2 in (-30.0f64..30.0, -30.0f64..30.0),
            m1 in mass_strategy(),
            m2 in mass_strategy(),
        ) {
            let tuning = PhysicsTuning::default();
            let mut a = piece(0, 400.0, 400.0);
            let mut b = piece(1, 400.0 + gap * angle.cos(), 400.0 + gap * angle.sin());
            a.mass = m1;
            b.mass = m2;
            a.vel = DVec2::new(v1.0, v1.1);
            b.vel = DVec2::new(v2.0, v2.1);

            let before = a.momentum() + b.momentum();
            resolve_pair(&mut a, &mut b, &tuning);
            let after = a.momentum() + b.momentum();

            prop_assert!((before - after).length() < 1e-9);
        }

        #[test]
        fn prop_energy_never_increases(
            angle in 0.0f64..std::f64::consts::TAU,
            gap in 1.0f64..31.0,
            v1 in (-30.0f64..30.0, -30.0f64..30.0),
            v2 in (-30.0f64..30.0, -30.0f64..30.0),
            m1 in mass_strategy(),
            m2 in mass_strategy(),
        ) {
            let tuning = PhysicsTuning::default();
            let mut a = piece(0, 400.0, 400.0);
            let mut b = piece(1, 400.0 + gap * angle.cos(), 400.0 + gap * angle.sin());
            a.mass = m1;
            b.mass = m2;
            a.vel = DVec2::new(v1.0, v1.1);
            b.vel = DVec2::new(v2.0, v2.1);

            let before = a.kinetic_energy() + b.kinetic_energy();
            resolve_pair(&mut a, &mut b, &tuning);
            let after = a.kinetic_energy() + b.kinetic_energy();

            prop_assert!(after <= before + 1e-9);
        }

        #[test]
        fn prop_resolved_pair_not_interpenetrating(
            angle in 0.0f64..std::f64::consts::TAU,
            gap in 1.0f64..29.0,
            v1 in (-30.0f64..30.0, -30.0f64..30.0),
        ) {
            let tuning = PhysicsTuning::default();
            let mut a = piece(0, 400.0, 400.0);
            let mut b = piece(1, 400.0 + gap * angle.cos(), 400.0 + gap * angle.sin());
            a.vel = DVec2::new(v1.0, v1.1);

            if resolve_pair(&mut a, &mut b, &tuning).is_some() {
                prop_assert!(a.pos.distance(b.pos) >= a.radius + b.radius - 1e-9);
            }
        }
    }
}
