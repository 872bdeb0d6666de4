//! Simulation tick and shot commands
//!
//! Per tick: integrate every active body (with pocket tests), then resolve all
//! active pairs, then check whether the shot in flight has settled.

use glam::DVec2;

use super::aim;
use super::body::Body;
use super::collision::resolve_all;
use super::motion::{advance, any_moving};
use super::rules::resolve_shot;
use super::state::{GameEvent, ShotPhase, SimulationContext};

/// Commands for a single tick, all optional
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Slide the striker along the baseline (board x coordinate)
    pub place_striker_x: Option<f64>,
    /// Current pull-back point (starts or updates aiming)
    pub aim_point: Option<DVec2>,
    /// Release the pull-back and fire
    pub release: bool,
    /// Drop the current aim without firing
    pub cancel_aim: bool,
    /// Fire with an explicit velocity, bypassing aiming
    pub launch: Option<DVec2>,
    /// Start the round over
    pub reset: bool,
}

/// Apply the tick's commands, then advance the simulation by one step
pub fn tick(ctx: &mut SimulationContext, input: &TickInput) {
    if input.reset {
        ctx.reset_round();
    }
    if let Some(x) = input.place_striker_x {
        ctx.place_striker(x);
    }
    if input.cancel_aim {
        ctx.cancel_aim();
    }
    if let Some(point) = input.aim_point {
        ctx.aim_at(point);
    }
    if input.release {
        ctx.release();
    }
    if let Some(velocity) = input.launch {
        ctx.launch_striker(velocity.x, velocity.y);
    }

    ctx.tick();
}

impl SimulationContext {
    /// True while the striker can be placed, aimed, or launched
    fn accepts_shot_commands(&self) -> bool {
        !self.match_state.shot_in_progress
            && matches!(self.phase, ShotPhase::Idle | ShotPhase::Aiming)
    }

    /// Fire the striker. Ignored while a shot is in flight or the round is
    /// over. Non-finite vectors and vectors too slow to move are rejected;
    /// anything faster than the strike limit is scaled down to it.
    pub fn launch_striker(&mut self, vx: f64, vy: f64) -> bool {
        if !self.accepts_shot_commands() {
            log::debug!("Launch ignored in phase {:?}", self.phase);
            return false;
        }

        let mut velocity = DVec2::new(vx, vy);
        if !velocity.is_finite() {
            log::warn!("Rejected non-finite launch ({}, {})", vx, vy);
            return false;
        }

        let speed = velocity.length();
        if speed <= self.tuning.rest_threshold {
            log::debug!("Launch too slow to move ({:.3})", speed);
            return false;
        }
        if speed > self.tuning.max_strike_speed {
            velocity *= self.tuning.max_strike_speed / speed;
        }

        let player = self.match_state.current_player;
        self.striker.vel = velocity;
        self.match_state.shot_in_progress = true;
        self.match_state.captured_this_shot.clear();
        self.aim_point = None;
        self.phase = ShotPhase::InFlight;
        self.push_event(GameEvent::ShotLaunched { player, velocity });

        log::debug!(
            "Player {} launched striker at ({:.2}, {:.2})",
            player.number(),
            velocity.x,
            velocity.y
        );
        true
    }

    /// Slide the striker along the baseline (Idle only)
    pub fn place_striker(&mut self, x: f64) -> bool {
        if !self.accepts_shot_commands() || self.phase != ShotPhase::Idle {
            return false;
        }
        let x = aim::clamp_placement(x, self.board.striker_x_range());
        self.striker.pos = DVec2::new(x, self.board.baseline_y());
        true
    }

    /// Start or update aiming with a pull-back point
    pub fn aim_at(&mut self, point: DVec2) -> bool {
        if !self.accepts_shot_commands() || !point.is_finite() {
            return false;
        }
        self.aim_point = Some(point);
        self.phase = ShotPhase::Aiming;
        true
    }

    pub fn cancel_aim(&mut self) {
        if self.phase == ShotPhase::Aiming {
            self.aim_point = None;
            self.phase = ShotPhase::Idle;
        }
    }

    /// Fire from the current aim. A pull that is too short just ends aiming.
    pub fn release(&mut self) -> bool {
        if self.phase != ShotPhase::Aiming {
            return false;
        }
        let Some(point) = self.aim_point.take() else {
            self.phase = ShotPhase::Idle;
            return false;
        };
        self.phase = ShotPhase::Idle;

        match aim::strike_velocity(
            self.striker.pos,
            point,
            self.board.size,
            self.tuning.max_strike_speed,
        ) {
            Some(velocity) => self.launch_striker(velocity.x, velocity.y),
            None => false,
        }
    }

    /// Power of the current aim (0-100), if aiming
    pub fn power_percent(&self) -> Option<u8> {
        let point = self.aim_point?;
        aim::power_percent(self.striker.pos, point, self.board.size)
    }

    /// Throw away the current round and lay out a new one
    pub fn reset_round(&mut self) {
        self.init_round();
        self.push_event(GameEvent::RoundReset);
    }

    /// Advance the simulation by one step
    pub fn tick(&mut self) {
        self.time_ticks += 1;

        if self.phase == ShotPhase::RoundOver {
            self.reset_ticks = self.reset_ticks.saturating_sub(1);
            if self.reset_ticks == 0 {
                log::info!("Resetting round");
                self.reset_round();
            }
            return;
        }

        let rest = self.tuning.rest_threshold;
        if !self.match_state.shot_in_progress && !any_moving(self.bodies(), rest) {
            return;
        }

        let board = self.board;
        let tuning = self.tuning;

        // Motion for every body completes before any collision is resolved
        let report = advance(self.bodies_mut(), &board, &tuning);
        for id in report.bounces {
            self.push_event(GameEvent::WallBounce { id });
        }
        for capture in report.captures {
            self.match_state.record_capture(capture);
            self.push_event(GameEvent::Pocketed(capture));
        }

        let mut active: Vec<&mut Body> = self.bodies_mut().filter(|b| b.active).collect();
        let contacts = resolve_all(&mut active, &tuning);
        for contact in contacts {
            self.push_event(GameEvent::Collision {
                a: contact.a,
                b: contact.b,
                impulse: contact.impulse,
            });
        }

        if !self.match_state.shot_in_progress {
            return;
        }

        if !any_moving(self.bodies(), rest) {
            self.end_shot();
        } else if self.phase == ShotPhase::InFlight
            && (!self.striker.active || !self.striker.is_moving(rest))
        {
            self.phase = ShotPhase::Settling;
        }
    }

    /// Tick until the shot in flight resolves, up to `max_ticks`.
    /// Returns the number of ticks taken.
    pub fn settle(&mut self, max_ticks: u32) -> u32 {
        let mut ticks = 0;
        while self.match_state.shot_in_progress && ticks < max_ticks {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    fn end_shot(&mut self) {
        let striker_pocketed = !self.striker.active;
        let outcome = resolve_shot(&mut self.match_state, striker_pocketed);

        log::info!(
            "Player {} shot: {} own, {} opponent, queen {}, foul {}, {:+} points ({})",
            outcome.player.number(),
            outcome.own_pocketed,
            outcome.opponent_pocketed,
            outcome.queen_pocketed,
            outcome.striker_foul,
            outcome.points,
            if outcome.valid { "valid" } else { "invalid" }
        );
        self.push_event(GameEvent::ShotResolved(outcome));

        if let Some(winner) = outcome.winner {
            log::info!("Player {} wins!", winner.number());
            self.winner = Some(winner);
            self.phase = ShotPhase::RoundOver;
            // The reset never happens on the same tick as the win
            self.reset_ticks = self.tuning.reset_delay_ticks.max(1);
            self.aim_point = None;
            self.push_event(GameEvent::Winner(winner));
            return;
        }

        if outcome.next_player != outcome.player {
            log::info!("Turn passes to player {}", outcome.next_player.number());
            self.push_event(GameEvent::TurnChanged(outcome.next_player));
        }

        self.reset_striker();
    }
}
