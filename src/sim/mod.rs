//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick = one explicit Euler step, no sub-stepping
//! - Seeded RNG only (cosmetic spin)
//! - Stable iteration order (layout order, striker last)
//! - No rendering or platform dependencies

pub mod aim;
pub mod board;
pub mod body;
pub mod collision;
pub mod motion;
pub mod rules;
pub mod state;
pub mod tick;

pub use aim::{aim_power, clamp_placement, power_percent, strike_velocity};
pub use board::Board;
pub use body::{Body, BodyKind, PieceColor};
pub use collision::{Contact, resolve_all, resolve_pair};
pub use motion::{Capture, MotionReport, StepResult, advance, any_moving, step_body};
pub use rules::{ShotOutcome, resolve_shot};
pub use state::{
    GameEvent, MatchState, PerPlayer, PiecesRemaining, Player, ShotPhase, SimulationContext,
};
pub use tick::{TickInput, tick};
