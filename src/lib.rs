//! Carrom - a two-player carrom board simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, pockets, shot rules)
//! - `settings`: Board geometry and physics tuning
//! - `view`: Read-only snapshots for an external renderer/HUD
//! - `wasm`: Browser bindings (wasm32 only)

pub mod settings;
pub mod sim;
pub mod view;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use settings::{PhysicsTuning, Settings};
pub use sim::{Board, Body, BodyKind, GameEvent, Player, SimulationContext, TickInput};

/// Game configuration constants
pub mod consts {
    /// Per-tick multiplicative velocity decay (table drag)
    pub const FRICTION: f64 = 0.98;
    /// Energy retained on wall bounces and body collisions (must stay < 1)
    pub const RESTITUTION: f64 = 0.88;
    /// Velocity components below this are zeroed; also the "is moving" cutoff
    pub const REST_THRESHOLD: f64 = 0.1;
    /// Extra distance added to the overlap test to catch fast near-misses
    pub const COLLISION_BUFFER: f64 = 2.0;
    /// Spin below this is zeroed (cosmetic only)
    pub const SPIN_REST_THRESHOLD: f64 = 0.01;

    /// Default board geometry (800px board)
    pub const BOARD_SIZE: f64 = 800.0;
    pub const BOARD_PADDING: f64 = 60.0;
    pub const POCKET_RADIUS: f64 = 25.0;
    pub const PIECE_RADIUS: f64 = 15.0;
    pub const STRIKER_RADIUS: f64 = 18.0;

    /// Body masses
    pub const PIECE_MASS: f64 = 1.0;
    pub const QUEEN_MASS: f64 = 1.1;
    pub const STRIKER_MASS: f64 = 1.3;

    /// Layout: ring spacing as a multiple of piece radius
    pub const RING_SPACING: f64 = 2.2;
    pub const PIECES_PER_COLOR: u8 = 9;

    /// Striker baseline sits this far above the bottom playing edge
    pub const BASELINE_OFFSET: f64 = 50.0;
    /// Striker can't be placed closer than this to the side edges
    pub const STRIKER_PLACEMENT_MARGIN: f64 = 60.0;

    /// Scoring
    pub const OWN_PIECE_POINTS: i32 = 10;
    pub const QUEEN_COVER_BONUS: i32 = 50;
    pub const STRIKER_FOUL_PENALTY: i32 = 10;

    /// Fastest allowed striker launch (full power)
    pub const MAX_STRIKE_SPEED: f64 = 32.0;
    /// Pull-backs shorter than this don't fire
    pub const MIN_PULL_DISTANCE: f64 = 5.0;

    /// Ticks between a win and the round reset (~500ms at 60 Hz)
    pub const ROUND_RESET_DELAY_TICKS: u32 = 30;

    /// Undrained events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 1024;
}
