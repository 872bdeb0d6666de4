//! Match state and the simulation context
//!
//! `SimulationContext` owns everything that changes during play. It is only
//! mutated through `init_round`, the shot commands, and `tick`.

use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::body::{Body, BodyKind, PieceColor};
use super::motion::Capture;
use super::rules::ShotOutcome;
use crate::consts::*;
use crate::settings::{PhysicsTuning, Settings};

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Fixed for the whole match: player 1 plays black, player 2 white
    pub fn color(self) -> PieceColor {
        match self {
            Player::One => PieceColor::Black,
            Player::Two => PieceColor::White,
        }
    }

    /// 1 or 2
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

/// A value kept per player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    pub player1: T,
    pub player2: T,
}

impl<T> Index<Player> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: Player) -> &T {
        match player {
            Player::One => &self.player1,
            Player::Two => &self.player2,
        }
    }
}

impl<T> IndexMut<Player> for PerPlayer<T> {
    fn index_mut(&mut self, player: Player) -> &mut T {
        match player {
            Player::One => &mut self.player1,
            Player::Two => &mut self.player2,
        }
    }
}

/// Carrom men of each color still on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiecesRemaining {
    pub black: u8,
    pub white: u8,
}

impl Default for PiecesRemaining {
    fn default() -> Self {
        Self {
            black: PIECES_PER_COLOR,
            white: PIECES_PER_COLOR,
        }
    }
}

impl PiecesRemaining {
    pub fn get(&self, color: PieceColor) -> u8 {
        match color {
            PieceColor::Black => self.black,
            PieceColor::White => self.white,
        }
    }

    pub fn decrement(&mut self, color: PieceColor) {
        let count = match color {
            PieceColor::Black => &mut self.black,
            PieceColor::White => &mut self.white,
        };
        *count = count.saturating_sub(1);
    }
}

/// Scores, turn, and piece accounting. Changed only by shot resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub current_player: Player,
    pub scores: PerPlayer<i32>,
    pub pieces_remaining: PiecesRemaining,
    pub queen_pocketed: bool,
    pub queen_covered: PerPlayer<bool>,
    pub shot_in_progress: bool,
    /// Bodies captured since the current shot was launched, in capture order
    pub captured_this_shot: Vec<Capture>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self {
            current_player: Player::One,
            scores: PerPlayer::default(),
            pieces_remaining: PiecesRemaining::default(),
            queen_pocketed: false,
            queen_covered: PerPlayer::default(),
            shot_in_progress: false,
            captured_this_shot: Vec::new(),
        }
    }
}

impl MatchState {
    /// Record a capture, ignoring a body that was already captured this shot
    pub fn record_capture(&mut self, capture: Capture) {
        if self
            .captured_this_shot
            .iter()
            .any(|c| c.body_id == capture.body_id)
        {
            return;
        }
        self.captured_this_shot.push(capture);
    }
}

/// Where the current shot is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotPhase {
    /// Striker on the baseline, waiting for placement/aim/launch
    Idle,
    /// Pull-back point recorded, waiting for release
    Aiming,
    /// Striker launched and still moving
    InFlight,
    /// Striker has stopped (or was pocketed) but other bodies still move
    Settling,
    /// A player won; the round resets after a short delay
    RoundOver,
}

impl ShotPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShotPhase::Idle => "idle",
            ShotPhase::Aiming => "aiming",
            ShotPhase::InFlight => "in_flight",
            ShotPhase::Settling => "settling",
            ShotPhase::RoundOver => "round_over",
        }
    }
}

/// Things the host may want to react to (sounds, effects, HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotLaunched { player: Player, velocity: DVec2 },
    Collision { a: u32, b: u32, impulse: f64 },
    WallBounce { id: u32 },
    Pocketed(Capture),
    ShotResolved(ShotOutcome),
    TurnChanged(Player),
    Winner(Player),
    RoundReset,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// A fresh generator for the next round; each call advances the stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.stream));
        self.stream += 1;
        rng
    }
}

/// Everything a running match needs (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationContext {
    pub board: Board,
    pub tuning: PhysicsTuning,
    /// Seed for cosmetic randomness (initial piece rotation)
    pub seed: u64,
    pub rng_state: RngState,
    /// Simulation tick counter (never reset)
    pub time_ticks: u64,
    /// Queen first, then the inner ring, then the outer ring
    pub pieces: Vec<Body>,
    pub striker: Body,
    pub match_state: MatchState,
    pub phase: ShotPhase,
    /// Pull-back point while aiming
    pub aim_point: Option<DVec2>,
    /// Set when a round is won, cleared by the reset
    pub winner: Option<Player>,
    /// Ticks left before a won round resets
    pub reset_ticks: u32,
    /// Events since the host last drained them, newest last
    #[serde(skip)]
    pub events: VecDeque<GameEvent>,
}

impl SimulationContext {
    /// Create a context with default settings and lay out the first round
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        let board = settings.board.validated();
        let mut ctx = Self {
            board,
            tuning: settings.physics.validated(),
            seed,
            rng_state: RngState::new(seed),
            time_ticks: 0,
            pieces: Vec::new(),
            striker: Body::striker(0, &board),
            match_state: MatchState::default(),
            phase: ShotPhase::Idle,
            aim_point: None,
            winner: None,
            reset_ticks: 0,
            events: VecDeque::new(),
        };
        ctx.init_round();
        ctx
    }

    /// Id the striker always carries (one past the last piece)
    pub fn striker_id(&self) -> u32 {
        self.pieces.len() as u32
    }

    /// Rebuild the 19-piece layout and reset the match state
    pub fn init_round(&mut self) {
        let board = self.board;
        let center = board.center();
        let spacing = board.piece_radius * RING_SPACING;
        let mut rng = self.rng_state.next_rng();

        let mut pieces = Vec::with_capacity(19);
        pieces.push(Body::queen(0, center, &board));

        // Inner ring: 6 pieces, black first
        for i in 0..6 {
            let angle = i as f64 * std::f64::consts::FRAC_PI_3;
            let color = if i % 2 == 0 {
                PieceColor::Black
            } else {
                PieceColor::White
            };
            let pos = center + DVec2::from_angle(angle) * spacing;
            pieces.push(Body::piece(pieces.len() as u32, pos, color, &board));
        }

        // Outer ring: 12 pieces, white first
        for i in 0..12 {
            let angle = i as f64 * std::f64::consts::FRAC_PI_6;
            let color = if i % 2 == 0 {
                PieceColor::White
            } else {
                PieceColor::Black
            };
            let pos = center + DVec2::from_angle(angle) * spacing * 2.0;
            pieces.push(Body::piece(pieces.len() as u32, pos, color, &board));
        }

        for piece in &mut pieces {
            piece.rotation = rng.random_range(0.0..std::f64::consts::TAU);
        }

        self.pieces = pieces;
        self.match_state = MatchState::default();
        self.winner = None;
        self.reset_ticks = 0;
        self.aim_point = None;
        self.reset_striker();

        log::info!(
            "Round initialized (seed {}, round {})",
            self.seed,
            self.rng_state.stream
        );
    }

    /// Fresh striker on the baseline, ready for the next shot
    pub fn reset_striker(&mut self) {
        self.striker = Body::striker(self.striker_id(), &self.board);
        self.aim_point = None;
        self.phase = ShotPhase::Idle;
    }

    /// Pieces then striker, in the fixed order used by the integrator and resolver
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.pieces.iter().chain(std::iter::once(&self.striker))
    }

    pub fn bodies_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.pieces
            .iter_mut()
            .chain(std::iter::once(&mut self.striker))
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies().find(|b| b.id == id)
    }

    /// Active carrom men of the given color
    pub fn active_count(&self, color: PieceColor) -> usize {
        self.pieces
            .iter()
            .filter(|p| p.active && p.kind == BodyKind::Piece(color))
            .count()
    }

    pub fn current_player(&self) -> Player {
        self.match_state.current_player
    }

    pub fn scores(&self) -> PerPlayer<i32> {
        self.match_state.scores
    }

    pub fn pieces_remaining(&self) -> PiecesRemaining {
        self.match_state.pieces_remaining
    }

    pub fn queen_pocketed(&self) -> bool {
        self.match_state.queen_pocketed
    }

    pub fn queen_covered(&self) -> PerPlayer<bool> {
        self.match_state.queen_covered
    }

    pub fn shot_in_progress(&self) -> bool {
        self.match_state.shot_in_progress
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Queue an event, dropping the oldest once the host stops draining
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_layout() {
        let ctx = SimulationContext::new(42);
        assert_eq!(ctx.pieces.len(), 19);
        assert_eq!(ctx.pieces[0].kind, BodyKind::Queen);
        assert_eq!(ctx.pieces[0].pos, ctx.board.center());
        assert_eq!(ctx.active_count(PieceColor::Black), 9);
        assert_eq!(ctx.active_count(PieceColor::White), 9);
        assert_eq!(ctx.striker.id, 19);
        assert_eq!(ctx.striker.pos, ctx.board.striker_home());
        assert_eq!(ctx.phase, ShotPhase::Idle);
        assert_eq!(ctx.current_player(), Player::One);

        // Ids match layout order
        for (i, piece) in ctx.pieces.iter().enumerate() {
            assert_eq!(piece.id, i as u32);
        }
    }

    #[test]
    fn test_initial_layout_has_no_contacts() {
        let ctx = SimulationContext::new(1);
        let contact = ctx.tuning.collision_buffer;
        for (i, a) in ctx.pieces.iter().enumerate() {
            for b in &ctx.pieces[i + 1..] {
                assert!(a.pos.distance(b.pos) >= a.radius + b.radius + contact);
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = SimulationContext::new(7);
        let b = SimulationContext::new(7);
        for (pa, pb) in a.pieces.iter().zip(&b.pieces) {
            assert_eq!(pa.rotation, pb.rotation);
            assert_eq!(pa.pos, pb.pos);
        }
    }

    #[test]
    fn test_per_player_index() {
        let mut scores: PerPlayer<i32> = PerPlayer::default();
        scores[Player::Two] += 10;
        assert_eq!(scores.player2, 10);
        assert_eq!(scores[Player::One], 0);
        assert_eq!(Player::One.other(), Player::Two);
        assert_eq!(Player::Two.color(), PieceColor::White);
    }

    #[test]
    fn test_record_capture_dedupes() {
        let mut state = MatchState::default();
        let capture = Capture {
            body_id: 3,
            kind: BodyKind::Piece(PieceColor::Black),
            pocket: 1,
        };
        state.record_capture(capture);
        state.record_capture(capture);
        assert_eq!(state.captured_this_shot.len(), 1);
    }

    #[test]
    fn test_pieces_remaining_saturates() {
        let mut remaining = PiecesRemaining { black: 1, white: 0 };
        remaining.decrement(PieceColor::White);
        remaining.decrement(PieceColor::Black);
        assert_eq!(remaining, PiecesRemaining { black: 0, white: 0 });
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut ctx = SimulationContext::new(1);
        let extra = 100;
        for id in 0..(MAX_PENDING_EVENTS + extra) as u32 {
            ctx.push_event(GameEvent::WallBounce { id });
        }
        assert_eq!(ctx.events.len(), MAX_PENDING_EVENTS);

        let events = ctx.drain_events();
        assert_eq!(events.first(), Some(&GameEvent::WallBounce { id: extra as u32 }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::WallBounce {
                id: (MAX_PENDING_EVENTS + extra - 1) as u32
            })
        );
        assert!(ctx.drain_events().is_empty());
    }
}
