//! Movable circular bodies: carrom men, the queen, and the striker

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::board::Board;
use crate::consts::*;

/// Color of a regular carrom man
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    Black,
    White,
}

impl PieceColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceColor::Black => "black",
            PieceColor::White => "white",
        }
    }
}

/// What a body is. Radius and mass differences are data, set at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Piece(PieceColor),
    Queen,
    Striker,
}

impl BodyKind {
    /// Stable numeric code for render buffers
    pub fn code(&self) -> u32 {
        match self {
            BodyKind::Piece(PieceColor::Black) => 0,
            BodyKind::Piece(PieceColor::White) => 1,
            BodyKind::Queen => 2,
            BodyKind::Striker => 3,
        }
    }

    pub fn color(&self) -> Option<PieceColor> {
        match self {
            BodyKind::Piece(color) => Some(*color),
            _ => None,
        }
    }
}

/// A circular body on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    pub kind: BodyKind,
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    pub mass: f64,
    /// False once captured by a pocket. Never flips back within a round.
    pub active: bool,
    /// Cosmetic orientation (radians), not part of the physical state
    #[serde(default)]
    pub rotation: f64,
    /// Cosmetic spin (radians per tick)
    #[serde(default)]
    pub angular_vel: f64,
}

impl Body {
    fn new(id: u32, kind: BodyKind, pos: DVec2, radius: f64, mass: f64) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: DVec2::ZERO,
            radius,
            mass,
            active: true,
            rotation: 0.0,
            angular_vel: 0.0,
        }
    }

    pub fn piece(id: u32, pos: DVec2, color: PieceColor, board: &Board) -> Self {
        Self::new(id, BodyKind::Piece(color), pos, board.piece_radius, PIECE_MASS)
    }

    /// The queen is piece-sized but slightly heavier
    pub fn queen(id: u32, pos: DVec2, board: &Board) -> Self {
        Self::new(id, BodyKind::Queen, pos, board.piece_radius, QUEEN_MASS)
    }

    /// A fresh striker resting on the baseline
    pub fn striker(id: u32, board: &Board) -> Self {
        Self::new(
            id,
            BodyKind::Striker,
            board.striker_home(),
            board.striker_radius,
            STRIKER_MASS,
        )
    }

    /// True while either velocity component exceeds the rest threshold
    #[inline]
    pub fn is_moving(&self, rest_threshold: f64) -> bool {
        self.vel.x.abs() > rest_threshold || self.vel.y.abs() > rest_threshold
    }

    #[inline]
    pub fn is_striker(&self) -> bool {
        self.kind == BodyKind::Striker
    }

    /// Translational kinetic energy
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vel.length_squared()
    }

    /// Linear momentum
    pub fn momentum(&self) -> DVec2 {
        self.vel * self.mass
    }
}
