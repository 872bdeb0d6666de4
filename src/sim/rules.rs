//! Shot resolution: turns the captures of a settled shot into score, turn, and
//! win changes.
//!
//! Rules, in order:
//! 1. Own-color man: -1 remaining, +10, shot is valid. Opponent man: -1
//!    remaining only. Queen: marked pocketed, no points.
//! 2. Queen plus at least one own man in the same shot covers the queen: +50
//!    and the shot is valid. An uncovered queen stays pocketed and is never
//!    returned to the board.
//! 3. Striker pocketed: -10 (never below 0) and the shot is invalid.
//! 4. If the shooter has no men of their color left, they win and keep the turn.
//! 5. Otherwise an invalid shot passes the turn.

use serde::{Deserialize, Serialize};

use super::body::BodyKind;
use super::state::{MatchState, Player};
use crate::consts::*;

/// Summary of a resolved shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotOutcome {
    /// Who took the shot
    pub player: Player,
    /// Whether the shooter keeps the turn
    pub valid: bool,
    pub own_pocketed: u8,
    pub opponent_pocketed: u8,
    pub queen_pocketed: bool,
    pub queen_covered: bool,
    pub striker_foul: bool,
    /// Net score change for the shooter
    pub points: i32,
    pub winner: Option<Player>,
    /// Who shoots next (unchanged on a win)
    pub next_player: Player,
}

/// Apply the captures recorded for the shot that just settled.
///
/// Consumes `captured_this_shot`, clears `shot_in_progress`, and updates the
/// current player.
pub fn resolve_shot(state: &mut MatchState, striker_pocketed: bool) -> ShotOutcome {
    let player = state.current_player;
    let own_color = player.color();
    let score_before = state.scores[player];

    let mut valid = false;
    let mut own_pocketed = 0u8;
    let mut opponent_pocketed = 0u8;
    let mut queen_this_shot = false;

    for capture in std::mem::take(&mut state.captured_this_shot) {
        match capture.kind {
            BodyKind::Queen => {
                queen_this_shot = true;
                state.queen_pocketed = true;
            }
            BodyKind::Piece(color) => {
                state.pieces_remaining.decrement(color);
                if color == own_color {
                    state.scores[player] += OWN_PIECE_POINTS;
                    own_pocketed += 1;
                    valid = true;
                } else {
                    opponent_pocketed += 1;
                }
            }
            // Only the foul below applies to the striker
            BodyKind::Striker => {}
        }
    }

    let queen_covered = queen_this_shot && own_pocketed > 0;
    if queen_covered {
        state.queen_covered[player] = true;
        state.scores[player] += QUEEN_COVER_BONUS;
        valid = true;
    }

    if striker_pocketed {
        state.scores[player] = (state.scores[player] - STRIKER_FOUL_PENALTY).max(0);
        valid = false;
    }

    state.shot_in_progress = false;

    let winner = (state.pieces_remaining.get(own_color) == 0).then_some(player);
    let next_player = if winner.is_some() || valid {
        player
    } else {
        player.other()
    };
    state.current_player = next_player;

    ShotOutcome {
        player,
        valid,
        own_pocketed,
        opponent_pocketed,
        queen_pocketed: queen_this_shot,
        queen_covered,
        striker_foul: striker_pocketed,
        points: state.scores[player] - score_before,
        winner,
        next_player,
    }
}
