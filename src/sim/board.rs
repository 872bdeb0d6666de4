//! Board geometry
//!
//! The board is a square of side `size`. The playing surface is inset by
//! `padding` on every side, and the four pockets sit exactly on the inner
//! corners of that surface.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Immutable per-session board dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Board {
    /// Full edge length
    pub size: f64,
    /// Inset from the outer edge to the playing surface
    pub padding: f64,
    pub pocket_radius: f64,
    pub piece_radius: f64,
    pub striker_radius: f64,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            size: BOARD_SIZE,
            padding: BOARD_PADDING,
            pocket_radius: POCKET_RADIUS,
            piece_radius: PIECE_RADIUS,
            striker_radius: STRIKER_RADIUS,
        }
    }
}

impl Board {
    /// Derive a board from its edge length, keeping the default proportions
    pub fn scaled(size: f64) -> Self {
        Self {
            size,
            padding: size / 13.33,
            pocket_radius: size / 32.0,
            piece_radius: size / 53.33,
            striker_radius: size / 44.44,
        }
    }

    /// Replace geometry that cannot describe a playable board.
    ///
    /// A bad edge length falls back to the default board; bad radii or an
    /// inset that leaves no surface fall back to the scaled proportions.
    pub fn validated(self) -> Self {
        if !(self.size > 0.0 && self.size.is_finite()) {
            log::warn!("Invalid board size {}, using default board", self.size);
            return Self::default();
        }

        let scaled = Self::scaled(self.size);
        let mut board = self;

        if !(board.padding >= 0.0 && board.padding * 2.0 < board.size) {
            log::warn!("Invalid board padding {}, using {}", board.padding, scaled.padding);
            board.padding = scaled.padding;
        }
        for (name, value, fallback) in [
            ("pocket", &mut board.pocket_radius, scaled.pocket_radius),
            ("piece", &mut board.piece_radius, scaled.piece_radius),
            ("striker", &mut board.striker_radius, scaled.striker_radius),
        ] {
            if !(*value > 0.0 && value.is_finite()) {
                log::warn!("Invalid {} radius {}, using {}", name, value, fallback);
                *value = fallback;
            }
        }

        board
    }

    /// Lowest coordinate of the playing surface (both axes)
    #[inline]
    pub fn inner_min(&self) -> f64 {
        self.padding
    }

    /// Highest coordinate of the playing surface (both axes)
    #[inline]
    pub fn inner_max(&self) -> f64 {
        self.size - self.padding
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::splat(self.size / 2.0)
    }

    /// Pocket centers, in fixed order: top-left, top-right, bottom-left, bottom-right
    pub fn pockets(&self) -> [DVec2; 4] {
        let lo = self.inner_min();
        let hi = self.inner_max();
        [
            DVec2::new(lo, lo),
            DVec2::new(hi, lo),
            DVec2::new(lo, hi),
            DVec2::new(hi, hi),
        ]
    }

    /// Index of the first pocket whose radius contains `pos`
    pub fn pocket_at(&self, pos: DVec2) -> Option<usize> {
        self.pockets()
            .iter()
            .position(|pocket| pos.distance(*pocket) < self.pocket_radius)
    }

    /// Y coordinate of the striker baseline
    #[inline]
    pub fn baseline_y(&self) -> f64 {
        self.inner_max() - BASELINE_OFFSET
    }

    /// Where the striker is placed at the start of every shot
    pub fn striker_home(&self) -> DVec2 {
        DVec2::new(self.size / 2.0, self.baseline_y())
    }

    /// Allowed x range for placing the striker on the baseline.
    ///
    /// Collapses to the center line when the margins overlap.
    pub fn striker_x_range(&self) -> (f64, f64) {
        let lo = self.inner_min() + STRIKER_PLACEMENT_MARGIN;
        let hi = self.inner_max() - STRIKER_PLACEMENT_MARGIN;
        if lo <= hi {
            (lo, hi)
        } else {
            let mid = self.size / 2.0;
            (mid, mid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pockets_on_inner_corners() {
        let board = Board::default();
        let pockets = board.pockets();
        assert_eq!(pockets[0], DVec2::new(60.0, 60.0));
        assert_eq!(pockets[1], DVec2::new(740.0, 60.0));
        assert_eq!(pockets[2], DVec2::new(60.0, 740.0));
        assert_eq!(pockets[3], DVec2::new(740.0, 740.0));
    }

    #[test]
    fn test_scaled_matches_default_proportions() {
        let board = Board::scaled(800.0);
        let default = Board::default();
        assert!((board.padding - default.padding).abs() < 0.05);
        assert!((board.pocket_radius - default.pocket_radius).abs() < 1e-9);
        assert!((board.piece_radius - default.piece_radius).abs() < 0.01);
        assert!((board.striker_radius - default.striker_radius).abs() < 0.01);

        let small = Board::scaled(400.0);
        assert!((small.pocket_radius - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_pocket_at() {
        let board = Board::default();
        assert_eq!(board.pocket_at(DVec2::new(70.0, 70.0)), Some(0));
        assert_eq!(board.pocket_at(DVec2::new(730.0, 735.0)), Some(3));
        assert_eq!(board.pocket_at(board.center()), None);
        // Exactly on the radius is not inside
        assert_eq!(board.pocket_at(DVec2::new(85.0, 60.0)), None);
    }

    #[test]
    fn test_striker_placement() {
        let board = Board::default();
        assert_eq!(board.striker_home(), DVec2::new(400.0, 690.0));
        assert_eq!(board.striker_x_range(), (120.0, 680.0));
    }

    #[test]
    fn test_small_board_placement_range_collapses() {
        let board = Board::scaled(120.0);
        assert_eq!(board.striker_x_range(), (60.0, 60.0));
    }

    #[test]
    fn test_validated_keeps_good_board() {
        assert_eq!(Board::default().validated(), Board::default());
        let small = Board::scaled(120.0);
        assert_eq!(small.validated(), small);
    }

    #[test]
    fn test_validated_replaces_bad_geometry() {
        let board = Board {
            size: f64::NAN,
            ..Board::default()
        };
        assert_eq!(board.validated(), Board::default());

        let board = Board {
            size: -50.0,
            ..Board::default()
        };
        assert_eq!(board.validated(), Board::default());

        let board = Board {
            padding: 500.0,
            striker_radius: 0.0,
            piece_radius: f64::INFINITY,
            ..Board::default()
        };
        let fixed = board.validated();
        let scaled = Board::scaled(BOARD_SIZE);
        assert_eq!(fixed.padding, scaled.padding);
        assert_eq!(fixed.striker_radius, scaled.striker_radius);
        assert_eq!(fixed.piece_radius, scaled.piece_radius);
        assert_eq!(fixed.pocket_radius, POCKET_RADIUS);
        assert!(fixed.inner_min() < fixed.inner_max());
    }
}
