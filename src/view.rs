//! Read-only snapshots for the renderer and HUD
//!
//! Nothing here mutates the simulation.

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

use crate::sim::{Body, SimulationContext};

/// One body as the renderer sees it
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    pub position: [f32; 2],
    pub radius: f32,
    pub rotation: f32,
    /// See `BodyKind::code`
    pub kind: u32,
    /// 1 while on the board, 0 once pocketed
    pub active: u32,
}

impl BodyInstance {
    pub fn from_body(body: &Body) -> Self {
        Self {
            position: [body.pos.x as f32, body.pos.y as f32],
            radius: body.radius as f32,
            rotation: body.rotation as f32,
            kind: body.kind.code(),
            active: body.active as u32,
        }
    }
}

/// Pieces in layout order, striker last
pub fn body_instances(ctx: &SimulationContext) -> Vec<BodyInstance> {
    ctx.bodies().map(BodyInstance::from_body).collect()
}

/// Raw bytes of `body_instances`, ready for a GPU buffer upload
pub fn body_instance_bytes(ctx: &SimulationContext) -> Vec<u8> {
    bytemuck::cast_slice(&body_instances(ctx)).to_vec()
}

/// HUD labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub current_player: u8,
    pub scores: [i32; 2],
    pub black_remaining: u8,
    pub white_remaining: u8,
    pub queen_pocketed: bool,
    pub queen_covered: [bool; 2],
    pub phase: &'static str,
    pub winner: Option<u8>,
    pub power: Option<u8>,
}

impl Hud {
    pub fn from_context(ctx: &SimulationContext) -> Self {
        let scores = ctx.scores();
        let covered = ctx.queen_covered();
        let remaining = ctx.pieces_remaining();
        Self {
            current_player: ctx.current_player().number(),
            scores: [scores.player1, scores.player2],
            black_remaining: remaining.black,
            white_remaining: remaining.white,
            queen_pocketed: ctx.queen_pocketed(),
            queen_covered: [covered.player1, covered.player2],
            phase: ctx.phase.as_str(),
            winner: ctx.winner().map(|p| p.number()),
            power: ctx.power_percent(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<BodyInstance>(), 24);
        let ctx = SimulationContext::new(1);
        let instances = body_instances(&ctx);
        assert_eq!(instances.len(), 20);
        assert_eq!(instances[0].kind, 2);
        assert_eq!(instances[19].kind, 3);
        assert!(instances.iter().all(|i| i.active == 1));
        assert_eq!(body_instance_bytes(&ctx).len(), 20 * 24);
    }

    #[test]
    fn test_hud_snapshot() {
        let mut ctx = SimulationContext::new(1);
        ctx.match_state.scores.player2 = 40;
        let hud = Hud::from_context(&ctx);
        assert_eq!(hud.current_player, 1);
        assert_eq!(hud.scores, [0, 40]);
        assert_eq!(hud.black_remaining, 9);
        assert_eq!(hud.phase, "idle");
        assert_eq!(hud.winner, None);

        let json = hud.to_json();
        assert!(json.contains("\"scores\":[0,40]"));
        assert!(json.contains("\"phase\":\"idle\""));
    }
}
