//! Browser bindings
//!
//! The page owns the canvas, pointer mapping and the animation loop. It calls
//! `tick()` once per frame, forwards board-space pointer positions, and reads
//! back the instance buffer and HUD JSON.

use glam::DVec2;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{GameEvent, SimulationContext};
use crate::view::{Hud, body_instance_bytes};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Carrom starting...");
}

/// A running match, owned by the page
#[wasm_bindgen]
pub struct CarromGame {
    ctx: SimulationContext,
}

#[wasm_bindgen]
impl CarromGame {
    /// New match using stored settings; `board_size` rescales the board when > 0
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, board_size: f64) -> CarromGame {
        let mut settings = Settings::load();
        if board_size > 0.0 {
            settings.board = crate::sim::Board::scaled(board_size);
        }
        CarromGame {
            ctx: SimulationContext::with_settings(seed, settings),
        }
    }

    #[wasm_bindgen(js_name = initRound)]
    pub fn init_round(&mut self) {
        self.ctx.reset_round();
    }

    #[wasm_bindgen(js_name = launchStriker)]
    pub fn launch_striker(&mut self, vx: f64, vy: f64) -> bool {
        self.ctx.launch_striker(vx, vy)
    }

    #[wasm_bindgen(js_name = placeStriker)]
    pub fn place_striker(&mut self, x: f64) -> bool {
        self.ctx.place_striker(x)
    }

    #[wasm_bindgen(js_name = aimAt)]
    pub fn aim_at(&mut self, x: f64, y: f64) -> bool {
        self.ctx.aim_at(DVec2::new(x, y))
    }

    #[wasm_bindgen(js_name = cancelAim)]
    pub fn cancel_aim(&mut self) {
        self.ctx.cancel_aim();
    }

    pub fn release(&mut self) -> bool {
        self.ctx.release()
    }

    pub fn tick(&mut self) {
        self.ctx.tick();
    }

    /// Packed `BodyInstance` records (24 bytes each)
    #[wasm_bindgen(js_name = bodyBuffer)]
    pub fn body_buffer(&self) -> Vec<u8> {
        body_instance_bytes(&self.ctx)
    }

    #[wasm_bindgen(js_name = hudJson)]
    pub fn hud_json(&self) -> String {
        Hud::from_context(&self.ctx).to_json()
    }

    /// Pending events as JSON, clearing them
    #[wasm_bindgen(js_name = takeEvents)]
    pub fn take_events(&mut self) -> String {
        let events: Vec<GameEvent> = self.ctx.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Store this match's board and physics for the next session
    #[wasm_bindgen(js_name = saveSettings)]
    pub fn save_settings(&self) {
        Settings {
            board: self.ctx.board,
            physics: self.ctx.tuning,
        }
        .save();
    }

    /// Winner of the round that just ended, if any (1 or 2)
    pub fn winner(&self) -> Option<u8> {
        self.ctx.winner().map(|p| p.number())
    }
}
