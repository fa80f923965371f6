//! Browser facade
//!
//! Wraps a [`GameState`] for JavaScript. The page owns the frame loop,
//! the canvas and input translation; it calls `tick` once per animation
//! frame and renders from `snapshot_json`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::settings::{MatchConfig, Ruleset};
use crate::sim::{Command, GameState, Selector};

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the first logger
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WasmMatch {
    state: GameState,
}

#[wasm_bindgen]
impl WasmMatch {
    /// Build a match from a ruleset name (`duel`, `squad`, `gauntlet`)
    #[wasm_bindgen(constructor)]
    pub fn new(ruleset: &str, seed: u64) -> Result<WasmMatch, JsValue> {
        let ruleset = Ruleset::from_str(ruleset)
            .ok_or_else(|| js_error(format!("unknown ruleset {ruleset:?}")))?;
        let state = GameState::new(ruleset.config(), seed).map_err(js_error)?;
        log::info!("{} match ready (seed {})", ruleset.as_str(), seed);
        Ok(Self { state })
    }

    /// Build a match from a JSON config (missing keys use defaults)
    pub fn from_json(json: &str, seed: u64) -> Result<WasmMatch, JsValue> {
        let config = MatchConfig::from_json(json).map_err(js_error)?;
        let state = GameState::new(config, seed).map_err(js_error)?;
        Ok(Self { state })
    }

    pub fn start(&mut self) {
        self.state.start_match();
    }

    pub fn reseed(&mut self, seed: u64) {
        self.state.reseed(seed);
    }

    /// Advance one frame; returns the frame's events as JSON
    pub fn tick(&mut self, elapsed_ms: f32) -> Result<String, JsValue> {
        let events = self.state.tick(elapsed_ms);
        serde_json::to_string(&events).map_err(js_error)
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.snapshot()).map_err(js_error)
    }

    /// Apply a JSON-encoded command
    pub fn apply_json(&mut self, json: &str) -> Result<bool, JsValue> {
        let command: Command = serde_json::from_str(json).map_err(js_error)?;
        Ok(self.state.apply(command))
    }

    /// Claim the player under a pointer; returns its id or -1
    pub fn claim_at(&mut self, x: f32, y: f32, channel: u32) -> i32 {
        self.state
            .claim_control(Selector::At(Vec2::new(x, y)), channel)
            .map_or(-1, |id| id as i32)
    }

    pub fn release(&mut self, player: usize, channel: u32) -> bool {
        self.state.release_control(player, channel)
    }

    /// Move `player` on behalf of the pointer `channel` holding it
    pub fn move_to(&mut self, player: usize, x: f32, y: f32, channel: u32) -> bool {
        self.state
            .select_and_move(Selector::Id(player), Vec2::new(x, y), Some(channel))
    }

    pub fn begin_charge(&mut self, player: usize) -> bool {
        self.state.begin_charge(player)
    }

    pub fn release_charge(&mut self, player: usize) -> bool {
        self.state.release_charge(player).is_some()
    }

    pub fn reload_tap(&mut self, player: usize) -> bool {
        self.state.reload_tap(player)
    }

    /// Hold time after which a press should begin a charge
    pub fn long_press_ms(&self) -> f32 {
        self.state.config.long_press_ms
    }

    /// Pointer channel currently holding `player`, or -1
    pub fn controller_of(&self, player: usize) -> i64 {
        match self.state.player(player).map(|p| p.owner) {
            Some(crate::sim::ControlOwner::Human(channel)) => i64::from(channel),
            _ => -1,
        }
    }
}
