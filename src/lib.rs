//! Snow Skirmish - two-team snowball fight simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, ballistics, AI, match flow)
//! - `settings`: Match configuration record and ruleset presets
//! - `web`: Browser facade (wasm32 only)
//!
//! Rendering, input translation and HUD live outside this crate. They read
//! [`sim::Snapshot`]s between ticks and talk back through [`sim::Command`]s.

pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{ConfigError, MatchConfig, Ruleset};

/// Default tuning constants
pub mod consts {
    /// Frame length the runners tick at (60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 500.0;
    pub const WALL_THICKNESS: f32 = 15.0;

    /// Player body
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Units moved per tick
    pub const PLAYER_SPEED: f32 = 2.5;
    /// Remaining distance at which a walk counts as arrived
    pub const ARRIVAL_EPSILON: f32 = 5.0;
    pub const STARTING_HEALTH: u8 = 2;

    /// Snowball ballistics (per tick)
    pub const SNOWBALL_RADIUS: f32 = 8.0;
    pub const SNOWBALL_SPEED_MIN: f32 = 4.0;
    pub const SNOWBALL_SPEED_MAX: f32 = 12.0;
    pub const GRAVITY: f32 = 0.15;
    /// Snowballs leave the hand at 70% of body height
    pub const LAUNCH_HEIGHT: f32 = PLAYER_HEIGHT * 0.7;

    /// Ammo
    pub const MAX_SNOWBALLS: u8 = 3;
    pub const STARTING_SNOWBALLS: u8 = 1;
    pub const TAPS_TO_RELOAD: u32 = 10;
    pub const TAP_WINDOW_MS: f64 = 2000.0;

    /// Timing (milliseconds)
    pub const LONG_PRESS_MS: f32 = 200.0;
    pub const MAX_CHARGE_MS: f32 = 750.0;
    pub const HIT_FLASH_MS: f32 = 200.0;
    pub const END_GRACE_MS: f32 = 500.0;

    /// Selection radius multiplier for picking a player by position
    pub const SELECT_RADIUS_FACTOR: f32 = 2.5;
}

/// Clamp to the unit interval, mapping NaN to zero
#[inline]
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
