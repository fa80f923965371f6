//! Match configuration and ruleset presets
//!
//! A match is built from a single [`MatchConfig`] record. Every field has a
//! default, so JSON documents only need the keys they override.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::arena::{Arena, ObstacleField};
use crate::sim::state::Team;

/// What happens to a snowball that reaches the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundPolicy {
    /// Removed as soon as its height reaches zero
    #[default]
    Despawn,
    /// Comes to rest at height zero and stays until the next match
    Settle,
}

/// How snowballs are replenished besides explicit reloads
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AmmoRegen {
    /// Only reload commands and tap combos add ammo
    #[default]
    Manual,
    /// Idle players gain one snowball per interval spent idle
    Idle { interval_ms: f32 },
}

/// Who drives a roster slot when the match starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// Free until an input channel claims it
    #[default]
    Human,
    /// Permanently owned by the opponent controller
    Ai,
}

/// One roster slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerSpawn {
    pub team: Team,
    pub position: Vec2,
    #[serde(default)]
    pub controller: Controller,
}

impl PlayerSpawn {
    pub fn new(team: Team, x: f32, y: f32, controller: Controller) -> Self {
        Self {
            team,
            position: Vec2::new(x, y),
            controller,
        }
    }
}

/// Opponent controller tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Max |dy| to an enemy that counts as lined up for a throw
    pub alignment_tolerance: f32,
    /// Per-tick chance to start aiming while idle and lined up
    pub aim_chance: f64,
    /// Per-tick chance to start walking while idle
    pub walk_chance: f64,
    /// Per-tick chance an idle AI with no ammo scoops up a snowball
    pub reload_chance: f64,
    /// Aim duration range (ms)
    pub aim_min_ms: f32,
    pub aim_max_ms: f32,
    /// Max vertical jitter added to a walk target
    pub walk_jitter: f32,
    /// Distance walk targets keep from the centre line
    pub midline_margin: f32,
    /// Horizontal distance that maps to a full-power throw (about the
    /// range of a full-power snowball before it lands)
    pub max_throw_distance: f32,
    /// Uniform jitter added to throw power
    pub power_jitter: f32,
    /// Weakest throw the AI will make
    pub min_power: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            alignment_tolerance: 40.0,
            aim_chance: 0.02,
            walk_chance: 0.01,
            reload_chance: 0.005,
            aim_min_ms: 500.0,
            aim_max_ms: 1200.0,
            walk_jitter: 60.0,
            midline_margin: 50.0,
            max_throw_distance: 230.0,
            power_jitter: 0.15,
            min_power: 0.2,
        }
    }
}

/// Complete configuration for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub arena: Arena,

    // === Players ===
    pub player_radius: f32,
    /// Units per tick
    pub player_speed: f32,
    pub arrival_epsilon: f32,
    pub starting_health: u8,
    /// Radius multiplier used when selecting a player by position
    pub select_radius_factor: f32,

    // === Snowballs ===
    pub snowball_radius: f32,
    pub snowball_speed_min: f32,
    pub snowball_speed_max: f32,
    /// Downward acceleration per tick
    pub gravity: f32,
    pub launch_height: f32,
    /// Spawn distance ahead of the thrower along the team's throw axis
    pub throw_offset: f32,
    pub ground: GroundPolicy,

    // === Ammo ===
    pub max_snowballs: u8,
    pub starting_snowballs: u8,
    pub regen: AmmoRegen,
    pub taps_to_reload: u32,
    pub tap_window_ms: f64,

    // === Timing (ms) ===
    pub max_charge_ms: f32,
    /// Hold time after which the input layer should begin a charge
    pub long_press_ms: f32,
    pub hit_flash_ms: f32,
    /// Delay between the deciding knockout and the match freezing
    pub end_grace_ms: f32,

    // === Layout ===
    pub obstacles: ObstacleField,
    pub roster: Vec<PlayerSpawn>,
    pub ai: AiTuning,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            arrival_epsilon: ARRIVAL_EPSILON,
            starting_health: STARTING_HEALTH,
            select_radius_factor: SELECT_RADIUS_FACTOR,
            snowball_radius: SNOWBALL_RADIUS,
            snowball_speed_min: SNOWBALL_SPEED_MIN,
            snowball_speed_max: SNOWBALL_SPEED_MAX,
            gravity: GRAVITY,
            launch_height: LAUNCH_HEIGHT,
            throw_offset: 0.0,
            ground: GroundPolicy::Despawn,
            max_snowballs: MAX_SNOWBALLS,
            starting_snowballs: STARTING_SNOWBALLS,
            regen: AmmoRegen::Manual,
            taps_to_reload: TAPS_TO_RELOAD,
            tap_window_ms: TAP_WINDOW_MS,
            max_charge_ms: MAX_CHARGE_MS,
            long_press_ms: LONG_PRESS_MS,
            hit_flash_ms: HIT_FLASH_MS,
            end_grace_ms: END_GRACE_MS,
            obstacles: ObstacleField::standard(),
            roster: vec![
                PlayerSpawn::new(Team::Blue, 80.0, 250.0, Controller::Human),
                PlayerSpawn::new(Team::Red, 720.0, 250.0, Controller::Ai),
            ],
            ai: AiTuning::default(),
        }
    }
}

/// Configuration validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{field} must be a probability in [0, 1] (got {value})")]
    Probability { field: &'static str, value: f64 },
    #[error("arena too small for a player of radius {radius}")]
    ArenaTooSmall { radius: f32 },
    #[error("team {0} has no players")]
    EmptyTeam(Team),
    #[error("roster slot {index} spawns outside the playable area")]
    SpawnOutsideArena { index: usize },
    #[error("starting health must be 1 or 2 (got {0})")]
    StartingHealth(u8),
    #[error("starting ammo {starting} exceeds max ammo {max}")]
    AmmoBounds { starting: u8, max: u8 },
    #[error("taps_to_reload must be at least 1")]
    TapCombo,
    #[error("obstacle {index} has a non-positive extent")]
    Obstacle { index: usize },
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { field, value })
    }
}

impl MatchConfig {
    /// Parse a JSON document (missing keys fall back to defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field a match relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena.width", self.arena.width)?;
        positive("arena.height", self.arena.height)?;
        if !(self.arena.wall_thickness >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "arena.wall_thickness",
                value: self.arena.wall_thickness,
            });
        }
        positive("player_radius", self.player_radius)?;
        positive("player_speed", self.player_speed)?;
        positive("arrival_epsilon", self.arrival_epsilon)?;
        positive("select_radius_factor", self.select_radius_factor)?;
        positive("snowball_radius", self.snowball_radius)?;
        positive("snowball_speed_max", self.snowball_speed_max)?;
        positive("gravity", self.gravity)?;
        positive("launch_height", self.launch_height)?;
        positive("max_charge_ms", self.max_charge_ms)?;
        ordered(
            "snowball_speed",
            self.snowball_speed_min,
            self.snowball_speed_max,
        )?;
        ordered("ai.aim_ms", self.ai.aim_min_ms, self.ai.aim_max_ms)?;
        positive("ai.aim_min_ms", self.ai.aim_min_ms)?;
        positive("ai.max_throw_distance", self.ai.max_throw_distance)?;
        ordered("ai.min_power", self.ai.min_power, 1.0)?;
        probability("ai.aim_chance", self.ai.aim_chance)?;
        probability("ai.walk_chance", self.ai.walk_chance)?;
        probability("ai.reload_chance", self.ai.reload_chance)?;

        if !matches!(self.starting_health, 1 | 2) {
            return Err(ConfigError::StartingHealth(self.starting_health));
        }
        if self.starting_snowballs > self.max_snowballs {
            return Err(ConfigError::AmmoBounds {
                starting: self.starting_snowballs,
                max: self.max_snowballs,
            });
        }
        if self.taps_to_reload == 0 {
            return Err(ConfigError::TapCombo);
        }
        if let AmmoRegen::Idle { interval_ms } = self.regen {
            positive("regen.interval_ms", interval_ms)?;
        }

        let playable = self.arena.playable(self.player_radius);
        if playable.min.x > playable.max.x || playable.min.y > playable.max.y {
            return Err(ConfigError::ArenaTooSmall {
                radius: self.player_radius,
            });
        }
        if let Some(index) = self
            .obstacles
            .iter()
            .position(|obstacle| !(obstacle.min_extent() > 0.0))
        {
            return Err(ConfigError::Obstacle { index });
        }
        for team in Team::ALL {
            if !self.roster.iter().any(|spawn| spawn.team == team) {
                return Err(ConfigError::EmptyTeam(team));
            }
        }
        if let Some(index) = self
            .roster
            .iter()
            .position(|spawn| !playable.contains(spawn.position))
        {
            return Err(ConfigError::SpawnOutsideArena { index });
        }
        Ok(())
    }

    /// Hand every roster slot to the opponent controller (demo / soak runs)
    pub fn with_all_ai(mut self) -> Self {
        for spawn in &mut self.roster {
            spawn.controller = Controller::Ai;
        }
        self
    }
}

/// Coherent gameplay tunings; a deployment picks exactly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ruleset {
    /// 1v1, snowballs vanish on landing, reload by tap combo
    #[default]
    Duel,
    /// 2v2, snowballs settle in the snow, idle players regenerate ammo
    Squad,
    /// One human against two AI throwers with idle regeneration
    Gauntlet,
}

impl Ruleset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ruleset::Duel => "Duel",
            Ruleset::Squad => "Squad",
            Ruleset::Gauntlet => "Gauntlet",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "duel" | "1v1" => Some(Ruleset::Duel),
            "squad" | "2v2" => Some(Ruleset::Squad),
            "gauntlet" => Some(Ruleset::Gauntlet),
            _ => None,
        }
    }

    /// Build the configuration this ruleset plays with
    pub fn config(&self) -> MatchConfig {
        let base = MatchConfig::default();
        match self {
            Ruleset::Duel => base,
            Ruleset::Squad => MatchConfig {
                ground: GroundPolicy::Settle,
                regen: AmmoRegen::Idle {
                    interval_ms: 3000.0,
                },
                roster: vec![
                    PlayerSpawn::new(Team::Blue, 80.0, 170.0, Controller::Human),
                    PlayerSpawn::new(Team::Blue, 80.0, 330.0, Controller::Human),
                    PlayerSpawn::new(Team::Red, 720.0, 170.0, Controller::Ai),
                    PlayerSpawn::new(Team::Red, 720.0, 330.0, Controller::Ai),
                ],
                ..base
            },
            Ruleset::Gauntlet => MatchConfig {
                regen: AmmoRegen::Idle {
                    interval_ms: 2500.0,
                },
                roster: vec![
                    PlayerSpawn::new(Team::Blue, 80.0, 250.0, Controller::Human),
                    PlayerSpawn::new(Team::Red, 720.0, 150.0, Controller::Ai),
                    PlayerSpawn::new(Team::Red, 720.0, 350.0, Controller::Ai),
                ],
                ..base
            },
        }
    }
}
