//! Match state and core simulation types
//!
//! The match exclusively owns its players and snowballs. Players live in a
//! roster-ordered `Vec` indexed by [`PlayerId`] and are never removed during
//! a match; snowballs are marked during a pass and compacted afterwards.

use std::fmt;

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::reload::TapCombo;
use crate::settings::{ConfigError, Controller, MatchConfig, PlayerSpawn};

/// Roster index of a player (stable for the lifetime of a match)
pub type PlayerId = usize;
/// Snowball identifier, unique within a match
pub type ProjectileId = u32;
/// Input channel identifier (one pointer, touch, or gamepad)
pub type ChannelId = u32;

/// The two sides of the fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Blue, Team::Red];

    /// Sign of the fixed horizontal throw axis
    #[inline]
    pub fn throw_direction(self) -> f32 {
        match self {
            Team::Blue => 1.0,
            Team::Red => -1.0,
        }
    }

    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Team::Blue => "blue",
            Team::Red => "red",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a player is visibly doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    #[default]
    Idle,
    Walking,
    Aiming,
}

/// Who currently drives a player's intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "channel", rename_all = "snake_case")]
pub enum ControlOwner {
    #[default]
    None,
    Human(ChannelId),
    Ai,
}

impl ControlOwner {
    /// A human channel is holding the player (targets persist after arrival)
    #[inline]
    pub fn is_human(&self) -> bool {
        matches!(self, ControlOwner::Human(_))
    }
}

/// Countdown for an AI wind-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimTimer {
    pub remaining_ms: f32,
    pub total_ms: f32,
}

impl AimTimer {
    pub fn progress(&self) -> f32 {
        if self.total_ms <= 0.0 {
            return 1.0;
        }
        crate::clamp01(1.0 - self.remaining_ms / self.total_ms)
    }
}

/// Opponent controller memory for one player
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiBrain {
    /// Enemy picked when the wind-up started (re-validated before throwing)
    pub target: Option<PlayerId>,
    pub aim: Option<AimTimer>,
}

/// A thrower on either team
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub team: Team,
    /// Position restored by a match reset
    pub spawn: Vec2,
    pub pos: Vec2,
    /// Active movement target
    pub target: Option<Vec2>,
    pub health: u8,
    pub knocked_out: bool,
    pub snowballs: u8,
    pub behavior: Behavior,
    pub owner: ControlOwner,
    /// Clock time a held charge began
    pub charge_started_ms: Option<f64>,
    /// Remaining hit-flash time (ms)
    pub hit_flash_ms: f32,
    pub brain: AiBrain,
    pub taps: TapCombo,
    /// Idle time banked toward the next regenerated snowball
    pub regen_ms: f32,
    /// Last movement attempt was fully obstructed
    pub blocked: bool,
}

impl Player {
    pub fn new(id: PlayerId, spawn: &PlayerSpawn, config: &MatchConfig) -> Self {
        Self {
            id,
            team: spawn.team,
            spawn: spawn.position,
            pos: spawn.position,
            target: None,
            health: config.starting_health,
            knocked_out: false,
            snowballs: config.starting_snowballs,
            behavior: Behavior::Idle,
            owner: match spawn.controller {
                Controller::Human => ControlOwner::None,
                Controller::Ai => ControlOwner::Ai,
            },
            charge_started_ms: None,
            hit_flash_ms: 0.0,
            brain: AiBrain::default(),
            taps: TapCombo::default(),
            regen_ms: 0.0,
            blocked: false,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.knocked_out
    }

    #[inline]
    pub fn is_ai(&self) -> bool {
        self.owner == ControlOwner::Ai
    }

    #[inline]
    pub fn is_charging(&self) -> bool {
        self.charge_started_ms.is_some()
    }

    /// Drop movement, charge and wind-up (used on knockout and release)
    pub fn clear_intents(&mut self) {
        self.target = None;
        self.charge_started_ms = None;
        self.brain.aim = None;
        self.brain.target = None;
        self.behavior = Behavior::Idle;
    }

    /// Take one point of damage; returns true if this knocked the player out
    pub fn take_hit(&mut self, flash_ms: f32) -> bool {
        self.health = self.health.saturating_sub(1);
        self.hit_flash_ms = flash_ms;
        if self.health == 0 {
            self.knocked_out = true;
            self.clear_intents();
            return true;
        }
        false
    }
}

/// A snowball in flight (or resting, under the settle policy)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    /// `z` is height above the ground
    pub pos: Vec3,
    pub vel: Vec3,
    pub team: Team,
    pub owner: PlayerId,
    /// Resting on the ground; no longer collides with anything
    pub settled: bool,
}

impl Projectile {
    #[inline]
    pub fn planar(&self) -> Vec2 {
        self.pos.truncate()
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        !self.settled && self.pos.z > 0.0
    }
}

/// Why a snowball left play without hitting anyone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestroyCause {
    Obstacle,
    OutOfBounds,
}

/// Things that happened during a tick, for sound and effects collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Thrown {
        player: PlayerId,
        projectile: ProjectileId,
    },
    Hit {
        projectile: ProjectileId,
        thrower: PlayerId,
        target: PlayerId,
        health_left: u8,
    },
    KnockedOut {
        player: PlayerId,
        team: Team,
    },
    /// Reached the ground (despawned or settled, per the ground policy)
    Landed {
        projectile: ProjectileId,
        settled: bool,
    },
    Destroyed {
        projectile: ProjectileId,
        cause: DestroyCause,
    },
    Regenerated {
        player: PlayerId,
    },
    /// A team was wiped out; the grace period started
    MatchDecided {
        winner: Team,
    },
    /// Grace period over; the match is frozen
    MatchEnded {
        winner: Team,
    },
}

/// How a finished match went for one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Lose,
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum MatchPhase {
    /// Before the first start
    #[default]
    Menu,
    /// Ticks advance the simulation
    Playing,
    /// Frozen; no tick mutates anything
    Ended { winner: Team },
}

impl MatchPhase {
    /// Win/lose from the point of view of `team` (None until the match ends)
    pub fn outcome_for(&self, team: Team) -> Option<Outcome> {
        match *self {
            MatchPhase::Ended { winner } if winner == team => Some(Outcome::Win),
            MatchPhase::Ended { .. } => Some(Outcome::Lose),
            _ => None,
        }
    }
}

/// A decided match waiting out its grace period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingEnd {
    pub winner: Team,
    pub remaining_ms: f32,
}

/// Complete match state (deterministic for a given seed and command stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: MatchConfig,
    pub phase: MatchPhase,
    /// Roster order, indexed by `PlayerId`
    pub players: Vec<Player>,
    /// Live snowballs, ascending by id
    pub projectiles: Vec<Projectile>,
    /// Scheduled transition to `Ended`
    pub pending_end: Option<PendingEnd>,
    /// Simulation clock (sum of tick elapsed times, ms)
    pub clock_ms: f64,
    pub time_ticks: u64,
    /// Seed the RNG was last initialised from
    pub seed: u64,
    pub rng: Pcg32,
    /// Events raised outside a tick (command throws), handed out by the next tick
    pub(crate) outbox: Vec<GameEvent>,
    next_projectile_id: ProjectileId,
}

impl GameState {
    /// Validate the config and build a match sitting in the menu
    pub fn new(config: MatchConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut state = Self {
            config,
            phase: MatchPhase::Menu,
            players: Vec::new(),
            projectiles: Vec::new(),
            pending_end: None,
            clock_ms: 0.0,
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            outbox: Vec::new(),
            next_projectile_id: 1,
        };
        state.spawn_roster();
        Ok(state)
    }

    /// Restart the random stream from a known seed
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
    }

    /// Rebuild every player from the roster and drop all snowballs
    pub(crate) fn spawn_roster(&mut self) {
        self.players = self
            .config
            .roster
            .iter()
            .enumerate()
            .map(|(id, spawn)| Player::new(id, spawn, &self.config))
            .collect();
        self.projectiles.clear();
        self.outbox.clear();
        self.next_projectile_id = 1;
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    /// Players still standing on `team`
    pub fn living_count(&self, team: Team) -> usize {
        self.players
            .iter()
            .filter(|p| p.team == team && p.is_active())
            .count()
    }

    /// Simulation may mutate players (playing and not yet decided)
    pub fn is_live(&self) -> bool {
        self.phase == MatchPhase::Playing && self.pending_end.is_none()
    }

    /// Allocate a new snowball ID
    pub fn next_projectile_id(&mut self) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        id
    }

    /// Check the per-player and per-snowball invariants (debug builds)
    pub fn debug_check_invariants(&self) {
        for player in &self.players {
            debug_assert!(
                player.health <= self.config.starting_health,
                "player {} health {} out of range",
                player.id,
                player.health
            );
            debug_assert_eq!(player.knocked_out, player.health == 0);
            debug_assert!(player.snowballs <= self.config.max_snowballs);
        }
        for projectile in &self.projectiles {
            debug_assert!(
                projectile.pos.is_finite() && projectile.vel.is_finite(),
                "snowball {} has a non-finite state",
                projectile.id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Ruleset;

    #[test]
    fn test_new_state_sits_in_menu_with_roster() {
        let state = GameState::new(MatchConfig::default(), 7).unwrap();
        assert_eq!(state.phase, MatchPhase::Menu);
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.players[0].team, Team::Blue);
        assert_eq!(state.players[0].owner, ControlOwner::None);
        assert_eq!(state.players[1].owner, ControlOwner::Ai);
        assert_eq!(state.players[1].pos, Vec2::new(720.0, 250.0));
        assert_eq!(state.players[0].snowballs, 1);
        assert_eq!(state.players[0].health, 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = MatchConfig {
            player_speed: 0.0,
            ..MatchConfig::default()
        };
        assert!(GameState::new(config, 1).is_err());
    }

    #[test]
    fn test_take_hit_knocks_out_at_zero() {
        let state = GameState::new(Ruleset::Duel.config(), 1).unwrap();
        let mut player = state.players[0].clone();
        player.target = Some(Vec2::new(300.0, 300.0));
        assert!(!player.take_hit(200.0));
        assert_eq!(player.health, 1);
        assert!(!player.knocked_out);
        assert_eq!(player.hit_flash_ms, 200.0);
        assert!(player.take_hit(200.0));
        assert_eq!(player.health, 0);
        assert!(player.knocked_out);
        assert_eq!(player.target, None);
        // Saturates instead of wrapping
        player.take_hit(200.0);
        assert_eq!(player.health, 0);
    }

    #[test]
    fn test_outcome_for() {
        let phase = MatchPhase::Ended { winner: Team::Red };
        assert_eq!(phase.outcome_for(Team::Red), Some(Outcome::Win));
        assert_eq!(phase.outcome_for(Team::Blue), Some(Outcome::Lose));
        assert_eq!(MatchPhase::Playing.outcome_for(Team::Blue), None);
    }

    #[test]
    fn test_team_axis() {
        assert_eq!(Team::Blue.throw_direction(), 1.0);
        assert_eq!(Team::Red.throw_direction(), -1.0);
        assert_eq!(Team::Blue.opponent(), Team::Red);
    }

    #[test]
    fn test_projectile_ids_increase() {
        let mut state = GameState::new(MatchConfig::default(), 1).unwrap();
        let a = state.next_projectile_id();
        let b = state.next_projectile_id();
        assert!(b > a);
    }

    #[test]
    fn test_aim_timer_progress() {
        let timer = AimTimer {
            remaining_ms: 250.0,
            total_ms: 1000.0,
        };
        assert!((timer.progress() - 0.75).abs() < 1e-6);
    }
}
