//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick(elapsed_ms)`
//! - Seeded RNG only (owned by the match)
//! - Stable iteration order (roster order for players, id order for snowballs)
//! - No rendering or platform dependencies

pub mod ai;
pub mod arena;
pub mod collision;
pub mod command;
pub mod movement;
pub mod outcome;
pub mod projectile;
pub mod reload;
pub mod snapshot;
pub mod state;
pub mod throw;
pub mod tick;

pub use arena::{Arena, Obstacle, ObstacleField};
pub use collision::{Rect, planar_distance, point_in_obstacle};
pub use command::{Command, Selector};
pub use movement::MoveOutcome;
pub use outcome::{evaluate_win_condition, start_match};
pub use snapshot::{PlayerView, ProjectileView, Snapshot};
pub use state::{
    Behavior, ChannelId, ControlOwner, DestroyCause, GameEvent, GameState, MatchPhase, Outcome,
    Player, PlayerId, Projectile, ProjectileId, Team,
};
pub use tick::tick;
