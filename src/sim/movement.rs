//! Player movement toward a target with obstacle sliding
//!
//! A walker heads straight for its target at a fixed per-tick speed. If the
//! straight step would end inside an obstacle it tries the X-only step, then
//! the Y-only step, and otherwise stays put for this tick. The result is
//! always clamped into the playable rectangle.

use glam::Vec2;

use super::state::{Behavior, Player};
use crate::settings::MatchConfig;

/// Displacements below this count as no movement
const STALL_EPSILON: f32 = 1e-4;

/// What a movement step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No target, or knocked out
    Stationary,
    /// Straight step taken
    Moved,
    /// Only one axis of the step was taken
    Slid,
    /// Every candidate step was obstructed
    Blocked,
    /// Reached the target and dropped it
    Arrived,
    /// Reached the target but a human channel keeps it alive
    Holding,
}

/// Advance one player by one tick
pub fn step_player(player: &mut Player, config: &MatchConfig) -> MoveOutcome {
    if player.knocked_out {
        return MoveOutcome::Stationary;
    }
    let Some(target) = player.target else {
        player.blocked = false;
        return MoveOutcome::Stationary;
    };

    let delta = target - player.pos;
    let dist = delta.length();

    if dist <= config.arrival_epsilon {
        player.blocked = false;
        if player.owner.is_human() {
            return MoveOutcome::Holding;
        }
        player.target = None;
        if player.behavior == Behavior::Walking {
            player.behavior = Behavior::Idle;
        }
        return MoveOutcome::Arrived;
    }

    let step = delta / dist * config.player_speed.min(dist);
    let start = player.pos;
    let (next, outcome) = resolve_step(start, start + step, config);
    let next = config.arena.playable(config.player_radius).clamp(next);

    let outcome = if next.distance(start) < STALL_EPSILON {
        MoveOutcome::Blocked
    } else {
        outcome
    };
    player.pos = next;
    player.blocked = outcome == MoveOutcome::Blocked;
    outcome
}

/// Pick the furthest unobstructed candidate: straight, X-only, then Y-only
fn resolve_step(from: Vec2, to: Vec2, config: &MatchConfig) -> (Vec2, MoveOutcome) {
    let obstacles = &config.obstacles;
    let radius = config.player_radius;

    if !obstacles.is_blocked(to, radius) {
        return (to, MoveOutcome::Moved);
    }
    let x_only = Vec2::new(to.x, from.y);
    if !obstacles.is_blocked(x_only, radius) {
        return (x_only, MoveOutcome::Slid);
    }
    let y_only = Vec2::new(from.x, to.y);
    if !obstacles.is_blocked(y_only, radius) {
        return (y_only, MoveOutcome::Slid);
    }
    (from, MoveOutcome::Blocked)
}
