//! Opponent controller
//!
//! Each AI-owned player runs a small state machine over its `Behavior`:
//!
//! - `Idle`: when lined up with the nearest enemy (and holding ammo) it may
//!   start a wind-up; otherwise it may wander toward the enemy's row on its
//!   own side of the centre line.
//! - `Aiming`: counts the wind-up down, then throws at the locked target if
//!   that target is still standing.
//! - `Walking`: movement does the work; a fully blocked walker gives up.
//!
//! Randomness comes from the caller so runs can be replayed from a seed.

use glam::Vec2;
use rand::Rng;

use super::reload::add_snowball;
use super::state::{AiBrain, AimTimer, Behavior, GameState, PlayerId, Team};
use super::throw::release_throw;
use crate::settings::MatchConfig;

/// Run one decision step for every standing AI player, in roster order.
///
/// Throws land in the state's event outbox like any other throw.
pub fn update_ai<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, elapsed_ms: f32) {
    if !state.is_live() {
        return;
    }
    for id in 0..state.players.len() {
        let player = &state.players[id];
        if !player.is_ai() || !player.is_active() {
            continue;
        }
        think(state, id, rng, elapsed_ms);
    }
}

/// Closest standing player on the other team (first in roster order on ties)
pub fn nearest_enemy(state: &GameState, id: PlayerId) -> Option<PlayerId> {
    let me = state.players.get(id)?;
    state
        .players
        .iter()
        .filter(|p| p.team != me.team && p.is_active())
        .min_by(|a, b| {
            a.pos
                .distance_squared(me.pos)
                .total_cmp(&b.pos.distance_squared(me.pos))
        })
        .map(|p| p.id)
}

fn think<R: Rng + ?Sized>(state: &mut GameState, id: PlayerId, rng: &mut R, elapsed_ms: f32) {
    let Some(enemy) = nearest_enemy(state, id) else {
        return;
    };
    let enemy_pos = state.players[enemy].pos;
    let tuning = state.config.ai;

    match state.players[id].behavior {
        Behavior::Idle => {
            let me = &state.players[id];
            let lined_up = (enemy_pos.y - me.pos.y).abs() < tuning.alignment_tolerance;
            let (team, has_ammo) = (me.team, me.snowballs > 0);

            if has_ammo && lined_up && rng.random_bool(tuning.aim_chance) {
                let total_ms = rng.random_range(tuning.aim_min_ms..=tuning.aim_max_ms);
                let me = &mut state.players[id];
                me.brain = AiBrain {
                    target: Some(enemy),
                    aim: Some(AimTimer {
                        remaining_ms: total_ms,
                        total_ms,
                    }),
                };
                me.target = None;
                me.behavior = Behavior::Aiming;
                log::trace!("ai {} winding up at player {} for {:.0}ms", id, enemy, total_ms);
            } else if rng.random_bool(tuning.walk_chance) {
                let goal = walk_target(&state.config, team, enemy_pos, rng);
                let me = &mut state.players[id];
                me.target = Some(goal);
                me.behavior = Behavior::Walking;
            } else if !has_ammo && rng.random_bool(tuning.reload_chance) {
                let max = state.config.max_snowballs;
                add_snowball(&mut state.players[id], max);
            }
        }
        Behavior::Aiming => {
            let me = &mut state.players[id];
            let Some(mut aim) = me.brain.aim else {
                me.behavior = Behavior::Idle;
                me.brain.target = None;
                return;
            };
            aim.remaining_ms -= elapsed_ms;
            if aim.remaining_ms > 0.0 {
                me.brain.aim = Some(aim);
                return;
            }
            me.brain.aim = None;
            let locked = me.brain.target.take();
            let has_ammo = me.snowballs > 0;
            let origin = me.pos;

            let victim = locked.and_then(|t| state.players.get(t)).filter(|p| p.is_active());
            match victim {
                Some(victim) if has_ammo => {
                    let dx = (victim.pos.x - origin.x).abs();
                    let power = throw_power(&state.config, dx, rng);
                    release_throw(state, id, power);
                }
                _ => log::trace!("ai {} lost its target, standing down", id),
            }
            state.players[id].behavior = Behavior::Idle;
        }
        Behavior::Walking => {
            let me = &mut state.players[id];
            if me.blocked {
                me.target = None;
                me.blocked = false;
                me.behavior = Behavior::Idle;
            } else if me.target.is_none() {
                me.behavior = Behavior::Idle;
            }
        }
    }
}

/// Throw power for a horizontal gap `dx`: further means harder, plus jitter
pub fn throw_power<R: Rng + ?Sized>(config: &MatchConfig, dx: f32, rng: &mut R) -> f32 {
    let tuning = &config.ai;
    let jitter = tuning.power_jitter.abs();
    let noise = if jitter > 0.0 {
        rng.random_range(-jitter..=jitter)
    } else {
        0.0
    };
    (dx / tuning.max_throw_distance + noise).clamp(tuning.min_power, 1.0)
}

/// Wander target on `team`'s side of the centre line, near the enemy's row
pub fn walk_target<R: Rng + ?Sized>(
    config: &MatchConfig,
    team: Team,
    enemy: Vec2,
    rng: &mut R,
) -> Vec2 {
    let playable = config.arena.playable(config.player_radius);
    let mid = config.arena.midline_x();
    let margin = config.ai.midline_margin;
    let (lo, hi) = match team {
        Team::Blue => (playable.min.x, mid - margin),
        Team::Red => (mid + margin, playable.max.x),
    };
    let x = if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        (lo + hi) * 0.5
    };

    let jitter = config.ai.walk_jitter.abs();
    let y = if jitter > 0.0 {
        enemy.y + rng.random_range(-jitter..=jitter)
    } else {
        enemy.y
    };
    playable.clamp(Vec2::new(x, y))
}
