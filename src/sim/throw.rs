//! Charge and throw mechanics
//!
//! Holding a charge scales the throw speed linearly between the configured
//! minimum and maximum. Throws always travel along the team's fixed
//! horizontal axis; there is no vertical or lateral aim.

use glam::Vec3;

use super::state::{Behavior, GameEvent, GameState, Player, PlayerId, Projectile, ProjectileId};
use crate::clamp01;
use crate::settings::MatchConfig;

/// Horizontal launch speed for a charge power in `[0, 1]`
pub fn throw_speed(config: &MatchConfig, power: f32) -> f32 {
    let power = clamp01(power);
    config.snowball_speed_min + (config.snowball_speed_max - config.snowball_speed_min) * power
}

/// Fraction of a full charge held at `now_ms` (0 when not charging)
pub fn charge_progress(player: &Player, now_ms: f64, max_charge_ms: f32) -> f32 {
    match player.charge_started_ms {
        Some(started) => clamp01(((now_ms - started) / max_charge_ms as f64) as f32),
        None => 0.0,
    }
}

/// Start holding a charge; ignored without ammo or while already charging
pub fn begin_charge(player: &mut Player, now_ms: f64) -> bool {
    if player.knocked_out || player.snowballs == 0 || player.is_charging() {
        return false;
    }
    player.charge_started_ms = Some(now_ms);
    player.behavior = Behavior::Aiming;
    true
}

/// Let go of a charge without throwing
pub fn abandon_charge(player: &mut Player) {
    player.charge_started_ms = None;
    if player.behavior == Behavior::Aiming {
        player.behavior = if player.target.is_some() {
            Behavior::Walking
        } else {
            Behavior::Idle
        };
    }
}

/// Throw one snowball at `power`; returns the new snowball's id
pub fn release_throw(state: &mut GameState, id: PlayerId, power: f32) -> Option<ProjectileId> {
    let config = &state.config;
    let speed = throw_speed(config, power);
    let offset = config.throw_offset;
    let launch_height = config.launch_height;

    let player = state.players.get_mut(id)?;
    if player.knocked_out || player.snowballs == 0 {
        return None;
    }
    player.snowballs -= 1;
    player.charge_started_ms = None;
    player.behavior = if player.target.is_some() {
        Behavior::Walking
    } else {
        Behavior::Idle
    };

    let direction = player.team.throw_direction();
    let origin = player.pos;
    let team = player.team;

    let projectile_id = state.next_projectile_id();
    state.projectiles.push(Projectile {
        id: projectile_id,
        pos: Vec3::new(origin.x + direction * offset, origin.y, launch_height),
        vel: Vec3::new(direction * speed, 0.0, 0.0),
        team,
        owner: id,
        settled: false,
    });
    state.outbox.push(GameEvent::Thrown {
        player: id,
        projectile: projectile_id,
    });
    log::debug!(
        "player {} ({}) threw snowball {} at speed {:.2}",
        id,
        team,
        projectile_id,
        speed
    );
    Some(projectile_id)
}
