//! Snowball ballistics and hit resolution
//!
//! Each tick a snowball first loses `gravity` of vertical velocity, then
//! moves by its velocity. Airborne snowballs are tested in order against
//! opposing players, obstacles and the inside of the wall; the first match
//! ends the snowball. Removal is deferred until the whole pass is done.

use glam::Vec3;

use super::collision::planar_distance;
use super::outcome;
use super::state::{DestroyCause, GameEvent, GameState};
use crate::settings::GroundPolicy;

/// Advance every snowball by one tick.
///
/// With `resolve_hits` false snowballs still fly, land and break on
/// obstacles but pass through players (used while a decided match winds down).
/// Hits also stop for the rest of the pass once a knockout decides the match.
pub fn update_projectiles(state: &mut GameState, resolve_hits: bool, events: &mut Vec<GameEvent>) {
    let mut spent = vec![false; state.projectiles.len()];

    for index in 0..state.projectiles.len() {
        let mut ball = state.projectiles[index];
        if ball.settled {
            continue;
        }

        ball.vel.z -= state.config.gravity;
        ball.pos += ball.vel;

        let inner = state.config.arena.inner();
        let planar = ball.planar();

        if ball.pos.z <= 0.0 {
            match state.config.ground {
                GroundPolicy::Despawn => {
                    spent[index] = true;
                    events.push(GameEvent::Landed {
                        projectile: ball.id,
                        settled: false,
                    });
                }
                GroundPolicy::Settle if !inner.contains(planar) => {
                    spent[index] = true;
                    events.push(GameEvent::Destroyed {
                        projectile: ball.id,
                        cause: DestroyCause::OutOfBounds,
                    });
                }
                GroundPolicy::Settle => {
                    ball.pos.z = 0.0;
                    ball.vel = Vec3::ZERO;
                    ball.settled = true;
                    events.push(GameEvent::Landed {
                        projectile: ball.id,
                        settled: true,
                    });
                }
            }
            state.projectiles[index] = ball;
            continue;
        }
        state.projectiles[index] = ball;

        if resolve_hits && state.is_live() {
            let reach = state.config.player_radius + state.config.snowball_radius;
            let victim = state.players.iter().position(|p| {
                p.is_active() && p.team != ball.team && planar_distance(p.pos, planar) < reach
            });
            if let Some(victim) = victim {
                spent[index] = true;
                let flash = state.config.hit_flash_ms;
                let player = &mut state.players[victim];
                let knocked_out = player.take_hit(flash);
                let (team, health_left) = (player.team, player.health);
                log::debug!(
                    "snowball {} from player {} hit player {} ({} health left)",
                    ball.id,
                    ball.owner,
                    victim,
                    health_left
                );
                events.push(GameEvent::Hit {
                    projectile: ball.id,
                    thrower: ball.owner,
                    target: victim,
                    health_left,
                });
                if knocked_out {
                    log::debug!("player {} ({}) knocked out", victim, team);
                    events.push(GameEvent::KnockedOut {
                        player: victim,
                        team,
                    });
                    outcome::evaluate_win_condition(state, events);
                }
                continue;
            }
        }

        let cause = if state.config.obstacles.is_blocked(planar, state.config.snowball_radius) {
            Some(DestroyCause::Obstacle)
        } else if !inner.contains(planar) {
            Some(DestroyCause::OutOfBounds)
        } else {
            None
        };
        if let Some(cause) = cause {
            spent[index] = true;
            events.push(GameEvent::Destroyed {
                projectile: ball.id,
                cause,
            });
        }
    }

    let mut flags = spent.into_iter();
    state
        .projectiles
        .retain(|_| !flags.next().unwrap_or(false));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MatchConfig;
    use crate::sim::arena::{Obstacle, ObstacleField};
    use crate::sim::state::{MatchPhase, Projectile, Team};
    use crate::sim::throw::release_throw;
    use glam::Vec2;

    fn open_field(ground: GroundPolicy) -> GameState {
        let config = MatchConfig {
            obstacles: ObstacleField::default(),
            ground,
            ..MatchConfig::default()
        };
        let mut state = GameState::new(config, 5).unwrap();
        state.phase = MatchPhase::Playing;
        state
    }

    fn place_ball(state: &mut GameState, pos: Vec3, vel: Vec3, team: Team, owner: usize) {
        let id = state.next_projectile_id();
        state.projectiles.push(Projectile {
            id,
            pos,
            vel,
            team,
            owner,
            settled: false,
        });
    }

    #[test]
    fn test_full_power_throw_trajectory() {
        let mut state = open_field(GroundPolicy::Despawn);
        state.players[0].pos = Vec2::new(100.0, 250.0);
        // Keep the red player out of the flight path
        state.players[1].pos = Vec2::new(700.0, 100.0);
        release_throw(&mut state, 0, 1.0).unwrap();
        assert_eq!(state.players[0].snowballs, 0);

        let mut events = Vec::new();
        for n in 1..=10u32 {
            update_projectiles(&mut state, true, &mut events);
            let ball = state.projectiles[0];
            assert!((ball.pos.x - (100.0 + 12.0 * n as f32)).abs() < 1e-3);
            let expected_z = 28.0 - 0.15 * (n * (n + 1)) as f32 / 2.0;
            assert!((ball.pos.z - expected_z).abs() < 1e-3, "tick {n}: z {}", ball.pos.z);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn test_despawn_on_ground() {
        let mut state = open_field(GroundPolicy::Despawn);
        place_ball(&mut state, Vec3::new(300.0, 250.0, 0.1), Vec3::ZERO, Team::Blue, 0);
        let mut events = Vec::new();
        update_projectiles(&mut state, true, &mut events);
        assert!(state.projectiles.is_empty());
        assert!(matches!(events[0], GameEvent::Landed { settled: false, .. }));
    }

    #[test]
    fn test_settle_on_ground_stops_and_ignores_players() {
        let mut state = open_field(GroundPolicy::Settle);
        place_ball(
            &mut state,
            Vec3::new(300.0, 250.0, 0.1),
            Vec3::new(5.0, 0.0, 0.0),
            Team::Red,
            1,
        );
        let mut events = Vec::new();
        update_projectiles(&mut state, true, &mut events);
        let ball = state.projectiles[0];
        assert!(ball.settled);
        assert_eq!(ball.pos.z, 0.0);
        assert_eq!(ball.vel, Vec3::ZERO);

        // A blue player walking onto the resting snowball is not hit
        state.players[0].pos = Vec2::new(305.0, 250.0);
        for _ in 0..5 {
            update_projectiles(&mut state, true, &mut events);
        }
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].pos, ball.pos);
        assert_eq!(state.players[0].health, 2);
    }

    #[test]
    fn test_settle_outside_arena_despawns() {
        let mut state = open_field(GroundPolicy::Settle);
        place_ball(
            &mut state,
            Vec3::new(780.0, 250.0, 0.1),
            Vec3::new(10.0, 0.0, 0.0),
            Team::Blue,
            0,
        );
        let mut events = Vec::new();
        update_projectiles(&mut state, true, &mut events);
        assert!(state.projectiles.is_empty());
        assert!(matches!(
            events[0],
            GameEvent::Destroyed {
                cause: DestroyCause::OutOfBounds,
                ..
            }
        ));
    }

    #[test]
    fn test_hit_reduces_health_and_spares_own_team() {
        let mut state = open_field(GroundPolicy::Despawn);
        state.players[0].pos = Vec2::new(100.0, 250.0);
        state.players[1].pos = Vec2::new(700.0, 250.0);
        // Red snowball just past the blue player, still airborne
        place_ball(
            &mut state,
            Vec3::new(130.0, 250.0, 20.0),
            Vec3::new(-4.0, 0.0, 0.0),
            Team::Red,
            1,
        );
        let mut events = Vec::new();
        update_projectiles(&mut state, true, &mut events);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.players[0].health, 1);
        assert_eq!(state.players[0].hit_flash_ms, 200.0);
        assert!(!state.players[0].knocked_out);
        assert_eq!(state.players[1].health, 2);
        assert!(matches!(
            events[0],
            GameEvent::Hit {
                target: 0,
                health_left: 1,
                ..
            }
        ));

        // Friendly snowball passes through its own thrower
        place_ball(
            &mut state,
            Vec3::new(700.0, 250.0, 20.0),
            Vec3::new(-4.0, 0.0, 0.0),
            Team::Red,
            1,
        );
        update_projectiles(&mut state, true, &mut events);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.players[1].health, 2);
    }

    #[test]
    fn test_knockout_schedules_match_end() {
        let mut state = open_field(GroundPolicy::Despawn);
        state.players[1].health = 1;
        let red = state.players[1].pos;
        place_ball(
            &mut state,
            Vec3::new(red.x - 10.0, red.y, 20.0),
            Vec3::new(4.0, 0.0, 0.0),
            Team::Blue,
            0,
        );
        let mut events = Vec::new();
        update_projectiles(&mut state, true, &mut events);
        assert!(state.players[1].knocked_out);
        assert_eq!(state.players[1].health, 0);
        assert!(events.contains(&GameEvent::KnockedOut {
            player: 1,
            team: Team::Red
        }));
        assert!(events.contains(&GameEvent::MatchDecided { winner: Team::Blue }));
        assert_eq!(state.pending_end.map(|p| p.winner), Some(Team::Blue));
        assert_eq!(state.phase, MatchPhase::Playing);
    }

    #[test]
    fn test_one_hit_per_snowball() {
        let mut state = GameState::new(
            MatchConfig {
                obstacles: ObstacleField::default(),
                ..crate::settings::Ruleset::Squad.config()
            },
            1,
        )
        .unwrap();
        state.phase = MatchPhase::Playing;
        // Stack both red players on the same spot
        state.players[2].pos = Vec2::new(500.0, 250.0);
        state.players[3].pos = Vec2::new(500.0, 250.0);
        place_ball(
            &mut state,
            Vec3::new(495.0, 250.0, 20.0),
            Vec3::ZERO,
            Team::Blue,
            0,
        );
        let mut events = Vec::new();
        update_projectiles(&mut state, true, &mut events);
        assert_eq!(state.players[2].health, 1);
        assert_eq!(state.players[3].health, 2);
    }

    #[test]
    fn test_obstacle_destroys_snowball() {
        let mut state = open_field(GroundPolicy::Despawn);
        state.config.obstacles = ObstacleField::new(vec![Obstacle::tree(400.0, 250.0, 25.0)]);
        place_ball(
            &mut state,
            Vec3::new(370.0, 250.0, 20.0),
            Vec3::new(4.0, 0.0, 0.0),
            Team::Blue,
            0,
        );
        let mut events = Vec::new();
        update_projectiles(&mut state, true, &mut events);
        assert!(state.projectiles.is_empty());
        assert!(matches!(
            events[0],
            GameEvent::Destroyed {
                cause: DestroyCause::Obstacle,
                ..
            }
        ));
    }

    #[test]
    fn test_leaving_inner_wall_destroys_snowball() {
        let mut state = open_field(GroundPolicy::Despawn);
        place_ball(
            &mut state,
            Vec3::new(780.0, 250.0, 25.0),
            Vec3::new(12.0, 0.0, 0.0),
            Team::Blue,
            0,
        );
        let mut events = Vec::new();
        update_projectiles(&mut state, true, &mut events);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_hits_suppressed_while_winding_down() {
        let mut state = open_field(GroundPolicy::Despawn);
        let blue = state.players[0].pos;
        place_ball(
            &mut state,
            Vec3::new(blue.x + 5.0, blue.y, 20.0),
            Vec3::ZERO,
            Team::Red,
            1,
        );
        let mut events = Vec::new();
        update_projectiles(&mut state, false, &mut events);
        assert_eq!(state.players[0].health, 2);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_deciding_hit_stops_later_hits_in_same_pass() {
        let mut state = open_field(GroundPolicy::Despawn);
        state.players[0].health = 1;
        state.players[1].health = 1;
        let (blue, red) = (state.players[0].pos, state.players[1].pos);
        place_ball(&mut state, Vec3::new(red.x - 5.0, red.y, 20.0), Vec3::ZERO, Team::Blue, 0);
        place_ball(&mut state, Vec3::new(blue.x + 5.0, blue.y, 20.0), Vec3::ZERO, Team::Red, 1);

        let mut events = Vec::new();
        update_projectiles(&mut state, true, &mut events);
        assert!(state.players[1].knocked_out);
        assert_eq!(state.players[0].health, 1);
        assert!(!state.players[0].knocked_out);
        assert_eq!(state.pending_end.map(|p| p.winner), Some(Team::Blue));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Hit { target: 0, .. })));
        // The red snowball keeps flying
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].id, 2);
    }

    #[test]
    fn test_removal_keeps_survivor_order() {
        let mut state = open_field(GroundPolicy::Despawn);
        place_ball(&mut state, Vec3::new(300.0, 100.0, 20.0), Vec3::ZERO, Team::Blue, 0);
        place_ball(&mut state, Vec3::new(300.0, 200.0, 0.05), Vec3::ZERO, Team::Blue, 0);
        place_ball(&mut state, Vec3::new(300.0, 300.0, 20.0), Vec3::ZERO, Team::Blue, 0);
        let mut events = Vec::new();
        update_projectiles(&mut state, true, &mut events);
        let ids: Vec<_> = state.projectiles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
