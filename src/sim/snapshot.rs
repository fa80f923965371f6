//! Read-only view of a match for presentation layers
//!
//! Built between ticks. Nothing here can mutate the match.

use glam::{Vec2, Vec3};
use serde::Serialize;

use super::state::{Behavior, ControlOwner, GameState, MatchPhase, PlayerId, ProjectileId, Team};
use super::throw::charge_progress;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub team: Team,
    pub pos: Vec2,
    pub target: Option<Vec2>,
    pub health: u8,
    pub knocked_out: bool,
    pub snowballs: u8,
    pub behavior: Behavior,
    /// Held charge or AI wind-up, in `[0, 1]`
    pub charge_progress: f32,
    pub owner: ControlOwner,
    pub hit_flash_ms: f32,
    /// Taps counting toward the reload combo
    pub reload_taps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub id: ProjectileId,
    pub pos: Vec3,
    pub team: Team,
    pub settled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: MatchPhase,
    pub clock_ms: f64,
    pub tick: u64,
    /// Winner already decided, match still winding down
    pub deciding: Option<Team>,
    pub players: Vec<PlayerView>,
    pub projectiles: Vec<ProjectileView>,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let config = &self.config;
        let players = self
            .players
            .iter()
            .map(|p| {
                let charge = match p.brain.aim {
                    Some(aim) => aim.progress(),
                    None => charge_progress(p, self.clock_ms, config.max_charge_ms),
                };
                PlayerView {
                    id: p.id,
                    team: p.team,
                    pos: p.pos,
                    target: p.target,
                    health: p.health,
                    knocked_out: p.knocked_out,
                    snowballs: p.snowballs,
                    behavior: p.behavior,
                    charge_progress: charge,
                    owner: p.owner,
                    hit_flash_ms: p.hit_flash_ms,
                    reload_taps: p.taps.recent(self.clock_ms, config.tap_window_ms),
                }
            })
            .collect();
        let projectiles = self
            .projectiles
            .iter()
            .map(|b| ProjectileView {
                id: b.id,
                pos: b.pos,
                team: b.team,
                settled: b.settled,
            })
            .collect();

        Snapshot {
            phase: self.phase,
            clock_ms: self.clock_ms,
            tick: self.time_ticks,
            deciding: self.pending_end.map(|p| p.winner),
            players,
            projectiles,
        }
    }
}

impl Snapshot {
    pub fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::Ended { .. })
    }

    pub fn living(&self, team: Team) -> usize {
        self.players
            .iter()
            .filter(|p| p.team == team && !p.knocked_out)
            .count()
    }
}
