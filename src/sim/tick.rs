//! Simulation step
//!
//! Advances a match by one frame. Order within a tick is fixed: player
//! timers, regeneration and movement, then the AI, then snowballs (which see
//! this tick's positions). A win is only checked when a hit knocks someone
//! out.

use super::ai::update_ai;
use super::movement::step_player;
use super::outcome::advance_pending_end;
use super::projectile::update_projectiles;
use super::reload::regenerate;
use super::state::{GameEvent, GameState, MatchPhase};

/// Advance the match by `elapsed_ms` of game time.
///
/// Returns everything that happened since the previous tick, including
/// throws made by commands in between. Outside `Playing` nothing changes.
pub fn tick(state: &mut GameState, elapsed_ms: f32) -> Vec<GameEvent> {
    let mut events = std::mem::take(&mut state.outbox);
    if state.phase != MatchPhase::Playing {
        return events;
    }

    let elapsed = if elapsed_ms.is_finite() {
        elapsed_ms.max(0.0)
    } else {
        0.0
    };
    state.clock_ms += f64::from(elapsed);
    state.time_ticks += 1;

    for player in &mut state.players {
        player.hit_flash_ms = (player.hit_flash_ms - elapsed).max(0.0);
    }

    // Decided: let snowballs finish their flight, then freeze
    if state.pending_end.is_some() {
        update_projectiles(state, false, &mut events);
        advance_pending_end(state, elapsed, &mut events);
        state.debug_check_invariants();
        return events;
    }

    let config = &state.config;
    for player in &mut state.players {
        if regenerate(player, config.regen, config.max_snowballs, elapsed) {
            events.push(GameEvent::Regenerated { player: player.id });
        }
        step_player(player, config);
    }

    let mut rng = state.rng.clone();
    update_ai(state, &mut rng, elapsed);
    state.rng = rng;
    events.append(&mut state.outbox);

    update_projectiles(state, true, &mut events);

    state.debug_check_invariants();
    events
}

impl GameState {
    pub fn tick(&mut self, elapsed_ms: f32) -> Vec<GameEvent> {
        tick(self, elapsed_ms)
    }
}
