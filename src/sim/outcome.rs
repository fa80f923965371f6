//! Match lifecycle: start, win detection and the end-of-match grace period

use super::state::{ControlOwner, GameEvent, GameState, MatchPhase, PendingEnd, Team};

/// Reset every player to the roster and begin playing.
///
/// Also cancels a decided-but-not-yet-ended match.
pub fn start_match(state: &mut GameState) {
    state.spawn_roster();
    state.pending_end = None;
    state.clock_ms = 0.0;
    state.time_ticks = 0;
    state.phase = MatchPhase::Playing;
    log::info!(
        "match started: {} players, seed {}",
        state.players.len(),
        state.seed
    );
}

/// Team left standing once the other side is wiped out
pub fn decided_winner(state: &GameState) -> Option<Team> {
    let blue = state.living_count(Team::Blue);
    let red = state.living_count(Team::Red);
    match (blue, red) {
        (0, 0) => None,
        (0, _) => Some(Team::Red),
        (_, 0) => Some(Team::Blue),
        _ => None,
    }
}

/// Schedule the end of the match if a team has been eliminated.
///
/// Only the first decision counts; later knockouts during the grace period
/// never change the winner.
pub fn evaluate_win_condition(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase != MatchPhase::Playing || state.pending_end.is_some() {
        return;
    }
    let Some(winner) = decided_winner(state) else {
        return;
    };
    log::info!("{} team wins, ending in {}ms", winner, state.config.end_grace_ms);
    events.push(GameEvent::MatchDecided { winner });
    state.pending_end = Some(PendingEnd {
        winner,
        remaining_ms: state.config.end_grace_ms,
    });
    if state.config.end_grace_ms <= 0.0 {
        finish(state, winner, events);
    }
}

/// Count down the grace period; ends the match when it runs out
pub fn advance_pending_end(state: &mut GameState, elapsed_ms: f32, events: &mut Vec<GameEvent>) {
    let Some(pending) = state.pending_end.as_mut() else {
        return;
    };
    pending.remaining_ms -= elapsed_ms;
    if pending.remaining_ms <= 0.0 {
        let winner = pending.winner;
        finish(state, winner, events);
    }
}

fn finish(state: &mut GameState, winner: Team, events: &mut Vec<GameEvent>) {
    state.pending_end = None;
    state.phase = MatchPhase::Ended { winner };
    for player in &mut state.players {
        if player.owner.is_human() {
            player.owner = ControlOwner::None;
        }
        player.target = None;
        player.charge_started_ms = None;
        player.brain.aim = None;
    }
    events.push(GameEvent::MatchEnded { winner });
    log::info!("match ended after {:.0}ms", state.clock_ms);
}

impl GameState {
    /// Start (or restart) the match
    pub fn start_match(&mut self) {
        start_match(self);
    }

    /// Winner once the match has fully ended
    pub fn winner(&self) -> Option<Team> {
        match self.phase {
            MatchPhase::Ended { winner } => Some(winner),
            _ => None,
        }
    }
}
