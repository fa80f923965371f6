//! Snow Skirmish entry point
//!
//! Native builds run a headless AI-vs-AI match and log the result. The
//! browser build is driven through `snow_skirmish::web` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "duel".to_string());
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            log::error!("invalid seed: {err}");
            std::process::exit(2);
        }
        None => 1,
    };

    let config = match load_config(&source) {
        Ok(config) => config.with_all_ai(),
        Err(err) => {
            log::error!("{err}");
            std::process::exit(2);
        }
    };

    match headless::run(config, seed) {
        Ok(()) => {}
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    }
}

/// A ruleset name or a path to a JSON config
#[cfg(not(target_arch = "wasm32"))]
fn load_config(source: &str) -> Result<snow_skirmish::MatchConfig, String> {
    use snow_skirmish::{MatchConfig, Ruleset};

    if source.ends_with(".json") {
        let json = std::fs::read_to_string(source)
            .map_err(|err| format!("cannot read {source}: {err}"))?;
        return MatchConfig::from_json(&json).map_err(|err| err.to_string());
    }
    Ruleset::from_str(source)
        .map(|ruleset| ruleset.config())
        .ok_or_else(|| format!("unknown ruleset {source:?} (expected duel, squad or gauntlet)"))
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use snow_skirmish::consts::FRAME_MS;
    use snow_skirmish::sim::{GameEvent, GameState, MatchPhase, Team};
    use snow_skirmish::{ConfigError, MatchConfig};

    /// Ten minutes of game time at 60 Hz
    const MAX_TICKS: u64 = 60 * 60 * 10;

    pub fn run(config: MatchConfig, seed: u64) -> Result<(), ConfigError> {
        let mut state = GameState::new(config, seed)?;
        state.start_match();

        let mut throws = 0u32;
        let mut hits = 0u32;
        while state.time_ticks < MAX_TICKS {
            for event in state.tick(FRAME_MS) {
                match event {
                    GameEvent::Thrown { .. } => throws += 1,
                    GameEvent::Hit {
                        thrower, target, ..
                    } => {
                        hits += 1;
                        log::info!("player {thrower} hit player {target}");
                    }
                    GameEvent::KnockedOut { player, team } => {
                        log::info!("player {player} ({team}) is out");
                    }
                    _ => {}
                }
            }
            if matches!(state.phase, MatchPhase::Ended { .. }) {
                break;
            }
        }

        let seconds = state.clock_ms / 1000.0;
        match state.winner() {
            Some(winner) => log::info!(
                "{winner} team won after {seconds:.1}s ({throws} throws, {hits} hits)"
            ),
            None => log::info!(
                "no winner after {seconds:.1}s: blue {} standing, red {} standing ({throws} throws, {hits} hits)",
                state.living_count(Team::Blue),
                state.living_count(Team::Red)
            ),
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is snow_skirmish::web, this is just to satisfy the compiler
}
