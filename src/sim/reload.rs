//! Snowball replenishment
//!
//! Three sources top a player's ammo up, none of them past the configured
//! maximum: explicit reload commands, a rapid-tap combo, and (under
//! [`AmmoRegen::Idle`]) time spent standing still.

use super::state::{Behavior, Player};
use crate::settings::AmmoRegen;

/// Recent quick taps on one player
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TapCombo {
    taps: Vec<f64>,
}

impl TapCombo {
    /// Record a tap; returns true when enough taps landed inside the window.
    /// A completed combo always resets, even if the reload is wasted.
    pub fn record(&mut self, now_ms: f64, window_ms: f64, needed: u32) -> bool {
        self.taps.push(now_ms);
        self.taps.retain(|&t| now_ms - t < window_ms);
        if self.taps.len() >= needed as usize {
            self.taps.clear();
            return true;
        }
        false
    }

    /// Taps still counting toward the combo (for a progress ring)
    pub fn recent(&self, now_ms: f64, window_ms: f64) -> usize {
        self.taps.iter().filter(|&&t| now_ms - t < window_ms).count()
    }

    pub fn clear(&mut self) {
        self.taps.clear();
    }
}

/// Add one snowball if the player is standing and below `max`
pub fn add_snowball(player: &mut Player, max: u8) -> bool {
    if player.knocked_out || player.snowballs >= max {
        return false;
    }
    player.snowballs += 1;
    true
}

/// Advance idle regeneration; returns true if a snowball was added
pub fn regenerate(player: &mut Player, regen: AmmoRegen, max: u8, elapsed_ms: f32) -> bool {
    let AmmoRegen::Idle { interval_ms } = regen else {
        return false;
    };
    if player.knocked_out || player.behavior != Behavior::Idle || player.snowballs >= max {
        player.regen_ms = 0.0;
        return false;
    }
    player.regen_ms += elapsed_ms;
    if player.regen_ms >= interval_ms {
        player.regen_ms -= interval_ms;
        return add_snowball(player, max);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MatchConfig;
    use crate::sim::state::GameState;

    fn player() -> Player {
        let state = GameState::new(MatchConfig::default(), 3).unwrap();
        state.players[0].clone()
    }

    #[test]
    fn test_add_snowball_caps_at_max() {
        let mut p = player();
        p.snowballs = 2;
        assert!(add_snowball(&mut p, 3));
        assert_eq!(p.snowballs, 3);
        assert!(!add_snowball(&mut p, 3));
        assert_eq!(p.snowballs, 3);
    }

    #[test]
    fn test_add_snowball_ignores_knocked_out() {
        let mut p = player();
        p.health = 0;
        p.knocked_out = true;
        p.snowballs = 0;
        assert!(!add_snowball(&mut p, 3));
        assert_eq!(p.snowballs, 0);
    }

    #[test]
    fn test_tap_combo_needs_taps_inside_window() {
        let mut combo = TapCombo::default();
        for i in 0..9 {
            assert!(!combo.record(i as f64 * 100.0, 2000.0, 10));
        }
        assert_eq!(combo.recent(800.0, 2000.0), 9);
        assert!(combo.record(900.0, 2000.0, 10));
        assert_eq!(combo.recent(900.0, 2000.0), 0);
    }

    #[test]
    fn test_tap_combo_forgets_stale_taps() {
        let mut combo = TapCombo::default();
        for i in 0..9 {
            combo.record(i as f64 * 300.0, 2000.0, 10);
        }
        // Taps are 300ms apart, so at most 7 fit inside a 2s window
        assert!(!combo.record(2700.0, 2000.0, 10));
        assert!(combo.recent(2700.0, 2000.0) < 10);
    }

    #[test]
    fn test_idle_regen_banks_idle_time() {
        let mut p = player();
        p.snowballs = 0;
        let regen = AmmoRegen::Idle { interval_ms: 1000.0 };
        assert!(!regenerate(&mut p, regen, 3, 600.0));
        assert!(regenerate(&mut p, regen, 3, 600.0));
        assert_eq!(p.snowballs, 1);
        assert!((p.regen_ms - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_regen_resets_when_busy() {
        let mut p = player();
        p.snowballs = 0;
        let regen = AmmoRegen::Idle { interval_ms: 1000.0 };
        regenerate(&mut p, regen, 3, 900.0);
        p.behavior = Behavior::Walking;
        assert!(!regenerate(&mut p, regen, 3, 900.0));
        assert_eq!(p.regen_ms, 0.0);
        assert_eq!(p.snowballs, 0);
    }

    #[test]
    fn test_manual_mode_never_regenerates() {
        let mut p = player();
        p.snowballs = 0;
        assert!(!regenerate(&mut p, AmmoRegen::Manual, 3, 1e6));
        assert_eq!(p.snowballs, 0);
    }
}
