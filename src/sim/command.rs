//! Intents from the input layer
//!
//! Positions arrive already translated to game space. Every command is
//! validated against the current state and either applied or ignored; the
//! boolean result only tells the caller which, nothing is ever an error.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::reload::add_snowball;
use super::state::{Behavior, ChannelId, ControlOwner, GameState, MatchPhase, PlayerId, ProjectileId};
use super::throw::{abandon_charge, begin_charge, charge_progress, release_throw};

/// How a command picks its player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    Id(PlayerId),
    /// The first eligible player near a game-space point
    At(Vec2),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SelectAndMove {
        selector: Selector,
        target: Vec2,
        /// Channel issuing the move; needed to steer a player it holds
        #[serde(default)]
        channel: Option<ChannelId>,
    },
    BeginCharge { player: PlayerId },
    ReleaseThrow { player: PlayerId, power: f32 },
    /// Throw with whatever charge has built up
    ReleaseCharge { player: PlayerId },
    AddAmmo { player: PlayerId },
    ReloadTap { player: PlayerId },
    ClaimControl { selector: Selector, channel: ChannelId },
    ReleaseControl { player: PlayerId, channel: ChannelId },
}

impl GameState {
    /// Apply one command; returns whether it changed anything
    pub fn apply(&mut self, command: Command) -> bool {
        let accepted = match command {
            Command::SelectAndMove {
                selector,
                target,
                channel,
            } => self.select_and_move(selector, target, channel),
            Command::BeginCharge { player } => self.begin_charge(player),
            Command::ReleaseThrow { player, power } => self.release_throw(player, power).is_some(),
            Command::ReleaseCharge { player } => self.release_charge(player).is_some(),
            Command::AddAmmo { player } => self.add_ammo(player),
            Command::ReloadTap { player } => self.reload_tap(player),
            Command::ClaimControl { selector, channel } => {
                self.claim_control(selector, channel).is_some()
            }
            Command::ReleaseControl { player, channel } => self.release_control(player, channel),
        };
        if !accepted {
            log::trace!("ignored {:?}", command);
        }
        accepted
    }

    /// First standing player within the selection radius of `point`.
    ///
    /// AI players never match. Players held by a human channel match only
    /// when `channel` is that same channel.
    pub fn find_player_at(&self, point: Vec2, channel: Option<ChannelId>) -> Option<PlayerId> {
        let reach = self.config.player_radius * self.config.select_radius_factor;
        self.players
            .iter()
            .find(|p| {
                let selectable = match p.owner {
                    ControlOwner::None => true,
                    ControlOwner::Human(owner) => Some(owner) == channel,
                    ControlOwner::Ai => false,
                };
                selectable && p.is_active() && p.pos.distance(point) < reach
            })
            .map(|p| p.id)
    }

    /// Player currently held by `channel`
    pub fn controlled_by(&self, channel: ChannelId) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|p| p.owner == ControlOwner::Human(channel))
            .map(|p| p.id)
    }

    /// Resolve a selector to a standing, human-drivable player.
    ///
    /// A player held by a channel resolves only for that channel.
    fn select(&self, selector: Selector, channel: Option<ChannelId>) -> Option<PlayerId> {
        let id = match selector {
            Selector::Id(id) => id,
            Selector::At(point) => self.find_player_at(point, channel)?,
        };
        let player = self.players.get(id)?;
        let reachable = match player.owner {
            ControlOwner::None => true,
            ControlOwner::Human(owner) => Some(owner) == channel,
            ControlOwner::Ai => false,
        };
        (reachable && player.is_active()).then_some(id)
    }

    /// A standing player that human input may drive
    fn drivable(&self, id: PlayerId) -> bool {
        self.is_live()
            && self
                .players
                .get(id)
                .is_some_and(|p| p.is_active() && !p.is_ai())
    }

    /// Point a player at a new movement target.
    ///
    /// Targets outside the arena (or non-finite) are ignored; targets in the
    /// wall band are pulled into the playable rectangle. A player held by a
    /// channel only takes moves issued on that channel.
    pub fn select_and_move(
        &mut self,
        selector: Selector,
        target: Vec2,
        channel: Option<ChannelId>,
    ) -> bool {
        if !self.is_live() || !target.is_finite() || !self.config.arena.bounds().contains(target) {
            return false;
        }
        let Some(id) = self.select(selector, channel) else {
            return false;
        };
        let target = self.config.arena.playable(self.config.player_radius).clamp(target);
        let player = &mut self.players[id];
        player.target = Some(target);
        player.behavior = if player.is_charging() {
            Behavior::Aiming
        } else {
            Behavior::Walking
        };
        true
    }

    pub fn begin_charge(&mut self, id: PlayerId) -> bool {
        if !self.drivable(id) {
            return false;
        }
        let now = self.clock_ms;
        begin_charge(&mut self.players[id], now)
    }

    /// Throw from a human-driven player at an explicit power
    pub fn release_throw(&mut self, id: PlayerId, power: f32) -> Option<ProjectileId> {
        if !self.drivable(id) || !power.is_finite() {
            return None;
        }
        release_throw(self, id, power)
    }

    /// Throw with the power built up since `begin_charge`
    pub fn release_charge(&mut self, id: PlayerId) -> Option<ProjectileId> {
        let player = self.players.get(id)?;
        if !player.is_charging() {
            return None;
        }
        let power = charge_progress(player, self.clock_ms, self.config.max_charge_ms);
        self.release_throw(id, power)
    }

    /// Add one snowball (any standing player, up to the max)
    pub fn add_ammo(&mut self, id: PlayerId) -> bool {
        if !self.is_live() {
            return false;
        }
        let max = self.config.max_snowballs;
        self.players
            .get_mut(id)
            .is_some_and(|p| add_snowball(p, max))
    }

    /// Count a quick tap toward the reload combo; true once a tap is recorded
    pub fn reload_tap(&mut self, id: PlayerId) -> bool {
        if !self.is_live() {
            return false;
        }
        let (now, window, needed, max) = (
            self.clock_ms,
            self.config.tap_window_ms,
            self.config.taps_to_reload,
            self.config.max_snowballs,
        );
        let Some(player) = self.players.get_mut(id).filter(|p| p.is_active()) else {
            return false;
        };
        if player.taps.record(now, window, needed) && add_snowball(player, max) {
            log::debug!("player {} reloaded by tap combo", id);
        }
        true
    }

    /// Bind an unowned player to an input channel.
    ///
    /// A channel holds at most one player; claiming again while holding one
    /// is ignored.
    pub fn claim_control(&mut self, selector: Selector, channel: ChannelId) -> Option<PlayerId> {
        if !self.is_live() || self.controlled_by(channel).is_some() {
            return None;
        }
        let id = self.select(selector, Some(channel))?;
        let player = &mut self.players[id];
        if player.owner != ControlOwner::None {
            return None;
        }
        player.owner = ControlOwner::Human(channel);
        player.target = None;
        if player.behavior == Behavior::Walking {
            player.behavior = Behavior::Idle;
        }
        log::trace!("channel {} took player {}", channel, id);
        Some(id)
    }

    /// Hand a player back; an unreleased charge is abandoned
    pub fn release_control(&mut self, id: PlayerId, channel: ChannelId) -> bool {
        if self.phase != MatchPhase::Playing {
            return false;
        }
        let Some(player) = self.players.get_mut(id) else {
            return false;
        };
        if player.owner != ControlOwner::Human(channel) {
            return false;
        }
        player.owner = ControlOwner::None;
        player.target = None;
        abandon_charge(player);
        if player.behavior == Behavior::Walking {
            player.behavior = Behavior::Idle;
        }
        true
    }
}
