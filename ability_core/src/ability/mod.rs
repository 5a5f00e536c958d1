//! PlayerAbility - Cast dispatch, buff management and lifecycle

mod actor;
mod constraint;
mod definition;
mod state;
mod validation;

pub use actor::{Actor, ActorRef};
pub use constraint::{AvailabilityCheck, CastConditions, ConstraintPipeline, CooldownTimer, Trigger};
pub use definition::{AbilityDefinition, AttributeDefinition};
pub use state::AbilityState;
pub use validation::ValidationReport;

use crate::buff::Buff;
use crate::error::BuffError;
use crate::types::{AttributeFlags, Seconds};

/// What a concrete ability does when it is cast.
///
/// Every hook gets the ability state so the behavior can spawn projectiles,
/// read attributes and fire the after-cast chain.
pub trait AbilityBehavior {
    /// Cast a shared ability once
    fn cast(&mut self, _ability: &mut AbilityState, _now: Seconds) {}

    /// Cast a per-player ability for one standing player
    fn cast_on_player(&mut self, _ability: &mut AbilityState, _player: &dyn Actor, _now: Seconds) {}

    /// Called after the equipped buffs change
    fn on_buffed(&mut self, _ability: &mut AbilityState) {}

    /// Called when the ability is enabled or disabled
    fn toggle_all_projectiles(&mut self, _ability: &mut AbilityState, _enabled: bool) {}
}

/// A player ability: runtime state plus the behavior that casts it
pub struct PlayerAbility<B: AbilityBehavior> {
    state: AbilityState,
    behavior: B,
}

impl<B: AbilityBehavior> PlayerAbility<B> {
    /// Create an ability bound to `players`. Call [`PlayerAbility::initialize`]
    /// before use.
    pub fn new(definition: AbilityDefinition, players: Vec<ActorRef>, behavior: B) -> Self {
        PlayerAbility {
            state: AbilityState::new(definition, players),
            behavior,
        }
    }

    /// Equip buff templates before initialization
    pub fn with_buffs(mut self, buffs: Vec<Buff>) -> Self {
        self.state.equipped_buffs = buffs;
        self
    }

    pub fn state(&self) -> &AbilityState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AbilityState {
        &mut self.state
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut B {
        &mut self.behavior
    }

    /// State and behavior borrowed together, for drivers that let the
    /// behavior update the state outside of a cast
    pub fn parts_mut(&mut self) -> (&mut AbilityState, &mut B) {
        (&mut self.state, &mut self.behavior)
    }

    // === Lifecycle ===

    /// Reset counters, apply the equipped buffs and compute every attribute
    pub fn initialize(&mut self) -> ValidationReport {
        self.state.reset_runtime();
        let report = self.state.verify_equipped_buffs();
        self.state.calculate_all_scalable_attributes();
        tracing::debug!(
            ability = %self.state.name(),
            buffs = self.state.equipped_buffs().len(),
            "ability initialized"
        );
        report
    }

    /// Re-apply the equipped buffs after the configuration was edited
    pub fn on_config_changed(&mut self) -> ValidationReport {
        let report = self.state.verify_equipped_buffs();
        self.behavior.on_buffed(&mut self.state);
        report
    }

    /// Drop live projectiles and applied buffs. Equipped templates are kept,
    /// so a later `initialize` restores the same ability.
    pub fn teardown(&mut self) {
        self.behavior.toggle_all_projectiles(&mut self.state, false);
        for attribute in &mut self.state.attributes {
            attribute.clear_buffs();
        }
        self.state.reset_runtime();
    }

    // === Casting ===

    pub fn is_available(&self, now: Seconds) -> bool {
        self.state.is_available(now)
    }

    /// Cast if available. Shared abilities cast once; otherwise every
    /// standing player gets a cast. Returns whether the ability was available.
    pub fn try_cast_ability(&mut self, now: Seconds) -> bool {
        if !self.state.is_available(now) {
            return false;
        }

        if self.state.is_shared() {
            tracing::debug!(ability = %self.state.name(), "casting shared ability");
            self.behavior.cast(&mut self.state, now);
        } else {
            let players = self.state.players().to_vec();
            for player in players.iter().filter(|p| !p.is_downed()) {
                tracing::debug!(ability = %self.state.name(), player = player.id().0, "casting");
                self.behavior.cast_on_player(&mut self.state, &**player, now);
            }
        }
        true
    }

    /// Cast once per standing player, re-checking availability before each.
    /// Shared abilities are skipped. Returns the number of casts.
    pub fn try_cast_ability_on_each(&mut self, now: Seconds) -> usize {
        if self.state.is_shared() || self.state.players().is_empty() {
            return 0;
        }

        let players = self.state.players().to_vec();
        let mut casts = 0;
        for player in &players {
            if !player.is_downed() && self.state.is_available(now) {
                self.behavior.cast_on_player(&mut self.state, &**player, now);
                casts += 1;
            }
        }
        casts
    }

    pub fn on_projectile_spawned(&mut self) {
        self.state.on_projectile_spawned();
    }

    pub fn on_projectile_destroyed(&mut self, now: Seconds) {
        self.state.on_projectile_destroyed(now);
    }

    pub fn do_after_cast_handler(&mut self, now: Seconds) {
        self.state.do_after_cast_handler(now);
    }

    // === Buffs ===

    /// Equip a buff template and re-apply the whole equipped list
    pub fn add_buff(&mut self, buff: Buff) -> ValidationReport {
        self.state.equipped_buffs.push(buff);
        self.refresh_buffs()
    }

    /// Unequip one template with this title. Returns `None` if none is equipped.
    pub fn unequip_buff(&mut self, title: &str) -> Option<ValidationReport> {
        let index = self.state.equipped_buffs.iter().position(|b| b.title == title)?;
        self.state.equipped_buffs.remove(index);
        Some(self.refresh_buffs())
    }

    /// Remove one stack of `buff` and unequip the template that supplied it,
    /// so later revalidations keep the stack removed. Returns the stacks
    /// left in the buff's group. Nothing changes if no equipped buff matches.
    pub fn remove_buff(&mut self, buff: &Buff) -> Result<u32, BuffError> {
        let equipped = &self.state.equipped_buffs;
        let Some(index) = equipped
            .iter()
            .position(|b| b.title == buff.title && b.stacks_with(buff))
            .or_else(|| equipped.iter().position(|b| b.stacks_with(buff)))
        else {
            let err = BuffError::UnmatchedRemoval { flags: buff.flags };
            tracing::warn!(error = %err, ability = %self.state.name(), "buff is not equipped");
            return Err(err);
        };

        match self.state.attribute_mut(buff.flags) {
            Some(attribute) => attribute.remove_buff(buff)?,
            None => return Err(BuffError::UnmatchedRemoval { flags: buff.flags }),
        };

        // A unique buff holds one stack however often it is equipped
        if self.state.equipped_buffs[index].is_unique {
            let title = self.state.equipped_buffs[index].title.clone();
            self.state.equipped_buffs.retain(|b| b.title != title);
        } else {
            self.state.equipped_buffs.remove(index);
        }

        self.refresh_buffs();
        let remaining = self
            .state
            .attribute(buff.flags)
            .and_then(|a| a.applied_buffs().iter().find(|b| b.stacks_with(buff)))
            .map_or(0, |b| b.stacks_applied());
        Ok(remaining)
    }

    fn refresh_buffs(&mut self) -> ValidationReport {
        let report = self.state.verify_equipped_buffs();
        self.behavior.on_buffed(&mut self.state);
        report
    }

    // === Flags and stats ===

    pub fn set_ability_enabled(&mut self, enabled: bool) {
        self.state.set_enabled(enabled);
        self.behavior.toggle_all_projectiles(&mut self.state, enabled);
    }

    pub fn toggle_ability(&mut self) {
        let enabled = !self.state.is_enabled();
        self.set_ability_enabled(enabled);
    }

    pub fn set_ability_unlocked(&mut self, unlocked: bool) {
        self.state.set_unlocked(unlocked);
    }

    pub fn calculate_all_scalable_attributes(&mut self) {
        self.state.calculate_all_scalable_attributes();
    }

    pub fn get_stat_value(&self, kind: AttributeFlags) -> f64 {
        self.state.get_stat_value(kind)
    }
}
