//! AbilityState - Everything an ability owns besides its cast behavior

use super::actor::{Actor, ActorRef};
use super::constraint::{CastConditions, ConstraintPipeline, CooldownTimer};
use super::definition::AbilityDefinition;
use crate::attribute::ScalableAttribute;
use crate::buff::Buff;
use crate::types::{AbilityCategory, AttributeFlags, Seconds};

/// Runtime state of one player ability
///
/// Owns the scalable attributes, the equipped buff templates, the
/// constraint chains, the cooldown timer and the live projectile counter.
pub struct AbilityState {
    definition: AbilityDefinition,
    pub(super) attributes: Vec<ScalableAttribute>,
    pub(super) equipped_buffs: Vec<Buff>,
    pipeline: ConstraintPipeline,
    cooldown: CooldownTimer,
    active_projectiles: u32,
    enabled: bool,
    unlocked: bool,
    players: Vec<ActorRef>,
    player: Option<ActorRef>,
    other_player: Option<ActorRef>,
}

impl AbilityState {
    /// Build the attributes and constraint chains from `definition`
    pub fn new(definition: AbilityDefinition, players: Vec<ActorRef>) -> Self {
        let attributes = definition.attributes.iter().map(|a| a.build()).collect();
        let pipeline = ConstraintPipeline::build(&definition.activation_constraints);
        let enabled = definition.starts_enabled;

        AbilityState {
            definition,
            attributes,
            equipped_buffs: Vec::new(),
            pipeline,
            cooldown: CooldownTimer::default(),
            active_projectiles: 0,
            enabled,
            unlocked: true,
            players,
            player: None,
            other_player: None,
        }
    }

    // === Identity ===

    pub fn definition(&self) -> &AbilityDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn category(&self) -> AbilityCategory {
        self.definition.category
    }

    pub fn is_category(&self, category: AbilityCategory) -> bool {
        self.definition.category == category
    }

    pub fn is_shared(&self) -> bool {
        self.definition.shared
    }

    /// Attribute kinds buffs may target
    pub fn declared_attribute_flags(&self) -> AttributeFlags {
        self.definition.declared_flags()
    }

    pub fn pipeline(&self) -> &ConstraintPipeline {
        &self.pipeline
    }

    // === Flags ===

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(super) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn set_unlocked(&mut self, unlocked: bool) {
        self.unlocked = unlocked;
    }

    // === Players ===

    pub fn players(&self) -> &[ActorRef] {
        &self.players
    }

    /// The player this ability is attached to, if any
    pub fn player(&self) -> Option<&ActorRef> {
        self.player.as_ref()
    }

    pub fn other_player(&self) -> Option<&ActorRef> {
        self.other_player.as_ref()
    }

    /// Bind the ability to `owner`, resolving which associated player is
    /// the owner and which is the partner.
    ///
    /// Returns false if `owner` is not one of the associated players.
    pub fn attach_to(&mut self, owner: &dyn Actor) -> bool {
        let Some(index) = self.players.iter().position(|p| owner.is_same_player(&**p)) else {
            tracing::warn!(ability = %self.definition.name, "owner is not an associated player");
            return false;
        };

        self.player = Some(self.players[index].clone());
        self.other_player = self
            .players
            .iter()
            .enumerate()
            .find(|(i, _)| *i != index)
            .map(|(_, p)| p.clone());
        true
    }

    // === Attributes ===

    pub fn attributes(&self) -> &[ScalableAttribute] {
        &self.attributes
    }

    /// First attribute covering `kind`
    pub fn attribute(&self, kind: AttributeFlags) -> Option<&ScalableAttribute> {
        self.attributes.iter().find(|a| a.accepts(kind))
    }

    pub fn attribute_mut(&mut self, kind: AttributeFlags) -> Option<&mut ScalableAttribute> {
        self.attributes.iter_mut().find(|a| a.accepts(kind))
    }

    /// Actual value of the attribute covering `kind`, or 0 if there is none
    pub fn get_stat_value(&self, kind: AttributeFlags) -> f64 {
        self.attribute(kind).map(|a| a.actual_value()).unwrap_or(0.0)
    }

    pub fn calculate_all_scalable_attributes(&mut self) {
        for attribute in &mut self.attributes {
            attribute.calculate_value();
        }
    }

    pub fn equipped_buffs(&self) -> &[Buff] {
        &self.equipped_buffs
    }

    // === Cooldown ===

    pub fn cooldown_duration(&self) -> Seconds {
        self.get_stat_value(AttributeFlags::COOLDOWN)
    }

    pub fn begin_cooldown_count(&mut self, now: Seconds) {
        self.cooldown.begin(now);
    }

    pub fn is_on_cooldown(&self, now: Seconds) -> bool {
        self.cooldown.is_active(now, self.cooldown_duration())
    }

    pub fn cooldown_remaining(&self, now: Seconds) -> Seconds {
        self.cooldown.remaining(now, self.cooldown_duration())
    }

    // === Projectiles ===

    pub fn active_projectiles(&self) -> u32 {
        self.active_projectiles
    }

    /// Live projectile limit, rounded from the projectile count attribute
    pub fn max_projectiles(&self) -> u32 {
        let value = self.get_stat_value(AttributeFlags::PROJECTILE_COUNT);
        value.round_ties_even().max(0.0) as u32
    }

    pub fn on_projectile_spawned(&mut self) {
        self.active_projectiles += 1;
    }

    /// Count a destroyed projectile and fire the projectile-destroyed chain
    pub fn on_projectile_destroyed(&mut self, now: Seconds) {
        if self.active_projectiles == 0 {
            tracing::warn!(
                ability = %self.definition.name,
                "projectile destroyed without a matching spawn"
            );
        }
        self.active_projectiles = self.active_projectiles.saturating_sub(1);
        self.pipeline.fire_projectile_destroyed(&mut self.cooldown, now);
    }

    /// Fire the after-cast chain. Concrete abilities call this from their
    /// cast at whatever point the cast counts as finished.
    pub fn do_after_cast_handler(&mut self, now: Seconds) {
        self.pipeline.fire_after_cast(&mut self.cooldown, now);
    }

    // === Availability ===

    pub fn is_available(&self, now: Seconds) -> bool {
        self.pipeline.is_available(self, now)
    }

    /// Clear counters and the cooldown
    pub(super) fn reset_runtime(&mut self) {
        self.active_projectiles = 0;
        self.cooldown.reset();
    }
}

impl CastConditions for AbilityState {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_on_cooldown(&self, now: Seconds) -> bool {
        AbilityState::is_on_cooldown(self, now)
    }

    fn active_instances(&self) -> u32 {
        self.active_projectiles
    }

    fn max_instances(&self) -> u32 {
        self.max_projectiles()
    }

    fn is_player_active(&self) -> bool {
        match &self.player {
            Some(owner) => !owner.is_downed(),
            None => self.players.iter().any(|p| !p.is_downed()),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn projectile_count_never_negative(spawns in prop::collection::vec(any::<bool>(), 0..64)) {
            let mut state = AbilityState::new(AbilityDefinition::basic_projectile(), Vec::new());
            let mut expected: u32 = 0;
            for spawn in spawns {
                if spawn {
                    state.on_projectile_spawned();
                    expected += 1;
                } else {
                    state.on_projectile_destroyed(0.0);
                    expected = expected.saturating_sub(1);
                }
                prop_assert_eq!(state.active_projectiles(), expected);
            }
        }
    }
}
