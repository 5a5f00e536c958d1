//! ScalableAttribute - A base value scaled by the buffs applied to it

mod display;

pub use display::DisplayRules;

use crate::buff::Buff;
use crate::error::BuffError;
use crate::types::AttributeFlags;
use serde::{Deserialize, Serialize};

/// A numeric stat composed of a base value plus buff modifiers
///
/// Final value is calculated as:
/// `base + Σ buff.calculate_modifier(base)`
///
/// Every mutation of the base value or the applied buffs recomputes the
/// cached values, so `actual_value` is never stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalableAttribute {
    kind: AttributeFlags,
    base_value: f64,
    modifier_value: f64,
    actual_value: f64,
    /// Advisory cap, never applied by `calculate_value`
    max_value: Option<f64>,
    display: DisplayRules,
    applied_buffs: Vec<Buff>,
    last_stacks_applied: u32,
}

impl ScalableAttribute {
    /// Create an attribute with no buffs applied
    pub fn new(kind: AttributeFlags, base_value: f64) -> Self {
        ScalableAttribute {
            kind,
            base_value,
            modifier_value: 0.0,
            actual_value: base_value,
            max_value: None,
            display: DisplayRules::default(),
            applied_buffs: Vec::new(),
            last_stacks_applied: 0,
        }
    }

    /// Set the advisory cap
    pub fn with_max_value(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    /// Set the UI readability rules
    pub fn with_display(mut self, display: DisplayRules) -> Self {
        self.display = display;
        self
    }

    pub fn kind(&self) -> AttributeFlags {
        self.kind
    }

    pub fn base_value(&self) -> f64 {
        self.base_value
    }

    /// Sum of all buff contributions at the last recomputation
    pub fn modifier_value(&self) -> f64 {
        self.modifier_value
    }

    /// The value used in gameplay calculations
    pub fn actual_value(&self) -> f64 {
        self.actual_value
    }

    pub fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    pub fn applied_buffs(&self) -> &[Buff] {
        &self.applied_buffs
    }

    /// Stack count of the group touched by the last add or remove
    pub fn last_stacks_applied(&self) -> u32 {
        self.last_stacks_applied
    }

    /// Whether this attribute accepts buffs targeting `flags`
    pub fn accepts(&self, flags: AttributeFlags) -> bool {
        self.kind.intersects(flags)
    }

    /// Recompute the modifier and actual value from the applied buffs
    pub fn calculate_value(&mut self) -> f64 {
        let base = self.base_value;
        self.modifier_value = self
            .applied_buffs
            .iter()
            .map(|buff| buff.calculate_modifier(base))
            .sum();
        self.actual_value = base + self.modifier_value;
        self.actual_value
    }

    /// Actual value limited to the advisory cap, if one is set
    pub fn clamped_value(&self) -> f64 {
        match self.max_value {
            Some(max) => self.actual_value.min(max),
            None => self.actual_value,
        }
    }

    /// Whether the actual value is above the advisory cap
    pub fn exceeds_max(&self) -> bool {
        self.max_value.is_some_and(|max| self.actual_value > max)
    }

    /// Current value as shown to players
    pub fn player_readable_value(&self) -> f64 {
        self.display.apply(self.actual_value)
    }

    /// Any value formatted with this attribute's readability rules
    pub fn readable_value(&self, value: f64) -> f64 {
        self.display.apply(value)
    }

    pub fn set_base_value(&mut self, value: f64) {
        self.base_value = value;
        self.calculate_value();
    }

    /// Apply a buff.
    ///
    /// A unique buff whose title is already applied is ignored. A buff in an
    /// already applied stack group adds a stack to that instance. Otherwise a
    /// fresh single-stack copy is appended.
    pub fn add_buff(&mut self, buff: &Buff) {
        if buff.is_unique && self.applied_buffs.iter().any(|b| b.title == buff.title) {
            tracing::debug!(buff = %buff.title, "unique buff already applied, ignoring");
            return;
        }

        match self.applied_buffs.iter_mut().find(|b| b.stacks_with(buff)) {
            Some(existing) => {
                tracing::debug!(
                    buff = %buff.title,
                    group = %existing.title,
                    "buff with the same effect found, increasing stacks"
                );
                existing.increase_stacks();
                self.last_stacks_applied = existing.stacks_applied();
            }
            None => {
                let instance = buff.instantiate();
                self.last_stacks_applied = instance.stacks_applied();
                self.applied_buffs.push(instance);
            }
        }

        self.calculate_value();
    }

    /// Remove one stack from the instance in `buff`'s stack group.
    ///
    /// The instance is dropped once it has no stacks left. Returns the
    /// remaining stack count.
    pub fn remove_buff(&mut self, buff: &Buff) -> Result<u32, BuffError> {
        let Some(index) = self.applied_buffs.iter().position(|b| b.stacks_with(buff)) else {
            let err = BuffError::UnmatchedRemoval { flags: buff.flags };
            tracing::warn!(error = %err, "buff removal ignored");
            return Err(err);
        };

        let instance = &mut self.applied_buffs[index];
        instance.decrease_stacks();
        let remaining = instance.stacks_applied();
        if remaining == 0 {
            self.applied_buffs.remove(index);
        }
        self.last_stacks_applied = remaining;

        self.calculate_value();
        Ok(remaining)
    }

    /// Remove every applied buff
    pub fn clear_buffs(&mut self) {
        self.applied_buffs.clear();
        self.last_stacks_applied = 0;
        self.calculate_value();
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buff::BuffEffect;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn stacks_never_negative_and_value_matches(ops in prop::collection::vec(any::<bool>(), 0..64)) {
            let mut attr = ScalableAttribute::new(AttributeFlags::COOLDOWN, 10.0);
            let buff = Buff::new(
                "Swift",
                AttributeFlags::COOLDOWN,
                BuffEffect::FlatPerStack { amount: -0.5 },
            )
            .with_max_stacks(5);

            let mut expected: u32 = 0;
            for add in ops {
                if add {
                    attr.add_buff(&buff);
                    expected = (expected + 1).min(5);
                } else {
                    let result = attr.remove_buff(&buff);
                    prop_assert_eq!(result.is_err(), expected == 0);
                    expected = expected.saturating_sub(1);
                }

                let stacks: u32 = attr.applied_buffs().iter().map(|b| b.stacks_applied()).sum();
                prop_assert_eq!(stacks, expected);
                prop_assert!(attr.applied_buffs().len() <= 1);
                prop_assert!((attr.actual_value() - (10.0 - 0.5 * expected as f64)).abs() < 1e-9);
            }
        }
    }
}
