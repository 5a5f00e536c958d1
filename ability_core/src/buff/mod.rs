//! Buff - Stackable modifier templates and their applied instances

mod presets;

pub use presets::BuffPresets;

use crate::types::AttributeFlags;
use serde::{Deserialize, Serialize};

/// How a buff turns an attribute's base value into a modifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuffEffect {
    /// Constant delta regardless of stacks
    Flat { amount: f64 },
    /// Delta multiplied by the stack count
    FlatPerStack { amount: f64 },
    /// Percentage of the base value (10.0 = 10%)
    Percent { percent: f64 },
    /// Percentage of the base value per stack
    PercentPerStack { percent: f64 },
}

impl BuffEffect {
    /// Modifier for the given base value at the given stack count
    pub fn modifier(&self, base_value: f64, stacks: u32) -> f64 {
        let stacks = stacks as f64;
        match *self {
            BuffEffect::Flat { amount } => amount,
            BuffEffect::FlatPerStack { amount } => amount * stacks,
            BuffEffect::Percent { percent } => base_value * percent / 100.0,
            BuffEffect::PercentPerStack { percent } => base_value * percent / 100.0 * stacks,
        }
    }
}

/// A buff, either as an authored template or as an instance applied to an
/// attribute.
///
/// Templates are never mutated by application: attributes keep their own
/// copy made with [`Buff::instantiate`], and only that copy tracks stacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    /// Display name, also the identity key for unique buffs
    pub title: String,
    /// Attribute kinds this buff applies to; also its stacking group
    pub flags: AttributeFlags,
    /// At most one instance with this title per attribute
    #[serde(default)]
    pub is_unique: bool,
    pub effect: BuffEffect,
    /// Upper bound for `stacks_applied`
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
    #[serde(default = "default_stacks")]
    stacks_applied: u32,
}

fn default_max_stacks() -> u32 {
    99
}

fn default_stacks() -> u32 {
    1
}

impl Buff {
    /// Create a new non-unique buff template
    pub fn new(title: impl Into<String>, flags: AttributeFlags, effect: BuffEffect) -> Self {
        Buff {
            title: title.into(),
            flags,
            is_unique: false,
            effect,
            max_stacks: default_max_stacks(),
            stacks_applied: default_stacks(),
        }
    }

    /// Mark this buff as unique per attribute
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Set the stack cap. A cap below one is raised to one.
    pub fn with_max_stacks(mut self, max_stacks: u32) -> Self {
        self.max_stacks = max_stacks.max(1);
        self.stacks_applied = self.stacks_applied.min(self.max_stacks);
        self
    }

    /// Fresh instance of this template holding a single stack
    pub fn instantiate(&self) -> Buff {
        Buff {
            stacks_applied: 1.min(self.max_stacks),
            ..self.clone()
        }
    }

    pub fn stacks_applied(&self) -> u32 {
        self.stacks_applied
    }

    /// Add a stack, up to `max_stacks`.
    ///
    /// Does not recompute anything; the owning attribute does that.
    pub fn increase_stacks(&mut self) {
        if self.stacks_applied < self.max_stacks {
            self.stacks_applied += 1;
        }
    }

    /// Remove a stack, never going below zero
    pub fn decrease_stacks(&mut self) {
        self.stacks_applied = self.stacks_applied.saturating_sub(1);
    }

    /// Modifier this buff contributes on top of `base_value`
    pub fn calculate_modifier(&self, base_value: f64) -> f64 {
        self.effect.modifier(base_value, self.stacks_applied)
    }

    /// Whether `other` belongs to the same stack group
    pub fn stacks_with(&self, other: &Buff) -> bool {
        self.flags == other.flags
    }
}
