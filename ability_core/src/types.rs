//! Core types shared by buffs, attributes and abilities

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Kinds of scalable stats an ability can expose and a buff can target.
    ///
    /// A buff or attribute may belong to more than one kind at once, so
    /// matching is done through set operations rather than equality of tags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct AttributeFlags: u32 {
        const COOLDOWN         = 1 << 0;
        const PROJECTILE_COUNT = 1 << 1;
        const DAMAGE           = 1 << 2;
        const RANGE            = 1 << 3;
        const DURATION         = 1 << 4;
        const SPEED            = 1 << 5;
        const AREA             = 1 << 6;
        const HEALING          = 1 << 7;
    }
}

/// Gameplay category an ability belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityCategory {
    #[default]
    Offensive,
    Defensive,
    Support,
    Movement,
}

/// Declarative rule that composes into an ability's predicate chains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationConstraint {
    /// Gated by cooldown; the cooldown starts when a projectile is destroyed
    CooldownOnProjectileDestroyed,
    /// Gated by cooldown; the cooldown starts after the cast finishes
    CooldownOnCastEnd,
    /// Gated by the number of live projectiles
    NumberOfActiveInstances,
    /// Gated by the owning player not being downed
    PlayerIsActive,
}

/// Identifier for a player actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl From<u8> for PlayerId {
    fn from(id: u8) -> Self {
        PlayerId(id)
    }
}

/// Time in seconds on the external game clock
pub type Seconds = f64;
