//! ability_core - Player abilities gated by activation constraints and
//! scaled by stacking buffs
//!
//! This library provides:
//! - Buff: Stackable modifier templates and applied instances
//! - ScalableAttribute: Base value plus buff modifiers
//! - ConstraintPipeline: Availability checks and cast triggers built from
//!   declarative activation constraints
//! - PlayerAbility: Cast dispatch, projectile bookkeeping, cooldowns and
//!   buff validation

pub mod ability;
pub mod attribute;
pub mod buff;
pub mod config;
pub mod error;
pub mod prelude;
pub mod types;

// Re-export core types for convenience
pub use ability::{
    AbilityBehavior, AbilityDefinition, AbilityState, Actor, ActorRef, AttributeDefinition,
    ConstraintPipeline, PlayerAbility, ValidationReport,
};
pub use attribute::{DisplayRules, ScalableAttribute};
pub use buff::{Buff, BuffEffect, BuffPresets};
pub use config::{default_abilities, default_buffs, ConfigError};
pub use error::BuffError;
pub use types::{AbilityCategory, ActivationConstraint, AttributeFlags, PlayerId, Seconds};
