//! Prelude module for convenient imports
//!
//! ```rust
//! use ability_core::prelude::*;
//! ```

// Core types
pub use crate::types::{AbilityCategory, ActivationConstraint, AttributeFlags, PlayerId, Seconds};

// Buffs and attributes
pub use crate::attribute::ScalableAttribute;
pub use crate::buff::{Buff, BuffEffect};

// Abilities
pub use crate::ability::{AbilityBehavior, AbilityDefinition, AbilityState, Actor, ActorRef, PlayerAbility};

// Errors
pub use crate::error::BuffError;
