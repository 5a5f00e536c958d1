//! AbilityDefinition - Immutable ability configuration
//! Loaded from TOML configuration

use crate::attribute::{DisplayRules, ScalableAttribute};
use crate::config::ConfigError;
use crate::types::{AbilityCategory, ActivationConstraint, AttributeFlags};
use serde::{Deserialize, Serialize};

/// Starting values for one scalable attribute of an ability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub kind: AttributeFlags,
    pub base_value: f64,
    /// Advisory cap
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub display: DisplayRules,
}

impl AttributeDefinition {
    pub fn new(kind: AttributeFlags, base_value: f64) -> Self {
        AttributeDefinition {
            kind,
            base_value,
            max_value: None,
            display: DisplayRules::default(),
        }
    }

    /// Build a fresh attribute with no buffs applied
    pub fn build(&self) -> ScalableAttribute {
        let attribute = ScalableAttribute::new(self.kind, self.base_value).with_display(self.display);
        match self.max_value {
            Some(max) => attribute.with_max_value(max),
            None => attribute,
        }
    }
}

/// Describes a player ability: how it is gated and which stats it scales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    /// Unique ability name
    pub name: String,
    #[serde(default)]
    pub category: AbilityCategory,
    /// Cast once for both players instead of once per player
    #[serde(default)]
    pub shared: bool,
    /// Whether the ability starts enabled
    #[serde(default = "default_enabled")]
    pub starts_enabled: bool,
    /// Rules composed into the availability and trigger chains
    #[serde(default)]
    pub activation_constraints: Vec<ActivationConstraint>,
    /// Attribute kinds buffs may target; defaults to the union of `attributes`
    #[serde(default)]
    pub attribute_flags: Option<AttributeFlags>,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
}

fn default_enabled() -> bool {
    true
}

impl AbilityDefinition {
    /// Create a definition with no constraints and no attributes
    pub fn new(name: impl Into<String>) -> Self {
        AbilityDefinition {
            name: name.into(),
            category: AbilityCategory::default(),
            shared: false,
            starts_enabled: true,
            activation_constraints: Vec::new(),
            attribute_flags: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: AbilityCategory) -> Self {
        self.category = category;
        self
    }

    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    pub fn with_constraint(mut self, constraint: ActivationConstraint) -> Self {
        self.activation_constraints.push(constraint);
        self
    }

    pub fn with_attribute(mut self, kind: AttributeFlags, base_value: f64) -> Self {
        self.attributes.push(AttributeDefinition::new(kind, base_value));
        self
    }

    /// Override the attribute kinds buffs may target
    pub fn with_attribute_flags(mut self, flags: AttributeFlags) -> Self {
        self.attribute_flags = Some(flags);
        self
    }

    /// Attribute kinds buffs may target
    pub fn declared_flags(&self) -> AttributeFlags {
        self.attribute_flags.unwrap_or_else(|| {
            self.attributes
                .iter()
                .fold(AttributeFlags::empty(), |acc, attr| acc | attr.kind)
        })
    }

    /// A projectile ability limited by cooldown and live instances
    pub fn basic_projectile() -> Self {
        AbilityDefinition::new("basic_projectile")
            .with_constraint(ActivationConstraint::CooldownOnCastEnd)
            .with_constraint(ActivationConstraint::NumberOfActiveInstances)
            .with_attribute(AttributeFlags::COOLDOWN, 1.0)
            .with_attribute(AttributeFlags::PROJECTILE_COUNT, 1.0)
    }

    /// Check the definition for authoring mistakes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ability name must not be empty".to_string(),
            ));
        }

        let mut seen = AttributeFlags::empty();
        for attr in &self.attributes {
            if attr.kind.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "ability '{}' has an attribute without a kind",
                    self.name
                )));
            }
            if seen.intersects(attr.kind) {
                return Err(ConfigError::ValidationError(format!(
                    "ability '{}' declares {:?} more than once",
                    self.name, attr.kind
                )));
            }
            if attr.base_value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "ability '{}' attribute {:?} has a negative base value",
                    self.name, attr.kind
                )));
            }
            if attr.max_value.is_some_and(|max| max < attr.base_value) {
                return Err(ConfigError::ValidationError(format!(
                    "ability '{}' attribute {:?} has max_value below base_value",
                    self.name, attr.kind
                )));
            }
            seen |= attr.kind;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_flags_default_to_union() {
        let def = AbilityDefinition::basic_projectile();
        assert_eq!(
            def.declared_flags(),
            AttributeFlags::COOLDOWN | AttributeFlags::PROJECTILE_COUNT
        );

        let narrowed = def.with_attribute_flags(AttributeFlags::COOLDOWN);
        assert_eq!(narrowed.declared_flags(), AttributeFlags::COOLDOWN);
    }

    #[test]
    fn test_build_attribute() {
        let mut def = AttributeDefinition::new(AttributeFlags::RANGE, 8.0);
        def.max_value = Some(12.0);
        let attr = def.build();
        assert_eq!(attr.kind(), AttributeFlags::RANGE);
        assert!((attr.actual_value() - 8.0).abs() < f64::EPSILON);
        assert_eq!(attr.max_value(), Some(12.0));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let def = AbilityDefinition::new("dup")
            .with_attribute(AttributeFlags::COOLDOWN, 1.0)
            .with_attribute(AttributeFlags::COOLDOWN, 2.0);
        assert!(matches!(def.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty = AbilityDefinition::new("  ");
        assert!(empty.validate().is_err());

        let negative = AbilityDefinition::new("neg").with_attribute(AttributeFlags::RANGE, -1.0);
        assert!(negative.validate().is_err());

        let mut capped = AbilityDefinition::new("cap").with_attribute(AttributeFlags::RANGE, 5.0);
        capped.attributes[0].max_value = Some(4.0);
        assert!(capped.validate().is_err());

        assert!(AbilityDefinition::basic_projectile().validate().is_ok());
    }
}
