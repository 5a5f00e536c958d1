//! Common buff presets

use super::{Buff, BuffEffect};
use crate::types::AttributeFlags;

/// Ready-made buff templates
pub struct BuffPresets;

impl BuffPresets {
    /// Shorter cooldown, `seconds` less per stack
    pub fn cooldown_reduction(seconds: f64) -> Buff {
        Buff::new(
            "Cooldown Reduction",
            AttributeFlags::COOLDOWN,
            BuffEffect::FlatPerStack { amount: -seconds },
        )
    }

    /// One extra live projectile per stack
    pub fn extra_projectile() -> Buff {
        Buff::new(
            "Extra Projectile",
            AttributeFlags::PROJECTILE_COUNT,
            BuffEffect::FlatPerStack { amount: 1.0 },
        )
    }

    /// Percentage damage increase, unique per attribute
    pub fn empowered(percent: f64) -> Buff {
        Buff::new(
            format!("Empowered {}%", percent),
            AttributeFlags::DAMAGE,
            BuffEffect::Percent { percent },
        )
        .unique()
    }
}
