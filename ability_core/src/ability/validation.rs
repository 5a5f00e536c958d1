//! Equipped-buff validation

use super::state::AbilityState;
use crate::error::BuffError;

/// Outcome of re-applying the equipped buffs to an ability
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// One entry per buff dropped from the equipped list
    pub errors: Vec<BuffError>,
}

impl ValidationReport {
    /// True if every equipped buff was applied
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Titles of the dropped buffs
    pub fn rejected_titles(&self) -> Vec<&str> {
        self.errors.iter().filter_map(|e| e.title()).collect()
    }
}

impl AbilityState {
    /// Rebuild every attribute's buff list from the equipped buffs.
    ///
    /// All attributes are cleared first so nothing is applied twice. Buffs
    /// that target no declared kind, or that no attribute accepts, are
    /// dropped from the equipped list after the pass. Running this twice
    /// in a row gives the same result.
    pub fn verify_equipped_buffs(&mut self) -> ValidationReport {
        for attribute in &mut self.attributes {
            attribute.clear_buffs();
        }

        let declared = self.declared_attribute_flags();
        let ability = self.definition().name.clone();
        let mut rejected = Vec::new();
        let mut report = ValidationReport::default();

        for (index, buff) in self.equipped_buffs.iter().enumerate() {
            if !declared.intersects(buff.flags) {
                let err = BuffError::Incompatible {
                    title: buff.title.clone(),
                    flags: buff.flags,
                    ability: ability.clone(),
                };
                tracing::error!(error = %err, "removing buff from equipped buffs");
                report.errors.push(err);
                rejected.push(index);
                continue;
            }

            match self.attributes.iter_mut().find(|a| a.accepts(buff.flags)) {
                Some(attribute) => attribute.add_buff(buff),
                None => {
                    let err = BuffError::AttachmentFailed {
                        title: buff.title.clone(),
                        ability: ability.clone(),
                    };
                    tracing::error!(error = %err, "check the scalable attribute list");
                    report.errors.push(err);
                    rejected.push(index);
                }
            }
        }

        let mut index = 0;
        self.equipped_buffs.retain(|_| {
            let keep = !rejected.contains(&index);
            index += 1;
            keep
        });

        report
    }
}
