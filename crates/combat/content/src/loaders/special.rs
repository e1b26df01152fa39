//! Weapon special loader.

use std::path::Path;

use combat_core::{WeaponSpecialDefinition, validate_special_definition};

use crate::loaders::{LoadResult, read_file, report_issues};

/// Loader for weapon special definitions from RON files.
pub struct SpecialLoader;

impl SpecialLoader {
    pub fn load(path: &Path) -> LoadResult<WeaponSpecialDefinition> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load special {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<WeaponSpecialDefinition> {
        let definition: WeaponSpecialDefinition = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse special RON: {}", e))?;

        let subject = definition.action.ability_id().to_string();
        report_issues(&subject, &validate_special_definition(&definition));
        tracing::debug!(
            special = %subject,
            rule = %definition.rule.rule_type(),
            "special loaded"
        );

        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{ComboInputType, SpecialRuleType, SpecialTrigger};

    #[test]
    fn parses_finisher_special() {
        let definition = SpecialLoader::parse(include_str!("../../data/specials/longsword.ron"))
            .expect("longsword special parses");

        assert_eq!(definition.rule.rule_type(), SpecialRuleType::FinisherReached);
        assert_eq!(definition.rule.expires_after_seconds, 2.0);
        assert_eq!(definition.action.ability_id(), "5f1c2a9e-longsword-whirlwind");
        assert_eq!(definition.action.cooldown_seconds, 6.0);
        assert_eq!(definition.action.resource_costs.len(), 1);
    }

    #[test]
    fn parses_sequence_special_with_defaults() {
        let definition = SpecialLoader::parse(include_str!("../../data/specials/rhythm.ron"))
            .expect("rhythm special parses");

        assert_eq!(
            definition.rule.trigger,
            SpecialTrigger::SequenceMatch {
                sequence: vec![
                    ComboInputType::Light,
                    ComboInputType::Light,
                    ComboInputType::Heavy
                ],
            }
        );
        assert_eq!(definition.rule.expires_after_seconds, 0.0);
        assert_eq!(definition.action.ability_id(), "rhythm_strike");
        assert!(definition.action.ability_reference.is_none());
    }
}
