//! Weapon combo graph loader.

use std::path::Path;

use combat_core::{WeaponCombatDefinition, validate_combat_definition};

use crate::loaders::{LoadResult, read_file, report_issues};

/// Loader for weapon combat definitions from RON files.
pub struct WeaponLoader;

impl WeaponLoader {
    /// Load a weapon combat definition from a RON file.
    ///
    /// Authoring issues are logged, never returned as errors.
    pub fn load(path: &Path) -> LoadResult<WeaponCombatDefinition> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load weapon {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<WeaponCombatDefinition> {
        let definition: WeaponCombatDefinition = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse weapon RON: {}", e))?;

        let issues = validate_combat_definition(&definition);
        report_issues(&definition.weapon_id, &issues);
        tracing::debug!(
            weapon = %definition.weapon_id,
            nodes = definition.combo_graph.nodes.len(),
            edges = definition.combo_graph.edges.len(),
            issues = issues.len(),
            "weapon loaded"
        );

        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{ComboInputType, ComboSystem, HitShapeType};

    const LONGSWORD: &str = include_str!("../../data/weapons/longsword.ron");

    #[test]
    fn parses_embedded_longsword() {
        let definition = WeaponLoader::parse(LONGSWORD).expect("longsword parses");

        assert_eq!(definition.weapon_id, "longsword");
        assert_eq!(definition.combo_graph.start_nodes.len(), 2);
        assert_eq!(definition.combo_graph.nodes.len(), 5);
        assert!(validate_combat_definition(&definition).is_empty());

        let heavy = &definition.combo_graph.nodes[3].step;
        assert_eq!(heavy.hit_shapes[0].shape, HitShapeType::Box);
        assert!(heavy.hit_shapes[0].requires_line_of_sight);

        let gated = &definition.combo_graph.edges[2];
        assert_eq!(gated.conditions.map(|c| c.stamina_min), Some(20.0));
    }

    #[test]
    fn loaded_graph_drives_combo_system() {
        let definition = WeaponLoader::parse(LONGSWORD).expect("longsword parses");
        let mut combo = ComboSystem::default();
        combo.set_definition(Some(std::sync::Arc::new(definition)));

        let steps: Vec<String> = [0.0, 0.4, 0.8]
            .into_iter()
            .filter_map(|now| combo.try_advance_input(ComboInputType::Light, now))
            .map(|step| step.step_id.clone())
            .collect();
        assert_eq!(
            steps,
            ["longsword_light_1", "longsword_light_2", "longsword_light_3"]
        );
    }

    #[test]
    fn issues_do_not_fail_parsing() {
        let dangling = r#"(
            weapon_id: "broken",
            combo_graph: (
                start_nodes: [(input: Light, node_id: "missing")],
                edges: [(from_node_id: "missing", to_node_id: "nowhere", input: Light)],
            ),
        )"#;

        let definition = WeaponLoader::parse(dangling).expect("issues are tolerated");
        assert!(!validate_combat_definition(&definition).is_empty());
    }

    #[test]
    fn malformed_ron_is_an_error() {
        assert!(WeaponLoader::parse("(weapon_id: 3)").is_err());
    }
}
