//! Lookup caches built from a [`WeaponCombatDefinition`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::definition::{
    ComboEdgeConditionDefinition, ComboInputType, ComboStepDefinition, WeaponCombatDefinition,
    node_key,
};

/// A node as seen by the runtime: its declared id and a shared step.
#[derive(Clone, Debug)]
pub(crate) struct CachedNode {
    pub node_id: String,
    pub step: Arc<ComboStepDefinition>,
}

#[derive(Clone, Debug)]
pub(crate) struct CachedEdge {
    pub input: ComboInputType,
    pub to_node_id: String,
    pub conditions: Option<ComboEdgeConditionDefinition>,
}

/// Read-only index over a combo graph.
///
/// Node ids are keyed case-insensitively. Outgoing edges keep their declared
/// order so the first matching edge is deterministic.
#[derive(Clone, Debug, Default)]
pub(crate) struct ComboGraph {
    start_nodes: HashMap<ComboInputType, String>,
    nodes: HashMap<String, CachedNode>,
    edges: HashMap<String, Vec<CachedEdge>>,
}

impl ComboGraph {
    pub fn build(definition: &WeaponCombatDefinition) -> Self {
        let graph = &definition.combo_graph;
        let mut cache = Self::default();

        // Later declarations overwrite earlier ones.
        for start in &graph.start_nodes {
            if node_key(&start.node_id).is_some() {
                cache.start_nodes.insert(start.input, start.node_id.clone());
            }
        }

        for node in &graph.nodes {
            if let Some(key) = node_key(&node.node_id) {
                cache.nodes.insert(
                    key,
                    CachedNode {
                        node_id: node.node_id.clone(),
                        step: Arc::new(node.step.clone()),
                    },
                );
            }
        }

        for edge in &graph.edges {
            if let Some(key) = node_key(&edge.from_node_id) {
                cache.edges.entry(key).or_default().push(CachedEdge {
                    input: edge.input,
                    to_node_id: edge.to_node_id.clone(),
                    conditions: edge.conditions,
                });
            }
        }

        cache
    }

    pub fn start_node(&self, input: ComboInputType) -> Option<&str> {
        self.start_nodes.get(&input).map(String::as_str)
    }

    pub fn node(&self, node_id: &str) -> Option<&CachedNode> {
        self.nodes.get(&node_key(node_id)?)
    }

    pub fn edges_from(&self, node_id: &str) -> &[CachedEdge] {
        node_key(node_id)
            .and_then(|key| self.edges.get(&key))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ComboEdgeDefinition, ComboGraphDefinition};

    #[test]
    fn edges_keep_declaration_order() {
        let graph = ComboGraphDefinition::default()
            .with_node("A", ComboStepDefinition::new("a", "a"))
            .with_edge(ComboEdgeDefinition::new("A", ComboInputType::Light, "B"))
            .with_edge(ComboEdgeDefinition::new("a", ComboInputType::Light, "C"))
            .with_edge(ComboEdgeDefinition::new("A", ComboInputType::Heavy, "D"));
        let cache = ComboGraph::build(&WeaponCombatDefinition::new("w", graph));

        let targets: Vec<_> = cache
            .edges_from("A")
            .iter()
            .map(|edge| edge.to_node_id.as_str())
            .collect();
        assert_eq!(targets, ["B", "C", "D"]);
    }

    #[test]
    fn later_duplicates_overwrite_earlier() {
        let graph = ComboGraphDefinition::default()
            .with_start(ComboInputType::Light, "A")
            .with_start(ComboInputType::Light, "B")
            .with_node("A", ComboStepDefinition::new("first", "a"))
            .with_node("a", ComboStepDefinition::new("second", "a"))
            .with_node("   ", ComboStepDefinition::new("blank", "blank"));
        let cache = ComboGraph::build(&WeaponCombatDefinition::new("w", graph));

        assert_eq!(cache.start_node(ComboInputType::Light), Some("B"));
        assert_eq!(cache.node("A").map(|n| n.step.step_id.as_str()), Some("second"));
        assert_eq!(cache.node_count(), 1);
        assert!(cache.edges_from("").is_empty());
    }
}
