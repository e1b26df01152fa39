//! Authoring checks for weapon definitions.
//!
//! The runtime tolerates every problem reported here (unknown targets resolve
//! to "no match", duplicates are overwritten), so validation never blocks
//! loading. Loaders surface issues as warnings; tools can refuse content with
//! [`IssueSeverity::Invalid`] issues.

use std::collections::{HashMap, HashSet};

use super::{
    ComboInputType, ComboStepDefinition, NormalizedWindow, SpecialTrigger, WeaponCombatDefinition,
    WeaponSpecialDefinition, node_key,
};

/// How much a definition issue matters at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueSeverity {
    /// Tolerated with a well-defined fallback (overwrite, skip).
    Warning,

    /// Part of the content can never work as authored.
    Invalid,
}

impl IssueSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Invalid => "invalid",
        }
    }
}

/// A single problem found in a definition.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DefinitionIssue {
    #[error("combo graph has no start nodes")]
    NoStartNodes,

    #[error("node #{index} has a blank id and is ignored")]
    BlankNodeId { index: usize },

    #[error("node id '{node_id}' is declared more than once; the last declaration wins")]
    DuplicateNodeId { node_id: String },

    #[error("start input {input} is declared more than once; the last declaration wins")]
    DuplicateStartInput { input: ComboInputType },

    #[error("start input {input} points at unknown node '{node_id}'")]
    UnknownStartNode {
        input: ComboInputType,
        node_id: String,
    },

    #[error("edge #{index} has a blank source node and is ignored")]
    BlankEdgeSource { index: usize },

    #[error("edge {from} --{input}--> {to} leaves an unknown node and is unreachable")]
    UnknownEdgeSource {
        from: String,
        to: String,
        input: ComboInputType,
    },

    #[error("edge {from} --{input}--> {to} targets an unknown node")]
    UnknownEdgeTarget {
        from: String,
        to: String,
        input: ComboInputType,
    },

    #[error("node '{node_id}' {window} window [{start}, {end}) never opens")]
    EmptyWindow {
        node_id: String,
        window: &'static str,
        start: f32,
        end: f32,
    },

    #[error("node '{node_id}' hit moment {moment} is outside [0, 1]")]
    HitMomentOutOfRange { node_id: String, moment: f32 },

    #[error("sequence rule has an empty sequence")]
    EmptySequence,

    #[error("hit count rule requires at least one hit")]
    NonPositiveHitCount,

    #[error("finisher rule has a blank tag")]
    BlankFinisherTag,

    #[error("special cooldown {seconds}s is negative and treated as no cooldown")]
    NegativeCooldown { seconds: f32 },
}

impl DefinitionIssue {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            Self::NoStartNodes
            | Self::UnknownStartNode { .. }
            | Self::UnknownEdgeTarget { .. }
            | Self::HitMomentOutOfRange { .. }
            | Self::EmptySequence
            | Self::NonPositiveHitCount
            | Self::BlankFinisherTag => IssueSeverity::Invalid,
            Self::BlankNodeId { .. }
            | Self::DuplicateNodeId { .. }
            | Self::DuplicateStartInput { .. }
            | Self::BlankEdgeSource { .. }
            | Self::UnknownEdgeSource { .. }
            | Self::EmptyWindow { .. }
            | Self::NegativeCooldown { .. } => IssueSeverity::Warning,
        }
    }
}

/// Checks a combo graph for problems the runtime would silently tolerate.
pub fn validate_combat_definition(definition: &WeaponCombatDefinition) -> Vec<DefinitionIssue> {
    let graph = &definition.combo_graph;
    let mut issues = Vec::new();

    let mut known_nodes = HashSet::new();
    for (index, node) in graph.nodes.iter().enumerate() {
        let Some(key) = node_key(&node.node_id) else {
            issues.push(DefinitionIssue::BlankNodeId { index });
            continue;
        };

        if !known_nodes.insert(key) {
            issues.push(DefinitionIssue::DuplicateNodeId {
                node_id: node.node_id.clone(),
            });
        }

        check_step(&node.node_id, &node.step, &mut issues);
    }

    if graph.start_nodes.is_empty() {
        issues.push(DefinitionIssue::NoStartNodes);
    }

    let mut seen_inputs: HashMap<ComboInputType, usize> = HashMap::new();
    for start in &graph.start_nodes {
        let count = seen_inputs.entry(start.input).or_default();
        *count += 1;
        if *count == 2 {
            issues.push(DefinitionIssue::DuplicateStartInput { input: start.input });
        }

        let resolves = node_key(&start.node_id).is_some_and(|key| known_nodes.contains(&key));
        if !resolves {
            issues.push(DefinitionIssue::UnknownStartNode {
                input: start.input,
                node_id: start.node_id.clone(),
            });
        }
    }

    for (index, edge) in graph.edges.iter().enumerate() {
        let Some(from) = node_key(&edge.from_node_id) else {
            issues.push(DefinitionIssue::BlankEdgeSource { index });
            continue;
        };

        if !known_nodes.contains(&from) {
            issues.push(DefinitionIssue::UnknownEdgeSource {
                from: edge.from_node_id.clone(),
                to: edge.to_node_id.clone(),
                input: edge.input,
            });
        }

        let target_known = node_key(&edge.to_node_id).is_some_and(|key| known_nodes.contains(&key));
        if !target_known {
            issues.push(DefinitionIssue::UnknownEdgeTarget {
                from: edge.from_node_id.clone(),
                to: edge.to_node_id.clone(),
                input: edge.input,
            });
        }
    }

    issues
}

/// Checks a special definition's rule and action.
pub fn validate_special_definition(definition: &WeaponSpecialDefinition) -> Vec<DefinitionIssue> {
    let mut issues = Vec::new();

    match &definition.rule.trigger {
        SpecialTrigger::SequenceMatch { sequence } if sequence.is_empty() => {
            issues.push(DefinitionIssue::EmptySequence);
        }
        SpecialTrigger::HitCount { hit_count: 0, .. } => {
            issues.push(DefinitionIssue::NonPositiveHitCount);
        }
        SpecialTrigger::FinisherReached { tag } if tag.trim().is_empty() => {
            issues.push(DefinitionIssue::BlankFinisherTag);
        }
        _ => {}
    }

    let cooldown = definition.action.cooldown_seconds;
    if cooldown < 0.0 {
        issues.push(DefinitionIssue::NegativeCooldown { seconds: cooldown });
    }

    issues
}

fn check_step(node_id: &str, step: &ComboStepDefinition, issues: &mut Vec<DefinitionIssue>) {
    check_window(node_id, "continue", step.continue_window, issues);
    check_window(
        node_id,
        "cancel-into-ability",
        step.cancel_into_ability_window,
        issues,
    );

    for hit in &step.hit_shapes {
        let moment = hit.hit_moment_normalized;
        if !(0.0..=1.0).contains(&moment) {
            issues.push(DefinitionIssue::HitMomentOutOfRange {
                node_id: node_id.to_string(),
                moment,
            });
        }
    }
}

// An all-zero window is the authored "no window" and is not reported.
fn check_window(
    node_id: &str,
    window: &'static str,
    bounds: NormalizedWindow,
    issues: &mut Vec<DefinitionIssue>,
) {
    if bounds.is_interval() || bounds == NormalizedWindow::CLOSED {
        return;
    }

    issues.push(DefinitionIssue::EmptyWindow {
        node_id: node_id.to_string(),
        window,
        start: bounds.start,
        end: bounds.end,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{
        ComboEdgeDefinition, ComboGraphDefinition, SpecialRuleDefinition, WeaponSpecialDefinition,
    };

    fn graph() -> ComboGraphDefinition {
        ComboGraphDefinition::default()
            .with_start(ComboInputType::Light, "L1")
            .with_node("L1", ComboStepDefinition::new("l1", "swing_1"))
            .with_node("L2", ComboStepDefinition::new("l2", "swing_2"))
            .with_edge(ComboEdgeDefinition::new("L1", ComboInputType::Light, "L2"))
    }

    #[test]
    fn clean_graph_has_no_issues() {
        let definition = WeaponCombatDefinition::new("sword", graph());
        assert!(validate_combat_definition(&definition).is_empty());
    }

    #[test]
    fn reports_duplicates_and_dangling_references() {
        let graph = graph()
            .with_node("l1", ComboStepDefinition::new("dup", "swing_dup"))
            .with_start(ComboInputType::Light, "L2")
            .with_start(ComboInputType::Heavy, "H1")
            .with_edge(ComboEdgeDefinition::new("L2", ComboInputType::Heavy, "H9"))
            .with_edge(ComboEdgeDefinition::new("X", ComboInputType::Heavy, "L1"));
        let issues = validate_combat_definition(&WeaponCombatDefinition::new("sword", graph));

        assert!(issues.contains(&DefinitionIssue::DuplicateNodeId {
            node_id: "l1".into()
        }));
        assert!(issues.contains(&DefinitionIssue::DuplicateStartInput {
            input: ComboInputType::Light
        }));
        assert!(issues.contains(&DefinitionIssue::UnknownStartNode {
            input: ComboInputType::Heavy,
            node_id: "H1".into()
        }));
        assert!(issues.contains(&DefinitionIssue::UnknownEdgeTarget {
            from: "L2".into(),
            to: "H9".into(),
            input: ComboInputType::Heavy
        }));
        assert!(issues.contains(&DefinitionIssue::UnknownEdgeSource {
            from: "X".into(),
            to: "L1".into(),
            input: ComboInputType::Heavy
        }));
    }

    #[test]
    fn reports_step_timing_problems() {
        let step = ComboStepDefinition::new("l1", "swing_1")
            .with_hit(1.2)
            .with_continue_window(0.8, 0.6);
        let graph = ComboGraphDefinition::default()
            .with_start(ComboInputType::Light, "L1")
            .with_node("L1", step);
        let issues = validate_combat_definition(&WeaponCombatDefinition::new("sword", graph));

        assert_eq!(issues.len(), 2);
        assert!(
            issues
                .iter()
                .all(|issue| matches!(
                    issue,
                    DefinitionIssue::EmptyWindow { .. } | DefinitionIssue::HitMomentOutOfRange { .. }
                ))
        );
    }

    #[test]
    fn empty_graph_is_invalid() {
        let issues = validate_combat_definition(&WeaponCombatDefinition::default());
        assert_eq!(issues, vec![DefinitionIssue::NoStartNodes]);
        assert_eq!(issues[0].severity(), IssueSeverity::Invalid);
    }

    #[test]
    fn special_rule_checks() {
        let special = WeaponSpecialDefinition::new(SpecialRuleDefinition::new(
            SpecialTrigger::HitCount {
                hit_count: 0,
                hit_window_seconds: 2.0,
            },
        ))
        .with_cooldown(-1.0);
        let issues = validate_special_definition(&special);

        assert_eq!(
            issues,
            vec![
                DefinitionIssue::NonPositiveHitCount,
                DefinitionIssue::NegativeCooldown { seconds: -1.0 },
            ]
        );
        assert_eq!(issues[1].severity(), IssueSeverity::Warning);
    }
}
