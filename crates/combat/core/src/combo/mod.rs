//! Combo graph walker.
//!
//! [`ComboSystem`] turns timestamped inputs into combo steps by walking the
//! graph of the active [`WeaponCombatDefinition`]. It keeps only the current
//! node, the time of the last accepted input and the active step.
//!
//! # Resolution
//!
//! 1. A gap longer than the input timeout resets the chain first.
//! 2. With no current node, the start node registered for the input is used.
//! 3. Otherwise the first outgoing edge (declaration order) whose input and
//!    conditions match is taken; when none matches, the start node for the
//!    input is used if restarting mid-chain is allowed.
//! 4. An unresolvable target resets the chain and reports no match.

mod graph;

use std::sync::Arc;

use crate::config::CombatConfig;
use crate::definition::{
    ComboEdgeConditionDefinition, ComboInputType, ComboStepDefinition, WeaponCombatDefinition,
};

use graph::ComboGraph;

/// Live facts an edge guard is evaluated against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComboInputContext {
    pub input: ComboInputType,
    pub hit_confirmed: bool,
    pub stamina: f32,
}

impl ComboInputContext {
    /// Context with no confirmed hit and unlimited stamina.
    pub const fn unconditioned(input: ComboInputType) -> Self {
        Self {
            input,
            hit_confirmed: false,
            stamina: f32::MAX,
        }
    }
}

/// Position of a combo chain in its graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ComboSystemState {
    /// Declared id of the current node, empty when no chain is active.
    pub current_node_id: String,
    pub last_input_time: f32,
    pub active_step: Option<Arc<ComboStepDefinition>>,
}

impl ComboSystemState {
    pub fn empty() -> Self {
        Self {
            current_node_id: String::new(),
            last_input_time: f32::NEG_INFINITY,
            active_step: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current_node_id.is_empty()
    }
}

impl Default for ComboSystemState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Walks one weapon's combo graph.
#[derive(Clone, Debug)]
pub struct ComboSystem {
    definition: Option<Arc<WeaponCombatDefinition>>,
    graph: ComboGraph,
    state: ComboSystemState,
    input_timeout_seconds: f32,
    allow_restart_mid_chain: bool,
}

impl ComboSystem {
    /// Creates a combo system with no definition.
    pub fn new(config: &CombatConfig) -> Self {
        let config = config.sanitized();
        Self {
            definition: None,
            graph: ComboGraph::default(),
            state: ComboSystemState::empty(),
            input_timeout_seconds: config.combo_input_timeout_seconds,
            allow_restart_mid_chain: config.allow_restart_mid_chain,
        }
    }

    pub fn state(&self) -> &ComboSystemState {
        &self.state
    }

    pub fn definition(&self) -> Option<&Arc<WeaponCombatDefinition>> {
        self.definition.as_ref()
    }

    pub fn input_timeout_seconds(&self) -> f32 {
        self.input_timeout_seconds
    }

    /// Sets the input timeout, keeping it strictly positive.
    pub fn set_input_timeout_seconds(&mut self, seconds: f32) {
        self.input_timeout_seconds = seconds.max(CombatConfig::MIN_COMBO_INPUT_TIMEOUT);
    }

    pub fn allow_restart_mid_chain(&self) -> bool {
        self.allow_restart_mid_chain
    }

    pub fn set_allow_restart_mid_chain(&mut self, allow: bool) {
        self.allow_restart_mid_chain = allow;
    }

    /// Installs a definition, rebuilding lookups and resetting the chain.
    ///
    /// Passing the definition that is already installed is a no-op.
    pub fn set_definition(&mut self, definition: Option<Arc<WeaponCombatDefinition>>) {
        let unchanged = match (&self.definition, &definition) {
            (Some(current), Some(next)) => Arc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.graph = definition
            .as_deref()
            .map(ComboGraph::build)
            .unwrap_or_default();
        tracing::debug!(
            weapon = definition.as_deref().map(|d| d.weapon_id.as_str()),
            nodes = self.graph.node_count(),
            "combo definition installed"
        );
        self.definition = definition;
        self.reset_combo();
    }

    pub fn reset_combo(&mut self) {
        self.state = ComboSystemState::empty();
    }

    /// Advances with no confirmed hit and unlimited stamina.
    pub fn try_advance_input(
        &mut self,
        input: ComboInputType,
        now: f32,
    ) -> Option<Arc<ComboStepDefinition>> {
        self.try_advance_combo(&ComboInputContext::unconditioned(input), now)
    }

    /// Resolves the next step for `context` at time `now`.
    ///
    /// Returns the step of the node the chain moved to, or `None` when the
    /// input matched nothing (the chain is reset in that case).
    pub fn try_advance_combo(
        &mut self,
        context: &ComboInputContext,
        now: f32,
    ) -> Option<Arc<ComboStepDefinition>> {
        self.definition.as_ref()?;

        if now - self.state.last_input_time > self.input_timeout_seconds {
            self.reset_combo();
        }

        let resolved = self
            .resolve_next_node(context)
            .and_then(|node_id| self.graph.node(node_id))
            .map(|node| (node.node_id.clone(), Arc::clone(&node.step)));

        let Some((node_id, step)) = resolved else {
            tracing::trace!(input = %context.input, "combo input matched no node");
            self.reset_combo();
            return None;
        };

        tracing::trace!(input = %context.input, node = %node_id, "combo advanced");
        self.state.current_node_id = node_id;
        self.state.last_input_time = now;
        self.state.active_step = Some(Arc::clone(&step));
        Some(step)
    }

    fn resolve_next_node(&self, context: &ComboInputContext) -> Option<&str> {
        if self.state.is_empty() {
            return self.graph.start_node(context.input);
        }

        let edge = self
            .graph
            .edges_from(&self.state.current_node_id)
            .iter()
            .find(|edge| edge.input == context.input && conditions_met(edge.conditions, context));

        match edge {
            Some(edge) => Some(edge.to_node_id.as_str()),
            None if self.allow_restart_mid_chain => self.graph.start_node(context.input),
            None => None,
        }
    }
}

impl Default for ComboSystem {
    fn default() -> Self {
        Self::new(&CombatConfig::default())
    }
}

fn conditions_met(
    conditions: Option<ComboEdgeConditionDefinition>,
    context: &ComboInputContext,
) -> bool {
    let Some(conditions) = conditions else {
        return true;
    };

    if conditions.hit_confirmed_required && !context.hit_confirmed {
        return false;
    }

    context.stamina >= conditions.stamina_min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ComboEdgeDefinition, ComboGraphDefinition};

    use ComboInputType::{Heavy, Light, Medium};

    fn step(id: &str) -> ComboStepDefinition {
        ComboStepDefinition::new(id, format!("anim_{id}"))
    }

    fn light_chain() -> Arc<WeaponCombatDefinition> {
        let graph = ComboGraphDefinition::default()
            .with_start(Light, "L1")
            .with_start(Heavy, "H1")
            .with_node("L1", step("l1"))
            .with_node("L2", step("l2"))
            .with_node("L3", step("l3"))
            .with_node("H1", step("h1"))
            .with_edge(ComboEdgeDefinition::new("L1", Light, "L2"))
            .with_edge(ComboEdgeDefinition::new("L2", Light, "L3"));
        Arc::new(WeaponCombatDefinition::new("sword", graph))
    }

    fn system(definition: Arc<WeaponCombatDefinition>) -> ComboSystem {
        let mut combo = ComboSystem::default();
        combo.set_input_timeout_seconds(1.0);
        combo.set_definition(Some(definition));
        combo
    }

    fn step_id(step: Option<Arc<ComboStepDefinition>>) -> Option<String> {
        step.map(|s| s.step_id.clone())
    }

    #[test]
    fn walks_chain_through_edges() {
        let mut combo = system(light_chain());

        assert_eq!(step_id(combo.try_advance_input(Light, 0.0)), Some("l1".into()));
        assert_eq!(step_id(combo.try_advance_input(Light, 0.4)), Some("l2".into()));
        assert_eq!(step_id(combo.try_advance_input(Light, 0.8)), Some("l3".into()));
        assert_eq!(combo.state().current_node_id, "L3");
        assert_eq!(combo.state().last_input_time, 0.8);
    }

    #[test]
    fn timeout_resets_before_evaluating() {
        let mut combo = system(light_chain());
        combo.try_advance_input(Light, 0.0);
        combo.try_advance_input(Light, 0.5);

        // Gap of 1.5s exceeds the 1.0s timeout: back to the opener.
        assert_eq!(step_id(combo.try_advance_input(Light, 2.0)), Some("l1".into()));
        assert_eq!(combo.state().current_node_id, "L1");
    }

    #[test]
    fn gap_equal_to_timeout_keeps_chain() {
        let mut combo = system(light_chain());
        combo.try_advance_input(Light, 0.0);

        assert_eq!(step_id(combo.try_advance_input(Light, 1.0)), Some("l2".into()));
    }

    #[test]
    fn first_matching_edge_wins() {
        let graph = ComboGraphDefinition::default()
            .with_start(Light, "A")
            .with_node("A", step("a"))
            .with_node("B", step("b"))
            .with_node("C", step("c"))
            .with_node("D", step("d"))
            .with_edge(
                ComboEdgeDefinition::new("A", Light, "B").with_conditions(
                    ComboEdgeConditionDefinition {
                        hit_confirmed_required: true,
                        stamina_min: 0.0,
                    },
                ),
            )
            .with_edge(ComboEdgeDefinition::new("A", Light, "C").with_conditions(
                ComboEdgeConditionDefinition {
                    hit_confirmed_required: false,
                    stamina_min: 10.0,
                },
            ))
            .with_edge(ComboEdgeDefinition::new("A", Light, "D"));
        let definition = Arc::new(WeaponCombatDefinition::new("w", graph));

        let cases = [
            (true, 50.0, "b"),
            (false, 50.0, "c"),
            (true, 5.0, "b"),
            (false, 5.0, "d"),
        ];
        for (hit_confirmed, stamina, expected) in cases {
            let mut combo = system(Arc::clone(&definition));
            combo.try_advance_input(Light, 0.0);
            let context = ComboInputContext {
                input: Light,
                hit_confirmed,
                stamina,
            };
            assert_eq!(
                step_id(combo.try_advance_combo(&context, 0.2)),
                Some(expected.to_string()),
                "hit_confirmed={hit_confirmed} stamina={stamina}"
            );
        }
    }

    #[test]
    fn unmatched_input_mid_chain_restarts_from_opener() {
        let mut combo = system(light_chain());
        combo.try_advance_input(Light, 0.0);
        combo.try_advance_input(Light, 0.3);

        // No Heavy edge out of L2, but Heavy opens a chain of its own.
        assert_eq!(step_id(combo.try_advance_input(Heavy, 0.6)), Some("h1".into()));
        assert_eq!(combo.state().current_node_id, "H1");
    }

    #[test]
    fn restart_mid_chain_can_be_disabled() {
        let mut combo = system(light_chain());
        combo.set_allow_restart_mid_chain(false);
        combo.try_advance_input(Light, 0.0);

        assert_eq!(combo.try_advance_input(Heavy, 0.3), None);
        assert!(combo.state().is_empty());

        // Once reset, Heavy opens normally.
        assert_eq!(step_id(combo.try_advance_input(Heavy, 0.4)), Some("h1".into()));
    }

    #[test]
    fn unknown_input_resets_chain() {
        let mut combo = system(light_chain());
        combo.try_advance_input(Light, 0.0);

        assert_eq!(combo.try_advance_input(Medium, 0.2), None);
        assert_eq!(combo.state(), &ComboSystemState::empty());
    }

    #[test]
    fn dangling_edge_target_resets_chain() {
        let graph = ComboGraphDefinition::default()
            .with_start(Light, "L1")
            .with_node("L1", step("l1"))
            .with_edge(ComboEdgeDefinition::new("L1", Light, "missing"));
        let mut combo = system(Arc::new(WeaponCombatDefinition::new("w", graph)));
        combo.try_advance_input(Light, 0.0);

        assert_eq!(combo.try_advance_input(Light, 0.2), None);
        assert!(combo.state().is_empty());
    }

    #[test]
    fn node_ids_match_case_insensitively() {
        let graph = ComboGraphDefinition::default()
            .with_start(Light, "opener")
            .with_node("OPENER", step("o"))
            .with_node("Follow", step("f"))
            .with_edge(ComboEdgeDefinition::new("Opener", Light, "follow"));
        let mut combo = system(Arc::new(WeaponCombatDefinition::new("w", graph)));

        assert_eq!(step_id(combo.try_advance_input(Light, 0.0)), Some("o".into()));
        assert_eq!(combo.state().current_node_id, "OPENER");
        assert_eq!(step_id(combo.try_advance_input(Light, 0.1)), Some("f".into()));
    }

    #[test]
    fn no_definition_never_matches() {
        let mut combo = ComboSystem::default();
        assert_eq!(combo.try_advance_input(Light, 0.0), None);
    }

    #[test]
    fn same_definition_keeps_state() {
        let definition = light_chain();
        let mut combo = system(Arc::clone(&definition));
        combo.try_advance_input(Light, 0.0);

        combo.set_definition(Some(Arc::clone(&definition)));
        assert_eq!(combo.state().current_node_id, "L1");

        // An equal but distinct definition is a new definition.
        combo.set_definition(Some(Arc::new((*definition).clone())));
        assert!(combo.state().is_empty());
    }
}
