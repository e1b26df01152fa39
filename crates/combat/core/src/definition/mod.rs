//! Static weapon definitions consumed by the combo runtime.
//!
//! Definitions are authored once per weapon/moveset, loaded by the host and
//! handed to the runtime behind an [`Arc`](std::sync::Arc). Nothing in this
//! module is mutated after loading; the runtime builds its own lookup caches.
//!
//! - [`WeaponCombatDefinition`]: the combo graph (start nodes, nodes, edges)
//! - [`WeaponSpecialDefinition`]: the special readiness rule and its action
//! - [`validate_combat_definition`] / [`validate_special_definition`]:
//!   authoring checks reported as [`DefinitionIssue`]s

mod special;
mod validation;

pub use special::{
    AbilityReference, ResourceCostDefinition, SpecialActionDefinition, SpecialRuleDefinition,
    SpecialRuleType, SpecialTrigger, WeaponSpecialDefinition,
};
pub use validation::{
    DefinitionIssue, IssueSeverity, validate_combat_definition, validate_special_definition,
};

/// Lookup key for a node id: ids compare case-insensitively and blank ids
/// have no key.
pub(crate) fn node_key(node_id: &str) -> Option<String> {
    if node_id.trim().is_empty() {
        None
    } else {
        Some(node_id.to_lowercase())
    }
}

/// Input category fed into the combo graph.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum ComboInputType {
    Light,
    Medium,
    Heavy,
    Special,
}

/// Shape of the volume swept by a hit.
///
/// The runtime never evaluates volumes; shapes travel with hit events so the
/// host can run its own overlap queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitShapeType {
    #[default]
    Arc,
    Cone,
    Box,
    Sphere,
}

/// A single hit volume and the moment in the step it lands.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HitShapeDefinition {
    pub shape: HitShapeType,
    pub range: f32,
    pub radius: f32,
    pub width: f32,
    pub angle: f32,
    pub offset: [f32; 3],
    pub requires_line_of_sight: bool,
    pub max_targets: u32,
    /// Normalized playback position (0..=1) at which the hit fires.
    pub hit_moment_normalized: f32,
}

/// Half-open interval `[start, end)` over normalized playback time.
///
/// A window only exists when `end > start`; anything else never opens.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NormalizedWindow {
    pub start: f32,
    pub end: f32,
}

impl NormalizedWindow {
    pub const CLOSED: Self = Self::new(0.0, 0.0);

    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    /// Returns true if this window describes a genuine interval.
    pub fn is_interval(&self) -> bool {
        self.end > self.start
    }

    /// Returns true if `t` lies inside the window.
    pub fn contains(&self, t: f32) -> bool {
        self.is_interval() && t >= self.start && t < self.end
    }
}

/// Payload carried by a combo node: one discrete attack move.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComboStepDefinition {
    pub step_id: String,
    /// Key handed to the host's animation system when the step starts.
    pub animation_key: String,
    pub hit_shapes: Vec<HitShapeDefinition>,
    /// Interval during which a new input chains into the next step.
    pub continue_window: NormalizedWindow,
    /// Interval during which the step may be cancelled into a special ability.
    pub cancel_into_ability_window: NormalizedWindow,
    pub tags: Vec<String>,
}

impl ComboStepDefinition {
    /// Creates a step with the given id and animation key and no windows.
    pub fn new(step_id: impl Into<String>, animation_key: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
            animation_key: animation_key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hit(mut self, hit_moment_normalized: f32) -> Self {
        self.hit_shapes.push(HitShapeDefinition {
            hit_moment_normalized,
            ..HitShapeDefinition::default()
        });
        self
    }

    #[must_use]
    pub fn with_continue_window(mut self, start: f32, end: f32) -> Self {
        self.continue_window = NormalizedWindow::new(start, end);
        self
    }

    #[must_use]
    pub fn with_cancel_window(mut self, start: f32, end: f32) -> Self {
        self.cancel_into_ability_window = NormalizedWindow::new(start, end);
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Maps an opening input to the node a fresh combo starts from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboStartNodeDefinition {
    pub input: ComboInputType,
    pub node_id: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboNodeDefinition {
    pub node_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub step: ComboStepDefinition,
}

/// Guard evaluated against the live input context before an edge is taken.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComboEdgeConditionDefinition {
    pub hit_confirmed_required: bool,
    pub stamina_min: f32,
}

/// Directed transition between two nodes, taken on a matching input.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboEdgeDefinition {
    pub from_node_id: String,
    pub to_node_id: String,
    pub input: ComboInputType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Option<ComboEdgeConditionDefinition>,
}

impl ComboEdgeDefinition {
    pub fn new(
        from_node_id: impl Into<String>,
        input: ComboInputType,
        to_node_id: impl Into<String>,
    ) -> Self {
        Self {
            from_node_id: from_node_id.into(),
            to_node_id: to_node_id.into(),
            input,
            conditions: None,
        }
    }

    #[must_use]
    pub fn with_conditions(mut self, conditions: ComboEdgeConditionDefinition) -> Self {
        self.conditions = Some(conditions);
        self
    }
}

/// Start nodes, nodes and edges of one moveset.
///
/// Edge order is significant: the first edge out of a node whose input and
/// conditions match wins.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComboGraphDefinition {
    pub start_nodes: Vec<ComboStartNodeDefinition>,
    pub nodes: Vec<ComboNodeDefinition>,
    pub edges: Vec<ComboEdgeDefinition>,
}

impl ComboGraphDefinition {
    #[must_use]
    pub fn with_start(mut self, input: ComboInputType, node_id: impl Into<String>) -> Self {
        self.start_nodes.push(ComboStartNodeDefinition {
            input,
            node_id: node_id.into(),
        });
        self
    }

    #[must_use]
    pub fn with_node(mut self, node_id: impl Into<String>, step: ComboStepDefinition) -> Self {
        self.nodes.push(ComboNodeDefinition {
            node_id: node_id.into(),
            step,
        });
        self
    }

    #[must_use]
    pub fn with_edge(mut self, edge: ComboEdgeDefinition) -> Self {
        self.edges.push(edge);
        self
    }
}

/// Combo graph owned by one weapon.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WeaponCombatDefinition {
    pub weapon_id: String,
    pub combo_graph: ComboGraphDefinition,
}

impl WeaponCombatDefinition {
    pub fn new(weapon_id: impl Into<String>, combo_graph: ComboGraphDefinition) -> Self {
        Self {
            weapon_id: weapon_id.into(),
            combo_graph,
        }
    }
}
