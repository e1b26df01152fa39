//! Weapon special definitions: the readiness rule and the action it unlocks.

use super::ComboInputType;

/// Discriminant of a [`SpecialTrigger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SpecialRuleType {
    SequenceMatch,
    HitCount,
    FinisherReached,
    TimeInCombat,
    MeterFill,
}

/// Condition that makes a weapon special ready.
///
/// Each variant only carries the fields its rule reads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialTrigger {
    /// Ready when the most recent inputs equal `sequence`, in order.
    SequenceMatch { sequence: Vec<ComboInputType> },

    /// Ready once `hit_count` confirmed hits land inside one rolling window.
    HitCount {
        hit_count: u32,
        hit_window_seconds: f32,
    },

    /// Ready once the externally pushed meter reaches `threshold`.
    MeterFill { threshold: f32 },

    /// Ready once the externally pushed time in combat reaches `seconds`.
    TimeInCombat { seconds: f32 },

    /// Ready when a started combo step carries `tag`.
    FinisherReached { tag: String },
}

impl SpecialTrigger {
    pub fn rule_type(&self) -> SpecialRuleType {
        match self {
            Self::SequenceMatch { .. } => SpecialRuleType::SequenceMatch,
            Self::HitCount { .. } => SpecialRuleType::HitCount,
            Self::MeterFill { .. } => SpecialRuleType::MeterFill,
            Self::TimeInCombat { .. } => SpecialRuleType::TimeInCombat,
            Self::FinisherReached { .. } => SpecialRuleType::FinisherReached,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialRuleDefinition {
    pub trigger: SpecialTrigger,
    /// Seconds readiness lasts once set. Zero or negative never expires.
    #[cfg_attr(feature = "serde", serde(default))]
    pub expires_after_seconds: f32,
}

impl SpecialRuleDefinition {
    pub fn new(trigger: SpecialTrigger) -> Self {
        Self {
            trigger,
            expires_after_seconds: 0.0,
        }
    }

    #[must_use]
    pub fn expiring_after(mut self, seconds: f32) -> Self {
        self.expires_after_seconds = seconds;
        self
    }

    pub fn rule_type(&self) -> SpecialRuleType {
        self.trigger.rule_type()
    }
}

/// Reference to an ability asset by its stable guid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityReference {
    pub guid: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceCostDefinition {
    pub resource_type_id: String,
    pub amount: f32,
}

/// What the host fires once the special is consumed.
///
/// The runtime only reads `cooldown_seconds` and the identifiers; costs are
/// passed through for the host.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpecialActionDefinition {
    pub ability_reference: Option<AbilityReference>,
    pub special_id: Option<String>,
    pub cooldown_seconds: f32,
    pub resource_costs: Vec<ResourceCostDefinition>,
}

impl SpecialActionDefinition {
    /// Identifier of the ability to fire: the ability guid when present,
    /// otherwise the special id, otherwise empty.
    pub fn ability_id(&self) -> &str {
        if let Some(ability) = &self.ability_reference {
            if !ability.guid.trim().is_empty() {
                return &ability.guid;
            }
        }

        self.special_id.as_deref().unwrap_or_default()
    }
}

/// Special attack of one weapon.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponSpecialDefinition {
    pub rule: SpecialRuleDefinition,
    #[cfg_attr(feature = "serde", serde(default))]
    pub action: SpecialActionDefinition,
}

impl WeaponSpecialDefinition {
    pub fn new(rule: SpecialRuleDefinition) -> Self {
        Self {
            rule,
            action: SpecialActionDefinition::default(),
        }
    }

    #[must_use]
    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        self.action.cooldown_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_special_id(mut self, special_id: impl Into<String>) -> Self {
        self.action.special_id = Some(special_id.into());
        self
    }
}
