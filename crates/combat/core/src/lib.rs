//! Deterministic combo and special-ability resolution.
//!
//! `combat-core` turns timestamped player inputs into combo steps, tracks
//! when a weapon special becomes usable and converts animation playback into
//! discrete hit and window events. It is headless and tick-driven: every call
//! takes the caller's clock and nothing blocks or reads a wall clock.
//!
//! The pieces can be used on their own ([`ComboSystem`], [`SpecialReadiness`],
//! [`AnimationCombatDriver`], [`CombatStateMachine`]) or wired together by
//! [`CombatEngine`].
pub mod combo;
pub mod config;
pub mod definition;
pub mod engine;
pub mod machine;
pub mod special;
pub mod timeline;

pub use combo::{ComboInputContext, ComboSystem, ComboSystemState};
pub use config::CombatConfig;
pub use definition::{
    AbilityReference, ComboEdgeConditionDefinition, ComboEdgeDefinition, ComboGraphDefinition,
    ComboInputType, ComboNodeDefinition, ComboStartNodeDefinition, ComboStepDefinition,
    DefinitionIssue, HitShapeDefinition, HitShapeType, IssueSeverity, NormalizedWindow,
    ResourceCostDefinition, SpecialActionDefinition, SpecialRuleDefinition, SpecialRuleType,
    SpecialTrigger, WeaponCombatDefinition, WeaponSpecialDefinition, validate_combat_definition,
    validate_special_definition,
};
pub use engine::{CombatEngine, Event, NoTimeline, TimelineOracle, Topic};
pub use machine::{
    ActionHandleResult, BufferedAction, ComboStepContext, CombatEvent, CombatState,
    CombatStateMachine,
};
pub use special::SpecialReadiness;
pub use timeline::{
    AnimationCombatDriver, TimelineEvent, TimelineState, WindowState, WindowTracker,
    WindowTransition, sample_normalized_time,
};
