use std::sync::Arc;

use crate::definition::{ComboInputType, ComboStepDefinition};

/// Top-level combat state of one entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatState {
    #[default]
    Idle,
    BasicAttack,
    Recovery,
}

/// Outcome of a combo input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum ActionHandleResult {
    /// A step started immediately.
    Started,
    /// The input was held for replay when a window opens or recovery ends.
    Buffered,
    /// The input matched nothing and could not be buffered.
    Rejected,
}

/// An input held back until the state machine can act on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferedAction {
    pub input: ComboInputType,
    pub recovery_seconds: f32,
    pub received_at: f32,
    pub expires_at: f32,
}

impl BufferedAction {
    pub fn is_expired(&self, now: f32) -> bool {
        now > self.expires_at
    }
}

/// Describes a step that just started.
#[derive(Clone, Debug, PartialEq)]
pub struct ComboStepContext {
    pub input: ComboInputType,
    pub step: Arc<ComboStepDefinition>,
    pub recovery_seconds: f32,
}

/// Notifications queued by [`CombatStateMachine`](super::CombatStateMachine).
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    ComboStepStarted(ComboStepContext),
    ComboStepEnded(Option<Arc<ComboStepDefinition>>),
    SpecialReadyChanged(bool),
}

impl CombatEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ComboStepStarted(_) => "combo_step_started",
            Self::ComboStepEnded(_) => "combo_step_ended",
            Self::SpecialReadyChanged(_) => "special_ready_changed",
        }
    }
}
