//! Combat state machine.
//!
//! [`CombatStateMachine`] cycles `Idle -> BasicAttack -> Recovery -> Idle`.
//! It owns the [`ComboSystem`] and the [`SpecialReadiness`] evaluator, reacts
//! to timeline notifications and buffers inputs it cannot act on yet.
//!
//! All calls are synchronous and take the caller's clock. Notifications for
//! the host are queued as [`CombatEvent`]s in emission order and collected
//! with [`CombatStateMachine::drain_events`].

mod action;

use std::sync::Arc;

use crate::combo::ComboSystem;
use crate::config::CombatConfig;
use crate::definition::{
    ComboInputType, ComboStepDefinition, WeaponCombatDefinition, WeaponSpecialDefinition,
};
use crate::special::SpecialReadiness;
use crate::timeline::{TimelineEvent, WindowState};

pub use action::{ActionHandleResult, BufferedAction, ComboStepContext, CombatEvent, CombatState};

#[derive(Clone, Debug)]
pub struct CombatStateMachine {
    combo: ComboSystem,
    special: SpecialReadiness,
    buffered_input_timeout_seconds: f32,
    state: CombatState,
    current_step: Option<Arc<ComboStepDefinition>>,
    buffered: Option<BufferedAction>,
    continue_window: WindowState,
    cancel_window: WindowState,
    recovery_ends_at: f32,
    steps_started: u64,
    events: Vec<CombatEvent>,
}

impl CombatStateMachine {
    pub fn new(config: &CombatConfig) -> Self {
        let config = config.sanitized();
        Self {
            combo: ComboSystem::new(&config),
            special: SpecialReadiness::new(config.special_input_timeout_seconds),
            buffered_input_timeout_seconds: config.buffered_input_timeout_seconds,
            state: CombatState::Idle,
            current_step: None,
            buffered: None,
            continue_window: WindowState::Closed,
            cancel_window: WindowState::Closed,
            recovery_ends_at: f32::NEG_INFINITY,
            steps_started: 0,
            events: Vec::new(),
        }
    }

    // ===== queries =====

    pub fn state(&self) -> CombatState {
        self.state
    }

    pub fn combo(&self) -> &ComboSystem {
        &self.combo
    }

    pub fn special(&self) -> &SpecialReadiness {
        &self.special
    }

    pub fn current_step(&self) -> Option<&Arc<ComboStepDefinition>> {
        self.current_step.as_ref()
    }

    pub fn buffered_action(&self) -> Option<&BufferedAction> {
        self.buffered.as_ref()
    }

    pub fn is_continue_window_open(&self) -> bool {
        self.continue_window == WindowState::Open
    }

    pub fn is_cancelable_into_ability_open(&self) -> bool {
        self.cancel_window == WindowState::Open
    }

    pub fn recovery_ends_at(&self) -> f32 {
        self.recovery_ends_at
    }

    /// Number of steps started since construction.
    pub fn steps_started(&self) -> u64 {
        self.steps_started
    }

    pub fn is_special_ready(&self) -> bool {
        self.special.is_ready()
    }

    pub fn special_cooldown_seconds(&self) -> f32 {
        self.special.cooldown_seconds()
    }

    pub fn special_cooldown_remaining(&self, now: f32) -> f32 {
        self.special.cooldown_remaining(now)
    }

    pub fn current_special_ability_id(&self) -> &str {
        self.special.ability_id()
    }

    pub fn combat_meter(&self) -> f32 {
        self.special.combat_meter()
    }

    pub fn time_in_combat(&self) -> f32 {
        self.special.time_in_combat()
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== definitions =====

    pub fn set_combat_definition(&mut self, definition: Option<Arc<WeaponCombatDefinition>>) {
        self.combo.set_definition(definition);
    }

    pub fn set_special_definition(&mut self, definition: Option<Arc<WeaponSpecialDefinition>>) {
        let change = self.special.set_definition(definition);
        self.publish_ready(change);
    }

    // ===== inputs =====

    /// Routes a combo input.
    ///
    /// The input always reaches the sequence-match tracker first. During an
    /// attack with the continue window closed it is buffered; otherwise the
    /// combo graph decides whether a step starts.
    pub fn handle_combo_input(
        &mut self,
        input: ComboInputType,
        recovery_seconds: f32,
        now: f32,
    ) -> ActionHandleResult {
        self.register_combo_input(input, now);

        if self.state == CombatState::BasicAttack && !self.is_continue_window_open() {
            self.buffer_action(input, recovery_seconds, now);
            return ActionHandleResult::Buffered;
        }

        let Some(step) = self.combo.try_advance_input(input, now) else {
            return match self.state {
                CombatState::BasicAttack | CombatState::Recovery => {
                    self.buffer_action(input, recovery_seconds, now);
                    ActionHandleResult::Buffered
                }
                CombatState::Idle => ActionHandleResult::Rejected,
            };
        };

        self.start_combo_step(input, step, recovery_seconds, now);
        ActionHandleResult::Started
    }

    /// Feeds an input to the special sequence tracker only.
    pub fn register_combo_input(&mut self, input: ComboInputType, now: f32) {
        let change = self.special.register_input(input, now);
        self.publish_ready(change);
    }

    pub fn register_hit_confirmed(&mut self, now: f32) {
        let change = self.special.register_hit(now);
        self.publish_ready(change);
    }

    pub fn update_combat_meter(&mut self, meter: f32, now: f32) {
        let change = self.special.update_meter(meter, now);
        self.publish_ready(change);
    }

    pub fn update_time_in_combat(&mut self, seconds: f32, now: f32) {
        let change = self.special.update_time_in_combat(seconds, now);
        self.publish_ready(change);
    }

    /// Consumes special readiness and starts its cooldown.
    ///
    /// Returns true once per activation; the host then fires the ability.
    pub fn try_consume_special_ready(&mut self, now: f32) -> bool {
        // Readiness past its deadline expires here rather than being consumed.
        let change = self.special.tick(now);
        self.publish_ready(change);

        if !self.special.try_consume(now) {
            return false;
        }

        self.events.push(CombatEvent::SpecialReadyChanged(false));
        true
    }

    // ===== timeline notifications =====

    pub fn notify_continue_window_opened(&mut self, now: f32) {
        self.continue_window = WindowState::Open;
        self.try_consume_buffered_action(now);
    }

    pub fn notify_continue_window_closed(&mut self) {
        self.continue_window = WindowState::Closed;
    }

    pub fn notify_cancelable_into_ability_opened(&mut self) {
        self.cancel_window = WindowState::Open;
    }

    pub fn notify_cancelable_into_ability_closed(&mut self) {
        self.cancel_window = WindowState::Closed;
    }

    /// Ends the running attack and enters recovery.
    pub fn notify_action_animation_complete(&mut self) {
        if self.state != CombatState::BasicAttack {
            return;
        }

        self.state = CombatState::Recovery;
        self.continue_window = WindowState::Closed;
        self.cancel_window = WindowState::Closed;

        let step = self.current_step.take();
        tracing::debug!(
            step = step.as_deref().map(|s| s.step_id.as_str()),
            recovery_ends_at = self.recovery_ends_at,
            "combo step ended"
        );
        self.events.push(CombatEvent::ComboStepEnded(step));
    }

    /// Dispatches one timeline event to the matching notification.
    pub fn handle_timeline_event(&mut self, event: &TimelineEvent, now: f32) {
        match event {
            TimelineEvent::Hit { .. } => self.register_hit_confirmed(now),
            TimelineEvent::ContinueWindowOpened => self.notify_continue_window_opened(now),
            TimelineEvent::ContinueWindowClosed => self.notify_continue_window_closed(),
            TimelineEvent::CancelableIntoAbilityOpened => {
                self.notify_cancelable_into_ability_opened()
            }
            TimelineEvent::CancelableIntoAbilityClosed => {
                self.notify_cancelable_into_ability_closed()
            }
            TimelineEvent::AnimationComplete => self.notify_action_animation_complete(),
        }
    }

    /// Per-frame update: finishes recovery and expires special readiness.
    pub fn tick(&mut self, now: f32) {
        if self.state == CombatState::Recovery && now >= self.recovery_ends_at {
            self.state = CombatState::Idle;
            tracing::debug!(now, "recovery finished");
            self.try_consume_buffered_action(now);
        }

        let change = self.special.tick(now);
        self.publish_ready(change);
    }

    fn start_combo_step(
        &mut self,
        input: ComboInputType,
        step: Arc<ComboStepDefinition>,
        recovery_seconds: f32,
        now: f32,
    ) {
        self.state = CombatState::BasicAttack;
        self.current_step = Some(Arc::clone(&step));
        self.continue_window = WindowState::Closed;
        self.cancel_window = WindowState::Closed;
        self.recovery_ends_at = now + recovery_seconds.max(0.0);
        self.buffered = None;
        self.steps_started += 1;

        tracing::debug!(%input, step = %step.step_id, now, "combo step started");
        self.events.push(CombatEvent::ComboStepStarted(ComboStepContext {
            input,
            step: Arc::clone(&step),
            recovery_seconds,
        }));

        let change = self.special.register_step(&step, now);
        self.publish_ready(change);
    }

    fn buffer_action(&mut self, input: ComboInputType, recovery_seconds: f32, now: f32) {
        if self.buffered_input_timeout_seconds <= 0.0 {
            return;
        }

        let action = BufferedAction {
            input,
            recovery_seconds,
            received_at: now,
            expires_at: now + self.buffered_input_timeout_seconds,
        };
        tracing::debug!(%input, expires_at = action.expires_at, "input buffered");
        self.buffered = Some(action);
    }

    /// Replays the buffered input once. It is dropped whether it starts a
    /// step or not; it survives only while an attack has no open window.
    fn try_consume_buffered_action(&mut self, now: f32) {
        let Some(action) = self.buffered else {
            return;
        };

        if action.is_expired(now) {
            tracing::debug!(input = %action.input, now, "buffered input expired");
            self.buffered = None;
            return;
        }

        if self.state == CombatState::BasicAttack && !self.is_continue_window_open() {
            return;
        }

        self.buffered = None;
        match self.combo.try_advance_input(action.input, now) {
            Some(step) => self.start_combo_step(action.input, step, action.recovery_seconds, now),
            None => tracing::debug!(input = %action.input, "buffered input matched nothing"),
        }
    }

    fn publish_ready(&mut self, change: Option<bool>) {
        if let Some(ready) = change {
            self.events.push(CombatEvent::SpecialReadyChanged(ready));
        }
    }
}

impl Default for CombatStateMachine {
    fn default() -> Self {
        Self::new(&CombatConfig::default())
    }
}
