//! Tick loop wiring a state machine to a timeline adapter.

use std::sync::Arc;

use crate::config::CombatConfig;
use crate::definition::{ComboInputType, WeaponCombatDefinition, WeaponSpecialDefinition};
use crate::machine::{ActionHandleResult, CombatEvent, CombatStateMachine};
use crate::timeline::{AnimationCombatDriver, TimelineEvent, TimelineState};

/// Host animation system as seen by the engine.
pub trait TimelineOracle {
    /// Starts playing `animation_key` from the beginning.
    fn play(&mut self, animation_key: &str);

    /// Current playback position, or `None` when nothing is playing.
    fn sample(&self) -> Option<TimelineState>;
}

/// Oracle without an animation system; steps run on the fallback clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTimeline;

impl TimelineOracle for NoTimeline {
    fn play(&mut self, _animation_key: &str) {}

    fn sample(&self) -> Option<TimelineState> {
        None
    }
}

/// Topics for event filtering
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// State machine notifications (steps, special readiness)
    Combat,
    /// Playback notifications (hits, windows, completion)
    Timeline,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Combat(CombatEvent),
    Timeline(TimelineEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Combat(_) => Topic::Combat,
            Event::Timeline(_) => Topic::Timeline,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::Combat(event) => event.name(),
            Event::Timeline(event) => event.name(),
        }
    }
}

/// Drives one combat entity.
///
/// Every started step is handed to the driver and the oracle. Timeline
/// events reach the state machine synchronously and in order; once one of
/// them starts a new step, the rest of that batch belonged to the old step
/// and is dropped.
pub struct CombatEngine<T: TimelineOracle = NoTimeline> {
    machine: CombatStateMachine,
    driver: AnimationCombatDriver,
    oracle: T,
    events: Vec<Event>,
}

impl CombatEngine<NoTimeline> {
    pub fn headless(config: &CombatConfig) -> Self {
        Self::new(config, NoTimeline)
    }
}

impl<T: TimelineOracle> CombatEngine<T> {
    pub fn new(config: &CombatConfig, oracle: T) -> Self {
        let config = config.sanitized();
        Self {
            machine: CombatStateMachine::new(&config),
            driver: AnimationCombatDriver::new(config.fallback_duration_seconds),
            oracle,
            events: Vec::new(),
        }
    }

    pub fn machine(&self) -> &CombatStateMachine {
        &self.machine
    }

    pub fn driver(&self) -> &AnimationCombatDriver {
        &self.driver
    }

    pub fn oracle(&self) -> &T {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut T {
        &mut self.oracle
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn set_combat_definition(&mut self, definition: Option<Arc<WeaponCombatDefinition>>) {
        self.machine.set_combat_definition(definition);
    }

    pub fn set_special_definition(&mut self, definition: Option<Arc<WeaponSpecialDefinition>>) {
        self.machine.set_special_definition(definition);
        self.pump();
    }

    pub fn handle_combo_input(
        &mut self,
        input: ComboInputType,
        recovery_seconds: f32,
        now: f32,
    ) -> ActionHandleResult {
        let result = self.machine.handle_combo_input(input, recovery_seconds, now);
        self.pump();
        result
    }

    pub fn register_combo_input(&mut self, input: ComboInputType, now: f32) {
        self.machine.register_combo_input(input, now);
        self.pump();
    }

    /// Reports a hit confirmed by the host outside the timeline.
    pub fn register_hit_confirmed(&mut self, now: f32) {
        self.machine.register_hit_confirmed(now);
        self.pump();
    }

    pub fn update_combat_meter(&mut self, meter: f32, now: f32) {
        self.machine.update_combat_meter(meter, now);
        self.pump();
    }

    pub fn update_time_in_combat(&mut self, seconds: f32, now: f32) {
        self.machine.update_time_in_combat(seconds, now);
        self.pump();
    }

    pub fn try_consume_special_ready(&mut self, now: f32) -> bool {
        let consumed = self.machine.try_consume_special_ready(now);
        self.pump();
        consumed
    }

    /// Advances playback by `delta_seconds`, then runs the state machine
    /// tick at `now`.
    pub fn tick(&mut self, now: f32, delta_seconds: f32) {
        let batch = self.driver.tick(self.oracle.sample(), delta_seconds);

        for event in batch {
            let started_before = self.machine.steps_started();
            self.machine.handle_timeline_event(&event, now);
            self.events.push(Event::Timeline(event));
            self.pump();

            if self.machine.steps_started() != started_before {
                break;
            }
        }

        self.machine.tick(now);
        self.pump();
    }

    /// Moves state machine events into the engine queue, starting playback
    /// for every new step.
    fn pump(&mut self) {
        for event in self.machine.drain_events() {
            if let CombatEvent::ComboStepStarted(context) = &event {
                self.driver.begin_combo_step(Arc::clone(&context.step));
                if !context.step.animation_key.trim().is_empty() {
                    self.oracle.play(&context.step.animation_key);
                }
            }
            self.events.push(Event::Combat(event));
        }
    }
}
