//! Timeline adapter.
//!
//! [`AnimationCombatDriver`] turns a normalized playback position into
//! discrete, edge-triggered [`TimelineEvent`]s for the active combo step. It
//! owns no combat state: the events are fed to the state machine by the host
//! (or by [`CombatEngine`](crate::CombatEngine)).
//!
//! Within one tick events are produced in a fixed order: hits (ascending by
//! moment), continue window edge, cancel window edge, then completion.

mod sample;
mod window;

use std::collections::VecDeque;
use std::sync::Arc;

use crate::config::CombatConfig;
use crate::definition::{ComboStepDefinition, HitShapeDefinition};

pub use sample::{TimelineState, sample_normalized_time};
pub use window::{WindowState, WindowTracker, WindowTransition};

/// Event produced while a step plays.
#[derive(Clone, Debug, PartialEq)]
pub enum TimelineEvent {
    Hit {
        step: Arc<ComboStepDefinition>,
        hit_shape: HitShapeDefinition,
    },
    ContinueWindowOpened,
    ContinueWindowClosed,
    CancelableIntoAbilityOpened,
    CancelableIntoAbilityClosed,
    AnimationComplete,
}

impl TimelineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hit { .. } => "hit",
            Self::ContinueWindowOpened => "continue_window_opened",
            Self::ContinueWindowClosed => "continue_window_closed",
            Self::CancelableIntoAbilityOpened => "cancelable_into_ability_opened",
            Self::CancelableIntoAbilityClosed => "cancelable_into_ability_closed",
            Self::AnimationComplete => "animation_complete",
        }
    }
}

/// Tracks playback of one combo step.
#[derive(Clone, Debug)]
pub struct AnimationCombatDriver {
    active_step: Option<Arc<ComboStepDefinition>>,
    pending_hits: VecDeque<HitShapeDefinition>,
    last_normalized_time: f32,
    fallback_elapsed: f32,
    fallback_duration: f32,
    continue_window: WindowTracker,
    cancel_window: WindowTracker,
}

impl AnimationCombatDriver {
    pub fn new(fallback_duration_seconds: f32) -> Self {
        Self {
            active_step: None,
            pending_hits: VecDeque::new(),
            last_normalized_time: 0.0,
            fallback_elapsed: 0.0,
            fallback_duration: fallback_duration_seconds.max(CombatConfig::MIN_FALLBACK_DURATION),
            continue_window: WindowTracker::default(),
            cancel_window: WindowTracker::default(),
        }
    }

    pub fn active_step(&self) -> Option<&Arc<ComboStepDefinition>> {
        self.active_step.as_ref()
    }

    pub fn last_normalized_time(&self) -> f32 {
        self.last_normalized_time
    }

    pub fn fallback_duration(&self) -> f32 {
        self.fallback_duration
    }

    pub fn is_continue_window_open(&self) -> bool {
        self.continue_window.is_open()
    }

    pub fn is_cancel_window_open(&self) -> bool {
        self.cancel_window.is_open()
    }

    pub fn pending_hit_count(&self) -> usize {
        self.pending_hits.len()
    }

    /// Starts tracking `step` from the beginning.
    ///
    /// Hits are cached in ascending moment order; each fires at most once
    /// until the next call.
    pub fn begin_combo_step(&mut self, step: Arc<ComboStepDefinition>) {
        let mut hits = step.hit_shapes.clone();
        hits.sort_by(|a, b| a.hit_moment_normalized.total_cmp(&b.hit_moment_normalized));

        self.pending_hits = hits.into();
        self.last_normalized_time = 0.0;
        self.fallback_elapsed = 0.0;
        self.continue_window.reset();
        self.cancel_window.reset();
        self.active_step = Some(step);
    }

    /// Stops tracking without emitting anything.
    pub fn clear_step(&mut self) {
        self.active_step = None;
        self.pending_hits.clear();
        self.continue_window.reset();
        self.cancel_window.reset();
    }

    /// Advances playback by one tick.
    ///
    /// `sample` is the host timeline state, if any. The fallback clock only
    /// advances by `delta_seconds` on ticks without a playable sample.
    pub fn tick(&mut self, sample: Option<TimelineState>, delta_seconds: f32) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        let Some(step) = self.active_step.clone() else {
            return events;
        };

        if !sample.is_some_and(|state| state.is_playable()) {
            self.fallback_elapsed += delta_seconds.max(0.0);
        }

        let t = sample_normalized_time(sample, self.fallback_elapsed, self.fallback_duration);
        if t < self.last_normalized_time {
            // Wrapped into a new loop. Fired hits stay fired.
            self.last_normalized_time = 0.0;
        }

        while let Some(hit) = self.pending_hits.front() {
            if hit.hit_moment_normalized > t {
                break;
            }
            if let Some(hit_shape) = self.pending_hits.pop_front() {
                events.push(TimelineEvent::Hit {
                    step: Arc::clone(&step),
                    hit_shape,
                });
            }
        }

        match self.continue_window.update(step.continue_window, t) {
            Some(WindowTransition::Opened) => events.push(TimelineEvent::ContinueWindowOpened),
            Some(WindowTransition::Closed) => events.push(TimelineEvent::ContinueWindowClosed),
            None => {}
        }

        match self.cancel_window.update(step.cancel_into_ability_window, t) {
            Some(WindowTransition::Opened) => {
                events.push(TimelineEvent::CancelableIntoAbilityOpened)
            }
            Some(WindowTransition::Closed) => {
                events.push(TimelineEvent::CancelableIntoAbilityClosed)
            }
            None => {}
        }

        if t >= 1.0 {
            if self.continue_window.force_close().is_some() {
                events.push(TimelineEvent::ContinueWindowClosed);
            }
            if self.cancel_window.force_close().is_some() {
                events.push(TimelineEvent::CancelableIntoAbilityClosed);
            }
            events.push(TimelineEvent::AnimationComplete);
            tracing::trace!(step = %step.step_id, "step animation complete");
            self.clear_step();
        }

        self.last_normalized_time = t;
        events
    }
}

impl Default for AnimationCombatDriver {
    fn default() -> Self {
        Self::new(CombatConfig::DEFAULT_FALLBACK_DURATION)
    }
}
