//! Special attack readiness.
//!
//! [`SpecialReadiness`] observes combat facts (inputs, confirmed hits, meter,
//! time in combat, started steps) and flips a single "special ready" flag
//! according to the active [`WeaponSpecialDefinition`]'s trigger. Only the
//! trigger of the active rule is evaluated; every other observation is
//! ignored.
//!
//! Every mutating call returns `Some(ready)` when the flag changed, so the
//! owner can publish a change event, and `None` otherwise.

mod rules;

use std::sync::Arc;

use crate::definition::{ComboInputType, ComboStepDefinition, SpecialTrigger, WeaponSpecialDefinition};

use rules::{HitWindow, SequenceBuffer};

/// Readiness evaluator and cooldown gate for one weapon special.
#[derive(Clone, Debug)]
pub struct SpecialReadiness {
    definition: Option<Arc<WeaponSpecialDefinition>>,
    input_timeout_seconds: f32,
    sequence: SequenceBuffer,
    hits: HitWindow,
    combat_meter: f32,
    time_in_combat: f32,
    ready: bool,
    ready_expires_at: f32,
    cooldown_ends_at: f32,
}

impl SpecialReadiness {
    /// Creates an evaluator with no definition.
    ///
    /// `input_timeout_seconds` is the longest gap between inputs that keeps a
    /// sequence-match buffer alive.
    pub fn new(input_timeout_seconds: f32) -> Self {
        Self {
            definition: None,
            input_timeout_seconds: input_timeout_seconds.max(0.0),
            sequence: SequenceBuffer::new(),
            hits: HitWindow::new(),
            combat_meter: 0.0,
            time_in_combat: 0.0,
            ready: false,
            ready_expires_at: f32::NEG_INFINITY,
            cooldown_ends_at: f32::NEG_INFINITY,
        }
    }

    pub fn definition(&self) -> Option<&Arc<WeaponSpecialDefinition>> {
        self.definition.as_ref()
    }

    /// Installs a definition and discards all progress, readiness and
    /// cooldown. Passing the installed definition again is a no-op.
    pub fn set_definition(&mut self, definition: Option<Arc<WeaponSpecialDefinition>>) -> Option<bool> {
        let unchanged = match (&self.definition, &definition) {
            (Some(current), Some(next)) => Arc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return None;
        }

        tracing::debug!(
            rule = ?definition.as_deref().map(|d| d.rule.rule_type()),
            "special definition installed"
        );
        self.definition = definition;
        self.reset_tracking()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn ready_expires_at(&self) -> f32 {
        self.ready_expires_at
    }

    pub fn cooldown_ends_at(&self) -> f32 {
        self.cooldown_ends_at
    }

    pub fn is_cooling_down(&self, now: f32) -> bool {
        now < self.cooldown_ends_at
    }

    /// Cooldown applied when the special is consumed.
    pub fn cooldown_seconds(&self) -> f32 {
        self.definition
            .as_deref()
            .map_or(0.0, |d| d.action.cooldown_seconds.max(0.0))
    }

    pub fn cooldown_remaining(&self, now: f32) -> f32 {
        (self.cooldown_ends_at - now).max(0.0)
    }

    /// Ability the host should fire on consumption, empty when none.
    pub fn ability_id(&self) -> &str {
        self.definition
            .as_deref()
            .map_or("", |d| d.action.ability_id())
    }

    pub fn combat_meter(&self) -> f32 {
        self.combat_meter
    }

    pub fn time_in_combat(&self) -> f32 {
        self.time_in_combat
    }

    pub fn hit_count(&self) -> u32 {
        self.hits.count()
    }

    /// Inputs currently held by the sequence-match buffer, oldest first.
    pub fn buffered_inputs(&self) -> impl Iterator<Item = ComboInputType> + '_ {
        self.sequence.iter()
    }

    /// Records a combo input for the sequence-match rule.
    ///
    /// Inputs arriving during cooldown are not recorded at all.
    pub fn register_input(&mut self, input: ComboInputType, now: f32) -> Option<bool> {
        let definition = Arc::clone(self.definition.as_ref()?);
        let SpecialTrigger::SequenceMatch { sequence } = &definition.rule.trigger else {
            return None;
        };

        if self.is_cooling_down(now) {
            return None;
        }

        self.sequence
            .push(input, now, self.input_timeout_seconds, sequence.len());
        if self.sequence.ends_with(sequence) {
            return self.set_ready(now);
        }

        None
    }

    /// Records a confirmed hit for the hit-count rule.
    pub fn register_hit(&mut self, now: f32) -> Option<bool> {
        let (required, window_seconds) = match self.trigger() {
            Some(SpecialTrigger::HitCount {
                hit_count,
                hit_window_seconds,
            }) => (*hit_count, *hit_window_seconds),
            _ => return None,
        };

        let count = self.hits.register(now, window_seconds);
        if required > 0 && count >= required {
            return self.set_ready(now);
        }

        None
    }

    /// Records the current combat meter, clamped to zero.
    pub fn update_meter(&mut self, meter: f32, now: f32) -> Option<bool> {
        self.combat_meter = meter.max(0.0);
        match self.trigger() {
            Some(SpecialTrigger::MeterFill { threshold }) if self.combat_meter >= *threshold => {
                self.set_ready(now)
            }
            _ => None,
        }
    }

    /// Records the current time in combat, clamped to zero.
    pub fn update_time_in_combat(&mut self, seconds: f32, now: f32) -> Option<bool> {
        self.time_in_combat = seconds.max(0.0);
        match self.trigger() {
            Some(SpecialTrigger::TimeInCombat { seconds }) if self.time_in_combat >= *seconds => {
                self.set_ready(now)
            }
            _ => None,
        }
    }

    /// Checks a newly started step against the finisher rule.
    pub fn register_step(&mut self, step: &ComboStepDefinition, now: f32) -> Option<bool> {
        match self.trigger() {
            Some(SpecialTrigger::FinisherReached { tag }) if step.has_tag(tag) => {
                self.set_ready(now)
            }
            _ => None,
        }
    }

    /// Expires readiness once its deadline has passed.
    pub fn tick(&mut self, now: f32) -> Option<bool> {
        if self.ready && now >= self.ready_expires_at {
            tracing::debug!(now, "special readiness expired");
            return self.reset_ready();
        }

        None
    }

    /// Returns true if the special is ready and its deadline has not passed.
    pub fn is_ready_at(&self, now: f32) -> bool {
        self.ready && now < self.ready_expires_at
    }

    /// Consumes readiness and starts the cooldown in one step.
    ///
    /// Progress held by the sequence and hit trackers is spent with it.
    /// Returns false when the special is not ready at `now`; readiness whose
    /// deadline already passed is expired on the way.
    pub fn try_consume(&mut self, now: f32) -> bool {
        if self.tick(now).is_some() || !self.ready {
            return false;
        }

        self.reset_ready();
        self.sequence.clear();
        self.hits.clear();
        self.cooldown_ends_at = now + self.cooldown_seconds();
        tracing::debug!(now, cooldown_ends_at = self.cooldown_ends_at, "special consumed");
        true
    }

    fn trigger(&self) -> Option<&SpecialTrigger> {
        self.definition.as_deref().map(|d| &d.rule.trigger)
    }

    fn set_ready(&mut self, now: f32) -> Option<bool> {
        let definition = self.definition.as_deref()?;
        if self.is_cooling_down(now) {
            return None;
        }

        let expires_after = definition.rule.expires_after_seconds.max(0.0);
        self.ready_expires_at = if expires_after > 0.0 {
            now + expires_after
        } else {
            f32::INFINITY
        };

        // Already ready: the deadline was refreshed, nothing else changes.
        if self.ready {
            return None;
        }

        tracing::debug!(now, expires_at = self.ready_expires_at, "special ready");
        self.ready = true;
        Some(true)
    }

    fn reset_ready(&mut self) -> Option<bool> {
        self.ready_expires_at = f32::NEG_INFINITY;
        if !self.ready {
            return None;
        }

        self.ready = false;
        Some(false)
    }

    fn reset_tracking(&mut self) -> Option<bool> {
        let change = self.reset_ready();
        self.sequence.clear();
        self.hits.clear();
        self.cooldown_ends_at = f32::NEG_INFINITY;
        self.combat_meter = 0.0;
        self.time_in_combat = 0.0;
        change
    }
}
