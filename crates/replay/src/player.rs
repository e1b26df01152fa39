//! Fixed-step replay of a script against a combat engine.

use combat_content::{ReplayAction, ReplayScript};
use combat_core::{
    ActionHandleResult, CombatEngine, CombatEvent, CombatState, Event, TimelineEvent,
    TimelineOracle,
};

/// What happened during a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaySummary {
    pub steps_started: Vec<String>,
    pub inputs_started: u32,
    pub inputs_buffered: u32,
    pub inputs_rejected: u32,
    pub hits: u32,
    pub specials_consumed: u32,
    pub specials_denied: u32,
    pub final_state: CombatState,
    pub ended_at: f32,
}

impl ReplaySummary {
    fn new() -> Self {
        Self {
            steps_started: Vec::new(),
            inputs_started: 0,
            inputs_buffered: 0,
            inputs_rejected: 0,
            hits: 0,
            specials_consumed: 0,
            specials_denied: 0,
            final_state: CombatState::Idle,
            ended_at: 0.0,
        }
    }
}

/// Plays `script` on `engine`, ticking every `step_seconds`.
///
/// Entries due at or before a frame are applied before that frame's tick.
pub fn play<T: TimelineOracle>(
    engine: &mut CombatEngine<T>,
    script: &ReplayScript,
    step_seconds: f32,
) -> ReplaySummary {
    let step = step_seconds.max(0.001);
    let end = script.end_time();
    let frames = (end / step).ceil() as u32;

    let mut summary = ReplaySummary::new();
    let mut next_entry = 0;

    for frame in 0..=frames {
        let now = frame as f32 * step;
        let delta = if frame == 0 { 0.0 } else { step };

        while let Some(entry) = script.entries.get(next_entry)
            && entry.at <= now
        {
            apply(engine, entry.action, now, &mut summary);
            next_entry += 1;
        }

        engine.tick(now, delta);
        record(engine.drain_events(), now, &mut summary);
        summary.ended_at = now;
    }

    summary.final_state = engine.machine().state();
    summary
}

fn apply<T: TimelineOracle>(
    engine: &mut CombatEngine<T>,
    action: ReplayAction,
    now: f32,
    summary: &mut ReplaySummary,
) {
    match action {
        ReplayAction::Input { input, recovery } => {
            let result = engine.handle_combo_input(input, recovery, now);
            tracing::info!(at = now, %input, %result, "input");
            match result {
                ActionHandleResult::Started => summary.inputs_started += 1,
                ActionHandleResult::Buffered => summary.inputs_buffered += 1,
                ActionHandleResult::Rejected => summary.inputs_rejected += 1,
            }
        }
        ReplayAction::Hit => {
            summary.hits += 1;
            engine.register_hit_confirmed(now);
        }
        ReplayAction::Meter(value) => engine.update_combat_meter(value, now),
        ReplayAction::TimeInCombat(seconds) => engine.update_time_in_combat(seconds, now),
        ReplayAction::ConsumeSpecial => {
            if engine.try_consume_special_ready(now) {
                summary.specials_consumed += 1;
                tracing::info!(
                    at = now,
                    ability = engine.machine().current_special_ability_id(),
                    "special fired"
                );
            } else {
                summary.specials_denied += 1;
                tracing::info!(
                    at = now,
                    cooldown_remaining = engine.machine().special_cooldown_remaining(now),
                    "special not ready"
                );
            }
        }
    }

    record(engine.drain_events(), now, summary);
}

fn record(events: Vec<Event>, now: f32, summary: &mut ReplaySummary) {
    for event in events {
        match &event {
            Event::Combat(CombatEvent::ComboStepStarted(context)) => {
                tracing::info!(at = now, step = %context.step.step_id, "step started");
                summary.steps_started.push(context.step.step_id.clone());
            }
            Event::Combat(CombatEvent::SpecialReadyChanged(ready)) => {
                tracing::info!(at = now, ready, "special readiness changed");
            }
            Event::Timeline(TimelineEvent::Hit { step, .. }) => {
                tracing::info!(at = now, step = %step.step_id, "hit");
                summary.hits += 1;
            }
            other => tracing::info!(at = now, topic = ?other.topic(), "{}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use combat_content::ContentFactory;
    use combat_core::CombatConfig;

    use super::*;

    fn longsword_engine() -> CombatEngine {
        let factory = ContentFactory::bundled();
        let config = factory.load_config().expect("config");
        let mut engine = CombatEngine::headless(&config);
        engine.set_combat_definition(Some(Arc::new(
            factory.load_weapon("longsword").expect("weapon"),
        )));
        engine.set_special_definition(Some(Arc::new(
            factory.load_special("longsword").expect("special"),
        )));
        engine
    }

    #[test]
    fn light_chain_reaches_finisher_and_fires_once() {
        let script = ContentFactory::bundled()
            .load_replay("light_chain")
            .expect("replay");
        let mut engine = longsword_engine();

        let summary = play(&mut engine, &script, 0.01);

        assert_eq!(
            summary.steps_started,
            ["longsword_light_1", "longsword_light_2", "longsword_light_3"]
        );
        assert_eq!(summary.inputs_started, 1);
        assert_eq!(summary.inputs_buffered, 2);
        assert_eq!(summary.specials_consumed, 1);
        assert_eq!(summary.specials_denied, 1);
        assert_eq!(summary.final_state, CombatState::Idle);
    }

    #[test]
    fn empty_script_runs_one_second() {
        let mut engine = CombatEngine::headless(&CombatConfig::default());
        let summary = play(&mut engine, &ReplayScript::default(), 0.25);

        assert_eq!(summary.ended_at, 1.0);
        assert!(summary.steps_started.is_empty());
        assert_eq!(summary.final_state, CombatState::Idle);
    }
}
