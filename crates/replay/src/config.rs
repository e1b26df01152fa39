//! Environment overrides for combat timing.
use std::env;

use combat_core::CombatConfig;

/// Applies `COMBAT_*` environment variables on top of `config`.
///
/// Environment variables:
/// - `COMBAT_INPUT_TIMEOUT` - Max gap between combo inputs, seconds
/// - `COMBAT_BUFFER_TIMEOUT` - Lifetime of a buffered input, seconds
/// - `COMBAT_SPECIAL_INPUT_TIMEOUT` - Max gap inside a special sequence, seconds
/// - `COMBAT_FALLBACK_DURATION` - Step duration without a timeline, seconds
/// - `COMBAT_ALLOW_RESTART` - Whether an opener may restart a running chain
pub fn from_env(config: CombatConfig) -> CombatConfig {
    apply_overrides(config, |key| env::var(key).ok())
}

fn apply_overrides(mut config: CombatConfig, lookup: impl Fn(&str) -> Option<String>) -> CombatConfig {
    if let Some(seconds) = parse::<f32>(lookup("COMBAT_INPUT_TIMEOUT")) {
        config.combo_input_timeout_seconds = seconds;
    }

    if let Some(seconds) = parse::<f32>(lookup("COMBAT_BUFFER_TIMEOUT")) {
        config.buffered_input_timeout_seconds = seconds;
    }

    if let Some(seconds) = parse::<f32>(lookup("COMBAT_SPECIAL_INPUT_TIMEOUT")) {
        config.special_input_timeout_seconds = seconds;
    }

    if let Some(seconds) = parse::<f32>(lookup("COMBAT_FALLBACK_DURATION")) {
        config.fallback_duration_seconds = seconds;
    }

    if let Some(allow) = parse::<bool>(lookup("COMBAT_ALLOW_RESTART")) {
        config.allow_restart_mid_chain = allow;
    }

    config
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: std::str::FromStr,
{
    value?.trim().parse().ok()
}
