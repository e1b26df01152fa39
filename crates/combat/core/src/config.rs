/// Timing parameters for one combat entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Maximum gap between combo inputs before the chain resets.
    pub combo_input_timeout_seconds: f32,
    /// How long a buffered input stays eligible for replay.
    pub buffered_input_timeout_seconds: f32,
    /// Maximum gap between inputs tracked by the sequence-match special rule.
    pub special_input_timeout_seconds: f32,
    /// Duration of a step when no timeline is driving playback.
    pub fallback_duration_seconds: f32,
    /// Whether a valid opening input may restart the chain when no edge out
    /// of the current node matches.
    pub allow_restart_mid_chain: bool,
}

impl CombatConfig {
    // ===== lower bounds applied by `sanitized` =====
    pub const MIN_COMBO_INPUT_TIMEOUT: f32 = 0.05;
    pub const MIN_FALLBACK_DURATION: f32 = 0.01;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COMBO_INPUT_TIMEOUT: f32 = 1.15;
    pub const DEFAULT_BUFFERED_INPUT_TIMEOUT: f32 = 0.45;
    pub const DEFAULT_SPECIAL_INPUT_TIMEOUT: f32 = 1.25;
    pub const DEFAULT_FALLBACK_DURATION: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            combo_input_timeout_seconds: Self::DEFAULT_COMBO_INPUT_TIMEOUT,
            buffered_input_timeout_seconds: Self::DEFAULT_BUFFERED_INPUT_TIMEOUT,
            special_input_timeout_seconds: Self::DEFAULT_SPECIAL_INPUT_TIMEOUT,
            fallback_duration_seconds: Self::DEFAULT_FALLBACK_DURATION,
            allow_restart_mid_chain: true,
        }
    }

    /// Returns a copy with every timing clamped to its valid range.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            combo_input_timeout_seconds: self
                .combo_input_timeout_seconds
                .max(Self::MIN_COMBO_INPUT_TIMEOUT),
            buffered_input_timeout_seconds: self.buffered_input_timeout_seconds.max(0.0),
            special_input_timeout_seconds: self.special_input_timeout_seconds.max(0.0),
            fallback_duration_seconds: self
                .fallback_duration_seconds
                .max(Self::MIN_FALLBACK_DURATION),
            allow_restart_mid_chain: self.allow_restart_mid_chain,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_timings() {
        let config = CombatConfig {
            combo_input_timeout_seconds: 0.0,
            buffered_input_timeout_seconds: -1.0,
            special_input_timeout_seconds: -0.5,
            fallback_duration_seconds: 0.0,
            allow_restart_mid_chain: false,
        }
        .sanitized();

        assert_eq!(config.combo_input_timeout_seconds, 0.05);
        assert_eq!(config.buffered_input_timeout_seconds, 0.0);
        assert_eq!(config.special_input_timeout_seconds, 0.0);
        assert_eq!(config.fallback_duration_seconds, 0.01);
        assert!(!config.allow_restart_mid_chain);
    }

    #[test]
    fn defaults_are_already_sane() {
        assert_eq!(CombatConfig::default().sanitized(), CombatConfig::default());
    }
}
