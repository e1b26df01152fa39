use crate::config::CombatConfig;

/// Playback position reported by the host's animation system.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimelineState {
    /// Raw normalized time. Looping clips keep counting past 1.
    pub normalized_time: f32,
    pub length_seconds: f32,
    pub looping: bool,
}

impl TimelineState {
    pub const fn one_shot(normalized_time: f32, length_seconds: f32) -> Self {
        Self {
            normalized_time,
            length_seconds,
            looping: false,
        }
    }

    pub const fn looping(normalized_time: f32, length_seconds: f32) -> Self {
        Self {
            normalized_time,
            length_seconds,
            looping: true,
        }
    }

    /// A sample is usable only for a clip with a positive length.
    pub fn is_playable(&self) -> bool {
        self.length_seconds > 0.0 && self.normalized_time.is_finite()
    }
}

/// Maps a timeline sample, or the fallback clock, to a position in `[0, 1]`.
///
/// Looping samples wrap into `[0, 1)`. One-shot samples clamp so they reach
/// 1 and complete. Without a playable sample the position is
/// `fallback_elapsed / fallback_duration`, clamped.
pub fn sample_normalized_time(
    timeline: Option<TimelineState>,
    fallback_elapsed: f32,
    fallback_duration: f32,
) -> f32 {
    match timeline.filter(TimelineState::is_playable) {
        Some(state) if state.looping => state.normalized_time.rem_euclid(1.0),
        Some(state) => state.normalized_time.clamp(0.0, 1.0),
        None => {
            let duration = fallback_duration.max(CombatConfig::MIN_FALLBACK_DURATION);
            (fallback_elapsed / duration).clamp(0.0, 1.0)
        }
    }
}
