//! Progress trackers for the stateful readiness rules.

use std::collections::VecDeque;

use crate::definition::ComboInputType;

/// Rolling buffer of recent inputs for sequence matching.
#[derive(Clone, Debug)]
pub(crate) struct SequenceBuffer {
    inputs: VecDeque<ComboInputType>,
    last_input_time: f32,
}

impl SequenceBuffer {
    pub fn new() -> Self {
        Self {
            inputs: VecDeque::new(),
            last_input_time: f32::NEG_INFINITY,
        }
    }

    pub fn clear(&mut self) {
        self.inputs.clear();
        self.last_input_time = f32::NEG_INFINITY;
    }

    /// Records `input`, dropping stale history first and keeping at most
    /// `capacity` entries.
    pub fn push(&mut self, input: ComboInputType, now: f32, timeout_seconds: f32, capacity: usize) {
        if now - self.last_input_time > timeout_seconds {
            self.inputs.clear();
        }

        self.last_input_time = now;
        self.inputs.push_back(input);
        while self.inputs.len() > capacity.max(1) {
            self.inputs.pop_front();
        }
    }

    /// Returns true if the newest inputs equal `sequence` exactly, in order.
    pub fn ends_with(&self, sequence: &[ComboInputType]) -> bool {
        if sequence.is_empty() || self.inputs.len() < sequence.len() {
            return false;
        }

        let start = self.inputs.len() - sequence.len();
        self.inputs.range(start..).eq(sequence.iter())
    }

    pub fn iter(&self) -> impl Iterator<Item = ComboInputType> + '_ {
        self.inputs.iter().copied()
    }
}

/// Confirmed hits counted inside a rolling window.
///
/// The window opens on the first hit after the previous window expired;
/// hits landing inside it keep counting without extending it.
#[derive(Clone, Debug)]
pub(crate) struct HitWindow {
    count: u32,
    ends_at: f32,
}

impl HitWindow {
    pub fn new() -> Self {
        Self {
            count: 0,
            ends_at: f32::NEG_INFINITY,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Counts a hit at `now` and returns the count inside the current window.
    pub fn register(&mut self, now: f32, window_seconds: f32) -> u32 {
        if self.ends_at < now {
            self.count = 0;
            self.ends_at = now + window_seconds.max(0.0);
        }

        self.count += 1;
        self.count
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ComboInputType::{Heavy, Light};

    #[test]
    fn sequence_trims_to_capacity() {
        let mut buffer = SequenceBuffer::new();
        for (i, input) in [Heavy, Light, Light, Heavy].into_iter().enumerate() {
            buffer.push(input, i as f32 * 0.1, 1.0, 3);
        }

        assert_eq!(buffer.iter().collect::<Vec<_>>(), [Light, Light, Heavy]);
        assert!(buffer.ends_with(&[Light, Heavy]));
        assert!(!buffer.ends_with(&[Heavy, Light]));
    }

    #[test]
    fn sequence_clears_after_gap() {
        let mut buffer = SequenceBuffer::new();
        buffer.push(Light, 0.0, 1.0, 3);
        buffer.push(Light, 0.5, 1.0, 3);
        buffer.push(Heavy, 2.0, 1.0, 3);

        assert_eq!(buffer.iter().collect::<Vec<_>>(), [Heavy]);
        assert!(!buffer.ends_with(&[Light, Light, Heavy]));
    }

    #[test]
    fn empty_sequence_never_matches() {
        let mut buffer = SequenceBuffer::new();
        buffer.push(Light, 0.0, 1.0, 1);
        assert!(!buffer.ends_with(&[]));
    }

    #[test]
    fn hit_window_restarts_after_expiry() {
        let mut window = HitWindow::new();
        assert_eq!(window.register(0.0, 2.0), 1);
        assert_eq!(window.register(0.5, 2.0), 2);
        assert_eq!(window.register(2.0, 2.0), 3);
        assert_eq!(window.register(3.0, 2.0), 1);
    }
}
