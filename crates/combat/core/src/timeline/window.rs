use crate::definition::NormalizedWindow;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WindowState {
    #[default]
    Closed,
    Open,
}

/// Edge produced when a window changes state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowTransition {
    Opened,
    Closed,
}

/// Edge detector for one normalized window.
///
/// Feeding samples only reports changes: a window that stays open across
/// several samples produces a single [`WindowTransition::Opened`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowTracker {
    state: WindowState,
}

impl WindowTracker {
    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == WindowState::Open
    }

    /// Moves the tracker to the state implied by `t` inside `bounds`.
    pub fn update(&mut self, bounds: NormalizedWindow, t: f32) -> Option<WindowTransition> {
        let next = if bounds.contains(t) {
            WindowState::Open
        } else {
            WindowState::Closed
        };
        self.transition_to(next)
    }

    /// Closes the window, reporting the edge only if it was open.
    pub fn force_close(&mut self) -> Option<WindowTransition> {
        self.transition_to(WindowState::Closed)
    }

    /// Closes the window without reporting anything.
    pub fn reset(&mut self) {
        self.state = WindowState::Closed;
    }

    fn transition_to(&mut self, next: WindowState) -> Option<WindowTransition> {
        if next == self.state {
            return None;
        }

        self.state = next;
        Some(match next {
            WindowState::Open => WindowTransition::Opened,
            WindowState::Closed => WindowTransition::Closed,
        })
    }
}
