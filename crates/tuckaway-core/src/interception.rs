//! Per-window close interception, as an explicit state value.
//!
//! The platform layer boxes one [`Interception`] per instrumented window
//! and hands it to the window's subclass procedure, which asks it what
//! to do with every message.

/// Raw message ids the interception and the hook care about.
pub mod messages {
    pub const WM_DESTROY: u32 = 0x0002;
    pub const WM_CLOSE: u32 = 0x0010;
    pub const WM_SHOWWINDOW: u32 = 0x0018;
}

/// Lifecycle of the interception on one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interception {
    #[default]
    Unattached,
    Attached,
    /// Terminal: the window was destroyed and the subclass removed.
    Detached,
}

/// The messages the interception distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMessage {
    Close,
    Destroy,
    Other,
}

/// What the subclass procedure must do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Conceal the window and swallow the close request.
    Conceal,
    /// Forget the window in the shared state, remove the subclass, then
    /// let the message through.
    Release,
    /// Default handling.
    PassThrough,
}

impl WindowMessage {
    pub fn classify(message: u32) -> Self {
        match message {
            messages::WM_CLOSE => Self::Close,
            messages::WM_DESTROY => Self::Destroy,
            _ => Self::Other,
        }
    }
}

impl Interception {
    /// `Unattached → Attached`. Returns `false` from any other state.
    pub fn attach(&mut self) -> bool {
        if *self != Self::Unattached {
            return false;
        }
        *self = Self::Attached;
        true
    }

    pub fn is_attached(&self) -> bool {
        *self == Self::Attached
    }

    /// Decides the fate of one message, advancing the state on destroy.
    pub fn on_message(&mut self, message: WindowMessage) -> Verdict {
        match (*self, message) {
            (Self::Attached, WindowMessage::Close) => Verdict::Conceal,
            (Self::Attached, WindowMessage::Destroy) => {
                *self = Self::Detached;
                Verdict::Release
            }
            _ => Verdict::PassThrough,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_is_concealed_while_attached() {
        // Arrange
        let mut state = Interception::default();
        state.attach();

        // Act
        let verdict = state.on_message(WindowMessage::Close);

        // Assert
        assert_eq!(verdict, Verdict::Conceal);
        assert!(state.is_attached());
    }

    #[test]
    fn repeated_close_keeps_concealing() {
        let mut state = Interception::Attached;

        assert_eq!(state.on_message(WindowMessage::Close), Verdict::Conceal);
        assert_eq!(state.on_message(WindowMessage::Close), Verdict::Conceal);
    }

    #[test]
    fn destroy_releases_and_detaches() {
        // Arrange
        let mut state = Interception::Attached;

        // Act
        let verdict = state.on_message(WindowMessage::Destroy);

        // Assert
        assert_eq!(verdict, Verdict::Release);
        assert_eq!(state, Interception::Detached);
    }

    #[test]
    fn detached_passes_everything_through() {
        // Arrange
        let mut state = Interception::Detached;

        // Act / Assert
        assert_eq!(state.on_message(WindowMessage::Close), Verdict::PassThrough);
        assert_eq!(state.on_message(WindowMessage::Destroy), Verdict::PassThrough);
        assert!(!state.attach());
    }

    #[test]
    fn unattached_window_is_not_intercepted() {
        let mut state = Interception::Unattached;

        assert_eq!(state.on_message(WindowMessage::Close), Verdict::PassThrough);
    }

    #[test]
    fn other_messages_pass_through() {
        let mut state = Interception::Attached;

        assert_eq!(state.on_message(WindowMessage::Other), Verdict::PassThrough);
        assert!(state.is_attached());
    }

    #[test]
    fn classify_maps_raw_ids() {
        assert_eq!(WindowMessage::classify(0x0010), WindowMessage::Close);
        assert_eq!(WindowMessage::classify(0x0002), WindowMessage::Destroy);
        assert_eq!(WindowMessage::classify(0x000F), WindowMessage::Other);
    }
}
