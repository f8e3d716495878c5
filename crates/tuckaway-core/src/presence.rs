/// A change in whether the monitored application is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceChange {
    Appeared { pid: u32 },
    Vanished { pid: u32 },
}

/// Turns successive process probes into appear/vanish transitions.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    last: Option<u32>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pid seen by the latest probe, if the target was running.
    pub fn current(&self) -> Option<u32> {
        self.last
    }

    /// Feeds one probe result. A restart under a new pid between two
    /// probes is reported as a single `Appeared`.
    pub fn observe(&mut self, pid: Option<u32>) -> Option<PresenceChange> {
        let change = match (self.last, pid) {
            (None, Some(pid)) => Some(PresenceChange::Appeared { pid }),
            (Some(old), None) => Some(PresenceChange::Vanished { pid: old }),
            (Some(old), Some(new)) if old != new => Some(PresenceChange::Appeared { pid: new }),
            _ => None,
        };
        self.last = pid;
        change
    }
}
