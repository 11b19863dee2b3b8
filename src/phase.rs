use std::fmt;

/// Where a reset run currently is
///
/// Runs move strictly forward through
/// `Idle -> Connected -> Terminating -> Dropping -> Creating -> Done`.
/// Any phase other than `Done` may fall into `Failed`. Both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPhase {
    Idle,
    Connected,
    Terminating,
    Dropping,
    Creating,
    Done,
    Failed,
}

impl ResetPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, ResetPhase::Done | ResetPhase::Failed)
    }

    /// The phase that follows this one on success, if any
    pub fn next(self) -> Option<ResetPhase> {
        match self {
            ResetPhase::Idle => Some(ResetPhase::Connected),
            ResetPhase::Connected => Some(ResetPhase::Terminating),
            ResetPhase::Terminating => Some(ResetPhase::Dropping),
            ResetPhase::Dropping => Some(ResetPhase::Creating),
            ResetPhase::Creating => Some(ResetPhase::Done),
            ResetPhase::Done | ResetPhase::Failed => None,
        }
    }

    pub fn can_transition_to(self, to: ResetPhase) -> bool {
        if to == ResetPhase::Failed {
            return !self.is_terminal();
        }
        self.next() == Some(to)
    }
}

impl fmt::Display for ResetPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResetPhase::Idle => "idle",
            ResetPhase::Connected => "connected",
            ResetPhase::Terminating => "terminating",
            ResetPhase::Dropping => "dropping",
            ResetPhase::Creating => "creating",
            ResetPhase::Done => "done",
            ResetPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}
