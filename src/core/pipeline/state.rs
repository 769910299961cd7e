//! Orchestrator states.

use serde::{Deserialize, Serialize};

/// Where a scan is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanState {
    Idle,
    Enumerating,
    Fingerprinting,
    Relocating,
    Completed,
    Aborted,
}

impl ScanState {
    /// `Completed` and `Aborted` end a scan; a new request needs a new run
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanState::Completed | ScanState::Aborted)
    }

    /// Whether `self -> next` is an edge of the state machine
    pub fn can_transition_to(&self, next: ScanState) -> bool {
        use ScanState::*;
        matches!(
            (self, next),
            (Idle, Enumerating)
                | (Enumerating, Fingerprinting)
                // Empty source directory
                | (Enumerating, Completed)
                // Source directory vanished after validation
                | (Enumerating, Aborted)
                | (Fingerprinting, Relocating)
                | (Fingerprinting, Aborted)
                | (Relocating, Completed)
                | (Relocating, Aborted)
        )
    }
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanState::Idle => write!(f, "Idle"),
            ScanState::Enumerating => write!(f, "Enumerating"),
            ScanState::Fingerprinting => write!(f, "Fingerprinting"),
            ScanState::Relocating => write!(f, "Relocating"),
            ScanState::Completed => write!(f, "Completed"),
            ScanState::Aborted => write!(f, "Aborted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_allowed() {
        let path = [
            ScanState::Idle,
            ScanState::Enumerating,
            ScanState::Fingerprinting,
            ScanState::Relocating,
            ScanState::Completed,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for next in [ScanState::Idle, ScanState::Enumerating, ScanState::Relocating] {
            assert!(!ScanState::Completed.can_transition_to(next));
            assert!(!ScanState::Aborted.can_transition_to(next));
        }
        assert!(ScanState::Completed.is_terminal());
        assert!(ScanState::Aborted.is_terminal());
    }

    #[test]
    fn idle_cannot_abort_or_skip_ahead() {
        assert!(!ScanState::Idle.can_transition_to(ScanState::Aborted));
        assert!(!ScanState::Idle.can_transition_to(ScanState::Fingerprinting));
    }

    #[test]
    fn empty_scan_short_circuits() {
        assert!(ScanState::Enumerating.can_transition_to(ScanState::Completed));
        assert!(!ScanState::Fingerprinting.can_transition_to(ScanState::Completed));
    }
}
