//! Per-operation in-flight tracking
//!
//! Each long-running command holds a guard for its operation kind. A second
//! attempt of the same kind is refused while the guard lives; different
//! kinds never block each other.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Commands that are guarded against running twice at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    SubmitPersona,
    GenerateConversation,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::SubmitPersona => "submit_persona",
            OperationKind::GenerateConversation => "generate_conversation",
        }
    }

    /// Human label used in notices
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::SubmitPersona => "Creating your AI clone",
            OperationKind::GenerateConversation => "Generating a conversation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set of operations currently running
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    active: Arc<Mutex<HashSet<OperationKind>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically mark `kind` as running.
    ///
    /// Returns `None` if it already is. The returned guard clears the mark
    /// when dropped, whichever way the operation ends.
    pub fn try_acquire(&self, kind: OperationKind) -> Option<InFlightGuard> {
        if !self.active.lock().insert(kind) {
            return None;
        }
        Some(InFlightGuard {
            kind,
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_active(&self, kind: OperationKind) -> bool {
        self.active.lock().contains(&kind)
    }

    /// Running operations, sorted
    pub fn active(&self) -> Vec<OperationKind> {
        let mut kinds: Vec<_> = self.active.lock().iter().copied().collect();
        kinds.sort();
        kinds
    }
}

/// Marks one operation as running until dropped
#[derive(Debug)]
pub struct InFlightGuard {
    kind: OperationKind,
    active: Arc<Mutex<HashSet<OperationKind>>>,
}

impl InFlightGuard {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.lock().remove(&self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_refused() {
        let in_flight = InFlight::new();
        let guard = in_flight.try_acquire(OperationKind::SubmitPersona);
        assert!(guard.is_some());
        assert!(in_flight.try_acquire(OperationKind::SubmitPersona).is_none());
        assert!(in_flight.is_active(OperationKind::SubmitPersona));
    }

    #[test]
    fn test_drop_releases() {
        let in_flight = InFlight::new();
        {
            let _guard = in_flight.try_acquire(OperationKind::GenerateConversation).unwrap();
            assert_eq!(in_flight.active(), vec![OperationKind::GenerateConversation]);
        }
        assert!(in_flight.active().is_empty());
        assert!(in_flight.try_acquire(OperationKind::GenerateConversation).is_some());
    }

    #[test]
    fn test_kinds_are_independent() {
        let in_flight = InFlight::new();
        let _submit = in_flight.try_acquire(OperationKind::SubmitPersona).unwrap();
        let generate = in_flight.try_acquire(OperationKind::GenerateConversation).unwrap();
        assert_eq!(generate.kind(), OperationKind::GenerateConversation);
        assert_eq!(in_flight.active().len(), 2);
    }
}
