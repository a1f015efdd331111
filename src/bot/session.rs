//! Per-user conversation state.

use std::collections::HashMap;

/// Where a user is in the hide workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    /// The next plain text is the message to hide.
    AwaitingHideText,
}

/// Storage for session state, keyed by user identity.
pub trait SessionStore {
    /// Current state; `Idle` for unknown users.
    fn get(&self, identity: &str) -> SessionState;

    fn set(&mut self, identity: &str, state: SessionState);

    /// Return the user to `Idle`.
    fn reset(&mut self, identity: &str);
}

/// In-memory session store. State is lost on restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    states: HashMap<String, SessionState>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users not in `Idle`.
    pub fn active_count(&self) -> usize {
        self.states.len()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, identity: &str) -> SessionState {
        self.states.get(identity).copied().unwrap_or_default()
    }

    fn set(&mut self, identity: &str, state: SessionState) {
        match state {
            SessionState::Idle => self.reset(identity),
            _ => {
                self.states.insert(identity.to_string(), state);
            }
        }
    }

    fn reset(&mut self, identity: &str) {
        self.states.remove(identity);
    }
}
