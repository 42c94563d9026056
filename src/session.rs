//! Identity state kept by a client across calls.
//!
//! Both fields are set-once latches: the anonymous id is generated on first
//! need, the session id is learned from the first response that carries one.

use parking_lot::RwLock;
use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of generated anonymous ids.
pub const UNIQUE_ID_LEN: usize = 32;

/// Mutable identity of a client instance.
#[derive(Debug, Default)]
pub struct SessionState {
    unique_id: RwLock<Option<String>>,
    session_id: RwLock<Option<String>>,
}

impl SessionState {
    /// Create empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current anonymous id, generating and storing one if unset.
    pub fn unique_id(&self) -> String {
        if let Some(id) = self.unique_id.read().as_ref() {
            return id.clone();
        }

        let mut slot = self.unique_id.write();
        slot.get_or_insert_with(generate_unique_id).clone()
    }

    /// Session id learned so far.
    pub fn session_id(&self) -> Option<String> {
        self.session_id.read().clone()
    }

    /// Record a session id unless one is already set.
    ///
    /// Returns `true` if this call set the latch.
    pub fn learn_session(&self, session_id: &str) -> bool {
        if session_id.is_empty() || self.session_id.read().is_some() {
            return false;
        }

        let mut slot = self.session_id.write();
        if slot.is_some() {
            return false;
        }
        *slot = Some(session_id.to_string());
        true
    }
}

/// Random alphanumeric id.
pub fn generate_unique_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(UNIQUE_ID_LEN)
        .map(char::from)
        .collect()
}
