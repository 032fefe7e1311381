//! Remote session store interface
//!
//! The backend that persists session and move records and broadcasts change
//! events is an external collaborator; this module defines the operations
//! the game consumes against it. `MemoryStore` is the in-process stand-in
//! used by practice mode and tests.
//!
//! Conflict policy: a patch that moves play forward carries `expected_turn`,
//! and the store rejects it with `TurnConflict` when the session's current
//! turn holder differs. This is the tie-break for same-instant submissions
//! by both participants.

pub mod memory;

pub use memory::MemoryStore;

use crate::session::{EndReason, MoveRecord, SessionId, SessionRecord, SessionStatus};
use std::sync::mpsc::Receiver;

/// Errors from session store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No session with the given id
    NotFound,
    /// The optimistic turn check failed; `holder` currently owns the turn
    TurnConflict { holder: String },
    /// The session is Completed and accepts no further mutations
    SessionClosed,
    /// The patch violates a session invariant (described in the message)
    InvalidPatch(String),
    /// Transport or persistence failure
    Io(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "session not found"),
            StoreError::TurnConflict { holder } => {
                write!(f, "turn conflict: {} holds the turn", holder)
            }
            StoreError::SessionClosed => write!(f, "session already completed"),
            StoreError::InvalidPatch(reason) => write!(f, "invalid session patch: {}", reason),
            StoreError::Io(reason) => write!(f, "store i/o failure: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Partial update to a session record. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub status: Option<SessionStatus>,
    pub turn: Option<String>,
    /// Absolute new score for the named participant
    pub score_for: Option<(String, u32)>,
    /// Normalized word to append to `words_used`
    pub push_word: Option<String>,
    /// Set the sealed winner (inner None records a draw)
    pub winner: Option<Option<String>>,
    pub end_reason: Option<EndReason>,
    /// Second participant joining a Waiting session
    pub player_b: Option<String>,
    /// Optimistic concurrency check on the current turn holder
    pub expected_turn: Option<String>,
}

/// Parameters for creating a session.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub creator: String,
    /// Present immediately for practice sessions; joins later otherwise
    pub player_b: Option<String>,
    pub mode: crate::game::GameMode,
    pub category: Option<String>,
    pub game_budget_secs: u32,
    pub turn_budget_secs: u32,
    pub win_target: Option<u32>,
}

/// A change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    /// The session record changed (status, turn, scores, words)
    SessionUpdated { session_id: SessionId },
    /// A move was appended to the session's move log
    MoveInserted { session_id: SessionId },
}

impl SessionChange {
    pub fn session_id(&self) -> &str {
        match self {
            SessionChange::SessionUpdated { session_id } => session_id,
            SessionChange::MoveInserted { session_id } => session_id,
        }
    }
}

/// Handle for an active change subscription. Dropping it (or calling
/// `SessionStore::unsubscribe`) stops delivery.
pub struct Subscription {
    /// Store-assigned token identifying this subscriber
    pub token: u64,
    rx: Receiver<SessionChange>,
}

impl Subscription {
    pub fn new(token: u64, rx: Receiver<SessionChange>) -> Self {
        Subscription { token, rx }
    }

    /// Drain all pending change events (non-blocking).
    pub fn drain(&self) -> Vec<SessionChange> {
        let mut changes = Vec::new();
        while let Ok(change) = self.rx.try_recv() {
            changes.push(change);
        }
        changes
    }
}

/// Operations the game performs against the backend data service.
pub trait SessionStore {
    /// Create a session in Waiting status; returns its id.
    fn create_session(&self, params: CreateSession) -> Result<SessionId, StoreError>;

    /// Fetch the full denormalized session record.
    fn fetch_session(&self, id: &str) -> Result<SessionRecord, StoreError>;

    /// Apply a partial update: status transitions, score updates, turn
    /// flips, word appends. Enforces monotonic status, non-decreasing
    /// scores, unique words, and the `expected_turn` guard.
    fn update_session(&self, id: &str, patch: SessionPatch) -> Result<(), StoreError>;

    /// Append one move to the session's audit log.
    fn insert_move(&self, mv: MoveRecord) -> Result<(), StoreError>;

    /// Subscribe to change events for one session.
    fn subscribe(&self, id: &str) -> Result<Subscription, StoreError>;

    /// Stop delivering events to the given subscription.
    fn unsubscribe(&self, sub: &Subscription);

    /// Record the sealed outcome for a Completed session. Must be invoked
    /// exactly once per session; a second call is an error.
    fn apply_final_outcome(&self, id: &str, winner: Option<String>) -> Result<(), StoreError>;
}
