//! In-memory session store
//!
//! Stand-in for the hosted backend: keeps session and move records behind a
//! mutex and pushes change events to subscribers over mpsc channels. Used by
//! practice mode (the scripted opponent's moves round-trip through here just
//! like a remote peer's would) and by tests.

use super::{CreateSession, SessionChange, SessionPatch, SessionStore, StoreError, Subscription};
use crate::session::{MoveRecord, SessionId, SessionRecord, SessionStatus};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};

struct Subscriber {
    token: u64,
    session_id: SessionId,
    tx: Sender<SessionChange>,
}

#[derive(Default)]
struct Inner {
    sessions: HashMap<SessionId, SessionRecord>,
    moves: Vec<MoveRecord>,
    outcomes: HashMap<SessionId, Option<String>>,
    subscribers: Vec<Subscriber>,
    next_session: u64,
    next_token: u64,
}

impl Inner {
    fn notify(&mut self, change: SessionChange) {
        let id = change.session_id().to_string();
        // Dead subscribers are pruned as their channels disconnect
        self.subscribers
            .retain(|sub| sub.session_id != id || sub.tx.send(change.clone()).is_ok());
    }
}

/// Shared-handle in-memory store. Clones share the same state, so the view,
/// the engine, and a test harness can all talk to one backend.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Io("store lock poisoned".to_string()))
    }

    /// Moves recorded for a session, in insertion order.
    pub fn moves_for(&self, id: &str) -> Vec<MoveRecord> {
        match self.lock() {
            Ok(inner) => inner
                .moves
                .iter()
                .filter(|m| m.session_id == id)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Whether a final outcome has been recorded for the session.
    pub fn outcome_recorded(&self, id: &str) -> bool {
        self.lock()
            .map(|inner| inner.outcomes.contains_key(id))
            .unwrap_or(false)
    }
}

fn apply_patch(session: &mut SessionRecord, patch: SessionPatch) -> Result<(), StoreError> {
    if session.status == SessionStatus::Completed {
        return Err(StoreError::SessionClosed);
    }

    if let Some(expected) = &patch.expected_turn {
        if &session.turn != expected {
            return Err(StoreError::TurnConflict {
                holder: session.turn.clone(),
            });
        }
    }

    if let Some(status) = patch.status {
        // Lifecycle is monotonic with no skipped states
        let from = session.status.rank();
        if status.rank() < from || status.rank() > from + 1 {
            return Err(StoreError::InvalidPatch(format!(
                "illegal status transition {:?} -> {:?}",
                session.status, status
            )));
        }
        session.status = status;
    }

    if let Some(player_b) = patch.player_b {
        if session.player_b.is_some() {
            return Err(StoreError::InvalidPatch("second player already set".to_string()));
        }
        session.player_b = Some(player_b);
    }

    if let Some(word) = patch.push_word {
        let lower = word.to_lowercase();
        if session.words_used.iter().any(|w| w == &lower) {
            return Err(StoreError::InvalidPatch(format!("duplicate word '{}'", lower)));
        }
        session.words_used.push(lower);
    }

    if let Some((player, score)) = patch.score_for {
        if !session.is_participant(&player) {
            return Err(StoreError::InvalidPatch(format!("unknown participant '{}'", player)));
        }
        let current = session.score_of(&player);
        if score < current {
            return Err(StoreError::InvalidPatch(format!(
                "score decrease for '{}' ({} -> {})",
                player, current, score
            )));
        }
        if player == session.player_a {
            session.score_a = score;
        } else {
            session.score_b = score;
        }
    }

    if let Some(turn) = patch.turn {
        if !session.is_participant(&turn) {
            return Err(StoreError::InvalidPatch(format!("unknown turn holder '{}'", turn)));
        }
        session.turn = turn;
    }

    if let Some(winner) = patch.winner {
        session.winner = winner;
    }

    if let Some(reason) = patch.end_reason {
        session.end_reason = Some(reason);
    }

    Ok(())
}

impl SessionStore for MemoryStore {
    fn create_session(&self, params: CreateSession) -> Result<SessionId, StoreError> {
        let mut inner = self.lock()?;
        inner.next_session += 1;
        let id = format!("session-{}", inner.next_session);
        let record = SessionRecord {
            id: id.clone(),
            player_a: params.creator.clone(),
            player_b: params.player_b,
            mode: params.mode,
            category: params.category,
            status: SessionStatus::Waiting,
            // Placeholder until Countdown resolves the first turn
            turn: params.creator,
            score_a: 0,
            score_b: 0,
            words_used: Vec::new(),
            game_budget_secs: params.game_budget_secs,
            turn_budget_secs: params.turn_budget_secs,
            win_target: params.win_target,
            winner: None,
            end_reason: None,
        };
        inner.sessions.insert(id.clone(), record);
        Ok(id)
    }

    fn fetch_session(&self, id: &str) -> Result<SessionRecord, StoreError> {
        let inner = self.lock()?;
        inner.sessions.get(id).cloned().ok_or(StoreError::NotFound)
    }

    fn update_session(&self, id: &str, patch: SessionPatch) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let session = inner.sessions.get_mut(id).ok_or(StoreError::NotFound)?;
        apply_patch(session, patch)?;
        inner.notify(SessionChange::SessionUpdated {
            session_id: id.to_string(),
        });
        Ok(())
    }

    fn insert_move(&self, mv: MoveRecord) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let session = inner
            .sessions
            .get(&mv.session_id)
            .ok_or(StoreError::NotFound)?;
        if session.status == SessionStatus::Completed {
            return Err(StoreError::SessionClosed);
        }
        let session_id = mv.session_id.clone();
        inner.moves.push(mv);
        inner.notify(SessionChange::MoveInserted { session_id });
        Ok(())
    }

    fn subscribe(&self, id: &str) -> Result<Subscription, StoreError> {
        let mut inner = self.lock()?;
        if !inner.sessions.contains_key(id) {
            return Err(StoreError::NotFound);
        }
        inner.next_token += 1;
        let token = inner.next_token;
        let (tx, rx) = channel();
        inner.subscribers.push(Subscriber {
            token,
            session_id: id.to_string(),
            tx,
        });
        Ok(Subscription::new(token, rx))
    }

    fn unsubscribe(&self, sub: &Subscription) {
        if let Ok(mut inner) = self.lock() {
            inner.subscribers.retain(|s| s.token != sub.token);
        }
    }

    fn apply_final_outcome(&self, id: &str, winner: Option<String>) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let session = inner.sessions.get(id).ok_or(StoreError::NotFound)?;
        if session.status != SessionStatus::Completed {
            return Err(StoreError::InvalidPatch(
                "outcome for a session that is not completed".to_string(),
            ));
        }
        if inner.outcomes.contains_key(id) {
            return Err(StoreError::InvalidPatch("outcome already applied".to_string()));
        }
        inner.outcomes.insert(id.to_string(), winner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameMode;
    use crate::session::EndReason;

    fn create(store: &MemoryStore) -> SessionId {
        store
            .create_session(CreateSession {
                creator: "Alice".to_string(),
                player_b: Some("Bob".to_string()),
                mode: GameMode::Category,
                category: Some("animals".to_string()),
                game_budget_secs: 120,
                turn_budget_secs: 30,
                win_target: Some(100),
            })
            .unwrap()
    }

    fn activate(store: &MemoryStore, id: &str) {
        store
            .update_session(
                id,
                SessionPatch {
                    status: Some(SessionStatus::Countdown),
                    ..Default::default()
                },
            )
            .unwrap();
        store
            .update_session(
                id,
                SessionPatch {
                    status: Some(SessionStatus::Active),
                    turn: Some("Bob".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    #[test]
    fn test_create_and_fetch() {
        let store = MemoryStore::new();
        let id = create(&store);
        let session = store.fetch_session(&id).unwrap();
        assert_eq!(session.status, SessionStatus::Waiting);
        assert_eq!(session.player_a, "Alice");
        assert_eq!(session.player_b.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_fetch_missing_session() {
        let store = MemoryStore::new();
        assert_eq!(store.fetch_session("nope"), Err(StoreError::NotFound));
    }

    #[test]
    fn test_turn_conflict_rejected() {
        let store = MemoryStore::new();
        let id = create(&store);
        activate(&store, &id);

        // Alice tries to act while Bob holds the turn
        let result = store.update_session(
            &id,
            SessionPatch {
                expected_turn: Some("Alice".to_string()),
                turn: Some("Bob".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(
            result,
            Err(StoreError::TurnConflict {
                holder: "Bob".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_word_rejected() {
        let store = MemoryStore::new();
        let id = create(&store);
        activate(&store, &id);

        let push = |word: &str| {
            store.update_session(
                &id,
                SessionPatch {
                    push_word: Some(word.to_string()),
                    ..Default::default()
                },
            )
        };
        push("lion").unwrap();
        assert!(matches!(push("LION"), Err(StoreError::InvalidPatch(_))));
        let session = store.fetch_session(&id).unwrap();
        assert_eq!(session.words_used, vec!["lion".to_string()]);
    }

    #[test]
    fn test_score_never_decreases() {
        let store = MemoryStore::new();
        let id = create(&store);
        activate(&store, &id);

        let set = |score: u32| {
            store.update_session(
                &id,
                SessionPatch {
                    score_for: Some(("Bob".to_string(), score)),
                    ..Default::default()
                },
            )
        };
        set(15).unwrap();
        set(15).unwrap();
        assert!(matches!(set(10), Err(StoreError::InvalidPatch(_))));
        assert_eq!(store.fetch_session(&id).unwrap().score_b, 15);
    }

    #[test]
    fn test_no_backward_status_transition() {
        let store = MemoryStore::new();
        let id = create(&store);
        activate(&store, &id);

        let result = store.update_session(
            &id,
            SessionPatch {
                status: Some(SessionStatus::Waiting),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(StoreError::InvalidPatch(_))));
    }

    #[test]
    fn test_no_skipped_status_transition() {
        let store = MemoryStore::new();
        let id = create(&store);

        // Waiting -> Completed skips Countdown and Active
        let result = store.update_session(
            &id,
            SessionPatch {
                status: Some(SessionStatus::Completed),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(StoreError::InvalidPatch(_))));
        assert_eq!(
            store.fetch_session(&id).unwrap().status,
            SessionStatus::Waiting
        );
    }

    #[test]
    fn test_completed_session_is_sealed() {
        let store = MemoryStore::new();
        let id = create(&store);
        activate(&store, &id);
        store
            .update_session(
                &id,
                SessionPatch {
                    status: Some(SessionStatus::Completed),
                    winner: Some(Some("Bob".to_string())),
                    end_reason: Some(EndReason::TimeExpired),
                    ..Default::default()
                },
            )
            .unwrap();

        let result = store.update_session(
            &id,
            SessionPatch {
                push_word: Some("tiger".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(result, Err(StoreError::SessionClosed));

        let mv = MoveRecord {
            session_id: id.clone(),
            player: "Bob".to_string(),
            word: "tiger".to_string(),
            points: 15,
            seconds_taken: 3,
            valid: true,
        };
        assert_eq!(store.insert_move(mv), Err(StoreError::SessionClosed));
    }

    #[test]
    fn test_subscription_delivers_changes() {
        let store = MemoryStore::new();
        let id = create(&store);
        let sub = store.subscribe(&id).unwrap();

        activate(&store, &id);
        // One update per patch: Countdown, then Active
        let changes = sub.drain();
        assert_eq!(changes.len(), 2);
        assert!(changes
            .iter()
            .all(|c| *c == SessionChange::SessionUpdated {
                session_id: id.clone()
            }));

        store
            .insert_move(MoveRecord {
                session_id: id.clone(),
                player: "Bob".to_string(),
                word: "lion".to_string(),
                points: 15,
                seconds_taken: 3,
                valid: true,
            })
            .unwrap();
        let changes = sub.drain();
        assert_eq!(
            changes,
            vec![SessionChange::MoveInserted {
                session_id: id.clone()
            }]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let store = MemoryStore::new();
        let id = create(&store);
        let sub = store.subscribe(&id).unwrap();
        store.unsubscribe(&sub);

        activate(&store, &id);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn test_final_outcome_exactly_once() {
        let store = MemoryStore::new();
        let id = create(&store);
        activate(&store, &id);

        // Not completed yet
        assert!(store.apply_final_outcome(&id, None).is_err());

        store
            .update_session(
                &id,
                SessionPatch {
                    status: Some(SessionStatus::Completed),
                    winner: Some(None),
                    end_reason: Some(EndReason::TimeExpired),
                    ..Default::default()
                },
            )
            .unwrap();

        store.apply_final_outcome(&id, None).unwrap();
        assert!(store.outcome_recorded(&id));
        assert!(store.apply_final_outcome(&id, None).is_err());
    }

    #[test]
    fn test_moves_are_append_only_audit() {
        let store = MemoryStore::new();
        let id = create(&store);
        activate(&store, &id);

        for (word, points) in [("lion", 15), ("tiger", 16)] {
            store
                .insert_move(MoveRecord {
                    session_id: id.clone(),
                    player: "Bob".to_string(),
                    word: word.to_string(),
                    points,
                    seconds_taken: 2,
                    valid: true,
                })
                .unwrap();
        }
        let moves = store.moves_for(&id);
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].word, "lion");
        assert_eq!(moves[1].word, "tiger");
    }

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let id = create(&store);
        let other = store.clone();
        assert!(other.fetch_session(&id).is_ok());
    }
}
