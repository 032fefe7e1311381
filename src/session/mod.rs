//! Session data model: records, lifecycle states, winner determination
//!
//! A session is one match between two participants (or one participant and
//! the scripted opponent). The authoritative copy of a `SessionRecord` lives
//! in the session store; the engine holds a working copy that it replaces
//! wholesale on every reconciliation.

pub mod engine;
pub mod opponent;

use crate::game::GameMode;

/// Opaque session identifier
pub type SessionId = String;

/// Synthetic participant handle used by the practice-mode opponent
pub const COMPUTER_HANDLE: &str = "computer";

/// Session lifecycle. Transitions are monotonic:
/// Waiting -> Countdown -> Active -> Completed, no backward moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Created, second participant not yet confirmed present
    Waiting,
    /// Both present, fixed visual delay before play starts
    Countdown,
    /// Play in progress, both timers running
    Active,
    /// Terminal; winner sealed
    Completed,
}

impl SessionStatus {
    /// Ordering rank used to enforce monotonic transitions
    pub fn rank(&self) -> u8 {
        match self {
            SessionStatus::Waiting => 0,
            SessionStatus::Countdown => 1,
            SessionStatus::Active => 2,
            SessionStatus::Completed => 3,
        }
    }
}

/// Why a session reached Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The overall game timer reached zero
    TimeExpired,
    /// A participant reached the win target
    ScoreThreshold,
}

/// One full denormalized session record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: SessionId,
    /// First participant (the session creator)
    pub player_a: String,
    /// Second participant, once joined
    pub player_b: Option<String>,
    pub mode: GameMode,
    /// Category key, category mode only
    pub category: Option<String>,
    pub status: SessionStatus,
    /// Handle of the participant whose turn it is (meaningless once Completed)
    pub turn: String,
    pub score_a: u32,
    pub score_b: u32,
    /// Ordered, append-only, normalized (lowercase), unique for the session
    pub words_used: Vec<String>,
    pub game_budget_secs: u32,
    pub turn_budget_secs: u32,
    pub win_target: Option<u32>,
    /// Set only when Completed; None after completion means a draw
    pub winner: Option<String>,
    pub end_reason: Option<EndReason>,
}

impl SessionRecord {
    /// Score of the given participant (0 for non-participants).
    pub fn score_of(&self, player: &str) -> u32 {
        if player == self.player_a {
            self.score_a
        } else if self.player_b.as_deref() == Some(player) {
            self.score_b
        } else {
            0
        }
    }

    /// The other participant's handle, if both are present.
    pub fn other_player(&self, player: &str) -> Option<&str> {
        let b = self.player_b.as_deref()?;
        if player == self.player_a {
            Some(b)
        } else if player == b {
            Some(self.player_a.as_str())
        } else {
            None
        }
    }

    /// Whether the handle belongs to one of the two participants.
    pub fn is_participant(&self, player: &str) -> bool {
        player == self.player_a || self.player_b.as_deref() == Some(player)
    }

    /// The most recent word played, if any (the chain link).
    pub fn last_word(&self) -> Option<&str> {
        self.words_used.last().map(String::as_str)
    }

    /// Winner determination from current scores. Pure: strictly higher score
    /// wins, equal scores mean a draw (None).
    pub fn decide_winner(&self) -> Option<String> {
        let b = self.player_b.as_deref()?;
        winner_of(&self.player_a, self.score_a, b, self.score_b).map(str::to_string)
    }
}

/// Strictly higher score wins; equal scores are a draw.
pub fn winner_of<'a>(
    player_a: &'a str,
    score_a: u32,
    player_b: &'a str,
    score_b: u32,
) -> Option<&'a str> {
    match score_a.cmp(&score_b) {
        std::cmp::Ordering::Greater => Some(player_a),
        std::cmp::Ordering::Less => Some(player_b),
        std::cmp::Ordering::Equal => None,
    }
}

/// One accepted (or audited) word submission. Append-only; never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub session_id: SessionId,
    pub player: String,
    /// Normalized (lowercase) word
    pub word: String,
    pub points: u32,
    pub seconds_taken: u32,
    pub valid: bool,
}

/// Terminal result of a session, handed to the profile layer exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub session_id: SessionId,
    pub mode: GameMode,
    pub player_a: String,
    pub player_b: String,
    pub score_a: u32,
    pub score_b: u32,
    /// None means a draw
    pub winner: Option<String>,
    pub end_reason: Option<EndReason>,
    pub words_used: Vec<String>,
}

impl SessionOutcome {
    /// Build an outcome from a completed session record.
    /// Returns None if the session is not Completed or lacks a second player.
    pub fn from_record(record: &SessionRecord) -> Option<Self> {
        if record.status != SessionStatus::Completed {
            return None;
        }
        let player_b = record.player_b.clone()?;
        Some(SessionOutcome {
            session_id: record.id.clone(),
            mode: record.mode,
            player_a: record.player_a.clone(),
            player_b,
            score_a: record.score_a,
            score_b: record.score_b,
            winner: record.winner.clone(),
            end_reason: record.end_reason,
            words_used: record.words_used.clone(),
        })
    }

    /// Whether the session ended in a draw.
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SessionRecord {
        SessionRecord {
            id: "s1".to_string(),
            player_a: "Alice".to_string(),
            player_b: Some("Bob".to_string()),
            mode: GameMode::Category,
            category: Some("animals".to_string()),
            status: SessionStatus::Active,
            turn: "Alice".to_string(),
            score_a: 0,
            score_b: 0,
            words_used: Vec::new(),
            game_budget_secs: 120,
            turn_budget_secs: 30,
            win_target: Some(100),
            winner: None,
            end_reason: None,
        }
    }

    #[test]
    fn test_status_ranks_monotonic() {
        assert!(SessionStatus::Waiting.rank() < SessionStatus::Countdown.rank());
        assert!(SessionStatus::Countdown.rank() < SessionStatus::Active.rank());
        assert!(SessionStatus::Active.rank() < SessionStatus::Completed.rank());
    }

    #[test]
    fn test_winner_is_pure_function_of_scores() {
        assert_eq!(winner_of("a", 80, "b", 95), Some("b"));
        assert_eq!(winner_of("a", 95, "b", 80), Some("a"));
        assert_eq!(winner_of("a", 50, "b", 50), None);
        assert_eq!(winner_of("a", 0, "b", 0), None);
    }

    #[test]
    fn test_score_of_and_other_player() {
        let mut r = record();
        r.score_a = 12;
        r.score_b = 7;
        assert_eq!(r.score_of("Alice"), 12);
        assert_eq!(r.score_of("Bob"), 7);
        assert_eq!(r.score_of("Mallory"), 0);
        assert_eq!(r.other_player("Alice"), Some("Bob"));
        assert_eq!(r.other_player("Bob"), Some("Alice"));
        assert_eq!(r.other_player("Mallory"), None);
    }

    #[test]
    fn test_decide_winner() {
        let mut r = record();
        r.score_a = 80;
        r.score_b = 95;
        assert_eq!(r.decide_winner(), Some("Bob".to_string()));
        r.score_b = 80;
        assert_eq!(r.decide_winner(), None);
    }

    #[test]
    fn test_outcome_only_from_completed() {
        let mut r = record();
        assert!(SessionOutcome::from_record(&r).is_none());

        r.status = SessionStatus::Completed;
        r.score_a = 80;
        r.score_b = 95;
        r.winner = Some("Bob".to_string());
        r.end_reason = Some(EndReason::TimeExpired);
        let outcome = SessionOutcome::from_record(&r).unwrap();
        assert_eq!(outcome.winner.as_deref(), Some("Bob"));
        assert!(!outcome.is_draw());
    }

    #[test]
    fn test_last_word() {
        let mut r = record();
        assert_eq!(r.last_word(), None);
        r.words_used.push("lion".to_string());
        r.words_used.push("tiger".to_string());
        assert_eq!(r.last_word(), Some("tiger"));
    }
}
