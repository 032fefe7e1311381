//! Turn/session state machine
//!
//! Drives one session through Waiting -> Countdown -> Active -> Completed,
//! ticking at 1 Hz. The engine never trusts its own working copy as
//! canonical: every local mutation goes through the store first, then the
//! authoritative record is refetched and replaces the working copy
//! wholesale. Store change events trigger the same refetch, so a scripted
//! opponent's moves and a remote peer's moves arrive through one path.
//!
//! The two countdown values (`game_left`, `turn_left`) are display
//! approximations seeded from the session's configured budgets; `turn_left`
//! re-seeds whenever the authoritative turn flips.

use super::opponent::OpponentStrategy;
use super::{EndReason, MoveRecord, SessionOutcome, SessionRecord, SessionStatus};
use crate::game::scoring::ScoreRule;
use crate::game::validation::{self, ValidationResult};
use crate::game::wordlist::Category;
use crate::game::{GameMode, COUNTDOWN_SECS};
use crate::store::{CreateSession, SessionPatch, SessionStore, StoreError, Subscription};
use std::collections::HashMap;

/// Result of a local word submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Word accepted and persisted; turn has flipped
    Accepted { word: String, points: u32 },
    /// Word rejected by validation; no state change
    Rejected(ValidationResult),
    /// The session is not accepting moves right now
    NotActive,
    /// It is the other participant's turn
    NotYourTurn,
    /// Remote persistence failed; no local state was advanced, the same
    /// submission may be retried
    StoreFailed(String),
}

/// One session's client-side state machine.
pub struct SessionEngine<S: SessionStore> {
    store: S,
    subscription: Subscription,
    session: SessionRecord,
    local_player: String,
    opponent: Box<dyn OpponentStrategy>,
    rule: ScoreRule,
    countdown_left: u32,
    game_left: u32,
    turn_left: u32,
    streaks: HashMap<String, u32>,
    outcome: Option<SessionOutcome>,
    outcome_taken: bool,
    outcome_recorded: bool,
}

impl<S: SessionStore> SessionEngine<S> {
    /// Create a fresh session in the store and attach to it.
    pub fn create(
        store: S,
        params: CreateSession,
        local_player: impl Into<String>,
        opponent: Box<dyn OpponentStrategy>,
    ) -> Result<Self, StoreError> {
        let id = store.create_session(params)?;
        Self::attach(store, &id, local_player, opponent)
    }

    /// Attach to an existing session.
    pub fn attach(
        store: S,
        id: &str,
        local_player: impl Into<String>,
        opponent: Box<dyn OpponentStrategy>,
    ) -> Result<Self, StoreError> {
        let subscription = store.subscribe(id)?;
        let session = store.fetch_session(id)?;
        let rule = rule_for(session.mode, opponent.drives_locally());
        let game_left = session.game_budget_secs;
        let turn_left = session.turn_budget_secs;
        let mut engine = SessionEngine {
            store,
            subscription,
            session,
            local_player: local_player.into(),
            opponent,
            rule,
            countdown_left: COUNTDOWN_SECS,
            game_left,
            turn_left,
            streaks: HashMap::new(),
            outcome: None,
            outcome_taken: false,
            outcome_recorded: false,
        };
        // Session may already be past Waiting (reattach after navigation)
        if engine.session.status == SessionStatus::Completed {
            engine.outcome = SessionOutcome::from_record(&engine.session);
        }
        Ok(engine)
    }

    /// Advance the machine by one second.
    pub fn tick(&mut self) -> Result<(), StoreError> {
        self.pump_events()?;

        match self.session.status {
            SessionStatus::Waiting => {
                if self.session.player_b.is_some() && self.is_coordinator() {
                    self.update_and_reconcile(SessionPatch {
                        status: Some(SessionStatus::Countdown),
                        ..Default::default()
                    })?;
                }
            }
            SessionStatus::Countdown => {
                self.countdown_left = self.countdown_left.saturating_sub(1);
                if self.countdown_left == 0 && self.is_coordinator() {
                    // First turn goes to the participant who did not create
                    // the session
                    let first = self.session.player_b.clone();
                    self.update_and_reconcile(SessionPatch {
                        status: Some(SessionStatus::Active),
                        turn: first,
                        ..Default::default()
                    })?;
                }
            }
            SessionStatus::Active => {
                self.game_left = self.game_left.saturating_sub(1);
                if self.game_left == 0 {
                    return self.complete(EndReason::TimeExpired);
                }

                let holder = self.session.turn.clone();
                if self.drives(&holder) {
                    self.turn_left = self.turn_left.saturating_sub(1);
                    if self.turn_left == 0 {
                        return self.forced_pass(&holder);
                    }
                }

                if self.session.turn == self.opponent.handle() {
                    if let Some(word) = self.opponent.poll_move(&self.session) {
                        let player = self.opponent.handle().to_string();
                        self.submit_for(&player, &word)?;
                    }
                }
            }
            SessionStatus::Completed => {}
        }

        Ok(())
    }

    /// Submit a word for the local player.
    pub fn submit(&mut self, raw: &str) -> SubmitOutcome {
        if self.session.status != SessionStatus::Active {
            return SubmitOutcome::NotActive;
        }
        if self.session.turn != self.local_player {
            return SubmitOutcome::NotYourTurn;
        }
        let player = self.local_player.clone();
        match self.submit_for(&player, raw) {
            Ok(outcome) => outcome,
            Err(e) => SubmitOutcome::StoreFailed(e.to_string()),
        }
    }

    /// Validate, score, and persist one submission for either participant.
    /// On any store failure the working copy is left untouched.
    fn submit_for(&mut self, player: &str, raw: &str) -> Result<SubmitOutcome, StoreError> {
        let category = self.session.category.as_deref().and_then(Category::from_key);
        let chain_last = match self.session.mode {
            GameMode::WordChain => self.session.last_word().map(str::to_string),
            GameMode::Category => None,
        };
        let result = validation::validate(
            raw,
            self.session.mode,
            category,
            &self.session.words_used,
            chain_last.as_deref(),
        );

        if !result.is_valid() {
            self.streaks.insert(player.to_string(), 0);
            // Audit trail for rejected attempts is best-effort
            let _ = self.store.insert_move(MoveRecord {
                session_id: self.session.id.clone(),
                player: player.to_string(),
                word: validation::normalize(raw),
                points: 0,
                seconds_taken: self.seconds_taken(),
                valid: false,
            });
            return Ok(SubmitOutcome::Rejected(result));
        }

        let word = validation::normalize(raw);
        let seconds = match self.rule {
            ScoreRule::TimeRemaining => self.turn_left,
            ScoreRule::TimeTaken => self.seconds_taken(),
            ScoreRule::Chain => 0,
        };
        let streak = self.streaks.get(player).copied().unwrap_or(0);
        let points = self.rule.score(&word, seconds, streak);
        let new_score = self.session.score_of(player) + points;
        let seconds_taken = self.seconds_taken();

        let threshold_hit = self
            .session
            .win_target
            .map(|target| new_score >= target)
            .unwrap_or(false);

        let mut patch = SessionPatch {
            push_word: Some(word.clone()),
            score_for: Some((player.to_string(), new_score)),
            expected_turn: Some(player.to_string()),
            ..Default::default()
        };
        if !threshold_hit {
            patch.turn = self.session.other_player(player).map(str::to_string);
        }
        self.update_and_reconcile(patch)?;

        // Audit only once the session record has advanced; a rejected patch
        // must leave no scored move behind
        self.store.insert_move(MoveRecord {
            session_id: self.session.id.clone(),
            player: player.to_string(),
            word: word.clone(),
            points,
            seconds_taken,
            valid: true,
        })?;

        *self.streaks.entry(player.to_string()).or_insert(0) += 1;

        if threshold_hit {
            self.complete(EndReason::ScoreThreshold)?;
        }

        Ok(SubmitOutcome::Accepted { word, points })
    }

    /// Turn timer expired: pass the turn without touching scores.
    fn forced_pass(&mut self, holder: &str) -> Result<(), StoreError> {
        let next = match self.session.other_player(holder) {
            Some(next) => next.to_string(),
            None => return Ok(()),
        };
        let patch = SessionPatch {
            turn: Some(next),
            expected_turn: Some(holder.to_string()),
            ..Default::default()
        };
        match self.store.update_session(&self.session.id, patch) {
            Ok(()) => self.refetch(),
            // Authoritative state moved under us: take it wholesale
            Err(StoreError::TurnConflict { .. }) | Err(StoreError::SessionClosed) => self.refetch(),
            Err(e) => Err(e),
        }
    }

    /// Game timer expired or threshold crossed: seal the session.
    fn complete(&mut self, reason: EndReason) -> Result<(), StoreError> {
        let winner = self.session.decide_winner();
        let patch = SessionPatch {
            status: Some(SessionStatus::Completed),
            winner: Some(winner.clone()),
            end_reason: Some(reason),
            ..Default::default()
        };
        match self.store.update_session(&self.session.id, patch) {
            Ok(()) => {
                self.refetch()?;
                self.record_outcome(winner)
            }
            // The other side sealed it first; their record wins
            Err(StoreError::SessionClosed) => self.refetch(),
            Err(e) => Err(e),
        }
    }

    /// Record the final outcome exactly once per session from this client.
    fn record_outcome(&mut self, winner: Option<String>) -> Result<(), StoreError> {
        if self.outcome_recorded {
            return Ok(());
        }
        match self.store.apply_final_outcome(&self.session.id, winner) {
            Ok(()) => {
                self.outcome_recorded = true;
                Ok(())
            }
            // Lost the race to the other participant's client
            Err(StoreError::InvalidPatch(_)) => {
                self.outcome_recorded = true;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Drain pending change notifications; any of them triggers a refetch.
    fn pump_events(&mut self) -> Result<(), StoreError> {
        if self.subscription.drain().is_empty() {
            return Ok(());
        }
        self.refetch()
    }

    fn update_and_reconcile(&mut self, patch: SessionPatch) -> Result<(), StoreError> {
        self.store.update_session(&self.session.id, patch)?;
        self.refetch()
    }

    fn refetch(&mut self) -> Result<(), StoreError> {
        let authoritative = self.store.fetch_session(&self.session.id)?;
        self.reconcile(authoritative);
        Ok(())
    }

    /// Replace the working copy with the authoritative record (last fetch
    /// wins) and re-seed the local countdowns where the record moved.
    fn reconcile(&mut self, authoritative: SessionRecord) {
        let prev_status = self.session.status;
        let prev_turn = self.session.turn.clone();
        self.session = authoritative;

        if self.session.status == SessionStatus::Active && prev_status != SessionStatus::Active {
            self.game_left = self.session.game_budget_secs;
            self.turn_left = self.session.turn_budget_secs;
        } else if self.session.turn != prev_turn {
            self.turn_left = self.session.turn_budget_secs;
        }

        if self.session.status == SessionStatus::Countdown && prev_status == SessionStatus::Waiting
        {
            self.countdown_left = COUNTDOWN_SECS;
        }

        if self.session.status == SessionStatus::Completed && self.outcome.is_none() {
            self.outcome = SessionOutcome::from_record(&self.session);
        }
    }

    fn seconds_taken(&self) -> u32 {
        self.session.turn_budget_secs.saturating_sub(self.turn_left)
    }

    /// Whether this client is responsible for driving shared transitions
    /// (Waiting -> Countdown -> Active). The creator drives them; in
    /// practice mode the sole human client drives everything.
    fn is_coordinator(&self) -> bool {
        self.local_player == self.session.player_a || self.opponent.drives_locally()
    }

    /// Whether the given participant's turn timer is enforced here.
    fn drives(&self, player: &str) -> bool {
        player == self.local_player
            || (player == self.opponent.handle() && self.opponent.drives_locally())
    }

    // Accessors for the view layer

    pub fn session(&self) -> &SessionRecord {
        &self.session
    }

    pub fn local_player(&self) -> &str {
        &self.local_player
    }

    pub fn opponent_handle(&self) -> &str {
        self.opponent.handle()
    }

    pub fn is_local_turn(&self) -> bool {
        self.session.status == SessionStatus::Active && self.session.turn == self.local_player
    }

    pub fn countdown_left(&self) -> u32 {
        self.countdown_left
    }

    pub fn game_left(&self) -> u32 {
        self.game_left
    }

    pub fn turn_left(&self) -> u32 {
        self.turn_left
    }

    pub fn streak_of(&self, player: &str) -> u32 {
        self.streaks.get(player).copied().unwrap_or(0)
    }

    pub fn score_rule(&self) -> ScoreRule {
        self.rule
    }

    /// The sealed outcome, delivered at most once (for profile updates).
    pub fn take_outcome(&mut self) -> Option<SessionOutcome> {
        if self.outcome_taken {
            return None;
        }
        match &self.outcome {
            Some(outcome) => {
                self.outcome_taken = true;
                Some(outcome.clone())
            }
            None => None,
        }
    }
}

impl<S: SessionStore> Drop for SessionEngine<S> {
    fn drop(&mut self) {
        // Symmetric teardown: timers die with the engine, the subscription
        // is withdrawn from the store
        self.store.unsubscribe(&self.subscription);
    }
}

fn rule_for(mode: GameMode, opponent_is_local: bool) -> ScoreRule {
    match mode {
        GameMode::WordChain => ScoreRule::Chain,
        GameMode::Category => {
            if opponent_is_local {
                ScoreRule::TimeRemaining
            } else {
                ScoreRule::TimeTaken
            }
        }
    }
}
