//! Play-screen state
//!
//! `GameView` owns one practice session end to end: the engine, the input
//! line, the feedback message, and the feed of accepted words. The feed is
//! rebuilt from the store's move log so the scripted opponent's words show
//! up through the same path a remote peer's would.

use std::collections::VecDeque;

use crate::game::wordlist::Category;
use crate::game::{validation, GameMode, TURN_BUDGET_SECS};
use crate::session::engine::{SessionEngine, SubmitOutcome};
use crate::session::opponent::ScriptedOpponent;
use crate::session::{SessionOutcome, SessionRecord, SessionStatus, COMPUTER_HANDLE};
use crate::store::{CreateSession, MemoryStore, StoreError};

/// One accepted word in the feed (either participant)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub player: String,
    pub word: String,
    pub points: u32,
}

/// State behind the playing screen.
pub struct GameView {
    engine: SessionEngine<MemoryStore>,
    store: MemoryStore,
    session_id: String,
    /// Current user input
    pub input: String,
    /// Feedback message from last submission
    pub feedback: String,
    /// Recent accepted words, newest last
    pub word_feed: VecDeque<FeedEntry>,
    feed_max: usize,
    moves_seen: usize,
    /// Stored practice best for this mode/category, if any
    pub best_score: Option<u32>,
}

impl GameView {
    /// Start a practice session against the scripted opponent.
    pub fn practice(
        mode: GameMode,
        category: Option<Category>,
        handle: &str,
    ) -> Result<Self, StoreError> {
        let store = MemoryStore::new();
        let params = CreateSession {
            creator: handle.to_string(),
            player_b: Some(COMPUTER_HANDLE.to_string()),
            mode,
            category: category.map(|c| c.key().to_string()),
            game_budget_secs: mode.game_budget_secs(),
            turn_budget_secs: TURN_BUDGET_SECS,
            win_target: mode.win_target(),
        };
        let engine = SessionEngine::create(
            store.clone(),
            params,
            handle,
            Box::new(ScriptedOpponent::new(COMPUTER_HANDLE)),
        )?;
        let session_id = engine.session().id.clone();
        Ok(GameView {
            engine,
            store,
            session_id,
            input: String::new(),
            feedback: String::new(),
            word_feed: VecDeque::new(),
            feed_max: 10,
            moves_seen: 0,
            best_score: None,
        })
    }

    /// Advance the session by one second.
    pub fn tick(&mut self) {
        if let Err(e) = self.engine.tick() {
            self.feedback = format!("Sync failed: {}", e);
        }
        self.refresh_feed();
    }

    /// Handle character input (locked once the session is over)
    pub fn on_char(&mut self, c: char) {
        if self.is_over() {
            return;
        }
        self.input.push(c);
        self.feedback.clear();
    }

    /// Handle backspace (locked once the session is over)
    pub fn on_backspace(&mut self) {
        if self.is_over() {
            return;
        }
        self.input.pop();
        self.feedback.clear();
    }

    /// Handle word submission (Enter key)
    pub fn on_submit(&mut self) {
        if self.input.trim().is_empty() {
            return;
        }
        let word = self.input.clone();
        match self.engine.submit(&word) {
            SubmitOutcome::Accepted { word, points } => {
                self.feedback = format!("OK +{} ({})", points, word.to_uppercase());
                self.input.clear();
                self.refresh_feed();
            }
            SubmitOutcome::Rejected(result) => {
                self.feedback = result.message();
                self.input.clear();
            }
            SubmitOutcome::NotYourTurn => {
                self.feedback = "Wait for your turn".to_string();
            }
            SubmitOutcome::NotActive => {}
            SubmitOutcome::StoreFailed(reason) => {
                // Input is kept; the submission can be retried
                self.feedback = format!("Sync failed: {}", reason);
            }
        }
    }

    /// Pull newly logged moves into the word feed.
    fn refresh_feed(&mut self) {
        let moves = self.store.moves_for(&self.session_id);
        for mv in moves.iter().skip(self.moves_seen) {
            if !mv.valid {
                continue;
            }
            self.word_feed.push_back(FeedEntry {
                player: mv.player.clone(),
                word: mv.word.clone(),
                points: mv.points,
            });
            while self.word_feed.len() > self.feed_max {
                self.word_feed.pop_front();
            }
        }
        self.moves_seen = moves.len();
    }

    // Read-side accessors for rendering

    pub fn session(&self) -> &SessionRecord {
        self.engine.session()
    }

    pub fn mode(&self) -> GameMode {
        self.engine.session().mode
    }

    pub fn local_handle(&self) -> &str {
        self.engine.local_player()
    }

    pub fn local_score(&self) -> u32 {
        let handle = self.engine.local_player().to_string();
        self.engine.session().score_of(&handle)
    }

    pub fn opponent_handle(&self) -> &str {
        self.engine.opponent_handle()
    }

    pub fn opponent_score(&self) -> u32 {
        let handle = self.engine.opponent_handle().to_string();
        self.engine.session().score_of(&handle)
    }

    /// The local player's current streak of accepted words.
    pub fn streak(&self) -> u32 {
        let handle = self.engine.local_player().to_string();
        self.engine.streak_of(&handle)
    }

    pub fn is_local_turn(&self) -> bool {
        self.engine.is_local_turn()
    }

    pub fn countdown_left(&self) -> u32 {
        self.engine.countdown_left()
    }

    pub fn game_left(&self) -> u32 {
        self.engine.game_left()
    }

    pub fn turn_left(&self) -> u32 {
        self.engine.turn_left()
    }

    /// The letter the next chain word must start with, if constrained.
    pub fn required_letter(&self) -> Option<char> {
        match self.mode() {
            GameMode::WordChain => self
                .engine
                .session()
                .last_word()
                .and_then(validation::required_letter),
            GameMode::Category => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.engine.session().status == SessionStatus::Completed
    }

    /// The sealed outcome, delivered at most once.
    pub fn take_outcome(&mut self) -> Option<SessionOutcome> {
        self.engine.take_outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::COUNTDOWN_SECS;

    fn run_to_local_turn(view: &mut GameView) {
        for _ in 0..(COUNTDOWN_SECS + 40) {
            view.tick();
            if view.is_local_turn() {
                return;
            }
        }
        panic!("never became the local player's turn");
    }

    fn fresh_animal(view: &GameView) -> String {
        ["lion", "tiger", "zebra", "rabbit"]
            .into_iter()
            .find(|w| !view.session().words_used.iter().any(|used| used == w))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_input_editing() {
        let mut view =
            GameView::practice(GameMode::Category, Some(Category::Animals), "Alice").unwrap();
        view.on_char('c');
        view.on_char('a');
        view.on_char('t');
        assert_eq!(view.input, "cat");
        view.on_backspace();
        assert_eq!(view.input, "ca");
    }

    #[test]
    fn test_accepted_submission_updates_feedback_and_feed() {
        let mut view =
            GameView::practice(GameMode::Category, Some(Category::Animals), "Alice").unwrap();
        run_to_local_turn(&mut view);

        // Opponent's opener already reached the feed through the move log
        assert!(!view.word_feed.is_empty());
        let feed_before = view.word_feed.len();

        for c in fresh_animal(&view).chars() {
            view.on_char(c);
        }
        view.on_submit();

        assert!(view.feedback.starts_with("OK +"), "got '{}'", view.feedback);
        assert!(view.input.is_empty());
        assert_eq!(view.word_feed.len(), feed_before + 1);
        assert_eq!(view.word_feed.back().unwrap().player, "Alice");
    }

    #[test]
    fn test_rejected_submission_keeps_score() {
        let mut view =
            GameView::practice(GameMode::Category, Some(Category::Animals), "Alice").unwrap();
        run_to_local_turn(&mut view);

        let score = view.local_score();
        for c in "pizza".chars() {
            view.on_char(c);
        }
        view.on_submit();

        assert_eq!(view.feedback, "Not in this category");
        assert_eq!(view.local_score(), score);
        assert!(view.is_local_turn());
    }

    #[test]
    fn test_submission_out_of_turn_gives_feedback() {
        let mut view =
            GameView::practice(GameMode::Category, Some(Category::Animals), "Alice").unwrap();
        // Reach Active; the opponent holds the first turn
        for _ in 0..(COUNTDOWN_SECS + 1) {
            view.tick();
            if view.session().status == SessionStatus::Active {
                break;
            }
        }
        assert!(!view.is_local_turn());

        view.on_char('c');
        view.on_char('a');
        view.on_char('t');
        view.on_submit();
        assert_eq!(view.feedback, "Wait for your turn");
        // Input preserved for when the turn comes around
        assert_eq!(view.input, "cat");
    }

    #[test]
    fn test_required_letter_tracks_chain() {
        let mut view = GameView::practice(GameMode::WordChain, None, "Alice").unwrap();
        assert_eq!(view.required_letter(), None);
        run_to_local_turn(&mut view);

        // The opponent opened, so the chain letter is now fixed
        let last = view.session().last_word().unwrap().to_string();
        let expected = last.chars().last().unwrap();
        assert_eq!(view.required_letter(), Some(expected));
    }

    #[test]
    fn test_outcome_after_time_expires() {
        let mut view =
            GameView::practice(GameMode::Category, Some(Category::Animals), "Alice").unwrap();
        let budget = GameMode::Category.game_budget_secs();
        for _ in 0..(budget + COUNTDOWN_SECS + 5) {
            view.tick();
            if view.is_over() {
                break;
            }
        }
        assert!(view.is_over());
        let outcome = view.take_outcome().expect("outcome should be present");
        assert_eq!(outcome.player_a, "Alice");
        assert!(view.take_outcome().is_none());
    }
}
