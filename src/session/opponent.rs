//! Opponent strategies
//!
//! The engine is generic over who sits on the other side of the board:
//! a locally scripted opponent (practice mode) or a remote peer whose moves
//! arrive only through store change events.

use super::{SessionRecord, SessionStatus};
use crate::game::wordlist::{common_words_starting_with, Category};
use crate::game::{validation, GameMode};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Scripted opponent's move delay range in category mode (ticks)
const CATEGORY_DELAY_MIN: u32 = 1;
const CATEGORY_DELAY_MAX: u32 = 4;

/// The other participant in a session.
pub trait OpponentStrategy {
    /// The opponent's participant handle
    fn handle(&self) -> &str;

    /// Whether this opponent acts inside this process. Local opponents have
    /// their turn timer enforced here; remote peers enforce their own.
    fn drives_locally(&self) -> bool;

    /// Called once per tick while the session is Active and the opponent
    /// holds the turn. Returns a word when the opponent decides to play.
    fn poll_move(&mut self, session: &SessionRecord) -> Option<String>;
}

/// Practice-mode opponent: picks a random unused word from the relevant
/// reference list after a short randomized delay.
pub struct ScriptedOpponent {
    handle: String,
    rng: StdRng,
    /// Ticks remaining until the pending move fires
    delay: Option<u32>,
}

impl ScriptedOpponent {
    pub fn new(handle: impl Into<String>) -> Self {
        Self::seeded(handle, rand::rng().random())
    }

    /// Deterministic construction for tests.
    pub fn seeded(handle: impl Into<String>, seed: u64) -> Self {
        ScriptedOpponent {
            handle: handle.into(),
            rng: StdRng::seed_from_u64(seed),
            delay: None,
        }
    }

    fn pick_word(&mut self, session: &SessionRecord) -> Option<String> {
        match session.mode {
            GameMode::Category => {
                let category = session
                    .category
                    .as_deref()
                    .and_then(Category::from_key)?;
                let mut candidates: Vec<&str> = category
                    .words()
                    .iter()
                    .copied()
                    .filter(|w| !session.words_used.iter().any(|used| used == w))
                    .collect();
                candidates.sort_unstable();
                candidates.choose(&mut self.rng).map(|w| w.to_string())
            }
            GameMode::WordChain => {
                let candidates: Vec<&str> = match session.last_word() {
                    Some(last) => {
                        let letter = validation::required_letter(last)?;
                        common_words_starting_with(letter)
                    }
                    None => {
                        // Opening word: any starting letter
                        let letter = self.rng.random_range(b'a'..=b'z') as char;
                        common_words_starting_with(letter)
                    }
                }
                .into_iter()
                .filter(|w| !session.words_used.iter().any(|used| used == w))
                .collect();
                candidates.choose(&mut self.rng).map(|w| w.to_string())
            }
        }
    }
}

impl OpponentStrategy for ScriptedOpponent {
    fn handle(&self) -> &str {
        &self.handle
    }

    fn drives_locally(&self) -> bool {
        true
    }

    fn poll_move(&mut self, session: &SessionRecord) -> Option<String> {
        if session.status != SessionStatus::Active || session.turn != self.handle {
            self.delay = None;
            return None;
        }

        let remaining = match self.delay {
            Some(remaining) => remaining,
            None => {
                // Chain mode answers on the next tick; category mode mulls it over
                let delay = match session.mode {
                    GameMode::Category => {
                        self.rng.random_range(CATEGORY_DELAY_MIN..=CATEGORY_DELAY_MAX)
                    }
                    GameMode::WordChain => 1,
                };
                self.delay = Some(delay);
                delay
            }
        };

        if remaining > 1 {
            self.delay = Some(remaining - 1);
            return None;
        }

        self.delay = None;
        // No candidate left: stay silent and let the turn timer pass
        self.pick_word(session)
    }
}

/// Remote participant: never synthesizes moves locally. Their submissions
/// reach us as authoritative session updates from the store.
pub struct RemotePeer {
    handle: String,
}

impl RemotePeer {
    pub fn new(handle: impl Into<String>) -> Self {
        RemotePeer {
            handle: handle.into(),
        }
    }
}

impl OpponentStrategy for RemotePeer {
    fn handle(&self) -> &str {
        &self.handle
    }

    fn drives_locally(&self) -> bool {
        false
    }

    fn poll_move(&mut self, _session: &SessionRecord) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::COMPUTER_HANDLE;

    fn session(mode: GameMode) -> SessionRecord {
        SessionRecord {
            id: "s1".to_string(),
            player_a: "Alice".to_string(),
            player_b: Some(COMPUTER_HANDLE.to_string()),
            mode,
            category: match mode {
                GameMode::Category => Some("animals".to_string()),
                GameMode::WordChain => None,
            },
            status: SessionStatus::Active,
            turn: COMPUTER_HANDLE.to_string(),
            score_a: 0,
            score_b: 0,
            words_used: Vec::new(),
            game_budget_secs: mode.game_budget_secs(),
            turn_budget_secs: 30,
            win_target: mode.win_target(),
            winner: None,
            end_reason: None,
        }
    }

    fn run_until_move(
        opponent: &mut ScriptedOpponent,
        session: &SessionRecord,
        max_ticks: u32,
    ) -> Option<String> {
        for _ in 0..max_ticks {
            if let Some(word) = opponent.poll_move(session) {
                return Some(word);
            }
        }
        None
    }

    #[test]
    fn test_scripted_category_move_is_listed_and_unused() {
        let mut opponent = ScriptedOpponent::seeded(COMPUTER_HANDLE, 7);
        let mut s = session(GameMode::Category);
        s.words_used.push("lion".to_string());

        let word = run_until_move(&mut opponent, &s, 10).expect("opponent should move");
        assert!(Category::Animals.contains(&word));
        assert_ne!(word, "lion");
    }

    #[test]
    fn test_scripted_category_delay_in_range() {
        let mut opponent = ScriptedOpponent::seeded(COMPUTER_HANDLE, 21);
        let s = session(GameMode::Category);

        let mut ticks = 0;
        while opponent.poll_move(&s).is_none() {
            ticks += 1;
            assert!(ticks < CATEGORY_DELAY_MAX, "delay exceeded maximum");
        }
        assert!(ticks + 1 >= CATEGORY_DELAY_MIN);
    }

    #[test]
    fn test_scripted_chain_move_respects_letter() {
        let mut opponent = ScriptedOpponent::seeded(COMPUTER_HANDLE, 3);
        let mut s = session(GameMode::WordChain);
        s.words_used.push("word".to_string());

        // Chain mode answers on the first polled tick
        let word = opponent.poll_move(&s).expect("opponent should move");
        assert!(word.starts_with('d'), "'{}' should start with d", word);
    }

    #[test]
    fn test_scripted_silent_off_turn() {
        let mut opponent = ScriptedOpponent::seeded(COMPUTER_HANDLE, 11);
        let mut s = session(GameMode::WordChain);
        s.turn = "Alice".to_string();

        for _ in 0..10 {
            assert_eq!(opponent.poll_move(&s), None);
        }
    }

    #[test]
    fn test_scripted_silent_when_list_exhausted() {
        let mut opponent = ScriptedOpponent::seeded(COMPUTER_HANDLE, 5);
        let mut s = session(GameMode::Category);
        s.words_used = Category::Animals.words().iter().map(|w| w.to_string()).collect();

        assert_eq!(run_until_move(&mut opponent, &s, 10), None);
    }

    #[test]
    fn test_seeded_opponent_is_deterministic() {
        let s = session(GameMode::Category);
        let mut a = ScriptedOpponent::seeded(COMPUTER_HANDLE, 42);
        let mut b = ScriptedOpponent::seeded(COMPUTER_HANDLE, 42);
        assert_eq!(run_until_move(&mut a, &s, 10), run_until_move(&mut b, &s, 10));
    }

    #[test]
    fn test_remote_peer_never_acts() {
        let mut peer = RemotePeer::new("Bob");
        let s = session(GameMode::Category);
        assert!(!peer.drives_locally());
        for _ in 0..10 {
            assert_eq!(peer.poll_move(&s), None);
        }
    }
}
