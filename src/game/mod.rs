//! Game rules: modes, word lists, validation, scoring

pub mod scoring;
pub mod validation;
pub mod wordlist;

/// Pre-game countdown shown before play starts (seconds)
pub const COUNTDOWN_SECS: u32 = 5;

/// Per-turn time budget (seconds)
pub const TURN_BUDGET_SECS: u32 = 30;

/// Overall game budget for category mode (seconds)
pub const CATEGORY_GAME_BUDGET_SECS: u32 = 120;

/// Overall game budget for word-chain mode (seconds)
pub const CHAIN_GAME_BUDGET_SECS: u32 = 180;

/// Score threshold that ends a category-mode game early
pub const CATEGORY_WIN_TARGET: u32 = 100;

/// The two game modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Words must belong to a fixed reference list for a chosen topic
    Category,
    /// Each word must start with the previous word's last letter
    WordChain,
}

impl GameMode {
    /// Overall game time budget for this mode (seconds)
    pub fn game_budget_secs(&self) -> u32 {
        match self {
            GameMode::Category => CATEGORY_GAME_BUDGET_SECS,
            GameMode::WordChain => CHAIN_GAME_BUDGET_SECS,
        }
    }

    /// Score threshold that ends the game early, if any
    pub fn win_target(&self) -> Option<u32> {
        match self {
            GameMode::Category => Some(CATEGORY_WIN_TARGET),
            GameMode::WordChain => None,
        }
    }

    /// Display label for this mode
    pub fn label(&self) -> &'static str {
        match self {
            GameMode::Category => "Category",
            GameMode::WordChain => "Word Chain",
        }
    }

    /// Short identifier used as a storage key
    pub fn key(&self) -> &'static str {
        match self {
            GameMode::Category => "category",
            GameMode::WordChain => "chain",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_budgets() {
        assert_eq!(GameMode::Category.game_budget_secs(), 120);
        assert_eq!(GameMode::WordChain.game_budget_secs(), 180);
    }

    #[test]
    fn test_win_target_only_in_category_mode() {
        assert_eq!(GameMode::Category.win_target(), Some(100));
        assert_eq!(GameMode::WordChain.win_target(), None);
    }

    #[test]
    fn test_mode_keys_distinct() {
        assert_ne!(GameMode::Category.key(), GameMode::WordChain.key());
    }
}
