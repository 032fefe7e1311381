//! Scoring formulas
//!
//! Three formulas coexist, one per context, and are deliberately not
//! unified: points reward speed and length, and the chain streak rewards
//! sustained correct play. All are deterministic and side-effect-free.

/// Turn budget the time-taken formula is calibrated against (seconds)
const TIME_TAKEN_BUDGET: u32 = 30;

/// Which formula a session uses to score accepted words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRule {
    /// Category practice/arena: flat base plus a time-remaining bonus
    TimeRemaining,
    /// Word chain: length and streak bonuses
    Chain,
    /// Remote versus: length bonus plus a time-taken speed bonus
    TimeTaken,
}

impl ScoreRule {
    /// Score an accepted word under this rule.
    ///
    /// `seconds` is time remaining on the turn clock for `TimeRemaining`,
    /// and time taken for `TimeTaken`; `Chain` ignores it.
    pub fn score(&self, word: &str, seconds: u32, streak: u32) -> u32 {
        match self {
            ScoreRule::TimeRemaining => time_remaining_points(seconds),
            ScoreRule::Chain => chain_points(word, streak),
            ScoreRule::TimeTaken => time_taken_points(word, seconds),
        }
    }
}

/// Practice/arena formula: `10 + max(1, floor(time_left / 5))`.
pub fn time_remaining_points(time_left: u32) -> u32 {
    10 + (time_left / 5).max(1)
}

/// Word-chain formula: `15 + max(0, len - 3) * 5 + streak * 2`.
pub fn chain_points(word: &str, streak: u32) -> u32 {
    let len = word.trim().chars().count() as u32;
    15 + len.saturating_sub(3) * 5 + streak * 2
}

/// Remote versus formula:
/// `floor(15 + max(0, len - 3) * 5 + clamp((30 - taken) * 0.5, 0, 15))`.
pub fn time_taken_points(word: &str, time_taken: u32) -> u32 {
    let len = word.trim().chars().count() as u32;
    let base = 15 + len.saturating_sub(3) * 5;
    let speed = ((TIME_TAKEN_BUDGET.saturating_sub(time_taken)) as f64 * 0.5).clamp(0.0, 15.0);
    (base as f64 + speed).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_remaining_points() {
        assert_eq!(time_remaining_points(30), 16); // 10 + 6
        assert_eq!(time_remaining_points(25), 15);
        assert_eq!(time_remaining_points(5), 11);
        assert_eq!(time_remaining_points(4), 11); // floor(4/5)=0, min bonus 1
        assert_eq!(time_remaining_points(0), 11);
    }

    #[test]
    fn test_chain_points() {
        assert_eq!(chain_points("cat", 0), 15); // no length bonus at 3
        assert_eq!(chain_points("table", 0), 25); // 15 + 2*5
        assert_eq!(chain_points("cat", 3), 21); // 15 + 3*2
        assert_eq!(chain_points("up", 1), 17); // short words don't go below base
    }

    #[test]
    fn test_time_taken_points() {
        // Instant answer gets the full 15-point speed bonus
        assert_eq!(time_taken_points("cat", 0), 30);
        // 10 seconds taken: 15 + 0 + 10.0
        assert_eq!(time_taken_points("cat", 10), 25);
        // Odd seconds floor the half-point: 15 + (29*0.5=14.5) -> 29
        assert_eq!(time_taken_points("cat", 1), 29);
        // Slow answers get no speed bonus, and never negative
        assert_eq!(time_taken_points("cat", 30), 15);
        assert_eq!(time_taken_points("cat", 45), 15);
        // Length bonus stacks
        assert_eq!(time_taken_points("planet", 30), 30); // 15 + 3*5
    }

    #[test]
    fn test_score_rule_dispatch() {
        assert_eq!(ScoreRule::TimeRemaining.score("lion", 25, 0), 15);
        assert_eq!(ScoreRule::Chain.score("lion", 25, 2), 24); // 15 + 5 + 4
        assert_eq!(ScoreRule::TimeTaken.score("lion", 10, 9), 30); // streak ignored
    }

    #[test]
    fn test_scoring_deterministic() {
        for _ in 0..3 {
            assert_eq!(chain_points("garden", 2), chain_points("garden", 2));
        }
    }
}
