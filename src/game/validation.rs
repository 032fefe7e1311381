//! Word validation
//!
//! Validates submitted words against:
//! - Non-empty input after trimming
//! - No repeats within the session (case-insensitive)
//! - Category membership (category mode)
//! - Starting-letter rule and loose English check (chain mode)

use super::wordlist::{is_common_word, Category};
use super::GameMode;

/// Minimum length at which a chain-mode word passes the loose English check
/// without being in the common-word list.
pub const CHAIN_MIN_FREE_LENGTH: usize = 3;

/// Result of word validation with specific rejection reasons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Word is acceptable
    Valid,
    /// Input was empty or whitespace-only
    EmptyInput,
    /// Word was already played this session
    AlreadyUsed,
    /// Word is not in the chosen category's reference list
    NotInCategory,
    /// Chain mode: word does not start with the required letter
    WrongStartingLetter { required: char },
    /// Chain mode: word failed the loose English check
    NotAWord,
}

impl ValidationResult {
    /// Returns true if the word is acceptable
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Returns a user-friendly message
    pub fn message(&self) -> String {
        match self {
            ValidationResult::Valid => "Valid word!".to_string(),
            ValidationResult::EmptyInput => "Type a word first".to_string(),
            ValidationResult::AlreadyUsed => "Already used".to_string(),
            ValidationResult::NotInCategory => "Not in this category".to_string(),
            ValidationResult::WrongStartingLetter { required } => {
                format!("Must start with '{}'", required.to_uppercase())
            }
            ValidationResult::NotAWord => "Not a word".to_string(),
        }
    }
}

/// Normalize a submission: trim surrounding whitespace and lowercase.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Validate a submitted word.
///
/// `prior_words` must hold normalized (lowercase) entries. `chain_last` is
/// the previous chain word, if any; `None` means any starting letter is
/// acceptable. Pure function: same inputs always yield the same decision.
///
/// Checks in order:
/// 1. Non-empty after normalization
/// 2. Not already used this session
/// 3. Mode rule: category membership, or chain letter + loose English check
pub fn validate(
    word: &str,
    mode: GameMode,
    category: Option<Category>,
    prior_words: &[String],
    chain_last: Option<&str>,
) -> ValidationResult {
    let normalized = normalize(word);

    if normalized.is_empty() {
        return ValidationResult::EmptyInput;
    }

    if prior_words.iter().any(|w| w == &normalized) {
        return ValidationResult::AlreadyUsed;
    }

    match mode {
        GameMode::Category => {
            let in_category = category.map(|c| c.contains(&normalized)).unwrap_or(false);
            if !in_category {
                return ValidationResult::NotInCategory;
            }
        }
        GameMode::WordChain => {
            if let Some(required) = chain_last.and_then(required_letter) {
                // First char of a non-empty normalized word always exists
                let first = normalized.chars().next().unwrap_or(' ');
                if first != required {
                    return ValidationResult::WrongStartingLetter { required };
                }
            }
            // Deliberately weak "valid English" check: common-list membership
            // OR length >= 3. Not a real dictionary lookup.
            if !is_common_word(&normalized) && normalized.chars().count() < CHAIN_MIN_FREE_LENGTH {
                return ValidationResult::NotAWord;
            }
        }
    }

    ValidationResult::Valid
}

/// The letter the next chain word must start with: the last letter of the
/// previous word, lowercased.
pub fn required_letter(previous: &str) -> Option<char> {
    previous
        .trim()
        .chars()
        .last()
        .map(|c| c.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn used(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| normalize(w)).collect()
    }

    #[test]
    fn test_category_accepts_listed_word() {
        let result = validate("lion", GameMode::Category, Some(Category::Animals), &[], None);
        assert_eq!(result, ValidationResult::Valid);
    }

    #[test]
    fn test_category_normalizes_case_and_whitespace() {
        // Mixed case with a trailing space is accepted once as "lion"...
        let result = validate("Lion ", GameMode::Category, Some(Category::Animals), &[], None);
        assert_eq!(result, ValidationResult::Valid);

        // ...and a second submission of "LION" is rejected as already used.
        let prior = used(&["Lion "]);
        let result = validate("LION", GameMode::Category, Some(Category::Animals), &prior, None);
        assert_eq!(result, ValidationResult::AlreadyUsed);
    }

    #[test]
    fn test_category_rejects_unlisted_word() {
        let result = validate("pizza", GameMode::Category, Some(Category::Animals), &[], None);
        assert_eq!(result, ValidationResult::NotInCategory);
    }

    #[test]
    fn test_empty_input_rejected() {
        for input in ["", "   ", "\t\n"] {
            let result = validate(input, GameMode::Category, Some(Category::Animals), &[], None);
            assert_eq!(result, ValidationResult::EmptyInput);
        }
    }

    #[test]
    fn test_already_used_applies_in_both_modes() {
        let prior = used(&["dog"]);
        let category = validate("DOG", GameMode::Category, Some(Category::Animals), &prior, None);
        assert_eq!(category, ValidationResult::AlreadyUsed);

        let chain = validate("Dog", GameMode::WordChain, None, &prior, Some("word"));
        assert_eq!(chain, ValidationResult::AlreadyUsed);
    }

    #[test]
    fn test_chain_starting_letter() {
        // "WORD" ends in "d": "dog" chains, "cat" does not.
        let result = validate("dog", GameMode::WordChain, None, &[], Some("WORD"));
        assert_eq!(result, ValidationResult::Valid);

        let result = validate("cat", GameMode::WordChain, None, &[], Some("WORD"));
        assert_eq!(
            result,
            ValidationResult::WrongStartingLetter { required: 'd' }
        );

        // And a replayed "dog" is rejected as already used, not wrong letter.
        let prior = used(&["dog"]);
        let result = validate("dog", GameMode::WordChain, None, &prior, Some("word"));
        assert_eq!(result, ValidationResult::AlreadyUsed);
    }

    #[test]
    fn test_chain_first_word_any_letter() {
        let result = validate("zebra", GameMode::WordChain, None, &[], None);
        assert_eq!(result, ValidationResult::Valid);
    }

    #[test]
    fn test_chain_loose_english_check() {
        // 3+ letters pass even when not in the common list
        let result = validate("drz", GameMode::WordChain, None, &[], Some("word"));
        assert_eq!(result, ValidationResult::Valid);

        // Short words pass only via list membership ("up" is listed)
        let result = validate("up", GameMode::WordChain, None, &[], Some("tofu"));
        assert_eq!(result, ValidationResult::Valid);

        let result = validate("dq", GameMode::WordChain, None, &[], Some("word"));
        assert_eq!(result, ValidationResult::NotAWord);
    }

    #[test]
    fn test_required_letter() {
        assert_eq!(required_letter("WORD"), Some('d'));
        assert_eq!(required_letter("lion "), Some('n'));
        assert_eq!(required_letter(""), None);
    }

    #[test]
    fn test_validation_is_pure() {
        let prior = used(&["lion", "tiger"]);
        let a = validate("bear", GameMode::Category, Some(Category::Animals), &prior, None);
        let b = validate("bear", GameMode::Category, Some(Category::Animals), &prior, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ValidationResult::AlreadyUsed.message(), "Already used");
        assert_eq!(
            ValidationResult::WrongStartingLetter { required: 'd' }.message(),
            "Must start with 'D'"
        );
        assert_eq!(ValidationResult::NotAWord.message(), "Not a word");
    }
}
