//! Embedded reference word lists
//!
//! Category lists are static, finite, hand-curated sets; no dictionary or
//! spell-check service is consulted. The common-word list backs the
//! word-chain validity check and the scripted opponent's vocabulary.
//! All lists embed at build time with O(1) hash set lookup.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static ANIMALS_DATA: &str = include_str!("../../data/categories/animals.txt");
static FOODS_DATA: &str = include_str!("../../data/categories/foods.txt");
static COUNTRIES_DATA: &str = include_str!("../../data/categories/countries.txt");
static SPORTS_DATA: &str = include_str!("../../data/categories/sports.txt");
static COMMON_DATA: &str = include_str!("../../data/common_words.txt");

static ANIMALS: Lazy<HashSet<&'static str>> = Lazy::new(|| ANIMALS_DATA.lines().collect());
static FOODS: Lazy<HashSet<&'static str>> = Lazy::new(|| FOODS_DATA.lines().collect());
static COUNTRIES: Lazy<HashSet<&'static str>> = Lazy::new(|| COUNTRIES_DATA.lines().collect());
static SPORTS: Lazy<HashSet<&'static str>> = Lazy::new(|| SPORTS_DATA.lines().collect());
static COMMON: Lazy<HashSet<&'static str>> = Lazy::new(|| COMMON_DATA.lines().collect());

/// A fixed word-list topic for category mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Animals,
    Foods,
    Countries,
    Sports,
}

impl Category {
    /// All categories, in menu order
    pub fn all() -> &'static [Category] {
        &[
            Category::Animals,
            Category::Foods,
            Category::Countries,
            Category::Sports,
        ]
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Animals => "Animals",
            Category::Foods => "Foods",
            Category::Countries => "Countries",
            Category::Sports => "Sports",
        }
    }

    /// Stable identifier used as a storage key
    pub fn key(&self) -> &'static str {
        match self {
            Category::Animals => "animals",
            Category::Foods => "foods",
            Category::Countries => "countries",
            Category::Sports => "sports",
        }
    }

    /// Look a category up by its storage key
    pub fn from_key(key: &str) -> Option<Category> {
        Category::all().iter().copied().find(|c| c.key() == key)
    }

    /// The category's reference word set (lowercase entries)
    pub fn words(&self) -> &'static HashSet<&'static str> {
        match self {
            Category::Animals => &ANIMALS,
            Category::Foods => &FOODS,
            Category::Countries => &COUNTRIES,
            Category::Sports => &SPORTS,
        }
    }

    /// Check membership, case-insensitive.
    pub fn contains(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.words().contains(lower.as_str())
    }
}

/// Check whether a word is in the common-word list, case-insensitive.
pub fn is_common_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    COMMON.contains(lower.as_str())
}

/// Common words starting with the given letter (for the chain-mode opponent).
pub fn common_words_starting_with(letter: char) -> Vec<&'static str> {
    let lower = letter.to_ascii_lowercase();
    let mut words: Vec<&'static str> = COMMON
        .iter()
        .copied()
        .filter(|w| w.starts_with(lower))
        .collect();
    words.sort_unstable();
    words
}

/// Number of entries in the common-word list
pub fn common_word_count() -> usize {
    COMMON.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_membership() {
        assert!(Category::Animals.contains("lion"));
        assert!(Category::Animals.contains("LION"));
        assert!(!Category::Animals.contains("pizza"));
        assert!(Category::Foods.contains("pizza"));
    }

    #[test]
    fn test_all_lists_nonempty() {
        for cat in Category::all() {
            assert!(cat.words().len() >= 50, "{} list too small", cat.label());
        }
        assert!(common_word_count() >= 200);
    }

    #[test]
    fn test_lists_are_lowercase() {
        for cat in Category::all() {
            for word in cat.words() {
                assert_eq!(*word, word.to_lowercase(), "{} not lowercase", word);
            }
        }
    }

    #[test]
    fn test_common_words() {
        assert!(is_common_word("dog"));
        assert!(is_common_word("word"));
        assert!(is_common_word("CAT"));
        assert!(!is_common_word("xyzzyplugh"));
    }

    #[test]
    fn test_common_words_starting_with() {
        let d_words = common_words_starting_with('d');
        assert!(d_words.contains(&"dog"));
        assert!(d_words.iter().all(|w| w.starts_with('d')));

        // Uppercase letter queries match too
        let upper = common_words_starting_with('D');
        assert_eq!(d_words, upper);
    }

    #[test]
    fn test_every_letter_has_chain_continuations() {
        // The scripted opponent needs candidates for any required letter.
        for letter in 'a'..='z' {
            assert!(
                !common_words_starting_with(letter).is_empty(),
                "no common words start with '{}'",
                letter
            );
        }
    }

    #[test]
    fn test_category_key_roundtrip() {
        for cat in Category::all() {
            assert_eq!(Category::from_key(cat.key()), Some(*cat));
        }
        assert_eq!(Category::from_key("bogus"), None);
    }
}
