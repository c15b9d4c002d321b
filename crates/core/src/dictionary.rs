//! Word dictionary with case-insensitive membership.
//!
//! Words are stored upper-cased; lookups upper-case their argument first.

use std::collections::HashSet;

/// Built-in word list used when no dictionary is supplied
const DEFAULT_WORDS: &[&str] = &[
    "CAT", "DOG", "BIRD", "FISH", "LION", "TIGER", "BEAR", "WOLF", "DEER", "FOX", "DUCK",
    "GOOSE", "SWAN", "EAGLE", "HAWK", "OWL", "CROW", "ROBIN", "FINCH", "PARROT", "EMU", "KIWI",
    "HERON", "STORK", "CRANE", "DOVE", "TURTLE", "SNAKE", "LIZARD", "FROG", "TOAD", "NEWT",
    "TETRA", "NEON", "GOBY", "TANG", "BOAR", "SOW", "HOG", "HAM", "RIB", "TIP", "ROAST",
    "STEAK", "ARM", "LEG", "BONE", "FAT", "DISC", "CORD", "BRAIN", "JAW", "FACE", "EYE",
    "IRIS", "LENS", "LASH", "BROW", "TEAR", "DUCT", "SPINE", "ORBIT", "SINUS", "PUPIL", "ANT",
    "BEE", "BAT", "RAT", "EEL", "ELK", "YAK", "APE", "COW", "PIG", "HEN", "RAM", "EWE",
];

/// A set of upper-cased words
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary holding the given words
    ///
    /// ```
    /// use letter_cascade_core::Dictionary;
    ///
    /// let dict = Dictionary::from_words(["cat", "Dog"]);
    /// assert!(dict.contains("CAT"));
    /// assert!(dict.contains("dog"));
    /// assert!(!dict.contains("cow"));
    /// ```
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Self::new();
        for word in words {
            dict.insert(word.as_ref());
        }
        dict
    }

    /// The built-in word list
    pub fn builtin() -> Self {
        Self::from_words(DEFAULT_WORDS)
    }

    /// Parse a newline-separated word list; blank lines and `#` comments are skipped.
    pub fn parse_list(text: &str) -> Self {
        Self::from_words(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Add a word; returns false when it was already present or is blank
    pub fn insert(&mut self, word: &str) -> bool {
        let word = word.trim();
        if word.is_empty() {
            return false;
        }
        self.words.insert(word.to_uppercase())
    }

    /// Remove a word; returns whether it was present
    pub fn remove(&mut self, word: &str) -> bool {
        self.words.remove(&word.trim().to_uppercase())
    }

    /// Case-insensitive membership test
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_uppercase())
    }

    /// Membership test for input already upper-cased
    pub(crate) fn contains_upper(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words, sorted
    pub fn words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.words.iter().map(String::as_str).collect();
        words.sort_unstable();
        words
    }
}

impl<S: AsRef<str>> FromIterator<S> for Dictionary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_words(iter)
    }
}
