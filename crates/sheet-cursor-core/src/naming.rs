//! Unique name generation for sheets and other named objects

use ahash::{AHashMap, AHashSet};

use crate::MAX_NAME_LEN;

/// Characters that may not appear in a sheet name
pub const FORBIDDEN_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];

/// Produces unique, sanitized, length-bounded names.
///
/// Every name the generator returns (or is told about through
/// [`reserve`](Self::reserve)) is remembered, and later requests that would
/// collide with it, ignoring case, get a numeric suffix instead.
///
/// ```
/// use sheet_cursor_core::NameGenerator;
///
/// let mut names = NameGenerator::new();
/// assert_eq!(names.generate("hello"), "hello");
/// assert_eq!(names.generate("hello"), "hello 2");
/// assert_eq!(names.generate(""), "1");
/// ```
#[derive(Debug, Clone)]
pub struct NameGenerator {
    /// Lowercased names already in use
    taken: AHashSet<String>,
    /// Last suffix issued per lowercased base name
    suffixes: AHashMap<String, u32>,
    /// Last number issued for names that sanitized to nothing
    counter: u64,
    max_len: usize,
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::with_max_len(MAX_NAME_LEN)
    }
}

impl NameGenerator {
    /// Create an empty generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty generator producing names of at most `max_len` characters
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            taken: AHashSet::new(),
            suffixes: AHashMap::new(),
            counter: 0,
            max_len: max_len.max(1),
        }
    }

    /// Maximum name length in characters
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Check whether a name is already in use (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(&name.to_lowercase())
    }

    /// Register a name that exists elsewhere so it is never generated
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_lowercase());
    }

    /// Number of names in use
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Whether no names have been issued or reserved
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    /// Generate a unique name derived from `suggested`
    pub fn generate(&mut self, suggested: &str) -> String {
        let sanitized: String = suggested
            .chars()
            .filter(|c| !FORBIDDEN_CHARS.contains(c))
            .collect();

        if sanitized.is_empty() {
            return self.next_numbered();
        }

        let base = truncate(&sanitized, self.max_len);
        if !self.contains(base) {
            let name = base.to_string();
            self.reserve(&name);
            return name;
        }

        let key = base.to_lowercase();
        let mut n = self.suffixes.get(&key).copied().unwrap_or(1);
        loop {
            n += 1;
            let suffix = format!(" {}", n);
            let width = suffix.chars().count();
            if width >= self.max_len {
                // No room for any of the base name next to the suffix
                return self.next_numbered();
            }
            let room = self.max_len - width;
            let candidate = format!("{}{}", truncate(&sanitized, room), suffix);
            if !self.contains(&candidate) {
                self.suffixes.insert(key, n);
                self.reserve(&candidate);
                return candidate;
            }
        }
    }

    fn next_numbered(&mut self) -> String {
        loop {
            self.counter += 1;
            let name = self.counter.to_string();
            if !self.contains(&name) {
                self.reserve(&name);
                return name;
            }
        }
    }
}

/// Truncate to at most `max` characters
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_repeated_name_gets_suffix() {
        let mut names = NameGenerator::new();
        assert_eq!(names.generate("hello"), "hello");
        assert_eq!(names.generate("hello"), "hello 2");
        assert_eq!(names.generate("HELLO"), "HELLO 3");
        assert_eq!(names.generate("other"), "other");
    }

    #[test]
    fn test_empty_name_uses_counter() {
        let mut names = NameGenerator::new();
        assert_eq!(names.generate(""), "1");
        assert_eq!(names.generate(""), "2");

        // Only forbidden characters
        assert_eq!(names.generate("[*]"), "3");
    }

    #[test]
    fn test_counter_skips_taken_names() {
        let mut names = NameGenerator::new();
        names.reserve("1");
        assert_eq!(names.generate(""), "2");
        assert_eq!(names.generate("1"), "1 2");
    }

    #[test]
    fn test_forbidden_characters_are_stripped() {
        let mut names = NameGenerator::new();
        assert_eq!(names.generate("Q1/Q2: [draft]?"), "Q1Q2 draft");
        assert_eq!(names.generate(r"a\b*c"), "abc");
    }

    #[test]
    fn test_long_names_are_truncated() {
        let mut names = NameGenerator::new();
        let long = "x".repeat(40);

        let first = names.generate(&long);
        assert_eq!(first, "x".repeat(MAX_NAME_LEN));

        let second = names.generate(&long);
        assert_eq!(second, format!("{} 2", "x".repeat(MAX_NAME_LEN - 2)));
        assert_eq!(second.chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let mut names = NameGenerator::new();
        let long = "é".repeat(40);
        assert_eq!(names.generate(&long).chars().count(), MAX_NAME_LEN);
    }

    #[test]
    fn test_custom_max_len() {
        let mut names = NameGenerator::with_max_len(5);
        assert_eq!(names.max_len(), 5);
        assert_eq!(names.generate("abcdefgh"), "abcde");
        assert_eq!(names.generate("abcdefgh"), "abc 2");
    }

    #[test]
    fn test_suffix_wider_than_max_len_falls_back_to_counter() {
        let mut names = NameGenerator::with_max_len(1);
        assert_eq!(names.generate("abc"), "a");
        assert_eq!(names.generate("abc"), "1");
        assert_eq!(names.generate("a"), "2");

        let mut names = NameGenerator::with_max_len(2);
        assert_eq!(names.generate("ab"), "ab");
        assert_eq!(names.generate("ab"), "1");
    }

    #[test]
    fn test_reserved_names_collide() {
        let mut names = NameGenerator::new();
        names.reserve("Sheet1");
        assert!(names.contains("SHEET1"));
        assert_eq!(names.generate("sheet1"), "sheet1 2");
        assert_eq!(names.len(), 2);
    }

    proptest! {
        #[test]
        fn generated_names_are_unique(requests in proptest::collection::vec("[a-cA-C:/ ]{0,40}", 1..60)) {
            let mut names = NameGenerator::new();
            let mut seen = std::collections::HashSet::new();
            for request in &requests {
                let name = names.generate(request);
                prop_assert!(name.chars().count() <= MAX_NAME_LEN);
                prop_assert!(seen.insert(name.to_lowercase()), "duplicate name {}", name);
            }
        }
    }
}
