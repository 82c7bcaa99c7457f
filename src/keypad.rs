//! Phonetic keypad signatures for display names.
//!
//! Maps each character of a name through per-alphabet letter groupings onto
//! the 2–9 telephone keypad digits. Literal decimal digits already present in
//! a name are preserved as themselves; characters with no mapping (spaces,
//! punctuation, unmapped scripts) contribute nothing. Query matching is a
//! contiguous-substring test over the resulting digit string, so multi-script
//! collisions on the same digit need no disambiguation.
use std::collections::HashMap;

/// Letter groupings for one alphabet, in keypad order for digits 2 through 9.
#[derive(Clone, Copy, Debug)]
pub struct AlphabetGroups(pub [&'static str; 8]);

/// Standard 2–9 telephone keypad groupings for the Latin alphabet.
pub const LATIN: AlphabetGroups = AlphabetGroups([
    "abc", "def", "ghi", "jkl", "mno", "pqrs", "tuv", "wxyz",
]);

/// Standard Russian keypad groupings mapped onto the same 2–9 range.
pub const CYRILLIC: AlphabetGroups = AlphabetGroups([
    "абвг", "деёжз", "ийкл", "мноп", "рсту", "фхцч", "шщъы", "ьэюя",
]);

/// Character-to-digit table built from one or more alphabet groupings.
#[derive(Clone, Debug)]
pub struct KeypadIndex {
    table: HashMap<char, char>,
}

impl Default for KeypadIndex {
    fn default() -> Self {
        Self::with_alphabets(&[LATIN, CYRILLIC])
    }
}

impl KeypadIndex {
    /// Build a table from the given alphabets. Later alphabets never shadow
    /// earlier ones; each letter keeps its first assignment.
    pub fn with_alphabets(alphabets: &[AlphabetGroups]) -> Self {
        let mut table = HashMap::new();
        for alphabet in alphabets {
            for (slot, letters) in alphabet.0.iter().enumerate() {
                let digit = char::from(b'2' + slot as u8);
                for ch in letters.chars() {
                    table.entry(ch).or_insert(digit);
                }
            }
        }
        Self { table }
    }

    /// Digit signature of `text`.
    ///
    /// Lower-cases before mapping, so matching is case-insensitive by
    /// construction. Pure and total: unmapped characters are dropped, never
    /// passed through, and ASCII digits map to themselves.
    pub fn signature(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            for lc in ch.to_lowercase() {
                if lc.is_ascii_digit() {
                    out.push(lc);
                } else if let Some(&digit) = self.table.get(&lc) {
                    out.push(digit);
                }
            }
        }
        out
    }

    /// Whether `query_digits` appears as a contiguous substring of the
    /// signature of `name`. An empty query matches every name.
    pub fn matches(&self, name: &str, query_digits: &str) -> bool {
        query_digits.is_empty() || self.signature(name).contains(query_digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_maps_latin_keypad_groups() {
        let idx = KeypadIndex::default();
        assert_eq!(idx.signature("adgjmptw"), "23456789");
        assert_eq!(idx.signature("CRUZ"), "2789");
    }

    #[test]
    fn signature_drops_spaces_and_punctuation() {
        let idx = KeypadIndex::default();
        // b=2 a=2 d=3, d=3 o=6 g=4
        assert_eq!(idx.signature("Bad Dog"), "223364");
        assert_eq!(idx.signature("e-mail!"), "36245");
        assert_eq!(idx.signature("  "), "");
    }

    #[test]
    fn signature_preserves_literal_digits() {
        let idx = KeypadIndex::default();
        assert_eq!(idx.signature("mp3 player"), "673752937");
        assert_eq!(idx.signature("007"), "007");
    }

    #[test]
    fn signature_maps_cyrillic_onto_same_range() {
        let idx = KeypadIndex::default();
        // к=4 а=2 р=6 т=6 ы=8
        assert_eq!(idx.signature("Карты"), "42668");
    }

    #[test]
    fn unmapped_scripts_contribute_nothing() {
        let idx = KeypadIndex::with_alphabets(&[LATIN]);
        assert_eq!(idx.signature("地图maps"), "6277");
    }

    #[test]
    fn matches_is_contiguous_substring_containment() {
        let idx = KeypadIndex::default();
        assert!(idx.matches("Bad Dog", "233"));
        assert!(idx.matches("Bad Dog", "223364"));
        assert!(!idx.matches("Bad Dog", "235"));
        assert!(idx.matches("anything", ""));
    }

    #[test]
    fn custom_alphabet_first_assignment_wins() {
        let clash = AlphabetGroups(["xa", "b", "c", "d", "e", "f", "g", "h"]);
        let idx = KeypadIndex::with_alphabets(&[LATIN, clash]);
        // 'x' keeps the Latin assignment (9), 'a' keeps 2.
        assert_eq!(idx.signature("xa"), "92");
    }
}
