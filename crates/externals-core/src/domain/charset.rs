//! Character sets used for random value generation.
//!
//! A [`CharacterSet`] is a small flag set selecting which character classes
//! make up an alphabet. The alphabet order is stable (uppercase, lowercase,
//! digits) because check-digit code points are derived from it.

use std::fmt;
use std::ops::BitOr;

/// Glyphs that are easily confused when read back by a human.
const SIMILAR: &[char] = &['0', 'O', '1', 'I', 'L', 'l', 'o', 'i'];

/// Flag set selecting the composition of an alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharacterSet(u8);

impl CharacterSet {
    pub const UPPERCASE: Self = Self(0b0001);
    pub const LOWERCASE: Self = Self(0b0010);
    pub const DIGITS: Self = Self(0b0100);
    pub const NO_SIMILAR: Self = Self(0b1000);

    /// The alphabet used for unique values: uppercase letters and digits
    /// without look-alike glyphs.
    pub const UNIQUE_VALUE: Self = Self(0b1101);

    /// True if every flag in `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 & 0b0111 == 0
    }

    /// Ordered characters of this set.
    pub fn alphabet(self) -> Vec<char> {
        let mut chars = Vec::with_capacity(62);
        if self.contains(Self::UPPERCASE) {
            chars.extend('A'..='Z');
        }
        if self.contains(Self::LOWERCASE) {
            chars.extend('a'..='z');
        }
        if self.contains(Self::DIGITS) {
            chars.extend('0'..='9');
        }
        if self.contains(Self::NO_SIMILAR) {
            chars.retain(|c| !SIMILAR.contains(c));
        }
        chars
    }
}

impl BitOr for CharacterSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.contains(Self::UPPERCASE) {
            parts.push("upper");
        }
        if self.contains(Self::LOWERCASE) {
            parts.push("lower");
        }
        if self.contains(Self::DIGITS) {
            parts.push("digits");
        }
        if self.contains(Self::NO_SIMILAR) {
            parts.push("no-similar");
        }
        if parts.is_empty() {
            return write!(f, "empty");
        }
        write!(f, "{}", parts.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_value_set_is_upper_digits_no_similar() {
        assert_eq!(
            CharacterSet::UNIQUE_VALUE,
            CharacterSet::UPPERCASE | CharacterSet::DIGITS | CharacterSet::NO_SIMILAR
        );
    }

    #[test]
    fn unique_value_alphabet_excludes_look_alikes() {
        let alphabet = CharacterSet::UNIQUE_VALUE.alphabet();

        assert_eq!(alphabet.len(), 31);
        for c in ['0', 'O', '1', 'I', 'L'] {
            assert!(!alphabet.contains(&c), "{c} should be excluded");
        }
        assert!(alphabet.iter().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn full_alphanumeric_alphabet() {
        let set = CharacterSet::UPPERCASE | CharacterSet::LOWERCASE | CharacterSet::DIGITS;
        assert_eq!(set.alphabet().len(), 62);
    }

    #[test]
    fn no_similar_alone_is_empty() {
        assert!(CharacterSet::NO_SIMILAR.is_empty());
        assert!(CharacterSet::NO_SIMILAR.alphabet().is_empty());
    }

    #[test]
    fn display_lists_flags() {
        assert_eq!(CharacterSet::UNIQUE_VALUE.to_string(), "upper+digits+no-similar");
        assert_eq!(CharacterSet::default().to_string(), "empty");
    }
}
