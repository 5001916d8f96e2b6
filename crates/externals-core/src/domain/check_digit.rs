//! Luhn mod N check digits.
//!
//! Works over any alphabet: each character's code point is its index in the
//! alphabet and `N` is the alphabet size. Detects every single-character
//! error and most adjacent transpositions.

use crate::domain::error::DomainError;

/// Luhn mod N calculator bound to one alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuhnModN {
    alphabet: Vec<char>,
}

impl LuhnModN {
    pub fn new(alphabet: Vec<char>) -> Result<Self, DomainError> {
        if alphabet.len() < 2 {
            return Err(DomainError::EmptyCharacterSet(alphabet.iter().collect()));
        }
        Ok(Self { alphabet })
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Compute the check character for `value`.
    pub fn check_character(&self, value: &str) -> Result<char, DomainError> {
        if value.is_empty() {
            return Err(DomainError::EmptyValue);
        }

        let n = self.alphabet.len();
        let sum = self.weighted_sum(value, 2)?;
        let check = (n - sum % n) % n;

        Ok(self.alphabet[check])
    }

    /// True if the last character of `value` is its valid check character.
    pub fn is_valid(&self, value: &str) -> Result<bool, DomainError> {
        if value.chars().count() < 2 {
            return Err(DomainError::EmptyValue);
        }

        let sum = self.weighted_sum(value, 1)?;
        Ok(sum % self.alphabet.len() == 0)
    }

    /// Right-to-left sum with alternating factors, folding doubled values.
    fn weighted_sum(&self, value: &str, first_factor: usize) -> Result<usize, DomainError> {
        let n = self.alphabet.len();
        let mut factor = first_factor;
        let mut sum = 0;

        for c in value.chars().rev() {
            let addend = factor * self.code_point(c)?;
            sum += addend / n + addend % n;
            factor = if factor == 2 { 1 } else { 2 };
        }

        Ok(sum)
    }

    fn code_point(&self, c: char) -> Result<usize, DomainError> {
        self.alphabet
            .iter()
            .position(|&a| a == c)
            .ok_or(DomainError::CharacterNotInAlphabet { character: c })
    }
}
