//! Luhn mod N check-digit adapter.

use externals_core::{
    application::ports::CheckDigitCalculator,
    domain::{CharacterSet, LuhnModN},
    error::ExternalsResult,
};

/// Check digits over a character set's alphabet.
#[derive(Debug, Clone)]
pub struct LuhnCheckDigit {
    inner: LuhnModN,
}

impl LuhnCheckDigit {
    pub fn new(charset: CharacterSet) -> ExternalsResult<Self> {
        Ok(Self {
            inner: LuhnModN::new(charset.alphabet())?,
        })
    }

    /// Calculator over the alphabet unique values are drawn from.
    pub fn for_unique_values() -> ExternalsResult<Self> {
        Self::new(CharacterSet::UNIQUE_VALUE)
    }
}

impl CheckDigitCalculator for LuhnCheckDigit {
    fn calculate(&self, value: &str) -> ExternalsResult<char> {
        Ok(self.inner.check_character(value)?)
    }

    fn verify(&self, value: &str) -> ExternalsResult<bool> {
        Ok(self.inner.is_valid(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use externals_core::{domain::DomainError, error::ExternalsError};

    #[test]
    fn calculated_digit_verifies() {
        let luhn = LuhnCheckDigit::for_unique_values().unwrap();
        let check = luhn.calculate("ZXCVBNM23").unwrap();

        assert!(luhn.verify(&format!("ZXCVBNM23{check}")).unwrap());
    }

    #[test]
    fn decimal_alphabet_is_plain_luhn() {
        let luhn = LuhnCheckDigit::new(CharacterSet::DIGITS).unwrap();
        assert_eq!(luhn.calculate("7992739871").unwrap(), '3');
    }

    #[test]
    fn foreign_characters_are_domain_errors() {
        let luhn = LuhnCheckDigit::for_unique_values().unwrap();

        assert_eq!(
            luhn.verify("ABCO"),
            Err(ExternalsError::Domain(DomainError::CharacterNotInAlphabet {
                character: 'O'
            }))
        );
    }

    #[test]
    fn empty_charset_is_rejected() {
        assert!(LuhnCheckDigit::new(CharacterSet::NO_SIMILAR).is_err());
    }
}
