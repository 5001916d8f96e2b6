//! Unique Value Generator - pre-persist hook.
//!
//! Fills an entity's generated property with a random value that no stored
//! row already holds:
//! 1. Skip entities without the capability or with generators disabled
//! 2. Draw a candidate (plus check digit when requested)
//! 3. Ask the repository whether the candidate is taken
//! 4. Retry up to [`MAX_ATTEMPTS`] times, then fail
//!
//! No locking or reservation happens here. A race between the count query
//! and the insert surfaces as a storage-level constraint violation.

use tracing::{debug, instrument, trace};

use crate::{
    application::{
        ApplicationError,
        ports::{
            CheckDigitCalculator, PrePersistListener, RandomStringGenerator, Translator,
            UniqueValueRepository,
        },
    },
    domain::{CharacterSet, Entity, GenerationSettings},
    error::ExternalsResult,
};

/// Upper bound on candidates drawn for one entity.
pub const MAX_ATTEMPTS: u32 = 100;

/// Translation key of the exhaustion message.
pub const NOT_GENERATED_KEY: &str = "unique_value.not_generated";

/// Generates repository-unique values for entities that opt in.
pub struct UniqueValueGenerator {
    random: Box<dyn RandomStringGenerator>,
    check_digit: Box<dyn CheckDigitCalculator>,
    translator: Box<dyn Translator>,
}

impl UniqueValueGenerator {
    /// Create a generator with the given adapters.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use externals_core::application::UniqueValueGenerator;
    ///
    /// let generator = UniqueValueGenerator::new(
    ///     random,      // impl RandomStringGenerator
    ///     check_digit, // impl CheckDigitCalculator
    ///     translator,  // impl Translator
    /// );
    /// ```
    pub fn new(
        random: Box<dyn RandomStringGenerator>,
        check_digit: Box<dyn CheckDigitCalculator>,
        translator: Box<dyn Translator>,
    ) -> Self {
        Self {
            random,
            check_digit,
            translator,
        }
    }

    /// Find a value for `settings` that `repository` does not hold yet.
    #[instrument(
        skip_all,
        fields(
            entity = %entity_name,
            property = %settings.property(),
            length = settings.length(),
            check_digit = settings.has_check_digit()
        )
    )]
    pub fn generate(
        &self,
        settings: &GenerationSettings,
        entity_name: &str,
        repository: &dyn UniqueValueRepository,
    ) -> ExternalsResult<String> {
        for attempt in 1..=MAX_ATTEMPTS {
            let candidate = self.candidate(settings)?;
            let existing = repository.count(entity_name, settings.property(), &candidate)?;

            if existing == 0 {
                debug!(attempt, "Unique value found");
                return Ok(candidate);
            }

            trace!(attempt, existing, "Candidate already taken");
        }

        debug!(attempts = MAX_ATTEMPTS, "Attempts exhausted");

        Err(ApplicationError::UniqueValueNotGenerated {
            message: self.translator.translate(NOT_GENERATED_KEY),
            attempts: MAX_ATTEMPTS,
        }
        .into())
    }

    /// One candidate: random portion, then the check digit if required.
    fn candidate(&self, settings: &GenerationSettings) -> ExternalsResult<String> {
        let mut value = self
            .random
            .random_string(settings.random_length(), CharacterSet::UNIQUE_VALUE);

        if settings.has_check_digit() {
            let check = self.check_digit.calculate(&value)?;
            value.push(check);
        }

        Ok(value)
    }
}

impl PrePersistListener for UniqueValueGenerator {
    #[instrument(skip_all)]
    fn pre_persist(
        &self,
        entity: &mut dyn Entity,
        repository: &dyn UniqueValueRepository,
    ) -> ExternalsResult<()> {
        let entity_name = entity.entity_name().to_owned();

        let Some(target) = entity.unique_value_target() else {
            trace!(entity = %entity_name, "No unique value capability");
            return Ok(());
        };

        if !target.generators_enabled() {
            debug!(entity = %entity_name, "Generators disabled");
            return Ok(());
        }

        let settings = GenerationSettings::from_target(&*target)?;
        let value = self.generate(&settings, &entity_name, repository)?;

        target.set_generated_value(value.clone());

        if let Some(callback) = target.generated_callback() {
            callback.on_generated(&value);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::application::ports::{
        MockCheckDigitCalculator, MockRandomStringGenerator, MockTranslator,
        MockUniqueValueRepository,
    };
    use crate::domain::{DomainError, LuhnModN, OnValueGenerated, UniqueValueTarget};
    use crate::error::ExternalsError;

    // ------------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------------

    #[derive(Default)]
    struct Voucher {
        code: Option<String>,
        disabled: bool,
        length: usize,
        check_digit: bool,
        with_callback: bool,
        callback_values: Vec<String>,
        override_with: Option<String>,
    }

    impl Voucher {
        fn new(length: usize, check_digit: bool) -> Self {
            Self {
                length,
                check_digit,
                ..Self::default()
            }
        }
    }

    impl Entity for Voucher {
        fn entity_name(&self) -> &str {
            "voucher"
        }

        fn unique_value_target(&mut self) -> Option<&mut dyn UniqueValueTarget> {
            Some(self)
        }
    }

    impl UniqueValueTarget for Voucher {
        fn generators_enabled(&self) -> bool {
            !self.disabled
        }

        fn generated_property(&self) -> &str {
            "code"
        }

        fn generated_property_length(&self) -> usize {
            self.length
        }

        fn has_check_digit(&self) -> bool {
            self.check_digit
        }

        fn set_generated_value(&mut self, value: String) {
            self.code = Some(value);
        }

        fn generated_value(&self) -> Option<&str> {
            self.code.as_deref()
        }

        fn generated_callback(&mut self) -> Option<&mut dyn OnValueGenerated> {
            if self.with_callback { Some(self) } else { None }
        }
    }

    impl OnValueGenerated for Voucher {
        fn on_generated(&mut self, value: &str) {
            self.callback_values.push(value.to_owned());
            if let Some(replacement) = self.override_with.take() {
                self.code = Some(replacement);
            }
        }
    }

    struct Note;

    impl Entity for Note {
        fn entity_name(&self) -> &str {
            "note"
        }
    }

    /// Real Luhn calculator so check-digit assertions are meaningful.
    struct Luhn(LuhnModN);

    impl Luhn {
        fn new() -> Self {
            Self(LuhnModN::new(CharacterSet::UNIQUE_VALUE.alphabet()).unwrap())
        }
    }

    impl CheckDigitCalculator for Luhn {
        fn calculate(&self, value: &str) -> ExternalsResult<char> {
            Ok(self.0.check_character(value)?)
        }

        fn verify(&self, value: &str) -> ExternalsResult<bool> {
            Ok(self.0.is_valid(value)?)
        }
    }

    fn generator(
        random: MockRandomStringGenerator,
        check_digit: impl CheckDigitCalculator + 'static,
        translator: MockTranslator,
    ) -> UniqueValueGenerator {
        UniqueValueGenerator::new(Box::new(random), Box::new(check_digit), Box::new(translator))
    }

    /// Random generator that walks a fixed list of values.
    fn scripted_random(values: &[&str]) -> (MockRandomStringGenerator, Arc<AtomicUsize>) {
        let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut random = MockRandomStringGenerator::new();
        random.expect_random_string().returning(move |_, _| {
            let i = counter.fetch_add(1, Ordering::SeqCst);
            values[i % values.len()].clone()
        });

        (random, calls)
    }

    // ------------------------------------------------------------------------
    // Skips
    // ------------------------------------------------------------------------

    #[test]
    fn entity_without_capability_is_skipped() {
        let service = generator(
            MockRandomStringGenerator::new(),
            MockCheckDigitCalculator::new(),
            MockTranslator::new(),
        );
        let repository = MockUniqueValueRepository::new();

        assert!(service.pre_persist(&mut Note, &repository).is_ok());
    }

    #[test]
    fn disabled_generators_make_no_calls_and_leave_entity_untouched() {
        let service = generator(
            MockRandomStringGenerator::new(),
            MockCheckDigitCalculator::new(),
            MockTranslator::new(),
        );
        let repository = MockUniqueValueRepository::new();
        let mut voucher = Voucher {
            disabled: true,
            ..Voucher::new(10, true)
        };

        service.pre_persist(&mut voucher, &repository).unwrap();

        assert_eq!(voucher.code, None);
        assert!(voucher.callback_values.is_empty());
    }

    // ------------------------------------------------------------------------
    // Success paths
    // ------------------------------------------------------------------------

    #[test]
    fn first_free_candidate_is_assigned_after_one_draw() {
        let mut random = MockRandomStringGenerator::new();
        random
            .expect_random_string()
            .withf(|length, charset| *length == 8 && *charset == CharacterSet::UNIQUE_VALUE)
            .times(1)
            .return_const("ABCDEFGH".to_string());

        let mut repository = MockUniqueValueRepository::new();
        repository
            .expect_count()
            .withf(|entity, property, value| {
                entity == "voucher" && property == "code" && value == "ABCDEFGH"
            })
            .times(1)
            .returning(|_, _, _| Ok(0));

        let service = generator(random, MockCheckDigitCalculator::new(), MockTranslator::new());
        let mut voucher = Voucher::new(8, false);

        service.pre_persist(&mut voucher, &repository).unwrap();

        assert_eq!(voucher.code.as_deref(), Some("ABCDEFGH"));
    }

    #[test]
    fn check_digit_takes_the_last_position() {
        let mut random = MockRandomStringGenerator::new();
        random
            .expect_random_string()
            .withf(|length, _| *length == 9)
            .times(1)
            .return_const("QWERTYUPA".to_string());

        let mut repository = MockUniqueValueRepository::new();
        repository.expect_count().times(1).returning(|_, _, _| Ok(0));

        let luhn = Luhn::new();
        let expected = luhn.calculate("QWERTYUPA").unwrap();
        let service = generator(random, luhn, MockTranslator::new());
        let mut voucher = Voucher::new(10, true);

        service.pre_persist(&mut voucher, &repository).unwrap();

        let code = voucher.code.unwrap();
        assert_eq!(code.len(), 10);
        assert_eq!(&code[..9], "QWERTYUPA");
        assert_eq!(code.chars().last(), Some(expected));
        assert!(Luhn::new().verify(&code).unwrap());
    }

    #[test]
    fn collisions_are_retried_until_a_free_value_appears() {
        let (random, calls) = scripted_random(&["TAKEN111", "TAKEN222", "FREEVALU"]);

        let mut repository = MockUniqueValueRepository::new();
        repository
            .expect_count()
            .times(3)
            .returning(|_, _, value| Ok(if value.starts_with("TAKEN") { 1 } else { 0 }));

        let service = generator(random, MockCheckDigitCalculator::new(), MockTranslator::new());
        let mut voucher = Voucher::new(8, false);

        service.pre_persist(&mut voucher, &repository).unwrap();

        assert_eq!(voucher.code.as_deref(), Some("FREEVALU"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn callback_runs_once_with_the_generated_value() {
        let mut random = MockRandomStringGenerator::new();
        random
            .expect_random_string()
            .times(1)
            .return_const("HJKMNPQR".to_string());

        let mut repository = MockUniqueValueRepository::new();
        repository.expect_count().times(1).returning(|_, _, _| Ok(0));

        let service = generator(random, MockCheckDigitCalculator::new(), MockTranslator::new());
        let mut voucher = Voucher {
            with_callback: true,
            ..Voucher::new(8, false)
        };

        service.pre_persist(&mut voucher, &repository).unwrap();

        assert_eq!(voucher.callback_values, vec!["HJKMNPQR".to_string()]);
        assert_eq!(voucher.code.as_deref(), Some("HJKMNPQR"));
    }

    #[test]
    fn callback_override_is_not_rechecked() {
        let mut random = MockRandomStringGenerator::new();
        random
            .expect_random_string()
            .times(1)
            .return_const("HJKMNPQR".to_string());

        // A second count would fail the `times(1)` expectation.
        let mut repository = MockUniqueValueRepository::new();
        repository.expect_count().times(1).returning(|_, _, _| Ok(0));

        let service = generator(random, MockCheckDigitCalculator::new(), MockTranslator::new());
        let mut voucher = Voucher {
            with_callback: true,
            override_with: Some("CUSTOM".into()),
            ..Voucher::new(8, false)
        };

        service.pre_persist(&mut voucher, &repository).unwrap();

        assert_eq!(voucher.callback_values.len(), 1);
        assert_eq!(voucher.code.as_deref(), Some("CUSTOM"));
    }

    // ------------------------------------------------------------------------
    // Failures
    // ------------------------------------------------------------------------

    #[test]
    fn exhausts_after_exactly_one_hundred_attempts() {
        let mut random = MockRandomStringGenerator::new();
        random
            .expect_random_string()
            .times(100)
            .return_const("SAMEVALU".to_string());

        let mut repository = MockUniqueValueRepository::new();
        repository
            .expect_count()
            .times(100)
            .returning(|_, _, _| Ok(1));

        let mut translator = MockTranslator::new();
        translator
            .expect_translate()
            .withf(|key| key == NOT_GENERATED_KEY)
            .times(1)
            .return_const("Unable to generate a unique value".to_string());

        let service = generator(random, MockCheckDigitCalculator::new(), translator);
        let mut voucher = Voucher {
            with_callback: true,
            ..Voucher::new(8, false)
        };

        let err = service.pre_persist(&mut voucher, &repository).unwrap_err();

        assert_eq!(
            err,
            ExternalsError::Application(ApplicationError::UniqueValueNotGenerated {
                message: "Unable to generate a unique value".into(),
                attempts: MAX_ATTEMPTS,
            })
        );
        assert!(!err.is_retryable());
        assert_eq!(voucher.code, None);
        assert!(voucher.callback_values.is_empty());
    }

    #[test]
    fn repository_failure_is_not_retried() {
        let mut random = MockRandomStringGenerator::new();
        random
            .expect_random_string()
            .times(1)
            .return_const("ABCDEFGH".to_string());

        let mut repository = MockUniqueValueRepository::new();
        repository.expect_count().times(1).returning(|_, _, _| {
            Err(ApplicationError::RepositoryFailure {
                reason: "connection reset".into(),
            }
            .into())
        });

        let service = generator(random, MockCheckDigitCalculator::new(), MockTranslator::new());
        let mut voucher = Voucher::new(8, false);

        let err = service.pre_persist(&mut voucher, &repository).unwrap_err();

        assert!(matches!(
            err,
            ExternalsError::Application(ApplicationError::RepositoryFailure { .. })
        ));
        assert_eq!(voucher.code, None);
    }

    #[test]
    fn malformed_settings_fail_before_drawing() {
        let service = generator(
            MockRandomStringGenerator::new(),
            MockCheckDigitCalculator::new(),
            MockTranslator::new(),
        );
        let repository = MockUniqueValueRepository::new();
        let mut voucher = Voucher::new(1, true);

        let err = service.pre_persist(&mut voucher, &repository).unwrap_err();

        assert!(matches!(
            err,
            ExternalsError::Domain(DomainError::InvalidSettings { .. })
        ));
    }

    #[test]
    fn generate_honours_total_length_for_every_candidate() {
        let (random, _) = scripted_random(&["ABCDEFGHJ"]);
        let mut repository = MockUniqueValueRepository::new();
        repository.expect_count().returning(|_, _, _| Ok(0));

        let service = generator(random, Luhn::new(), MockTranslator::new());
        let settings = GenerationSettings::new("code", 10, true).unwrap();

        let value = service.generate(&settings, "voucher", &repository).unwrap();

        assert_eq!(value.len(), settings.length());
        assert!(Luhn::new().verify(&value).unwrap());
    }
}
