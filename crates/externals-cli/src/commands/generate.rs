//! `externals generate`: issue unique codes.
//!
//! Each code is a fresh entity persisted through an [`InMemoryEntityStore`]
//! whose pre-persist hook is the [`UniqueValueGenerator`]. The store is seeded
//! from the registry file first, so codes stay unique across runs.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use indicatif::ProgressBar;
use tracing::{debug, info, instrument};

use externals_adapters::{
    CatalogTranslator, CodeRegistry, InMemoryEntityStore, IssuedCode, LocalFilesystem,
    LuhnCheckDigit, SeededGenerator, ThreadRngGenerator,
};
use externals_core::{
    application::{
        UniqueValueGenerator,
        ports::{Filesystem, RandomStringGenerator},
    },
    domain::{Entity, GenerationSettings, OnValueGenerated, UniqueValueTarget},
    error::ExternalsError,
};

use crate::{
    cli::{CodeFormat, GenerateArgs, GlobalArgs, OutputFormat},
    config::{AppConfig, GeneratorConfig},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// One code to issue, shaped as a persistable entity.
#[derive(Debug)]
struct CodeEntity {
    entity: String,
    settings: GenerationSettings,
    value: Option<String>,
    issued_at: Option<DateTime<Utc>>,
}

impl CodeEntity {
    fn new(entity: &str, settings: &GenerationSettings) -> Self {
        Self {
            entity: entity.to_string(),
            settings: settings.clone(),
            value: None,
            issued_at: None,
        }
    }

    fn into_issued(self) -> Option<IssuedCode> {
        let value = self.value?;
        Some(IssuedCode {
            entity: self.entity,
            property: self.settings.property().to_string(),
            value,
            issued_at: self.issued_at.unwrap_or_else(Utc::now),
        })
    }
}

impl Entity for CodeEntity {
    fn entity_name(&self) -> &str {
        &self.entity
    }

    fn unique_value_target(&mut self) -> Option<&mut dyn UniqueValueTarget> {
        Some(self)
    }
}

impl UniqueValueTarget for CodeEntity {
    fn generated_property(&self) -> &str {
        self.settings.property()
    }

    fn generated_property_length(&self) -> usize {
        self.settings.length()
    }

    fn has_check_digit(&self) -> bool {
        self.settings.has_check_digit()
    }

    fn set_generated_value(&mut self, value: String) {
        self.value = Some(value);
    }

    fn generated_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn generated_callback(&mut self) -> Option<&mut dyn OnValueGenerated> {
        Some(self)
    }
}

impl OnValueGenerated for CodeEntity {
    fn on_generated(&mut self, value: &str) {
        self.issued_at = Some(Utc::now());
        debug!(%value, "Code issued");
    }
}

/// Issue codes as requested by flags, falling back to configuration.
#[instrument(skip_all, fields(count = args.count))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (entity, settings) = resolve_request(&args, &config.generator)?;
    let format = resolve_format(args.format, global.output_format, &config.output.format);

    let random: Box<dyn RandomStringGenerator> = match args.seed {
        Some(seed) => Box::new(SeededGenerator::new(seed)),
        None => Box::new(ThreadRngGenerator::new()),
    };
    let generator = UniqueValueGenerator::new(
        random,
        Box::new(LuhnCheckDigit::for_unique_values()?),
        Box::new(load_translator(&config)?),
    );
    let store = InMemoryEntityStore::new().with_listener(generator);

    let registry_path = args.registry.unwrap_or_else(|| config.registry_path());
    if registry_path.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("registry path '{}' is a directory", registry_path.display()),
            source: None,
        });
    }
    let registry = CodeRegistry::new(Box::new(LocalFilesystem::new()), registry_path);
    let known = registry.load_into(&store)?;
    info!(known, path = %registry.path().display(), "Registry loaded");

    let bar = output.progress(u64::from(args.count));
    let issued = issue_codes(&store, &registry, &entity, &settings, args.count, &bar);
    bar.finish_and_clear();
    let issued = issued?;

    info!(issued = issued.len(), "Codes issued");
    render(&output, format, &entity, &settings, &issued)
}

/// Entity name and validated settings for this run.
fn resolve_request(
    args: &GenerateArgs,
    defaults: &GeneratorConfig,
) -> CliResult<(String, GenerationSettings)> {
    let entity = args
        .entity
        .clone()
        .unwrap_or_else(|| defaults.entity.clone());
    let property = args
        .property
        .clone()
        .unwrap_or_else(|| defaults.property.clone());
    let length = args.length.unwrap_or(defaults.length);
    let check_digit = args
        .check_digit_override()
        .unwrap_or(defaults.check_digit);

    let settings =
        GenerationSettings::new(property, length, check_digit).map_err(ExternalsError::from)?;
    Ok((entity, settings))
}

/// `--format`, else JSON when the global format is JSON, else configuration.
fn resolve_format(
    explicit: Option<CodeFormat>,
    global: OutputFormat,
    configured: &str,
) -> CodeFormat {
    explicit
        .or_else(|| (global == OutputFormat::Json).then_some(CodeFormat::Json))
        .or_else(|| CodeFormat::from_str(configured, true).ok())
        .unwrap_or(CodeFormat::Table)
}

fn load_translator(config: &AppConfig) -> CliResult<CatalogTranslator> {
    let translator = CatalogTranslator::with_defaults();

    match &config.translations.catalog {
        Some(path) => {
            let source = LocalFilesystem::new().read_file(path)?;
            debug!(path = %path.display(), "Loading translation catalog");
            Ok(translator.merge_toml(&source)?)
        }
        None => Ok(translator),
    }
}

/// Persist `count` entities; codes issued before a failure are still recorded.
fn issue_codes(
    store: &InMemoryEntityStore,
    registry: &CodeRegistry,
    entity: &str,
    settings: &GenerationSettings,
    count: u32,
    bar: &ProgressBar,
) -> CliResult<Vec<IssuedCode>> {
    let mut issued = Vec::new();

    for _ in 0..count {
        let mut code = CodeEntity::new(entity, settings);

        if let Err(e) = store.persist(&mut code) {
            registry.record(&issued)?;
            return Err(e.into());
        }

        let Some(entry) = code.into_issued() else {
            registry.record(&issued)?;
            return Err(ExternalsError::Internal {
                message: "persisted entity carries no generated value".into(),
            }
            .into());
        };

        issued.push(entry);
        bar.inc(1);
    }

    registry.record(&issued)?;
    Ok(issued)
}

fn render(
    output: &OutputManager,
    format: CodeFormat,
    entity: &str,
    settings: &GenerationSettings,
    issued: &[IssuedCode],
) -> CliResult<()> {
    match format {
        CodeFormat::Table => {
            output.header(&format!(
                "Issued {} code(s) for {}.{}:",
                issued.len(),
                entity,
                settings.property()
            ))?;
            let width = issued.len().to_string().len();
            for (index, code) in issued.iter().enumerate() {
                output.data(&format!("  {:>width$}  {}", index + 1, code.value))?;
            }
        }
        CodeFormat::List => {
            for code in issued {
                output.data(&code.value)?;
            }
        }
        CodeFormat::Json => output.json(issued)?,
    }

    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use externals_adapters::MemoryFilesystem;
    use externals_core::application::{MAX_ATTEMPTS, ports::CheckDigitCalculator};

    fn args(extra: &[&str]) -> GenerateArgs {
        use crate::cli::{Cli, Commands};
        use clap::Parser;

        let mut argv = vec!["externals", "generate"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Generate(args) => args,
            _ => unreachable!(),
        }
    }

    fn seeded_store(seed: u64) -> InMemoryEntityStore {
        let generator = UniqueValueGenerator::new(
            Box::new(SeededGenerator::new(seed)),
            Box::new(LuhnCheckDigit::for_unique_values().unwrap()),
            Box::new(CatalogTranslator::with_defaults()),
        );
        InMemoryEntityStore::new().with_listener(generator)
    }

    #[test]
    fn flags_override_config() {
        let (entity, settings) = resolve_request(
            &args(&["--entity", "ticket", "--length", "6", "--no-check-digit"]),
            &GeneratorConfig::default(),
        )
        .unwrap();

        assert_eq!(entity, "ticket");
        assert_eq!(settings.property(), "value");
        assert_eq!(settings.length(), 6);
        assert!(!settings.has_check_digit());
    }

    #[test]
    fn config_fills_missing_flags() {
        let (entity, settings) =
            resolve_request(&args(&[]), &GeneratorConfig::default()).unwrap();

        assert_eq!(entity, "code");
        assert_eq!(settings.length(), 10);
        assert!(settings.has_check_digit());
    }

    #[test]
    fn length_one_with_check_digit_is_rejected() {
        let err = resolve_request(&args(&["--length", "1"]), &GeneratorConfig::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn format_resolution_order() {
        assert_eq!(
            resolve_format(Some(CodeFormat::List), OutputFormat::Json, "table"),
            CodeFormat::List
        );
        assert_eq!(
            resolve_format(None, OutputFormat::Json, "table"),
            CodeFormat::Json
        );
        assert_eq!(
            resolve_format(None, OutputFormat::Plain, "LIST"),
            CodeFormat::List
        );
        assert_eq!(
            resolve_format(None, OutputFormat::Plain, "bogus"),
            CodeFormat::Table
        );
    }

    #[test]
    fn issued_codes_are_unique_checked_and_recorded() {
        let fs = MemoryFilesystem::new();
        let registry = CodeRegistry::new(Box::new(fs.clone()), "codes.jsonl");
        let store = seeded_store(42);
        let settings = GenerationSettings::new("code", 10, true).unwrap();

        let issued = issue_codes(
            &store,
            &registry,
            "voucher",
            &settings,
            50,
            &ProgressBar::hidden(),
        )
        .unwrap();

        let luhn = LuhnCheckDigit::for_unique_values().unwrap();
        let distinct: HashSet<_> = issued.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(distinct.len(), 50);
        assert!(issued.iter().all(|c| c.value.len() == 10));
        assert!(issued.iter().all(|c| luhn.verify(&c.value).unwrap()));
        assert_eq!(registry.load().unwrap().len(), 50);
    }

    #[test]
    fn exhaustion_keeps_codes_issued_so_far() {
        let fs = MemoryFilesystem::new();
        let registry = CodeRegistry::new(Box::new(fs), "codes.jsonl");
        let store = seeded_store(1);
        // 31 possible one-character values.
        let settings = GenerationSettings::new("code", 1, false).unwrap();

        let err = issue_codes(
            &store,
            &registry,
            "voucher",
            &settings,
            40,
            &ProgressBar::hidden(),
        )
        .unwrap_err();

        assert!(err.to_string().contains(&format!("({MAX_ATTEMPTS} attempts)")));
        let recorded = registry.load().unwrap().len();
        assert!((20..=31).contains(&recorded));
        assert_eq!(store.len(), recorded);
    }

    #[test]
    fn callback_stamps_issue_time() {
        let store = seeded_store(3);
        let settings = GenerationSettings::new("code", 8, false).unwrap();
        let mut code = CodeEntity::new("voucher", &settings);

        store.persist(&mut code).unwrap();

        assert!(code.issued_at.is_some());
        assert_eq!(code.into_issued().unwrap().value.len(), 8);
    }
}
