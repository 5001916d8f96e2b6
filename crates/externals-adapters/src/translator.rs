//! Message catalog translator.
//!
//! Catalog files are TOML with a single `[messages]` table:
//!
//! ```toml
//! [messages]
//! "unique_value.not_generated" = "Kein eindeutiger Wert gefunden"
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use externals_core::{
    application::{ApplicationError, NOT_GENERATED_KEY, ports::Translator},
    error::ExternalsResult,
};

/// Built-in English messages.
const DEFAULT_MESSAGES: &[(&str, &str)] = &[(
    NOT_GENERATED_KEY,
    "A unique value could not be generated. Please try again.",
)];

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    messages: HashMap<String, String>,
}

/// Key → message lookup with fallback to the key itself.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    messages: HashMap<String, String>,
}

impl CatalogTranslator {
    /// Empty catalog; every key translates to itself.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with the built-in English messages.
    pub fn with_defaults() -> Self {
        Self {
            messages: DEFAULT_MESSAGES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Overlay messages parsed from TOML source.
    pub fn merge_toml(mut self, source: &str) -> ExternalsResult<Self> {
        let file: CatalogFile =
            toml::from_str(source).map_err(|e| ApplicationError::TranslationCatalog {
                reason: e.to_string(),
            })?;

        debug!(messages = file.messages.len(), "Translation catalog merged");
        self.messages.extend(file.messages);
        Ok(self)
    }

    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
