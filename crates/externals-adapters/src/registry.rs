//! Append-only registry of issued codes.
//!
//! Each line is one JSON object:
//! `{"entity":"voucher","property":"code","value":"K7MQ2XH9A","issued_at":"..."}`.
//! Loading the registry into an [`InMemoryEntityStore`] makes uniqueness hold
//! across separate runs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use externals_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ExternalsError, ExternalsResult},
};

use crate::entity_store::InMemoryEntityStore;

/// One issued code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCode {
    pub entity: String,
    pub property: String,
    pub value: String,
    pub issued_at: DateTime<Utc>,
}

impl IssuedCode {
    pub fn new(
        entity: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            entity: entity.into(),
            property: property.into(),
            value: value.into(),
            issued_at: Utc::now(),
        }
    }
}

/// Registry file errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("malformed registry entry on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode registry entry: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<RegistryError> for ExternalsError {
    fn from(err: RegistryError) -> Self {
        ApplicationError::RepositoryFailure {
            reason: err.to_string(),
        }
        .into()
    }
}

/// JSON-lines registry stored through a [`Filesystem`].
pub struct CodeRegistry {
    fs: Box<dyn Filesystem>,
    path: PathBuf,
}

impl CodeRegistry {
    pub fn new(fs: Box<dyn Filesystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry; a missing file is an empty registry.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn load(&self) -> ExternalsResult<Vec<IssuedCode>> {
        if !self.fs.exists(&self.path) {
            debug!("Registry file absent");
            return Ok(Vec::new());
        }

        let content = self.fs.read_file(&self.path)?;
        let mut codes = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let code: IssuedCode =
                serde_json::from_str(line).map_err(|source| RegistryError::Malformed {
                    line: index + 1,
                    source,
                })?;
            codes.push(code);
        }

        debug!(entries = codes.len(), "Registry loaded");
        Ok(codes)
    }

    /// Seed `store` with every entry; returns the number seeded.
    pub fn load_into(&self, store: &InMemoryEntityStore) -> ExternalsResult<usize> {
        let mut seeded = 0;

        for code in self.load()? {
            match store.seed(code.entity, code.property, code.value) {
                Ok(_) => seeded += 1,
                Err(ExternalsError::Application(
                    ApplicationError::UniqueConstraintViolation { value, .. },
                )) => warn!(%value, "Duplicate registry entry skipped"),
                Err(e) => return Err(e),
            }
        }

        Ok(seeded)
    }

    /// Append entries, creating the file and its directory if needed.
    #[instrument(skip_all, fields(path = %self.path.display(), count = codes.len()))]
    pub fn record(&self, codes: &[IssuedCode]) -> ExternalsResult<()> {
        if codes.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.exists(parent) {
                self.fs.create_dir_all(parent)?;
            }
        }

        let mut buffer = String::new();
        for code in codes {
            buffer.push_str(&serde_json::to_string(code).map_err(RegistryError::from)?);
            buffer.push('\n');
        }

        self.fs.append_file(&self.path, &buffer)
    }
}
