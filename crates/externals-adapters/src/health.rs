//! Health checks for the code registry.

use std::path::PathBuf;

use tracing::debug;
use uuid::Uuid;

use externals_core::{
    application::ports::{Filesystem, HealthCheck},
    domain::HealthStatus,
};

use crate::registry::CodeRegistry;

/// Checks that the registry directory accepts writes.
///
/// A missing directory is `Degraded`: it is created on the first write.
pub struct FilesystemHealthCheck {
    fs: Box<dyn Filesystem>,
    dir: PathBuf,
}

impl FilesystemHealthCheck {
    pub fn new(fs: Box<dyn Filesystem>, dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dir: dir.into(),
        }
    }
}

impl HealthCheck for FilesystemHealthCheck {
    fn name(&self) -> &str {
        "registry_directory"
    }

    fn check(&self) -> HealthStatus {
        if !self.fs.exists(&self.dir) {
            return HealthStatus::Degraded(format!(
                "{} does not exist yet",
                self.dir.display()
            ));
        }

        let probe = self.dir.join(format!(".externals-probe-{}", Uuid::new_v4()));
        let result = self
            .fs
            .write_file(&probe, "ok")
            .and_then(|_| self.fs.remove(&probe));

        match result {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                debug!(error = %e, "Probe write failed");
                HealthStatus::Unhealthy(e.to_string())
            }
        }
    }
}

/// Checks that every registry entry parses.
pub struct RegistryHealthCheck {
    registry: CodeRegistry,
}

impl RegistryHealthCheck {
    pub fn new(registry: CodeRegistry) -> Self {
        Self { registry }
    }
}

impl HealthCheck for RegistryHealthCheck {
    fn name(&self) -> &str {
        "registry_file"
    }

    fn check(&self) -> HealthStatus {
        match self.registry.load() {
            Ok(codes) if codes.is_empty() => {
                HealthStatus::Degraded("no codes issued yet".to_string())
            }
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}
