//! `externals health`: run registry health checks.
//!
//! Exit code 1 when any check is unhealthy; degraded checks are reported but
//! do not fail the command.

use std::path::{Path, PathBuf};

use tracing::instrument;

use externals_adapters::{CodeRegistry, FilesystemHealthCheck, LocalFilesystem, RegistryHealthCheck};
use externals_core::{
    application::{HealthCheckService, HealthReport},
    domain::HealthStatus,
};

use crate::{
    cli::{HealthArgs, HealthFormat, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: HealthArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let registry_path = args.registry.unwrap_or_else(|| config.registry_path());
    let report = service_for(&registry_path).run();

    if args.format == HealthFormat::Json || output.format() == OutputFormat::Json {
        output.json(&report)?;
    } else {
        render_table(&output, &registry_path, &report)?;
    }

    let failing = failing_checks(&report);
    if failing.is_empty() {
        Ok(())
    } else {
        Err(CliError::Unhealthy { failing })
    }
}

fn service_for(registry_path: &Path) -> HealthCheckService {
    let dir = registry_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    HealthCheckService::new()
        .with_check(Box::new(FilesystemHealthCheck::new(
            Box::new(LocalFilesystem::new()),
            dir,
        )))
        .with_check(Box::new(RegistryHealthCheck::new(CodeRegistry::new(
            Box::new(LocalFilesystem::new()),
            registry_path,
        ))))
}

fn render_table(output: &OutputManager, path: &Path, report: &HealthReport) -> CliResult<()> {
    output.header(&format!("Registry {}", path.display()))?;

    for check in &report.checks {
        let line = format!("{:<20} {}", check.name, check.status);
        match check.status {
            HealthStatus::Healthy => output.success(&line)?,
            HealthStatus::Degraded(_) => output.warning(&line)?,
            HealthStatus::Unhealthy(_) => output.error(&line)?,
        }
    }

    output.print(&format!("Overall: {}", report.status))?;
    Ok(())
}

fn failing_checks(report: &HealthReport) -> Vec<String> {
    report
        .checks
        .iter()
        .filter(|c| matches!(c.status, HealthStatus::Unhealthy(_)))
        .map(|c| c.name.clone())
        .collect()
}
