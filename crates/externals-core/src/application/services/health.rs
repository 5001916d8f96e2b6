//! Health Check Service - aggregate named probes into one report.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::{application::ports::HealthCheck, domain::HealthStatus};

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    #[serde(flatten)]
    pub status: HealthStatus,
}

/// Aggregated report; `status` is the worst individual status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: Vec<CheckResult>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }
}

/// Runs every registered check.
#[derive(Default)]
pub struct HealthCheckService {
    checks: Vec<Box<dyn HealthCheck>>,
}

impl HealthCheckService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check; checks run in registration order.
    pub fn with_check(mut self, check: Box<dyn HealthCheck>) -> Self {
        self.checks.push(check);
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    #[instrument(skip_all, fields(checks = self.checks.len()))]
    pub fn run(&self) -> HealthReport {
        let checks: Vec<CheckResult> = self
            .checks
            .iter()
            .map(|check| {
                let status = check.check();
                debug!(check = check.name(), %status, "Health check finished");
                CheckResult {
                    name: check.name().to_string(),
                    status,
                }
            })
            .collect();

        let status = checks
            .iter()
            .fold(HealthStatus::Healthy, |acc, r| acc.worst(r.status.clone()));

        HealthReport { status, checks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, HealthStatus);

    impl HealthCheck for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn check(&self) -> HealthStatus {
            self.1.clone()
        }
    }

    #[test]
    fn empty_service_is_healthy() {
        let report = HealthCheckService::new().run();
        assert!(report.is_healthy());
        assert!(report.checks.is_empty());
    }

    #[test]
    fn worst_status_wins() {
        let service = HealthCheckService::new()
            .with_check(Box::new(Fixed("db", HealthStatus::Healthy)))
            .with_check(Box::new(Fixed("disk", HealthStatus::Degraded("80% full".into()))))
            .with_check(Box::new(Fixed("queue", HealthStatus::Healthy)));

        let report = service.run();

        assert_eq!(report.status, HealthStatus::Degraded("80% full".into()));
        assert_eq!(report.checks.len(), 3);
        assert_eq!(report.checks[1].name, "disk");
    }

    #[test]
    fn unhealthy_beats_degraded() {
        let service = HealthCheckService::new()
            .with_check(Box::new(Fixed("a", HealthStatus::Unhealthy("down".into()))))
            .with_check(Box::new(Fixed("b", HealthStatus::Degraded("slow".into()))));

        assert_eq!(service.run().status, HealthStatus::Unhealthy("down".into()));
    }

    #[test]
    fn report_serializes_flat_results() {
        let service = HealthCheckService::new()
            .with_check(Box::new(Fixed("disk", HealthStatus::Unhealthy("missing".into()))));

        let json = serde_json::to_value(service.run()).unwrap();

        assert_eq!(json["status"]["status"], "unhealthy");
        assert_eq!(json["checks"][0]["name"], "disk");
        assert_eq!(json["checks"][0]["reason"], "missing");
    }
}
