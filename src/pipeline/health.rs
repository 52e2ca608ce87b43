// src/pipeline/health.rs

use crate::services::{HealthReport, HealthService, Status};

/// Probe the upstream APIs and log each component.
pub async fn run_health(health: &HealthService) -> HealthReport {
    let report = health.check().await;

    for (name, component) in &report.components {
        match component.status {
            Status::Up => log::info!("{}: UP ({})", name, component.message),
            Status::Down => log::error!("{}: DOWN ({})", name, component.message),
        }
    }

    report
}
