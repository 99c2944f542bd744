//! Deprovision command handler.
//!
//! Resolves targets without the active-server filter so a wedged, inactive
//! server can still be torn down. Each (coordinator, server) pair is sent its
//! own deprovision request and reported individually; one refusal never stops
//! the rest of the sweep.

use log::{debug, error, info};

use crate::commands::report::{
    OperationReport, format_deprovision_line, format_fleet_unreachable, format_force_note,
    format_invalid_pattern, format_no_targets,
};
use crate::fleet::FleetService;
use crate::fleet::resolver::{compile_fragment, resolve_compiled};

/// Deprovisions every server matching the coordinator and server patterns.
pub async fn handle_deprovision<F: FleetService>(
    fleet: &F,
    coordinator_fragment: &str,
    server_fragment: &str,
    force: bool,
) -> String {
    debug!(
        "handling deprovision command for '{}' / '{}' (force={})",
        coordinator_fragment, server_fragment, force
    );

    let coordinator_pattern = match compile_fragment(coordinator_fragment) {
        Ok(pattern) => pattern,
        Err(_) => return format_invalid_pattern(coordinator_fragment),
    };
    let server_pattern = match compile_fragment(server_fragment) {
        Ok(pattern) => pattern,
        Err(_) => return format_invalid_pattern(server_fragment),
    };

    let coordinators = match fleet.coordinators().await {
        Ok(coordinators) => coordinators,
        Err(error) => {
            error!("failed to fetch coordinators: {:#}", error);
            return format_fleet_unreachable();
        }
    };

    let targets = resolve_compiled(&coordinators, &coordinator_pattern, &server_pattern, false);
    if targets.is_empty() {
        return format_no_targets("deprovision");
    }

    let mut report = OperationReport::new();
    if force {
        report.push(format_force_note());
    }

    for entry in &targets {
        for server in &entry.servers {
            let accepted = match fleet.deprovision(&entry.coordinator, server, force).await {
                Ok(accepted) => accepted,
                Err(error) => {
                    error!(
                        "deprovision request for {} on {} failed: {:#}",
                        server, entry.coordinator, error
                    );
                    false
                }
            };

            if accepted {
                info!("deprovisioned server {} on {}", server, entry.coordinator);
            }
            report.push(format_deprovision_line(&entry.coordinator, server, accepted));
        }
    }

    report.complete("Deprovision operation complete!")
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use mockall::predicate::eq;

    use super::*;
    use crate::fleet::{Coordinator, MockFleetService, PackageInfo, Server};

    fn create_server(uuid: &str, active: bool) -> Server {
        Server {
            uuid: uuid.to_string(),
            name: None,
            active,
            package: PackageInfo {
                id: "lobby".to_string(),
                version: "1.0".to_string(),
            },
            properties: HashMap::new(),
        }
    }

    fn create_coordinator(uuid: &str, servers: Vec<Server>) -> Coordinator {
        Coordinator {
            uuid: uuid.to_string(),
            name: None,
            enabled: true,
            channel_active: true,
            servers,
            resources: BTreeMap::new(),
            available_resources: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_handle_deprovision_reports_each_target() {
        let mut fleet = MockFleetService::new();
        fleet.expect_coordinators().times(1).returning(|| {
            Ok(vec![create_coordinator(
                "c1",
                vec![create_server("s1", true), create_server("s2", true)],
            )])
        });
        fleet
            .expect_deprovision()
            .with(eq("c1"), eq("s1"), eq(false))
            .times(1)
            .returning(|_, _, _| Ok(true));
        fleet
            .expect_deprovision()
            .with(eq("c1"), eq("s2"), eq(false))
            .times(1)
            .returning(|_, _, _| Ok(false));

        let result = handle_deprovision(&fleet, ".*", ".*", false).await;

        assert_eq!(
            result,
            "Deprovisioned server s1 on coordinator c1\n\
             Unable to send deprovision for s2 on coordinator c1\n\
             Deprovision operation complete!",
        );
    }

    #[tokio::test]
    async fn test_handle_deprovision_targets_inactive_servers() {
        let mut fleet = MockFleetService::new();
        fleet.expect_coordinators().times(1).returning(|| {
            Ok(vec![create_coordinator(
                "c1",
                vec![create_server("s1", false)],
            )])
        });
        fleet
            .expect_deprovision()
            .with(eq("c1"), eq("s1"), eq(false))
            .times(1)
            .returning(|_, _, _| Ok(true));

        let result = handle_deprovision(&fleet, ".*", ".*", false).await;

        assert!(result.contains("Deprovisioned server s1"));
    }

    #[tokio::test]
    async fn test_handle_deprovision_force_is_noted_and_forwarded() {
        let mut fleet = MockFleetService::new();
        fleet.expect_coordinators().times(1).returning(|| {
            Ok(vec![create_coordinator("c1", vec![create_server("s1", true)])])
        });
        fleet
            .expect_deprovision()
            .with(eq("c1"), eq("s1"), eq(true))
            .times(1)
            .returning(|_, _, _| Ok(true));

        let result = handle_deprovision(&fleet, ".*", ".*", true).await;

        assert!(result.starts_with("Note: deprovisioning via force\n"));
    }

    #[tokio::test]
    async fn test_handle_deprovision_no_targets() {
        let mut fleet = MockFleetService::new();
        fleet
            .expect_coordinators()
            .times(1)
            .returning(|| Ok(vec![create_coordinator("c1", vec![])]));

        let result = handle_deprovision(&fleet, ".*", ".*", false).await;

        assert_eq!(
            result,
            "I couldn't find any servers to deprovision matching those patterns.",
        );
    }

    #[tokio::test]
    async fn test_handle_deprovision_request_error_counts_as_failure() {
        let mut fleet = MockFleetService::new();
        fleet.expect_coordinators().times(1).returning(|| {
            Ok(vec![create_coordinator(
                "c1",
                vec![create_server("s1", true), create_server("s2", true)],
            )])
        });
        fleet
            .expect_deprovision()
            .with(eq("c1"), eq("s1"), eq(false))
            .times(1)
            .returning(|_, _, _| Err(anyhow::anyhow!("timed out")));
        fleet
            .expect_deprovision()
            .with(eq("c1"), eq("s2"), eq(false))
            .times(1)
            .returning(|_, _, _| Ok(true));

        let result = handle_deprovision(&fleet, ".*", ".*", false).await;

        // The sweep keeps going past a failed request
        assert!(result.contains("Unable to send deprovision for s1 on coordinator c1"));
        assert!(result.contains("Deprovisioned server s2 on coordinator c1"));
        assert!(result.ends_with("Deprovision operation complete!"));
    }

    #[tokio::test]
    async fn test_handle_deprovision_invalid_pattern() {
        let fleet = MockFleetService::new();

        let result = handle_deprovision(&fleet, "[oops", ".*", false).await;

        assert_eq!(result, "Sorry, '[oops' is not a valid regex pattern.");
    }
}
