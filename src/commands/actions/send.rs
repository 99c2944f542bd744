//! Send command handler.
//!
//! Delivers one line of console input to every server matching the patterns.
//! Resolution skips the active-server filter so input can reach a server that
//! is mid-shutdown, and each delivery is reported individually.

use log::{debug, error};

use crate::commands::report::{
    OperationReport, format_fleet_unreachable, format_invalid_pattern, format_no_targets,
    format_send_line,
};
use crate::fleet::FleetService;
use crate::fleet::resolver::{compile_fragment, resolve_compiled};

/// Sends console input to every server matching the patterns.
pub async fn handle_send<F: FleetService>(
    fleet: &F,
    coordinator_fragment: &str,
    server_fragment: &str,
    input: &str,
) -> String {
    debug!(
        "handling send command for '{}' / '{}'",
        coordinator_fragment, server_fragment
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
        return format_no_targets("send input to");
    }

    let mut report = OperationReport::new();
    for entry in &targets {
        for server in &entry.servers {
            let accepted = match fleet.send_input(&entry.coordinator, server, input).await {
                Ok(accepted) => accepted,
                Err(error) => {
                    error!(
                        "send input to {} on {} failed: {:#}",
                        server, entry.coordinator, error
                    );
                    false
                }
            };

            report.push(format_send_line(server, accepted));
        }
    }

    report.complete("Send operation complete!")
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
    async fn test_handle_send_reports_each_delivery() {
        let mut fleet = MockFleetService::new();
        fleet.expect_coordinators().times(1).returning(|| {
            Ok(vec![create_coordinator(
                "c1",
                vec![create_server("s1", true), create_server("s2", true)],
            )])
        });
        fleet
            .expect_send_input()
            .with(eq("c1"), eq("s1"), eq("say hello\n"))
            .times(1)
            .returning(|_, _, _| Ok(true));
        fleet
            .expect_send_input()
            .with(eq("c1"), eq("s2"), eq("say hello\n"))
            .times(1)
            .returning(|_, _, _| Ok(false));

        let result = handle_send(&fleet, ".*", ".*", "say hello\n").await;

        assert_eq!(
            result,
            "Sent input to server s1\n\
             Unable to send input to server s2\n\
             Send operation complete!",
        );
    }

    #[tokio::test]
    async fn test_handle_send_no_targets() {
        let mut fleet = MockFleetService::new();
        fleet
            .expect_coordinators()
            .times(1)
            .returning(|| Ok(vec![create_coordinator("c1", vec![])]));

        let result = handle_send(&fleet, ".*", ".*", "stop\n").await;

        assert_eq!(
            result,
            "I couldn't find any servers to send input to matching those patterns.",
        );
    }

    #[tokio::test]
    async fn test_handle_send_invalid_pattern() {
        let fleet = MockFleetService::new();

        let result = handle_send(&fleet, ".*", "[oops", "stop\n").await;

        assert_eq!(result, "Sorry, '[oops' is not a valid regex pattern.");
    }
}
