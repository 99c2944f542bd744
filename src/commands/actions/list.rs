//! List command handler.
//!
//! Lists the active coordinators on the network with their active servers.
//! Disabled coordinators and coordinators whose network channel is down are
//! left out, as are inactive servers; `deprovision` is the place to reach
//! those.

use log::{debug, error};

use crate::commands::report::{format_coordinator_list, format_fleet_unreachable};
use crate::fleet::{Coordinator, FleetService};

/// Lists active coordinators and their active servers.
pub async fn handle_list<F: FleetService>(fleet: &F) -> String {
    debug!("handling list command");

    let coordinators = match fleet.coordinators().await {
        Ok(coordinators) => coordinators,
        Err(error) => {
            error!("failed to fetch coordinators: {:#}", error);
            return format_fleet_unreachable();
        }
    };

    let active: Vec<Coordinator> = coordinators
        .into_iter()
        .filter(|coord| coord.enabled && coord.channel_active)
        .collect();

    format_coordinator_list(&active)
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;
    use crate::fleet::{MockFleetService, PackageInfo, Server};

    fn create_server(uuid: &str, name: &str, active: bool) -> Server {
        Server {
            uuid: uuid.to_string(),
            name: Some(name.to_string()),
            active,
            package: PackageInfo {
                id: "lobby".to_string(),
                version: "1.0".to_string(),
            },
            properties: HashMap::new(),
        }
    }

    fn create_coordinator(
        uuid: &str,
        name: &str,
        enabled: bool,
        channel_active: bool,
        servers: Vec<Server>,
    ) -> Coordinator {
        Coordinator {
            uuid: uuid.to_string(),
            name: Some(name.to_string()),
            enabled,
            channel_active,
            servers,
            resources: BTreeMap::new(),
            available_resources: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_handle_list_filters_inactive_coordinators_and_servers() {
        let mut fleet = MockFleetService::new();
        fleet.expect_coordinators().times(1).returning(|| {
            Ok(vec![
                create_coordinator(
                    "c1",
                    "alpha",
                    true,
                    true,
                    vec![
                        create_server("s1", "lobby-1", true),
                        create_server("s2", "lobby-2", false),
                    ],
                ),
                create_coordinator("c2", "beta", false, true, vec![]),
                create_coordinator("c3", "gamma", true, false, vec![]),
            ])
        });

        let result = handle_list(&fleet).await;

        assert!(result.contains("Coordinator alpha"));
        assert!(result.contains("lobby-1"));
        assert!(!result.contains("lobby-2"));
        assert!(!result.contains("beta"));
        assert!(!result.contains("gamma"));
    }

    #[tokio::test]
    async fn test_handle_list_no_active_coordinators() {
        let mut fleet = MockFleetService::new();
        fleet
            .expect_coordinators()
            .times(1)
            .returning(|| Ok(vec![create_coordinator("c1", "alpha", false, false, vec![])]));

        let result = handle_list(&fleet).await;

        assert_eq!(result, "There are no active coordinators for me to list!");
    }

    #[tokio::test]
    async fn test_handle_list_fleet_unreachable() {
        let mut fleet = MockFleetService::new();
        fleet
            .expect_coordinators()
            .times(1)
            .returning(|| Err(anyhow::anyhow!("connection refused")));

        let result = handle_list(&fleet).await;

        assert!(result.contains("couldn't reach the network coordinator"));
    }
}
