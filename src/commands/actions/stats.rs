//! Stats command handler.
//!
//! Reports per-coordinator and network-wide resource usage. Only enabled
//! coordinators count; a disabled coordinator's capacity is not really part
//! of the network.

use log::{debug, error};

use crate::commands::report::{format_fleet_unreachable, format_stats};
use crate::fleet::{Coordinator, FleetService};

/// Reports resource statistics for the enabled coordinators.
pub async fn handle_stats<F: FleetService>(fleet: &F) -> String {
    debug!("handling stats command");

    let coordinators = match fleet.coordinators().await {
        Ok(coordinators) => coordinators,
        Err(error) => {
            error!("failed to fetch coordinators: {:#}", error);
            return format_fleet_unreachable();
        }
    };

    let enabled: Vec<Coordinator> = coordinators
        .into_iter()
        .filter(|coord| coord.enabled)
        .collect();

    format_stats(&enabled)
}
