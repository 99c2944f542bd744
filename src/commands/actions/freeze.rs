//! Freeze command handler.
//!
//! Freezing marks a server so its files are kept for inspection when it next
//! deprovisions. Targets resolve without the active-server filter, matching
//! the deprovision sweep the freeze usually precedes.

use log::{debug, error};

use crate::commands::report::{
    OperationReport, format_fleet_unreachable, format_freeze_line, format_invalid_pattern,
    format_no_targets,
};
use crate::fleet::FleetService;
use crate::fleet::resolver::{compile_fragment, resolve_compiled};

/// Freezes every server matching the patterns.
pub async fn handle_freeze<F: FleetService>(
    fleet: &F,
    coordinator_fragment: &str,
    server_fragment: &str,
) -> String {
    debug!(
        "handling freeze command for '{}' / '{}'",
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
        return format_no_targets("freeze");
    }

    let mut report = OperationReport::new();
    for entry in &targets {
        for server in &entry.servers {
            let accepted = match fleet.freeze_server(&entry.coordinator, server).await {
                Ok(accepted) => accepted,
                Err(error) => {
                    error!(
                        "freeze request for {} on {} failed: {:#}",
                        server, entry.coordinator, error
                    );
                    false
                }
            };

            report.push(format_freeze_line(server, accepted));
        }
    }

    report.complete("Freeze operation complete!")
}
