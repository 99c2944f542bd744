//! Show command handler.
//!
//! Shows the details of every active server whose uuid or name matches the
//! given anchored pattern, across all active coordinators.

use log::{debug, error};

use crate::commands::report::{
    format_fleet_unreachable, format_invalid_pattern, format_server_matches,
};
use crate::fleet::resolver::{compile_fragment, matches_identity};
use crate::fleet::{FleetService, Server};

/// Shows details for active servers matching `server_fragment`.
pub async fn handle_show<F: FleetService>(fleet: &F, server_fragment: &str) -> String {
    debug!("handling show command for pattern '{}'", server_fragment);

    let pattern = match compile_fragment(server_fragment) {
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

    let mut matches: Vec<(String, Server)> = Vec::new();
    for coord in coordinators
        .iter()
        .filter(|coord| coord.enabled && coord.channel_active)
    {
        for server in coord.servers.iter().filter(|server| server.active) {
            if matches_identity(&pattern, &server.uuid, server.name.as_deref()) {
                matches.push((coord.display_name().to_owned(), server.clone()));
            }
        }
    }

    format_server_matches(&matches)
}
