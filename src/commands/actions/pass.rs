//! Pass command handler.
//!
//! Hands an opaque command to the network's plugin system. The first token is
//! the verb, the rest travel as-is; what the plugins make of it is their
//! business.

use log::{debug, error};

use crate::commands::report::{format_fleet_unreachable, format_pass_failed, format_pass_success};
use crate::fleet::FleetService;

/// Broadcasts a raw command to the network's plugin system.
pub async fn handle_pass<F: FleetService>(fleet: &F, args: &[String]) -> String {
    let verb = &args[0];
    debug!("handling pass command for '{}'", verb);

    match fleet.plugin_broadcast(verb, &args[1..]).await {
        Ok(true) => format_pass_success(verb),
        Ok(false) => format_pass_failed(),
        Err(error) => {
            error!("plugin broadcast failed: {:#}", error);
            format_fleet_unreachable()
        }
    }
}
