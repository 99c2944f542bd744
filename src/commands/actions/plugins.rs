//! List-plugins command handler.

use log::{debug, error};

use crate::commands::report::{format_fleet_unreachable, format_plugin_list};
use crate::fleet::FleetService;

/// Lists the plugins loaded on the network coordinator, in registry order.
pub async fn handle_list_plugins<F: FleetService>(fleet: &F) -> String {
    debug!("handling list-plugins command");

    match fleet.plugins().await {
        Ok(plugins) => format_plugin_list(&plugins),
        Err(error) => {
            error!("failed to fetch plugins: {:#}", error);
            format_fleet_unreachable()
        }
    }
}
