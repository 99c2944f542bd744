//! List-packages command handler.

use log::{debug, error};

use crate::commands::report::{format_fleet_unreachable, format_package_list};
use crate::fleet::FleetService;

/// Lists every package known to the network, sorted by id and version.
pub async fn handle_list_packages<F: FleetService>(fleet: &F) -> String {
    debug!("handling list-packages command");

    match fleet.packages().await {
        Ok(mut packages) => {
            packages.sort();
            format_package_list(&packages)
        }
        Err(error) => {
            error!("failed to fetch packages: {:#}", error);
            format_fleet_unreachable()
        }
    }
}
