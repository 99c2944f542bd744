//! Promote command handler.
//!
//! Promoting a version makes it the target of the `promoted` alias that
//! `provision` defaults to. The version must resolve before the promotion is
//! attempted.

use log::{debug, error, info};

use crate::commands::report::{
    format_fleet_unreachable, format_promote_failed, format_promote_not_found,
    format_promote_success,
};
use crate::fleet::FleetService;

/// Promotes a package version to the `promoted` alias.
pub async fn handle_promote<F: FleetService>(fleet: &F, package_id: &str, version: &str) -> String {
    debug!("handling promote command for {} ({})", package_id, version);

    let package = match fleet.resolve_package(package_id, version).await {
        Ok(Some(package)) => package,
        Ok(None) => return format_promote_not_found(package_id, version),
        Err(error) => {
            error!("failed to resolve package: {:#}", error);
            return format_fleet_unreachable();
        }
    };

    match fleet.promote_package(&package.id, &package.version).await {
        Ok(true) => {
            info!("promoted package {} ({})", package.id, package.version);
            format_promote_success(&package.id, &package.version)
        }
        Ok(false) => format_promote_failed(&package.id, &package.version),
        Err(error) => {
            error!("promote request failed: {:#}", error);
            format_fleet_unreachable()
        }
    }
}
