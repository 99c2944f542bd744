//! Provision command handler.
//!
//! Resolves the requested package against the network coordinator first, so a
//! typo in the package id or version comes back as a resolution error instead
//! of a refused placement. The resolved version replaces the `promoted` alias
//! in the request that goes out.

use log::{debug, error, info};

use crate::commands::report::{
    format_fleet_unreachable, format_package_not_resolved, format_provision_failed,
    format_provision_success,
};
use crate::fleet::{FleetService, ProvisionRequest};

/// Provisions a new server from the given request.
pub async fn handle_provision<F: FleetService>(fleet: &F, request: ProvisionRequest) -> String {
    debug!("handling provision command: {:?}", request);

    let package = match fleet
        .resolve_package(&request.package_id, &request.version)
        .await
    {
        Ok(Some(package)) => package,
        Ok(None) => return format_package_not_resolved(&request.package_id, &request.version),
        Err(error) => {
            error!("failed to resolve package: {:#}", error);
            return format_fleet_unreachable();
        }
    };

    let request = ProvisionRequest {
        package_id: package.id,
        version: package.version,
        ..request
    };

    match fleet.provision(request).await {
        Ok(Some(result)) => {
            info!(
                "provisioned server {} on coordinator {}",
                result.server, result.coordinator
            );
            format_provision_success(&result)
        }
        Ok(None) => format_provision_failed(),
        Err(error) => {
            error!("failed to provision server: {:#}", error);
            format_fleet_unreachable()
        }
    }
}
