//! Shutdown command handler.
//!
//! Shuts down one coordinator, addressed verbatim. No pattern matching here;
//! taking a whole coordinator down is deliberate enough to require the exact
//! identifier.

use log::{debug, error, info};

use crate::commands::report::{
    format_fleet_unreachable, format_shutdown_failed, format_shutdown_success,
};
use crate::fleet::FleetService;

/// Requests a shutdown of the given coordinator.
pub async fn handle_shutdown<F: FleetService>(fleet: &F, coordinator: &str) -> String {
    debug!("handling shutdown command for coordinator '{}'", coordinator);

    match fleet.shutdown_coordinator(coordinator).await {
        Ok(true) => {
            info!("shutdown request accepted for coordinator {}", coordinator);
            format_shutdown_success(coordinator)
        }
        Ok(false) => format_shutdown_failed(coordinator),
        Err(error) => {
            error!("shutdown request for {} failed: {:#}", coordinator, error);
            format_fleet_unreachable()
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::fleet::MockFleetService;

    #[tokio::test]
    async fn test_handle_shutdown_success() {
        let mut fleet = MockFleetService::new();
        fleet
            .expect_shutdown_coordinator()
            .with(eq("c1"))
            .times(1)
            .returning(|_| Ok(true));

        let result = handle_shutdown(&fleet, "c1").await;

        assert_eq!(result, "Shutdown request sent to coordinator c1");
    }

    #[tokio::test]
    async fn test_handle_shutdown_refused() {
        let mut fleet = MockFleetService::new();
        fleet
            .expect_shutdown_coordinator()
            .times(1)
            .returning(|_| Ok(false));

        let result = handle_shutdown(&fleet, "c1").await;

        assert_eq!(result, "Unable to shutdown coordinator c1");
    }

    #[tokio::test]
    async fn test_handle_shutdown_fleet_unreachable() {
        let mut fleet = MockFleetService::new();
        fleet
            .expect_shutdown_coordinator()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("connection refused")));

        let result = handle_shutdown(&fleet, "c1").await;

        assert!(result.contains("couldn't reach the network coordinator"));
    }
}
