//! Orchestration network integration.
//!
//! This module provides everything the bot knows about the fleet it manages:
//! the data model for coordinators and servers, the HTTP client for the
//! network coordinator's REST API, and the pattern-based target resolver that
//! turns user-supplied regex fragments into concrete (coordinator, server)
//! pairs.
//!
//! # Modules
//!
//! - `requester` - HTTP client implementing the [`FleetService`] contract
//! - `resolver` - anchored pattern matching and multi-target resolution
//! - `structs` - coordinators, servers, packages, plugins, provision types

pub mod resolver;
mod requester;
mod structs;

pub use crate::fleet::requester::{FleetRequester, FleetService};
pub use crate::fleet::structs::{
    Coordinator, PackageInfo, PluginInfo, ProvisionRequest, ProvisionResult, Server,
};

#[cfg(test)]
pub use crate::fleet::requester::MockFleetService;
