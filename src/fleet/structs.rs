//! Data structures describing the orchestration network.
//!
//! These structs mirror the JSON the network coordinator's REST API serves.
//! They double as the in-memory fleet snapshot the command handlers walk:
//! the wire format and the internal representation are the same shape, so a
//! single set of serde structs covers both.

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

/// A managed execution host in the fleet.
///
/// Coordinators own zero or more [`Server`]s and report their resource
/// capacity and availability. The `name` is optional; a coordinator is always
/// addressable by uuid.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coordinator {
    /// Unique identifier for the coordinator
    pub uuid: String,
    /// Optional human-friendly name
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the coordinator is enabled on the network
    pub enabled: bool,
    /// Whether the coordinator's network channel is currently live
    #[serde(default)]
    pub channel_active: bool,
    /// Servers provisioned on this coordinator
    #[serde(default)]
    pub servers: Vec<Server>,
    /// Total resource capacity, by resource name
    #[serde(default)]
    pub resources: BTreeMap<String, i64>,
    /// Resources still free, by resource name.
    ///
    /// A coordinator that has not reported availability for a resource simply
    /// omits the key; `stats` renders those as `?`.
    #[serde(default)]
    pub available_resources: BTreeMap<String, i64>,
}

impl Coordinator {
    /// The name to show in reports, falling back to the uuid for unnamed
    /// coordinators.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.uuid)
    }
}

impl fmt::Display for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "uuid={}, name={:?}, enabled={}, channel_active={}, servers={}",
            self.uuid,
            self.name,
            self.enabled,
            self.channel_active,
            self.servers.len()
        )
    }
}

/// A provisioned workload instance owned by exactly one coordinator.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    /// Unique identifier for the server
    pub uuid: String,
    /// Optional human-friendly name
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the server is currently active
    pub active: bool,
    /// The package this server runs
    pub package: PackageInfo,
    /// Opaque properties attached at provision time
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl Server {
    /// The name to show in reports, falling back to the uuid for unnamed
    /// servers.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.uuid)
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "uuid={}, name={:?}, active={}, package={}",
            self.uuid, self.name, self.active, self.package
        )
    }
}

/// A versioned deployable unit known to the network coordinator.
///
/// One version per package id may carry the `promoted` alias, which is the
/// default selection for `provision`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    /// Package identifier
    pub id: String,
    /// Package version
    pub version: String,
}

impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.version)
    }
}

/// A plugin loaded on the network coordinator.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    /// Plugin identifier
    pub id: String,
    /// Plugin version
    pub version: String,
}

impl fmt::Display for PluginInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.version)
    }
}

/// A provision request as the `provision` command assembles it.
///
/// `coordinator` left as `None` delegates placement to the network's best-fit
/// selection.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRequest {
    /// Package identifier to provision
    pub package_id: String,
    /// Package version ("promoted" selects the promoted alias)
    pub version: String,
    /// Optional server name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional explicit target coordinator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinator: Option<String>,
    /// Opaque properties to attach to the server
    pub properties: HashMap<String, String>,
}

/// Successful placement reported by the network coordinator.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionResult {
    /// Uuid of the coordinator the server landed on
    pub coordinator: String,
    /// Uuid of the new server
    pub server: String,
}
