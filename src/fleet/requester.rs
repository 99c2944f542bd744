//! HTTP client for the network coordinator's REST API.
//!
//! The orchestration network exposes its administrative surface over HTTP;
//! [`FleetRequester`] wraps those endpoints. The [`FleetService`] trait
//! abstracts the operations so command handlers can be tested against a mock
//! without a live network.

use anyhow::Error;
use log::{debug, info};
use mockall::automock;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::fleet::structs::{
    Coordinator, PackageInfo, PluginInfo, ProvisionRequest, ProvisionResult,
};

/// Acknowledgement body returned by the mutating endpoints.
#[derive(Deserialize, Debug)]
struct AckResponse {
    ok: bool,
}

/// Placement body returned by `/api/provision`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ProvisionResponse {
    ok: bool,
    coordinator: Option<String>,
    server: Option<String>,
}

/// Operations the command handlers need from the orchestration network.
///
/// Boolean results mirror the network's per-operation acknowledgements:
/// `false` means the network refused or could not complete the operation,
/// while an `Err` means the coordinator could not be reached at all.
#[automock]
pub trait FleetService {
    /// Fetches the current fleet snapshot: every coordinator with its
    /// servers and resource maps.
    async fn coordinators(&self) -> Result<Vec<Coordinator>, Error>;
    /// Resolves a package by id and version; `None` when unknown.
    async fn resolve_package(&self, id: &str, version: &str)
    -> Result<Option<PackageInfo>, Error>;
    /// Promotes a package version to the `promoted` alias.
    async fn promote_package(&self, id: &str, version: &str) -> Result<bool, Error>;
    /// Provisions a server; `None` when the network could not place it.
    async fn provision(&self, request: ProvisionRequest)
    -> Result<Option<ProvisionResult>, Error>;
    /// Deprovisions one server from one coordinator.
    async fn deprovision(&self, coordinator: &str, server: &str, force: bool)
    -> Result<bool, Error>;
    /// Shuts down a single coordinator and its servers.
    async fn shutdown_coordinator(&self, id: &str) -> Result<bool, Error>;
    /// Delivers one line of console input to a server.
    async fn send_input(&self, coordinator: &str, server: &str, input: &str)
    -> Result<bool, Error>;
    /// Marks a server as frozen so its state is kept on deprovision.
    async fn freeze_server(&self, coordinator: &str, server: &str) -> Result<bool, Error>;
    /// Lists every package known to the network coordinator.
    async fn packages(&self) -> Result<Vec<PackageInfo>, Error>;
    /// Lists the plugins loaded on the network coordinator, in registry order.
    async fn plugins(&self) -> Result<Vec<PluginInfo>, Error>;
    /// Broadcasts an opaque message to every plugin.
    async fn plugin_broadcast(&self, id: &str, arguments: &[String]) -> Result<bool, Error>;
}

/// [`FleetService`] implementation over the network coordinator's HTTP API.
pub struct FleetRequester {
    /// Base URL of the network coordinator API
    url: String,
    /// HTTP client
    client: Client,
}

impl FleetRequester {
    /// Create a new [`FleetRequester`] for the network coordinator at `url`.
    pub fn new(url: &str) -> Self {
        FleetRequester {
            url: url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    async fn post_ack<T: serde::Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<bool, Error> {
        let url = format!("{}{}", &self.url, path);
        debug!("request POST {}", &url);

        let ack: AckResponse = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("response from {} -> ok={}", &url, ack.ok);

        Ok(ack.ok)
    }
}

impl FleetService for FleetRequester {
    /// Request `/api/coordinators` for the full fleet snapshot.
    ///
    /// The endpoint returns a json array of coordinators, each carrying its
    /// nested servers and resource maps:
    /// ```json
    /// [
    ///   {
    ///     "uuid": "...", "name": "alpha", "enabled": true,
    ///     "channelActive": true,
    ///     "servers": [ { "uuid": "...", "active": true, ... } ],
    ///     "resources": { "cpu": 4 }, "availableResources": { "cpu": 1 }
    ///   }
    /// ]
    /// ```
    async fn coordinators(&self) -> Result<Vec<Coordinator>, Error> {
        let url = format!("{}/api/coordinators", &self.url);
        info!("request fleet snapshot");
        debug!("request {}", &url);

        let coordinators: Vec<Coordinator> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("response from {} -> {} coordinator(s)", &url, coordinators.len());

        Ok(coordinators)
    }

    /// Request `/api/packages/resolve?id={id}&version={version}`.
    ///
    /// A 404 means the package is unknown and maps to `Ok(None)`; that is a
    /// user-reportable miss, not a transport failure.
    async fn resolve_package(
        &self,
        id: &str,
        version: &str,
    ) -> Result<Option<PackageInfo>, Error> {
        let url = format!("{}/api/packages/resolve", &self.url);
        info!("resolve package {} ({})", id, version);
        debug!("request {}?id={}&version={}", &url, id, version);

        let response = self
            .client
            .get(&url)
            .query(&[("id", id), ("version", version)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let package: PackageInfo = response.error_for_status()?.json().await?;

        debug!("response from {} -> {}", &url, package);

        Ok(Some(package))
    }

    async fn promote_package(&self, id: &str, version: &str) -> Result<bool, Error> {
        info!("promote package {} ({})", id, version);
        self.post_ack(
            "/api/packages/promote",
            &serde_json::json!({ "id": id, "version": version }),
        )
        .await
    }

    /// Request `/api/provision` to place a server on the network.
    ///
    /// The network answers `{"ok": false}` when no coordinator can fit the
    /// package; that maps to `Ok(None)` and is reported, not retried.
    async fn provision(
        &self,
        request: ProvisionRequest,
    ) -> Result<Option<ProvisionResult>, Error> {
        let url = format!("{}/api/provision", &self.url);
        info!(
            "provision {} ({}) on {}",
            request.package_id,
            request.version,
            request.coordinator.as_deref().unwrap_or("best fit")
        );

        let response: ProvisionResponse = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("response from {} -> {:?}", &url, response);

        match (response.ok, response.coordinator, response.server) {
            (true, Some(coordinator), Some(server)) => Ok(Some(ProvisionResult {
                coordinator,
                server,
            })),
            _ => Ok(None),
        }
    }

    async fn deprovision(
        &self,
        coordinator: &str,
        server: &str,
        force: bool,
    ) -> Result<bool, Error> {
        info!(
            "deprovision server {} on coordinator {} (force={})",
            server, coordinator, force
        );
        self.post_ack(
            "/api/deprovision",
            &serde_json::json!({ "coordinator": coordinator, "server": server, "force": force }),
        )
        .await
    }

    async fn shutdown_coordinator(&self, id: &str) -> Result<bool, Error> {
        info!("shutdown coordinator {}", id);
        self.post_ack(
            "/api/coordinators/shutdown",
            &serde_json::json!({ "id": id }),
        )
        .await
    }

    async fn send_input(&self, coordinator: &str, server: &str, input: &str) -> Result<bool, Error> {
        info!("send input to server {} on coordinator {}", server, coordinator);
        self.post_ack(
            "/api/send",
            &serde_json::json!({ "coordinator": coordinator, "server": server, "input": input }),
        )
        .await
    }

    async fn freeze_server(&self, coordinator: &str, server: &str) -> Result<bool, Error> {
        info!("freeze server {} on coordinator {}", server, coordinator);
        self.post_ack(
            "/api/freeze",
            &serde_json::json!({ "coordinator": coordinator, "server": server }),
        )
        .await
    }

    /// Request `/api/packages` for every package the network knows about.
    async fn packages(&self) -> Result<Vec<PackageInfo>, Error> {
        let url = format!("{}/api/packages", &self.url);
        info!("request package list");

        let packages: Vec<PackageInfo> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("response from {} -> {} package(s)", &url, packages.len());

        Ok(packages)
    }

    /// Request `/api/plugins` for the loaded plugin list.
    async fn plugins(&self) -> Result<Vec<PluginInfo>, Error> {
        let url = format!("{}/api/plugins", &self.url);
        info!("request plugin list");

        let plugins: Vec<PluginInfo> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("response from {} -> {} plugin(s)", &url, plugins.len());

        Ok(plugins)
    }

    async fn plugin_broadcast(&self, id: &str, arguments: &[String]) -> Result<bool, Error> {
        info!("broadcast plugin message '{}'", id);
        self.post_ack(
            "/api/plugins/broadcast",
            &serde_json::json!({ "id": id, "arguments": arguments }),
        )
        .await
    }
}
