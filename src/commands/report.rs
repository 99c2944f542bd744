//! Response composition for bot commands.
//!
//! Every user-facing string the bot sends lives here, formatted as Slack
//! message text. The composer follows one rule throughout: an empty report
//! body is never sent; when a listing or target set is empty, an explicit
//! "nothing found" sentence goes out instead.

use std::collections::BTreeMap;

use crate::fleet::{Coordinator, PackageInfo, PluginInfo, ProvisionResult, Server};

/// Accumulates per-target outcome lines for multi-target operations.
///
/// Lines are kept in resolution order and the report always closes with a
/// summary line, no matter how many individual targets failed.
#[derive(Debug, Default)]
pub struct OperationReport {
    lines: Vec<String>,
}

impl OperationReport {
    pub fn new() -> Self {
        OperationReport { lines: Vec::new() }
    }

    /// Appends one outcome line to the report.
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Closes the report with a completion line and renders it.
    pub fn complete(mut self, summary: &str) -> String {
        self.lines.push(summary.to_owned());
        self.lines.join("\n")
    }
}

/// Formats the help message listing the full command vocabulary.
pub fn format_help() -> String {
    "Available commands:\n\
     help, list, show, provision, deprovision, shutdown, promote, send, freeze, \
     list-packages, list-plugins, pass, stats"
        .to_owned()
}

/// Formats the greeting shown when the bot is mentioned without a command.
pub fn format_greeting() -> String {
    "Hi there! Say '@playpen help' for a list of commands.".to_owned()
}

/// Formats the presence message the bot posts after (re)connecting.
pub fn format_startup_announcement() -> String {
    "Network coordinator link established! Say '@playpen help' for a list of commands.".to_owned()
}

/// Formats a response for an unrecognized subcommand.
pub fn format_unknown_command(token: &str) -> String {
    format!("Unknown command '{}', try saying '@playpen help'!", token)
}

/// Formats a response for a fragment that does not compile as a regex.
pub fn format_invalid_pattern(fragment: &str) -> String {
    format!("Sorry, '{}' is not a valid regex pattern.", fragment)
}

/// Formats the generic message for a network coordinator that cannot be
/// reached.
pub fn format_fleet_unreachable() -> String {
    "I couldn't reach the network coordinator. Try again in a moment.".to_owned()
}

/// Formats the usage reminder for a command invoked with the wrong arity.
pub fn format_usage(usage: &str) -> String {
    format!("Usage: @playpen {}", usage)
}

/// Formats the error for property tokens that do not come in pairs.
pub fn format_odd_properties() -> String {
    "Properties must be in the form <key> <value>".to_owned()
}

/// Formats the rejection for promoting the 'promoted' alias itself.
pub fn format_promote_promoted() -> String {
    "Cannot promote a package of version 'promoted'".to_owned()
}

/// Formats the coordinator listing for the `list` command.
///
/// Expects the pre-filtered (enabled and channel-active) coordinators; only
/// active servers are named. An empty slice yields the explicit no-match
/// sentence.
pub fn format_coordinator_list(coordinators: &[Coordinator]) -> String {
    if coordinators.is_empty() {
        return "There are no active coordinators for me to list!".to_owned();
    }

    coordinators
        .iter()
        .map(|coord| {
            let servers = coord
                .servers
                .iter()
                .filter(|server| server.active)
                .map(|server| server.display_name().to_owned())
                .collect::<Vec<String>>()
                .join(", ");

            format!(
                "Coordinator {}\n  uuid: {}\n  Servers: {}",
                coord.display_name(),
                coord.uuid,
                servers
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Formats the matched servers for the `show` command.
///
/// Takes (owning coordinator display name, server) pairs in resolution order.
pub fn format_server_matches(matches: &[(String, Server)]) -> String {
    if matches.is_empty() {
        return "There are no active servers that match that regex!".to_owned();
    }

    matches
        .iter()
        .map(|(coordinator, server)| {
            let mut block = format!(
                "Server {}\n  uuid: {}\n  coordinator: {}\n  package: {}",
                server.display_name(),
                server.uuid,
                coordinator,
                server.package
            );

            // Sorted so reports are stable between runs
            let mut keys: Vec<&String> = server.properties.keys().collect();
            keys.sort();
            for key in keys {
                block.push_str(&format!("\n  prop: {} = {}", key, server.properties[key]));
            }

            block
        })
        .collect::<Vec<String>>()
        .join("\n")
}

/// Formats a successful provision placement.
pub fn format_provision_success(result: &ProvisionResult) -> String {
    format!(
        "Provision request successful.\n  Coordinator uuid: {}\n  Server uuid: {}",
        result.coordinator, result.server
    )
}

/// Formats a provision request the network could not place.
pub fn format_provision_failed() -> String {
    "Unable to provision server.".to_owned()
}

/// Formats a package resolution miss for `provision`.
pub fn format_package_not_resolved(id: &str, version: &str) -> String {
    format!("Unable to resolve package {} ({})", id, version)
}

/// Formats a package resolution miss for `promote`.
pub fn format_promote_not_found(id: &str, version: &str) -> String {
    format!("Sorry, I can't seem to find package {} ({})", id, version)
}

/// Formats a successful promotion.
pub fn format_promote_success(id: &str, version: &str) -> String {
    format!("Promoted package {} ({})", id, version)
}

/// Formats a promotion the network refused.
pub fn format_promote_failed(id: &str, version: &str) -> String {
    format!("Unable to promote package {} ({})", id, version)
}

/// Formats a successful coordinator shutdown request.
pub fn format_shutdown_success(id: &str) -> String {
    format!("Shutdown request sent to coordinator {}", id)
}

/// Formats a coordinator shutdown the network refused.
pub fn format_shutdown_failed(id: &str) -> String {
    format!("Unable to shutdown coordinator {}", id)
}

/// Formats the package listing, expected pre-sorted by (id, version).
pub fn format_package_list(packages: &[PackageInfo]) -> String {
    if packages.is_empty() {
        return "There are no packages for me to list!".to_owned();
    }

    packages
        .iter()
        .map(PackageInfo::to_string)
        .collect::<Vec<String>>()
        .join("\n")
}

/// Formats the plugin listing in registry order.
pub fn format_plugin_list(plugins: &[PluginInfo]) -> String {
    if plugins.is_empty() {
        return "There are no plugins for me to list!".to_owned();
    }

    plugins
        .iter()
        .map(PluginInfo::to_string)
        .collect::<Vec<String>>()
        .join("\n")
}

/// Formats the empty-target-set message for a multi-target operation.
pub fn format_no_targets(operation: &str) -> String {
    format!(
        "I couldn't find any servers to {} matching those patterns.",
        operation
    )
}

/// Formats the note prepended to a forced deprovision report.
pub fn format_force_note() -> String {
    "Note: deprovisioning via force".to_owned()
}

/// Formats one deprovision outcome line.
pub fn format_deprovision_line(coordinator: &str, server: &str, accepted: bool) -> String {
    if accepted {
        format!("Deprovisioned server {} on coordinator {}", server, coordinator)
    } else {
        format!(
            "Unable to send deprovision for {} on coordinator {}",
            server, coordinator
        )
    }
}

/// Formats one send-input outcome line.
pub fn format_send_line(server: &str, accepted: bool) -> String {
    if accepted {
        format!("Sent input to server {}", server)
    } else {
        format!("Unable to send input to server {}", server)
    }
}

/// Formats one freeze outcome line.
pub fn format_freeze_line(server: &str, accepted: bool) -> String {
    if accepted {
        format!("Sent freeze to server {}", server)
    } else {
        format!("Unable to send freeze to server {}", server)
    }
}

/// Formats the acknowledgement for a `pass` broadcast.
pub fn format_pass_success(verb: &str) -> String {
    format!("Passed '{}' to the plugin system.", verb)
}

/// Formats a `pass` broadcast the network refused.
pub fn format_pass_failed() -> String {
    "Unable to pass that command to the plugin system.".to_owned()
}

/// Formats resource statistics for the `stats` command.
///
/// Expects the pre-filtered (enabled) coordinators. Each coordinator block
/// lists `used / total used` per resource; `?` stands in for coordinators
/// that did not report availability. The network-wide total sums the known
/// used values, showing `?` only when no coordinator reported availability
/// for that resource.
pub fn format_stats(coordinators: &[Coordinator]) -> String {
    if coordinators.is_empty() {
        return "There are no enabled coordinators to report stats for!".to_owned();
    }

    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    let mut used_totals: BTreeMap<String, i64> = BTreeMap::new();

    let mut result = String::from("*Local Resources:*");
    for coord in coordinators {
        result.push_str(&format!("\n  *{}*:", coord.display_name()));
        for (name, total) in &coord.resources {
            *totals.entry(name.clone()).or_insert(0) += total;

            match coord.available_resources.get(name) {
                Some(available) => {
                    let used = total - available;
                    *used_totals.entry(name.clone()).or_insert(0) += used;
                    result.push_str(&format!("\n    {}: {} / {} used", name, used, total));
                }
                None => {
                    result.push_str(&format!("\n    {}: ? / {} used", name, total));
                }
            }
        }
    }

    result.push_str("\n*Total Resources:*");
    for (name, total) in &totals {
        match used_totals.get(name) {
            Some(used) => result.push_str(&format!("\n  {}: {} / {} used", name, used, total)),
            None => result.push_str(&format!("\n  {}: ? / {} used", name, total)),
        }
    }

    result
}
