//! Command action handlers.
//!
//! One handler per bot command. Each handler borrows the
//! [`FleetService`](crate::fleet::FleetService) it needs, performs the
//! operation, and returns the complete response text; the commander sends
//! exactly one message per command, no matter how many targets were touched.
//!
//! # Available Handlers
//!
//! - [`handle_help`] - Display the command vocabulary
//! - [`handle_list`] - List active coordinators and servers
//! - [`handle_show`] - Show details for matching servers
//! - [`handle_provision`] - Provision a new server
//! - [`handle_deprovision`] - Deprovision matching servers
//! - [`handle_shutdown`] - Shut down a coordinator
//! - [`handle_promote`] - Promote a package version
//! - [`handle_send`] - Send console input to matching servers
//! - [`handle_freeze`] - Freeze matching servers
//! - [`handle_list_packages`] - List known packages
//! - [`handle_list_plugins`] - List loaded plugins
//! - [`handle_pass`] - Pass a raw command to the plugin system
//! - [`handle_stats`] - Report resource statistics

mod deprovision;
mod freeze;
mod help;
mod list;
mod packages;
mod pass;
mod plugins;
mod promote;
mod provision;
mod send;
mod show;
mod shutdown;
mod stats;

pub use crate::commands::actions::{
    deprovision::handle_deprovision, freeze::handle_freeze, help::handle_help, list::handle_list,
    packages::handle_list_packages, pass::handle_pass, plugins::handle_list_plugins,
    promote::handle_promote, provision::handle_provision, send::handle_send, show::handle_show,
    shutdown::handle_shutdown, stats::handle_stats,
};
