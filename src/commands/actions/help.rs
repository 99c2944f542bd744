//! Help command handler.
//!
//! Displays the full command vocabulary. This is a stateless command that
//! always returns the same message and never touches the network.

use log::debug;

use crate::commands::report::format_help;

/// Returns the formatted command vocabulary.
pub fn handle_help() -> String {
    debug!("handling help command");

    format_help()
}
