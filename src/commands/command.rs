//! Command parsing and validation.
//!
//! This module converts the whitespace-split tokens of a Slack message into
//! structured [`Command`] enums. The vocabulary is fixed: a static grammar
//! table drives both the arity checks and the usage strings shown on bad
//! invocations, so the parser and its error messages cannot drift apart.

use std::collections::HashMap;

use log::debug;

use crate::commands::report::{
    format_odd_properties, format_promote_promoted, format_unknown_command, format_usage,
};
use crate::fleet::ProvisionRequest;

/// Version alias selecting whichever version of a package is currently
/// promoted.
pub const PROMOTED_VERSION: &str = "promoted";

/// Represents a parsed bot command.
///
/// Commands are parsed from Slack message text after mention addressing has
/// been stripped, and carry everything their handler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Display the command vocabulary
    Help,
    /// List active coordinators and their active servers
    List,
    /// Show details for servers matching a pattern
    Show {
        /// Anchored regex fragment matched against server uuid or name
        server_pattern: String,
    },
    /// Provision a new server from a package
    Provision(ProvisionRequest),
    /// Deprovision servers matching a coordinator and server pattern
    Deprovision {
        coordinator_pattern: String,
        server_pattern: String,
        /// Force the deprovision instead of a graceful stop
        force: bool,
    },
    /// Shut down a single coordinator
    Shutdown {
        /// Exact coordinator uuid or name, no pattern matching
        coordinator: String,
    },
    /// Promote a package version
    Promote { package_id: String, version: String },
    /// Send console input to servers matching a pattern
    Send {
        coordinator_pattern: String,
        server_pattern: String,
        /// Input line, newline-terminated
        input: String,
    },
    /// Freeze servers matching a pattern for post-mortem inspection
    Freeze {
        coordinator_pattern: String,
        server_pattern: String,
    },
    /// List every package known to the network
    ListPackages,
    /// List plugins loaded on the network coordinator
    ListPlugins,
    /// Pass a raw command to the network's plugin system
    Pass {
        /// Verb and arguments, in message order
        args: Vec<String>,
    },
    /// Report per-coordinator and network-wide resource statistics
    Stats,
}

/// Errors that can occur during command parsing.
///
/// Every variant corresponds to a user-visible message; addressing failures
/// (wrong channel, no mention) are rejected before parsing starts and never
/// reach this type.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParsingError {
    /// The first token is not in the command vocabulary
    Unknown(String),
    /// Wrong number of arguments for a known command
    InvalidArity(&'static str),
    /// Provision properties did not come in `<key> <value>` pairs
    OddProperties,
    /// Attempted to promote the 'promoted' alias itself
    PromotedVersion,
}

/// One entry in the command grammar.
struct GrammarEntry {
    name: &'static str,
    min_args: usize,
    max_args: Option<usize>,
    usage: &'static str,
}

/// The full command vocabulary with argument bounds and usage strings.
static GRAMMAR: &[GrammarEntry] = &[
    GrammarEntry {
        name: "help",
        min_args: 0,
        max_args: Some(0),
        usage: "help",
    },
    GrammarEntry {
        name: "list",
        min_args: 0,
        max_args: Some(0),
        usage: "list",
    },
    GrammarEntry {
        name: "show",
        min_args: 1,
        max_args: Some(1),
        usage: "show <server-regex>",
    },
    GrammarEntry {
        name: "provision",
        min_args: 1,
        max_args: None,
        usage: "provision <package-id> [version <version>] [coordinator <uuid>] \
                [name <name>] [<key> <value> ...]",
    },
    GrammarEntry {
        name: "deprovision",
        min_args: 2,
        max_args: Some(3),
        usage: "deprovision <coordinator-regex> <server-regex> [force]",
    },
    GrammarEntry {
        name: "shutdown",
        min_args: 1,
        max_args: Some(1),
        usage: "shutdown <coordinator>",
    },
    GrammarEntry {
        name: "promote",
        min_args: 2,
        max_args: Some(2),
        usage: "promote <package-id> <version>",
    },
    GrammarEntry {
        name: "send",
        min_args: 3,
        max_args: None,
        usage: "send <coordinator-regex> <server-regex> <input>",
    },
    GrammarEntry {
        name: "freeze",
        min_args: 2,
        max_args: Some(2),
        usage: "freeze <coordinator-regex> <server-regex>",
    },
    GrammarEntry {
        name: "list-packages",
        min_args: 0,
        max_args: Some(0),
        usage: "list-packages",
    },
    GrammarEntry {
        name: "list-plugins",
        min_args: 0,
        max_args: Some(0),
        usage: "list-plugins",
    },
    GrammarEntry {
        name: "pass",
        min_args: 1,
        max_args: None,
        usage: "pass <command> [arguments ...]",
    },
    GrammarEntry {
        name: "stats",
        min_args: 0,
        max_args: Some(0),
        usage: "stats",
    },
];

impl Command {
    /// Parses command tokens into a Command.
    ///
    /// `tokens` holds the whitespace-split message with the leading mention
    /// already removed, so `tokens[0]` is the command name (matched
    /// case-insensitively) and the rest are its arguments. The grammar table
    /// validates the name and arity before any per-command parsing runs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is not in the vocabulary - [`CommandParsingError::Unknown`]
    /// - The argument count is out of bounds - [`CommandParsingError::InvalidArity`]
    /// - Provision properties are unpaired - [`CommandParsingError::OddProperties`]
    /// - Promote targets the 'promoted' alias - [`CommandParsingError::PromotedVersion`]
    pub fn parse(tokens: &[&str]) -> Result<Self, CommandParsingError> {
        // The command name is case-insensitive; arguments keep their case
        // (patterns and property values are case-sensitive)
        let name = tokens[0].to_ascii_lowercase();
        let args = &tokens[1..];

        let entry = GRAMMAR
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| CommandParsingError::Unknown(tokens[0].to_owned()))?;

        if args.len() < entry.min_args || entry.max_args.is_some_and(|max| args.len() > max) {
            return Err(CommandParsingError::InvalidArity(entry.usage));
        }

        debug!("parsing command '{}' with {} argument(s)", name, args.len());

        match name.as_str() {
            "help" => Ok(Command::Help),
            "list" => Ok(Command::List),
            "show" => Ok(Command::Show {
                server_pattern: args[0].to_owned(),
            }),
            "provision" => Ok(Command::Provision(Self::parse_provision(args)?)),
            "deprovision" => Ok(Command::Deprovision {
                coordinator_pattern: args[0].to_owned(),
                server_pattern: args[1].to_owned(),
                force: args.get(2).is_some_and(|arg| arg.eq_ignore_ascii_case("true")),
            }),
            "shutdown" => Ok(Command::Shutdown {
                coordinator: args[0].to_owned(),
            }),
            "promote" => Self::parse_promote(args),
            "send" => Ok(Command::Send {
                coordinator_pattern: args[0].to_owned(),
                server_pattern: args[1].to_owned(),
                input: format!("{}\n", args[2..].join(" ")),
            }),
            "freeze" => Ok(Command::Freeze {
                coordinator_pattern: args[0].to_owned(),
                server_pattern: args[1].to_owned(),
            }),
            "list-packages" => Ok(Command::ListPackages),
            "list-plugins" => Ok(Command::ListPlugins),
            "pass" => Ok(Command::Pass {
                args: args.iter().map(|arg| (*arg).to_owned()).collect(),
            }),
            "stats" => Ok(Command::Stats),
            // The grammar lookup above covers every name
            _ => Err(CommandParsingError::Unknown(tokens[0].to_owned())),
        }
    }

    /// Parses provision arguments into a request.
    ///
    /// The first argument is the package id. Everything after it is consumed
    /// pairwise: the reserved keys `version`, `coordinator` and `name`
    /// (case-insensitive) fill the request fields, any other pair becomes an
    /// opaque server property. Version defaults to the promoted alias.
    fn parse_provision(args: &[&str]) -> Result<ProvisionRequest, CommandParsingError> {
        let package_id = args[0].to_owned();
        let pairs = &args[1..];

        if pairs.len() % 2 != 0 {
            return Err(CommandParsingError::OddProperties);
        }

        let mut version: Option<String> = None;
        let mut coordinator: Option<String> = None;
        let mut name: Option<String> = None;
        let mut properties: HashMap<String, String> = HashMap::new();

        for pair in pairs.chunks(2) {
            let (key, value) = (pair[0], pair[1]);
            if key.eq_ignore_ascii_case("version") {
                version = Some(value.to_owned());
            } else if key.eq_ignore_ascii_case("coordinator") {
                coordinator = Some(value.to_owned());
            } else if key.eq_ignore_ascii_case("name") {
                name = Some(value.to_owned());
            } else {
                properties.insert(key.to_owned(), value.to_owned());
            }
        }

        let request = ProvisionRequest {
            package_id,
            version: version.unwrap_or_else(|| PROMOTED_VERSION.to_owned()),
            name,
            coordinator,
            properties,
        };

        debug!("parsed provision command: {:?}", request);

        Ok(request)
    }

    fn parse_promote(args: &[&str]) -> Result<Self, CommandParsingError> {
        let version = args[1];

        // 'promoted' is an alias, promoting it would be circular
        if version.eq_ignore_ascii_case(PROMOTED_VERSION) {
            return Err(CommandParsingError::PromotedVersion);
        }

        Ok(Command::Promote {
            package_id: args[0].to_owned(),
            version: version.to_owned(),
        })
    }
}

/// Formats a command parsing error into a user-facing message.
///
/// Every parsing error produces a response; staying silent is reserved for
/// messages that never addressed the bot in the first place, which are
/// filtered out before parsing.
pub fn format_command_error(error: &CommandParsingError) -> String {
    match error {
        CommandParsingError::Unknown(token) => format_unknown_command(token),
        CommandParsingError::InvalidArity(usage) => format_usage(usage),
        CommandParsingError::OddProperties => format_odd_properties(),
        CommandParsingError::PromotedVersion => format_promote_promoted(),
    }
}
