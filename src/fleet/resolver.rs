//! Pattern matching and multi-target resolution over the fleet.
//!
//! User-supplied patterns are regex fragments that are anchored before
//! compilation: a fragment `lobby.*` becomes `^lobby.*$`, so partial
//! substring matches never select a target. Both the coordinator and the
//! server side of a command match against the uuid or the name of the
//! candidate.

use log::debug;
use regex::Regex;

use crate::fleet::structs::Coordinator;

/// One resolved coordinator and the servers selected on it.
///
/// The resolver never produces an entry with an empty server list; a
/// coordinator without matching servers is dropped entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEntry {
    /// Uuid of the matched coordinator
    pub coordinator: String,
    /// Uuids of the matched servers, in fleet order
    pub servers: Vec<String>,
}

/// The resolved set of (coordinator, server) pairs a multi-target command
/// acts upon, in fleet iteration order. Empty means nothing matched.
pub type TargetSet = Vec<TargetEntry>;

/// Compiles a user-supplied fragment into an anchored full-match regex.
///
/// The fragment is wrapped as `^(?:` + fragment + `)$`; the group keeps the
/// anchors binding to the whole fragment, so an alternation like `a|b` cannot
/// decay into "starts with a, or ends with b". A syntactically invalid
/// fragment surfaces as a [`regex::Error`], which callers turn into a
/// user-visible message rather than a crash.
pub fn compile_fragment(fragment: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", fragment))
}

/// Returns true when the anchored pattern matches the candidate's uuid, or
/// its name when one is set.
pub fn matches_identity(pattern: &Regex, uuid: &str, name: Option<&str>) -> bool {
    pattern.is_match(uuid) || name.is_some_and(|name| pattern.is_match(name))
}

/// Resolves the fleet against a coordinator pattern and a server pattern.
///
/// For each coordinator whose uuid or name matches the coordinator pattern,
/// servers are selected by the server pattern against uuid or name. With
/// `require_active` set, inactive servers are skipped; mutating commands
/// (deprovision, send, freeze) resolve with it unset so that inactive servers
/// remain addressable.
///
/// Coordinator-level filters (enabled, channel liveness) are the caller's
/// concern: reporting commands pre-filter the slice they pass in, mutating
/// commands pass the raw fleet. Fragment compilation is also the caller's
/// concern, so it can report which fragment failed.
pub fn resolve_compiled(
    coordinators: &[Coordinator],
    coordinator_pattern: &Regex,
    server_pattern: &Regex,
    require_active: bool,
) -> TargetSet {
    let mut targets = Vec::new();
    for coord in coordinators {
        if !matches_identity(coordinator_pattern, &coord.uuid, coord.name.as_deref()) {
            continue;
        }

        let servers: Vec<String> = coord
            .servers
            .iter()
            .filter(|server| !require_active || server.active)
            .filter(|server| {
                matches_identity(server_pattern, &server.uuid, server.name.as_deref())
            })
            .map(|server| server.uuid.clone())
            .collect();

        // A coordinator with no matching servers drops out of the result
        if !servers.is_empty() {
            targets.push(TargetEntry {
                coordinator: coord.uuid.clone(),
                servers,
            });
        }
    }

    debug!(
        "resolved '{}' / '{}' (require_active={}) to {} coordinator(s)",
        coordinator_pattern.as_str(),
        server_pattern.as_str(),
        require_active,
        targets.len()
    );

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::structs::{PackageInfo, Server};
    use std::collections::{BTreeMap, HashMap};

    fn create_server(uuid: &str, name: Option<&str>, active: bool) -> Server {
        Server {
            uuid: uuid.to_string(),
            name: name.map(str::to_string),
            active,
            package: PackageInfo {
                id: "lobby".to_string(),
                version: "1.0".to_string(),
            },
            properties: HashMap::new(),
        }
    }

    fn resolve(
        coordinators: &[Coordinator],
        coordinator_fragment: &str,
        server_fragment: &str,
        require_active: bool,
    ) -> Result<TargetSet, regex::Error> {
        let coordinator_pattern = compile_fragment(coordinator_fragment)?;
        let server_pattern = compile_fragment(server_fragment)?;
        Ok(resolve_compiled(
            coordinators,
            &coordinator_pattern,
            &server_pattern,
            require_active,
        ))
    }

    fn create_coordinator(uuid: &str, name: Option<&str>, servers: Vec<Server>) -> Coordinator {
        Coordinator {
            uuid: uuid.to_string(),
            name: name.map(str::to_string),
            enabled: true,
            channel_active: true,
            servers,
            resources: BTreeMap::new(),
            available_resources: BTreeMap::new(),
        }
    }

    #[test]
    fn test_fragment_is_anchored() {
        let pattern = compile_fragment("abc").unwrap();
        assert!(pattern.is_match("abc"));
        assert!(!pattern.is_match("xabcx"));
        assert!(!pattern.is_match("abcx"));
        assert!(!pattern.is_match("xabc"));
    }

    #[test]
    fn test_fragment_supports_metacharacters() {
        let pattern = compile_fragment("lobby-.*").unwrap();
        assert!(pattern.is_match("lobby-1"));
        assert!(pattern.is_match("lobby-"));
        assert!(!pattern.is_match("hub-1"));

        let pattern = compile_fragment("a|b").unwrap();
        assert!(pattern.is_match("a"));
        assert!(pattern.is_match("b"));
        assert!(!pattern.is_match("ab"));

        let pattern = compile_fragment("[ln]obby").unwrap();
        assert!(pattern.is_match("lobby"));
        assert!(pattern.is_match("nobby"));
    }

    #[test]
    fn test_alternation_binds_to_both_anchors() {
        // '^lobby|hub$' would accept 'lobby-3' and 'big-hub'; the compiled
        // form must not
        let pattern = compile_fragment("lobby|hub").unwrap();
        assert!(pattern.is_match("lobby"));
        assert!(pattern.is_match("hub"));
        assert!(!pattern.is_match("lobby-3"));
        assert!(!pattern.is_match("big-hub"));
        assert!(!pattern.is_match("lobbyhub"));
    }

    #[test]
    fn test_fragment_match_is_case_sensitive() {
        let pattern = compile_fragment("Lobby").unwrap();
        assert!(pattern.is_match("Lobby"));
        assert!(!pattern.is_match("lobby"));
    }

    #[test]
    fn test_invalid_fragment_is_an_error() {
        assert!(compile_fragment("[unclosed").is_err());
        assert!(compile_fragment("(?P<broken").is_err());
    }

    #[test]
    fn test_matches_identity_uuid_or_name() {
        let pattern = compile_fragment("lobby-1").unwrap();
        assert!(matches_identity(&pattern, "lobby-1", None));
        assert!(matches_identity(&pattern, "uuid-1", Some("lobby-1")));
        assert!(!matches_identity(&pattern, "uuid-1", None));
        assert!(!matches_identity(&pattern, "uuid-1", Some("hub-1")));
    }

    #[test]
    fn test_resolve_matches_everything_with_wildcards() {
        let fleet = vec![
            create_coordinator(
                "c1",
                Some("alpha"),
                vec![create_server("s1", Some("lobby-1"), true)],
            ),
            create_coordinator("c2", None, vec![create_server("s2", None, true)]),
        ];

        let targets = resolve(&fleet, ".*", ".*", false).unwrap();
        assert_eq!(
            targets,
            vec![
                TargetEntry {
                    coordinator: "c1".to_string(),
                    servers: vec!["s1".to_string()],
                },
                TargetEntry {
                    coordinator: "c2".to_string(),
                    servers: vec!["s2".to_string()],
                },
            ]
        );
    }

    #[test]
    fn test_resolve_never_yields_empty_server_lists() {
        let fleet = vec![
            create_coordinator("c1", None, vec![create_server("s1", Some("lobby-1"), true)]),
            create_coordinator("c2", None, vec![create_server("s2", Some("hub-1"), true)]),
        ];

        let targets = resolve(&fleet, ".*", "lobby-.*", false).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].coordinator, "c1");
        assert!(targets.iter().all(|entry| !entry.servers.is_empty()));
    }

    #[test]
    fn test_resolve_empty_when_nothing_matches() {
        let fleet = vec![create_coordinator(
            "c1",
            None,
            vec![create_server("s1", None, true)],
        )];

        let targets = resolve(&fleet, "nope", ".*", false).unwrap();
        assert!(targets.is_empty());
    }

    #[test]
    fn test_resolve_without_active_filter_includes_inactive_servers() {
        let fleet = vec![
            create_coordinator(
                "c1",
                None,
                vec![
                    create_server("s1", None, true),
                    create_server("s2", None, false),
                ],
            ),
            create_coordinator(
                "c2",
                None,
                vec![
                    create_server("s3", None, true),
                    create_server("s4", None, false),
                ],
            ),
        ];

        // Mutating commands target inactive servers too
        let targets = resolve(&fleet, ".*", ".*", false).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].servers, vec!["s1", "s2"]);
        assert_eq!(targets[1].servers, vec!["s3", "s4"]);

        let targets = resolve(&fleet, ".*", ".*", true).unwrap();
        assert_eq!(targets[0].servers, vec!["s1"]);
        assert_eq!(targets[1].servers, vec!["s3"]);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let fleet = vec![
            create_coordinator(
                "c1",
                Some("alpha"),
                vec![
                    create_server("s1", Some("lobby-1"), true),
                    create_server("s2", Some("lobby-2"), false),
                ],
            ),
            create_coordinator("c2", Some("beta"), vec![create_server("s3", None, true)]),
        ];

        let first = resolve(&fleet, ".*", ".*", false).unwrap();
        let second = resolve(&fleet, ".*", ".*", false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolve_propagates_invalid_pattern() {
        let fleet = vec![create_coordinator("c1", None, vec![])];
        assert!(resolve(&fleet, "[oops", ".*", false).is_err());
        assert!(resolve(&fleet, ".*", "[oops", false).is_err());
    }
}
