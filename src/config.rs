//! Configuration file structures for the bot.
//!
//! Configuration is loaded from a YAML file, with every value overridable
//! through environment variables. The file is split into two sections: the
//! Slack account settings and the network coordinator settings.
//!
//! # Configuration File Format
//!
//! ```yaml
//! slack:
//!   app_token: "xapp-..."
//!   bot_token: "xoxb-..."
//!   channel: "playpen"
//!
//! fleet:
//!   url: "http://localhost:9000"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Any value can be overridden with a `PLAYPEN_` prefixed variable, using
//! `__` as the section separator:
//!
//! ```bash
//! export PLAYPEN_SLACK__BOT_TOKEN="xoxb-from-env"
//! export PLAYPEN_FLEET__URL="http://coordinator:9000"
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Default base url of the Slack Web API.
fn default_api_url() -> String {
    "https://slack.com/api".to_string()
}

/// Root configuration structure for the bot.
#[derive(Deserialize, Debug)]
pub struct Config {
    /// Slack account configuration
    pub slack: Slack,
    /// Network coordinator configuration
    pub fleet: Fleet,
}

/// Slack account configuration.
#[derive(Deserialize, Debug)]
pub struct Slack {
    /// Base url of the Slack Web API.
    ///
    /// Defaults to the public API; override it to point the bot at a test
    /// double.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// App-level token with the `connections:write` scope, used to open
    /// Socket Mode connections.
    pub app_token: String,

    /// Bot token used for the Web API calls.
    pub bot_token: String,

    /// Name of the channel the bot listens and responds in.
    pub channel: String,
}

/// Network coordinator configuration.
#[derive(Deserialize, Debug)]
pub struct Fleet {
    /// Base url of the network coordinator's REST API.
    pub url: String,
}

impl Config {
    /// Loads the configuration from a YAML file, merging `PLAYPEN_` prefixed
    /// environment variables on top.
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("PLAYPEN_").split("__"))
            .extract()
    }
}
