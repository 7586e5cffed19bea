use secstr::SecUtf8;
use serde::{Deserialize, Deserializer};

/// Process configuration, read from the environment once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default, deserialize_with = "deserialize_opt_secutf8")]
    pub discord_bot_token: Option<SecUtf8>,
    #[serde(default, deserialize_with = "deserialize_opt_nonempty")]
    pub discord_channel_id: Option<String>,
    #[serde(default = "default_discord_api_url")]
    pub discord_api_url: String,
    #[serde(default, deserialize_with = "deserialize_opt_secutf8")]
    pub slack_bot_token: Option<SecUtf8>,
    #[serde(default, deserialize_with = "deserialize_opt_nonempty")]
    pub slack_channel_id: Option<String>,
    #[serde(default = "default_slack_api_url")]
    pub slack_api_url: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".into()
}

fn default_discord_api_url() -> String {
    "https://discord.com/api".into()
}

fn default_slack_api_url() -> String {
    "https://slack.com/api".into()
}

/// An empty variable counts as unset.
fn deserialize_opt_nonempty<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(|o| o.filter(|s| !s.is_empty()))
}

fn deserialize_opt_secutf8<'de, D>(de: D) -> Result<Option<SecUtf8>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_opt_nonempty(de).map(|o| o.map(SecUtf8::from))
}
