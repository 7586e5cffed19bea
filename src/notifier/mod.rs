use std::fmt;

mod discord;
mod slack;
#[cfg(test)]
mod stub;
use std::sync::Arc;

use actix::prelude::*;
use secstr::SecUtf8;

use crate::event::Event;

#[derive(Debug, Clone, PartialEq, Eq, Message)]
#[rtype(result = "()")]
pub enum Notification {
    /// Rendered and sent to every configured platform.
    Event(Arc<Event>),
    /// Sent to Discord as-is.
    Relay(String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: Option<SecUtf8>,
    pub discord_channel: Option<String>,
    pub discord_api_url: String,
    pub slack_token: Option<SecUtf8>,
    pub slack_channel: Option<String>,
    pub slack_api_url: String,
}

#[derive(Clone)]
pub struct Notifier {
    discord: Option<Arc<discord::Discord>>,
    slack: Option<Arc<slack::Slack>>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[derive(Debug)]
        struct Disabled;

        f.debug_struct("Notifier")
            .field(
                "discord",
                match &self.discord {
                    Some(discord) => &discord.channel,
                    None => &Disabled,
                },
            )
            .field(
                "slack",
                match &self.slack {
                    Some(slack) => &slack.channel,
                    None => &Disabled,
                },
            )
            .finish()
    }
}

/// Pairs a token with its channel, warning when only the token is set.
fn credentials(
    platform: &str,
    token: Option<SecUtf8>,
    channel: Option<String>,
) -> Option<(SecUtf8, String)> {
    match (token, channel) {
        (Some(token), Some(channel)) => Some((token, channel)),
        (Some(_), None) => {
            tracing::warn!(
                "{} token is set without a channel, {} is disabled",
                platform,
                platform
            );
            None
        }
        (None, _) => None,
    }
}

impl Notifier {
    pub fn new(config: Config) -> Self {
        let http = Arc::new(awc::Client::default());
        let Config {
            discord_token,
            discord_channel,
            discord_api_url,
            slack_token,
            slack_channel,
            slack_api_url,
        } = config;

        let discord =
            credentials("Discord", discord_token, discord_channel).map(|(token, channel)| {
                Arc::new(discord::Discord::new(
                    http.clone(),
                    &discord_api_url,
                    &token,
                    channel,
                ))
            });
        let slack = credentials("Slack", slack_token, slack_channel).map(|(token, channel)| {
            Arc::new(slack::Slack::new(http, &slack_api_url, &token, channel))
        });

        let notifier = Self { discord, slack };
        tracing::info!("Configured {:?}", notifier);
        notifier
    }
}

impl Actor for Notifier {
    type Context = Context<Self>;
}

impl Handler<Notification> for Notifier {
    type Result = ResponseFuture<()>;

    fn handle(&mut self, msg: Notification, _ctx: &mut Self::Context) -> Self::Result {
        let discord = self.discord.clone();
        let slack = self.slack.clone();

        Box::pin(async move {
            match msg {
                Notification::Event(event) => {
                    let to_discord = async {
                        if let Some(discord) = &discord {
                            discord.notify(&event).await;
                        }
                    };
                    let to_slack = async {
                        if let Some(slack) = &slack {
                            slack.notify(&event).await;
                        }
                    };
                    futures::join!(to_discord, to_slack);
                }
                Notification::Relay(text) => match &discord {
                    Some(discord) => discord.send(&text).await,
                    None => tracing::debug!("Discord is disabled, dropping relayed message"),
                },
            }
        })
    }
}
