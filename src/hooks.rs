use std::sync::Arc;

use actix::Recipient;
use actix_web::{web, HttpResponse};

use crate::{
    http::{GithubWebhook, Webhook},
    notifier::Notification,
};

const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SlackHookError {
    #[error("body must contain `event.text` or a `challenge`")]
    NoEvent,
}

impl actix_web::ResponseError for SlackHookError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            SlackHookError::NoEvent => actix_web::http::StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct SlackMessage {
    pub text: String,
    /// Set on messages posted by bots, including our own.
    #[serde(default)]
    pub bot_id: Option<String>,
}

/// Slack Events API callback, or the one-off `url_verification` handshake.
#[derive(Debug, serde::Deserialize)]
pub struct SlackCallback {
    pub challenge: Option<String>,
    pub event: Option<SlackMessage>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_PAYLOAD_SIZE))
        .route("/github", web::post().to(github_hook))
        .route("/github/event", web::post().to(github_hook))
        .route("/slack", web::post().to(slack_hook));
}

async fn relay(notifier: &Recipient<Notification>, notification: Notification) {
    if let Err(err) = notifier.send(notification).await {
        tracing::error!("Failed to hand notification to notifier: {}", err);
    }
}

pub async fn github_hook(
    hook: GithubWebhook,
    notifier: web::Data<Recipient<Notification>>,
) -> HttpResponse {
    let GithubWebhook { kind, event } = hook;
    let event = match event {
        Some(event) => event,
        None => {
            tracing::debug!(kind = kind.as_str(), "Ignoring GitHub event");
            return HttpResponse::Ok().finish();
        }
    };

    tracing::info!(kind = event.kind(), "Relaying GitHub event");
    relay(&notifier, Notification::Event(Arc::new(event))).await;
    HttpResponse::Ok().finish()
}

pub async fn slack_hook(
    Webhook(callback): Webhook<SlackCallback>,
    notifier: web::Data<Recipient<Notification>>,
) -> Result<String, SlackHookError> {
    let SlackCallback { challenge, event } = callback;

    if let Some(event) = event {
        if let Some(bot_id) = &event.bot_id {
            tracing::debug!(bot_id = bot_id.as_str(), "Ignoring Slack message from a bot");
            return Ok(String::new());
        }
        tracing::info!("Relaying Slack message");
        relay(&notifier, Notification::Relay(event.text.clone())).await;
        return Ok(event.text);
    }

    match challenge {
        Some(challenge) => {
            tracing::info!("Answering Slack URL verification");
            Ok(challenge)
        }
        None => Err(SlackHookError::NoEvent),
    }
}
