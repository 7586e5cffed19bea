use std::sync::Arc;

use actix_web::http::header;
use color_eyre::eyre;
use secstr::SecUtf8;

use crate::{
    event::Event,
    format::{self, Platform},
};

#[derive(Debug, serde::Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

/// Slack answers `200` even for rejected messages; `ok` carries the outcome.
#[derive(Debug, serde::Deserialize)]
struct PostMessageResponse {
    ok: bool,
    error: Option<String>,
}

#[derive(Clone)]
pub struct Slack {
    http: Arc<awc::Client>,
    url: String,
    authorization: SecUtf8,
    pub channel: String,
}

impl Slack {
    pub fn new(http: Arc<awc::Client>, api_url: &str, token: &SecUtf8, channel: String) -> Self {
        let url = format!("{}/chat.postMessage", api_url.trim_end_matches('/'));
        let authorization = SecUtf8::from(format!("Bearer {}", token.unsecure()));
        Self {
            http,
            url,
            authorization,
            channel,
        }
    }

    async fn try_send(&self, text: &str) -> eyre::Result<()> {
        let message = PostMessage {
            channel: &self.channel,
            text,
        };

        let mut resp = self
            .http
            .post(&self.url)
            .insert_header((header::AUTHORIZATION, self.authorization.unsecure()))
            .send_json(&message)
            .await
            .map_err(|err| eyre::eyre!("Failed to send request to Slack: {}", err))?;

        if !resp.status().is_success() {
            eyre::bail!("Slack API returned error status: {}", resp.status());
        }

        let body: PostMessageResponse = resp
            .json()
            .await
            .map_err(|err| eyre::eyre!("Failed to decode Slack response: {}", err))?;
        if !body.ok {
            eyre::bail!(
                "Slack API rejected message: {}",
                body.error.as_deref().unwrap_or("unknown error")
            );
        }

        tracing::debug!(channel = self.channel.as_str(), "Delivered Slack message");
        Ok(())
    }

    pub async fn send(&self, text: &str) {
        if let Err(err) = self.try_send(text).await {
            tracing::error!(
                channel = self.channel.as_str(),
                "Failed sending Slack notification: {}",
                err
            );
        }
    }

    pub async fn notify(&self, event: &Event) {
        match format::render(event, Platform::Slack) {
            Ok(Some(text)) => self.send(&text).await,
            Ok(None) => tracing::debug!(kind = event.kind(), "No Slack template, skipping"),
            Err(err) => tracing::error!(
                kind = event.kind(),
                "Failed to render Slack message: {}",
                err
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        event::{Event, IssueEvent},
        notifier::stub::StubServer,
    };

    fn slack(stub: &StubServer) -> Slack {
        Slack::new(
            Arc::new(awc::Client::default()),
            &stub.url(),
            &SecUtf8::from("slack-token"),
            "C0123".into(),
        )
    }

    #[actix_web::test]
    async fn posts_message_with_bearer_token() {
        let stub = StubServer::start().await;
        slack(&stub).send("line \"one\"\nline two").await;

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/chat.postMessage");
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer slack-token"));
        assert_eq!(
            requests[0].body,
            serde_json::json!({ "channel": "C0123", "text": "line \"one\"\nline two" })
        );
        stub.stop().await;
    }

    #[actix_web::test]
    async fn rejected_message_is_reported() {
        let stub = StubServer::replying(
            StatusCode::OK,
            serde_json::json!({ "ok": false, "error": "channel_not_found" }),
        )
        .await;
        let err = slack(&stub).try_send("hello").await.unwrap_err();
        assert!(err.to_string().contains("channel_not_found"), "{}", err);
        stub.stop().await;
    }

    #[actix_web::test]
    async fn error_status_is_reported() {
        let stub = StubServer::replying(StatusCode::UNAUTHORIZED, serde_json::json!({})).await;
        let err = slack(&stub).try_send("hello").await.unwrap_err();
        assert!(err.to_string().contains("401"), "{}", err);
        stub.stop().await;
    }

    #[actix_web::test]
    async fn skips_events_without_slack_template() {
        let stub = StubServer::start().await;
        let issue = Event::Issue(IssueEvent {
            action: "opened".into(),
            url: "https://github.com/o/r/issues/1".into(),
            title: "Broken build".into(),
            description: String::new(),
            author: "bob".into(),
            author_url: "https://github.com/bob".into(),
            created_time: "2024-02-10 08:15".into(),
        });
        slack(&stub).notify(&issue).await;

        assert!(stub.requests().is_empty());
        stub.stop().await;
    }
}
