use std::sync::Arc;

use actix_web::http::header;
use color_eyre::eyre::{self, WrapErr as _};
use secstr::SecUtf8;

use crate::{
    event::Event,
    format::{self, Platform},
};

#[derive(Debug, serde::Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

#[derive(Clone)]
pub struct Discord {
    http: Arc<awc::Client>,
    url: String,
    authorization: SecUtf8,
    pub channel: String,
}

impl Discord {
    pub fn new(http: Arc<awc::Client>, api_url: &str, token: &SecUtf8, channel: String) -> Self {
        let url = format!(
            "{}/channels/{}/messages",
            api_url.trim_end_matches('/'),
            channel
        );
        let authorization = SecUtf8::from(format!("Bot {}", token.unsecure()));
        Self {
            http,
            url,
            authorization,
            channel,
        }
    }

    async fn try_send(&self, text: &str) -> eyre::Result<()> {
        let mut resp = self
            .http
            .post(&self.url)
            .insert_header((header::AUTHORIZATION, self.authorization.unsecure()))
            .send_json(&CreateMessage { content: text })
            .await
            .map_err(|err| eyre::eyre!("Failed to send request to Discord: {}", err))?;

        if !resp.status().is_success() {
            let body = resp
                .body()
                .await
                .wrap_err("Failed to fetch Discord response body")?;
            eyre::bail!(
                "Discord API returned error: {}\n{}",
                resp.status(),
                String::from_utf8_lossy(&body)
            );
        }

        tracing::debug!(channel = self.channel.as_str(), "Delivered Discord message");
        Ok(())
    }

    /// Posts `text` to the channel, logging any failure.
    pub async fn send(&self, text: &str) {
        if let Err(err) = self.try_send(text).await {
            tracing::error!(
                channel = self.channel.as_str(),
                "Failed sending Discord notification: {}",
                err
            );
        }
    }

    pub async fn notify(&self, event: &Event) {
        match format::render(event, Platform::Discord) {
            Ok(Some(text)) => self.send(&text).await,
            Ok(None) => {}
            Err(err) => tracing::error!(
                kind = event.kind(),
                "Failed to render Discord message: {}",
                err
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::notifier::stub::StubServer;

    fn discord(stub: &StubServer) -> Discord {
        Discord::new(
            Arc::new(awc::Client::default()),
            &format!("{}/", stub.url()),
            &SecUtf8::from("discord-token"),
            "1290928675688026176".into(),
        )
    }

    #[actix_web::test]
    async fn posts_message_with_bot_token() {
        let stub = StubServer::start().await;
        discord(&stub).send("hello").await;

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/channels/1290928675688026176/messages");
        assert_eq!(
            requests[0].authorization.as_deref(),
            Some("Bot discord-token")
        );
        assert_eq!(
            requests[0].content_type.as_deref(),
            Some("application/json")
        );
        assert_eq!(requests[0].body, serde_json::json!({ "content": "hello" }));
        stub.stop().await;
    }

    #[actix_web::test]
    async fn user_content_survives_serialization() {
        let stub = StubServer::start().await;
        let text = "say \"hi\"\\\nbye\t\u{1}";
        discord(&stub).send(text).await;

        let requests = stub.requests();
        assert_eq!(requests[0].body["content"], text);
        stub.stop().await;
    }

    #[actix_web::test]
    async fn error_status_is_reported() {
        let stub = StubServer::replying(
            actix_web::http::StatusCode::NOT_FOUND,
            serde_json::json!({ "message": "Unknown Channel", "code": 10003 }),
        )
        .await;
        let err = discord(&stub).try_send("hello").await.unwrap_err();
        assert!(err.to_string().contains("404"), "{}", err);
        assert!(err.to_string().contains("Unknown Channel"), "{}", err);

        discord(&stub).send("hello").await;
        assert_eq!(stub.requests().len(), 2);
        stub.stop().await;
    }

    #[actix_web::test]
    async fn unreachable_endpoint_is_reported() {
        let discord = Discord::new(
            Arc::new(awc::Client::default()),
            "http://127.0.0.1:1",
            &SecUtf8::from("discord-token"),
            "1".into(),
        );
        assert!(discord.try_send("hello").await.is_err());
        discord.send("hello").await;
    }
}
