use actix_web::{
    dev::Payload, error::ResponseError, http::StatusCode, web::Bytes, FromRequest, HttpRequest,
};
use futures::future::{FutureExt, LocalBoxFuture};

use crate::{event::Event, github};

/// JSON request body, answered with `400` when it doesn't match `T`.
#[derive(Debug, Clone)]
pub struct Webhook<T>(pub T);

/// A GitHub delivery, decoded according to its `X-GitHub-Event` header.
#[derive(Debug, Clone)]
pub struct GithubWebhook {
    /// Raw header value, empty when the header is missing.
    pub kind: String,
    /// `None` for deliveries that aren't relayed.
    pub event: Option<Event>,
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("`X-GitHub-Event` header is not valid UTF-8")]
    InvalidEventHeader,
    #[error("failed reading request data: {0}")]
    ActixError(#[from] actix_web::Error),
    #[error("invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidEventHeader => StatusCode::BAD_REQUEST,
            WebhookError::JsonError(_) => StatusCode::BAD_REQUEST,
            WebhookError::ActixError(err) => err.as_response_error().status_code(),
        }
    }
}

fn log_rejection<T>(req: &HttpRequest, res: Result<T, WebhookError>) -> Result<T, WebhookError> {
    if let Err(err) = &res {
        tracing::warn!(path = req.path(), "Rejected webhook: {}", err);
    }
    res
}

impl<T> FromRequest for Webhook<T>
where
    T: serde::de::DeserializeOwned,
{
    type Error = WebhookError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(Bytes::from_request(&req, payload).map(
            move |bytes| -> Result<Self, Self::Error> {
                let res = bytes
                    .map_err(WebhookError::from)
                    .and_then(|bytes| Ok(Self(serde_json::from_slice(&bytes)?)));
                log_rejection(&req, res)
            },
        ))
    }
}

fn decode_github(
    req: &HttpRequest,
    bytes: Result<Bytes, actix_web::Error>,
) -> Result<GithubWebhook, WebhookError> {
    let kind = match req.headers().get(github::EVENT_HEADER) {
        Some(value) => value
            .to_str()
            .map_err(|_| WebhookError::InvalidEventHeader)?
            .to_string(),
        None => String::new(),
    };
    let bytes = bytes?;
    let event = Event::from_github(&kind, &bytes)?;
    Ok(GithubWebhook { kind, event })
}

impl FromRequest for GithubWebhook {
    type Error = WebhookError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(
            Bytes::from_request(&req, payload)
                .map(move |bytes| log_rejection(&req, decode_github(&req, bytes))),
        )
    }
}
