//! Wire shape of the GitHub `push` delivery.
//!
//! Only the fields that end up in a notification are declared; everything
//! else in the payload is ignored by serde.

pub const EVENT_HEADER: &str = "X-GitHub-Event";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct User {
    pub html_url: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct CommitAuthor {
    pub username: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Commit {
    pub message: String,
    pub timestamp: String,
    pub url: String,
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub reference: String,
    pub head_commit: Commit,
    pub sender: User,
}
