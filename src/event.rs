use chrono::DateTime;

use crate::github;

/// Format used for every timestamp shown in a chat message.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const BRANCH_PREFIX: &str = "refs/heads/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    pub user: String,
    pub user_url: String,
    pub commit_message: String,
    pub commit_url: String,
    pub branch: String,
    pub time: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueEvent {
    pub action: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub author_url: String,
    pub created_time: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchEvent {
    pub action: String,
    pub name: String,
    pub author: String,
    pub author_url: String,
    pub base_branch: String,
    pub description: String,
    pub url: String,
    pub created_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Push(PushEvent),
    // Keep unrouted variants: they have Discord templates but no GitHub
    // delivery is decoded into them
    #[allow(dead_code)]
    Issue(IssueEvent),
    #[allow(dead_code)]
    Branch(BranchEvent),
}

impl Event {
    /// Decodes a GitHub delivery named by the `X-GitHub-Event` header.
    ///
    /// Only `push` is relayed. Every other delivery yields `Ok(None)` and its
    /// body is not parsed at all.
    pub fn from_github(kind: &str, body: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        match kind {
            "push" => {
                let push: github::PushEvent = serde_json::from_slice(body)?;
                Ok(Some(Self::Push(push.into())))
            }
            _ => Ok(None),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Push(_) => "push",
            Event::Issue(_) => "issue",
            Event::Branch(_) => "branch",
        }
    }
}

/// Formats an RFC 3339 timestamp as [`TIME_FORMAT`], keeping its offset.
///
/// An unparseable timestamp is logged and rendered as an empty string so the
/// notification still goes out.
pub fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(time) => time.format(TIME_FORMAT).to_string(),
        Err(err) => {
            tracing::warn!(timestamp = raw, "Failed to parse timestamp: {}", err);
            String::new()
        }
    }
}

fn branch_name(reference: &str) -> &str {
    reference.strip_prefix(BRANCH_PREFIX).unwrap_or(reference)
}

impl From<github::PushEvent> for PushEvent {
    fn from(event: github::PushEvent) -> Self {
        let github::PushEvent {
            reference,
            head_commit,
            sender,
        } = event;

        Self {
            user: head_commit.author.username,
            user_url: sender.html_url,
            commit_message: head_commit.message,
            commit_url: head_commit.url,
            branch: branch_name(&reference).to_string(),
            time: format_timestamp(&head_commit.timestamp),
        }
    }
}
