//! Chat message templates.
//!
//! Templates live under `templates/<platform>/`. Escaping is off: the output
//! is chat markdown, and the outbound JSON body is serialized separately.

use askama::Template;

use crate::event::{BranchEvent, Event, IssueEvent, PushEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Discord,
    Slack,
}

#[derive(Debug, Template)]
#[template(path = "discord/push.md", escape = "none")]
struct DiscordPush<'a> {
    event: &'a PushEvent,
}

#[derive(Debug, Template)]
#[template(path = "slack/push.md", escape = "none")]
struct SlackPush<'a> {
    event: &'a PushEvent,
}

#[derive(Debug, Template)]
#[template(path = "discord/issue.md", escape = "none")]
struct DiscordIssue<'a> {
    event: &'a IssueEvent,
}

#[derive(Debug, Template)]
#[template(path = "discord/branch.md", escape = "none")]
struct DiscordBranch<'a> {
    event: &'a BranchEvent,
}

/// Renders `event` for `platform`.
///
/// Returns `Ok(None)` when the platform has no template for this kind of
/// event; only pushes are rendered for Slack.
pub fn render(event: &Event, platform: Platform) -> askama::Result<Option<String>> {
    let text = match (event, platform) {
        (Event::Push(event), Platform::Discord) => DiscordPush { event }.render()?,
        (Event::Push(event), Platform::Slack) => SlackPush { event }.render()?,
        (Event::Issue(event), Platform::Discord) => DiscordIssue { event }.render()?,
        (Event::Branch(event), Platform::Discord) => DiscordBranch { event }.render()?,
        (Event::Issue(_), Platform::Slack) | (Event::Branch(_), Platform::Slack) => return Ok(None),
    };
    Ok(Some(text))
}
