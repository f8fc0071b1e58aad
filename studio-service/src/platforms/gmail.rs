/// Gmail API adapter
///
/// Gmail connections are never publish targets; they exist so the AI
/// email-parsing route can pull recent inbox messages for the user.
use super::{expect_json, json_str};
use crate::error::Result;
use crate::models::PlatformConnection;
use reqwest::Client;
use serde::Serialize;

const GMAIL_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

#[derive(Debug, Clone, Serialize)]
pub struct InboxMessage {
    pub id: String,
    pub from: String,
    pub subject: String,
    pub snippet: String,
}

/// Fetch the user's most recent inbox messages (metadata + snippet only).
pub async fn fetch_recent_messages(
    http: &Client,
    conn: &PlatformConnection,
    max_results: u32,
) -> Result<Vec<InboxMessage>> {
    let resp = http
        .get(format!("{GMAIL_BASE}/messages"))
        .query(&[("maxResults", max_results.to_string()), ("q", "in:inbox".to_string())])
        .bearer_auth(&conn.access_token)
        .send()
        .await?;
    let listing = expect_json(resp).await?;

    let ids: Vec<String> = listing
        .pointer("/messages")
        .and_then(|v| v.as_array())
        .map(|messages| {
            messages
                .iter()
                .filter_map(|m| m.pointer("/id").and_then(|id| id.as_str()))
                .map(|id| id.to_string())
                .collect()
        })
        .unwrap_or_default();

    let mut result = Vec::with_capacity(ids.len());
    for id in ids {
        let resp = http
            .get(format!("{GMAIL_BASE}/messages/{id}"))
            .query(&[
                ("format", "metadata"),
                ("metadataHeaders", "Subject"),
                ("metadataHeaders", "From"),
            ])
            .bearer_auth(&conn.access_token)
            .send()
            .await?;
        let message = expect_json(resp).await?;

        let snippet = json_str(&message, "/snippet").unwrap_or_default();
        let headers = message
            .pointer("/payload/headers")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let header = |name: &str| -> String {
            headers
                .iter()
                .find(|h| {
                    h.pointer("/name").and_then(|n| n.as_str()) == Some(name)
                })
                .and_then(|h| h.pointer("/value").and_then(|v| v.as_str()))
                .unwrap_or_default()
                .to_string()
        };

        result.push(InboxMessage {
            id,
            from: header("From"),
            subject: header("Subject"),
            snippet,
        });
    }

    Ok(result)
}
