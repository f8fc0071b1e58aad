/// Twitter API v2 adapter
use super::{expect_json, json_str, PlatformPublisher};
use crate::error::Result;
use crate::models::{ContentPost, Platform, PlatformConnection};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const TWEETS_ENDPOINT: &str = "https://api.twitter.com/2/tweets";

pub struct TwitterPublisher {
    http: Client,
}

impl TwitterPublisher {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PlatformPublisher for TwitterPublisher {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn publish(&self, conn: &PlatformConnection, post: &ContentPost) -> Result<String> {
        let resp = self
            .http
            .post(TWEETS_ENDPOINT)
            .bearer_auth(&conn.access_token)
            .json(&json!({ "text": post.resolved_twitter_text() }))
            .send()
            .await?;

        let value = expect_json(resp).await?;
        json_str(&value, "/data/id")
    }
}
