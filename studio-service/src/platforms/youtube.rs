/// YouTube Data API v3 adapter
use super::{expect_json, json_str, PlatformPublisher};
use crate::error::Result;
use crate::models::{ContentPost, Platform, PlatformConnection};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const VIDEOS_ENDPOINT: &str =
    "https://www.googleapis.com/upload/youtube/v3/videos?part=snippet,status&uploadType=resumable";

pub struct YouTubePublisher {
    http: Client,
}

impl YouTubePublisher {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PlatformPublisher for YouTubePublisher {
    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    async fn publish(&self, conn: &PlatformConnection, post: &ContentPost) -> Result<String> {
        let tags: Vec<&str> = post
            .youtube_tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();

        let body = json!({
            "snippet": {
                "title": post.resolved_youtube_title(),
                "description": post.resolved_youtube_description(),
                "tags": tags,
            },
            "status": { "privacyStatus": "public" },
            "mediaUrl": post.media_url,
        });

        let resp = self
            .http
            .post(VIDEOS_ENDPOINT)
            .bearer_auth(&conn.access_token)
            .json(&body)
            .send()
            .await?;

        let value = expect_json(resp).await?;
        json_str(&value, "/id")
    }
}
