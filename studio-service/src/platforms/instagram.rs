/// Instagram Graph API adapter
///
/// Publishing is a two-step flow: create a media container, then publish it.
/// Reels and photos use the same endpoints with different container fields.
use super::{expect_json, json_str, PlatformPublisher};
use crate::error::{AppError, Result};
use crate::models::{ContentPost, MediaType, Platform, PlatformConnection};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const GRAPH_BASE: &str = "https://graph.facebook.com/v19.0";

pub struct InstagramPublisher {
    http: Client,
}

impl InstagramPublisher {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PlatformPublisher for InstagramPublisher {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    async fn publish(&self, conn: &PlatformConnection, post: &ContentPost) -> Result<String> {
        let ig_user_id = conn.platform_user_id.as_deref().ok_or_else(|| {
            AppError::Upstream("Instagram connection has no account id".to_string())
        })?;

        let media_url = post.media_url.as_deref().ok_or_else(|| {
            AppError::Upstream("Instagram publishing requires a media URL".to_string())
        })?;

        let caption = post.resolved_instagram_caption();

        let container_body = match post.media_type {
            MediaType::Reel | MediaType::Video => json!({
                "media_type": "REELS",
                "video_url": media_url,
                "caption": caption,
            }),
            _ => json!({
                "image_url": media_url,
                "caption": caption,
            }),
        };

        let resp = self
            .http
            .post(format!("{GRAPH_BASE}/{ig_user_id}/media"))
            .bearer_auth(&conn.access_token)
            .json(&container_body)
            .send()
            .await?;
        let container = expect_json(resp).await?;
        let creation_id = json_str(&container, "/id")?;

        let resp = self
            .http
            .post(format!("{GRAPH_BASE}/{ig_user_id}/media_publish"))
            .bearer_auth(&conn.access_token)
            .json(&json!({ "creation_id": creation_id }))
            .send()
            .await?;
        let published = expect_json(resp).await?;
        json_str(&published, "/id")
    }
}
