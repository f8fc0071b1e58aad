/// LinkedIn UGC post adapter
use super::{expect_json, json_str, PlatformPublisher};
use crate::error::{AppError, Result};
use crate::models::{ContentPost, Platform, PlatformConnection};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const UGC_POSTS_ENDPOINT: &str = "https://api.linkedin.com/v2/ugcPosts";

pub struct LinkedInPublisher {
    http: Client,
}

impl LinkedInPublisher {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PlatformPublisher for LinkedInPublisher {
    fn platform(&self) -> Platform {
        Platform::Linkedin
    }

    async fn publish(&self, conn: &PlatformConnection, post: &ContentPost) -> Result<String> {
        let person_id = conn.platform_user_id.as_deref().ok_or_else(|| {
            AppError::Upstream("LinkedIn connection has no member id".to_string())
        })?;

        let body = json!({
            "author": format!("urn:li:person:{person_id}"),
            "lifecycleState": "PUBLISHED",
            "specificContent": {
                "com.linkedin.ugc.ShareContent": {
                    "shareCommentary": { "text": post.resolved_linkedin_text() },
                    "shareMediaCategory": "NONE",
                }
            },
            "visibility": {
                "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC"
            }
        });

        let resp = self
            .http
            .post(UGC_POSTS_ENDPOINT)
            .bearer_auth(&conn.access_token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .json(&body)
            .send()
            .await?;

        let value = expect_json(resp).await?;
        json_str(&value, "/id")
    }
}
