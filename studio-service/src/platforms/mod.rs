/// External platform adapters
///
/// Each publish destination implements [`PlatformPublisher`]: one uniform
/// `publish(connection, post) -> external id` contract, replacing per-platform
/// branching at the call site. Gmail has no publisher; it is credential-only
/// and exposed through [`gmail::fetch_recent_messages`].
use crate::error::{AppError, Result};
use crate::models::{ContentPost, Platform, PlatformConnection};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;

pub mod gmail;
pub mod instagram;
pub mod linkedin;
pub mod twitter;
pub mod youtube;

#[async_trait]
pub trait PlatformPublisher: Send + Sync {
    /// The platform this publisher serves.
    fn platform(&self) -> Platform;

    /// Publish the post under the given credential, returning the
    /// provider-assigned id of the created artifact.
    async fn publish(&self, conn: &PlatformConnection, post: &ContentPost) -> Result<String>;
}

/// Lookup table from platform to its publisher implementation.
#[derive(Clone)]
pub struct PublisherRegistry {
    publishers: HashMap<Platform, Arc<dyn PlatformPublisher>>,
}

impl PublisherRegistry {
    pub fn new(publishers: Vec<Arc<dyn PlatformPublisher>>) -> Self {
        Self {
            publishers: publishers.into_iter().map(|p| (p.platform(), p)).collect(),
        }
    }

    /// Registry wired to the real provider APIs, sharing one HTTP client.
    pub fn with_defaults() -> Self {
        let http = Client::new();
        Self::new(vec![
            Arc::new(youtube::YouTubePublisher::new(http.clone())),
            Arc::new(instagram::InstagramPublisher::new(http.clone())),
            Arc::new(linkedin::LinkedInPublisher::new(http.clone())),
            Arc::new(twitter::TwitterPublisher::new(http)),
        ])
    }

    pub fn get(&self, platform: Platform) -> Option<&Arc<dyn PlatformPublisher>> {
        self.publishers.get(&platform)
    }
}

/// Decode a provider response, surfacing non-2xx bodies as upstream errors.
pub(crate) async fn expect_json(resp: reqwest::Response) -> Result<serde_json::Value> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AppError::Upstream(format!(
            "provider returned {}: {}",
            status, body
        )));
    }
    Ok(resp.json::<serde_json::Value>().await?)
}

/// Pull a string field out of a provider response.
pub(crate) fn json_str(value: &serde_json::Value, pointer: &str) -> Result<String> {
    value
        .pointer(pointer)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            AppError::Upstream(format!("provider response missing field {}", pointer))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_str_extraction() {
        let value = serde_json::json!({"data": {"id": "12345"}});
        assert_eq!(json_str(&value, "/data/id").unwrap(), "12345");
        assert!(json_str(&value, "/data/missing").is_err());
    }

    #[test]
    fn test_default_registry_covers_publish_targets() {
        let registry = PublisherRegistry::with_defaults();
        for platform in [
            Platform::Youtube,
            Platform::Instagram,
            Platform::Linkedin,
            Platform::Twitter,
        ] {
            assert!(registry.get(platform).is_some(), "{:?}", platform);
        }
        assert!(registry.get(Platform::Gmail).is_none());
    }
}
