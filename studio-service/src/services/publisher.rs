/// Publish orchestration
///
/// Drives one content post through its per-platform targets: each pending
/// target either fails fast (no active credential) or is dispatched to the
/// platform's publisher. A target gets exactly one attempt per pass; failed
/// targets stay failed until a manual publish-now resets them.
use crate::db::{connections, posts};
use crate::error::Result;
use crate::metrics;
use crate::models::{Platform, PlatformConnection, PostStatus};
use crate::platforms::PublisherRegistry;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

const NOT_CONNECTED_MESSAGE: &str = "Platform not connected";

/// Decision for a single pending target before any I/O happens.
#[derive(Debug, PartialEq, Eq)]
pub enum TargetAction {
    /// An active credential exists; hand the post to the platform adapter.
    Dispatch,
    /// No active credential; the target fails without invoking any adapter.
    FailNoConnection,
}

/// Pure planning step: a target is only dispatched when its platform has an
/// active connection.
pub fn plan_target(
    connected: &HashMap<Platform, PlatformConnection>,
    platform: Platform,
) -> TargetAction {
    if connected.contains_key(&platform) {
        TargetAction::Dispatch
    } else {
        TargetAction::FailNoConnection
    }
}

/// Aggregate state once a pass over the targets completes. `None` while any
/// target is still pending or publishing; otherwise `failed` wins over
/// `published`.
pub fn resolve_aggregate_status(in_flight: i64, failed: i64) -> Option<PostStatus> {
    if in_flight > 0 {
        None
    } else if failed > 0 {
        Some(PostStatus::Failed)
    } else {
        Some(PostStatus::Published)
    }
}

#[derive(Clone)]
pub struct PublishService {
    pool: PgPool,
    registry: PublisherRegistry,
}

impl PublishService {
    pub fn new(pool: PgPool, registry: PublisherRegistry) -> Self {
        Self { pool, registry }
    }

    /// Run one best-effort publish pass over a post's pending targets, then
    /// recompute the post's aggregate status.
    pub async fn publish_post(&self, post_id: Uuid) -> Result<()> {
        let Some(post) = posts::load(&self.pool, post_id).await? else {
            tracing::warn!(%post_id, "claimed post no longer exists, skipping");
            return Ok(());
        };

        let targets = posts::pending_targets(&self.pool, post_id).await?;
        let connected: HashMap<Platform, PlatformConnection> =
            connections::list_active_by_user(&self.pool, post.user_id)
                .await?
                .into_iter()
                .map(|c| (c.platform, c))
                .collect();

        for target in targets {
            match plan_target(&connected, target.platform) {
                TargetAction::FailNoConnection => {
                    posts::mark_target_failed(&self.pool, target.id, NOT_CONNECTED_MESSAGE)
                        .await?;
                    metrics::record_publish_attempt(target.platform.as_str(), "not_connected");
                    tracing::info!(
                        %post_id,
                        platform = target.platform.as_str(),
                        "target failed: no active connection"
                    );
                }
                TargetAction::Dispatch => {
                    posts::mark_target_publishing(&self.pool, target.id).await?;

                    let conn = &connected[&target.platform];
                    let outcome = match self.registry.get(target.platform) {
                        Some(publisher) => publisher.publish(conn, &post).await,
                        None => Err(crate::error::AppError::Internal(format!(
                            "no publisher registered for {}",
                            target.platform.as_str()
                        ))),
                    };

                    match outcome {
                        Ok(external_id) => {
                            posts::mark_target_published(&self.pool, target.id, &external_id)
                                .await?;
                            posts::set_post_external_id(
                                &self.pool,
                                post_id,
                                target.platform,
                                &external_id,
                            )
                            .await?;
                            metrics::record_publish_attempt(target.platform.as_str(), "published");
                            tracing::info!(
                                %post_id,
                                platform = target.platform.as_str(),
                                %external_id,
                                "target published"
                            );
                        }
                        Err(err) => {
                            posts::mark_target_failed(&self.pool, target.id, &err.to_string())
                                .await?;
                            metrics::record_publish_attempt(target.platform.as_str(), "failed");
                            tracing::warn!(
                                %post_id,
                                platform = target.platform.as_str(),
                                error = %err,
                                "target publish failed"
                            );
                        }
                    }
                }
            }
        }

        self.finalize(post_id).await
    }

    /// Recompute the post's aggregate status from its target states.
    async fn finalize(&self, post_id: Uuid) -> Result<()> {
        let (in_flight, failed) = posts::target_counts(&self.pool, post_id).await?;

        if let Some(status) = resolve_aggregate_status(in_flight, failed) {
            let last_error = match status {
                PostStatus::Failed => Some(format!("{failed} platform target(s) failed")),
                _ => None,
            };
            posts::finalize_status(&self.pool, post_id, status, last_error.as_deref()).await?;
            tracing::info!(%post_id, ?status, "post finalized");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn connection(platform: Platform) -> PlatformConnection {
        PlatformConnection {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            platform,
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: None,
            platform_user_id: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_aggregate_published_when_no_failures() {
        assert_eq!(resolve_aggregate_status(0, 0), Some(PostStatus::Published));
    }

    #[test]
    fn test_aggregate_failed_when_any_target_failed() {
        assert_eq!(resolve_aggregate_status(0, 1), Some(PostStatus::Failed));
        assert_eq!(resolve_aggregate_status(0, 3), Some(PostStatus::Failed));
    }

    #[test]
    fn test_aggregate_unresolved_while_targets_in_flight() {
        assert_eq!(resolve_aggregate_status(1, 0), None);
        assert_eq!(resolve_aggregate_status(2, 1), None);
    }

    #[test]
    fn test_unconnected_platform_fails_without_dispatch() {
        let mut connected = HashMap::new();
        connected.insert(Platform::Twitter, connection(Platform::Twitter));

        assert_eq!(
            plan_target(&connected, Platform::Youtube),
            TargetAction::FailNoConnection
        );
        assert_eq!(
            plan_target(&connected, Platform::Twitter),
            TargetAction::Dispatch
        );
    }
}
