/// Background publish scheduling
///
/// A single scan loop claims due posts and feeds them into a bounded queue;
/// a fixed pool of workers drains the queue and runs the publish pass. The
/// queue bound gives backpressure: when workers fall behind, the scan loop
/// blocks on `send` instead of claiming more rows.
use crate::config::SchedulerConfig;
use crate::db::posts;
use crate::metrics;
use crate::services::PublishService;
use sqlx::PgPool;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use uuid::Uuid;

/// Cloneable handle for enqueueing a post id onto the publish queue.
/// Handlers use this for publish-now requests; the scan loop uses it for
/// due scheduled posts.
#[derive(Clone)]
pub struct PublishQueue {
    tx: mpsc::Sender<Uuid>,
}

impl PublishQueue {
    /// Enqueue a post, waiting if the queue is full.
    pub async fn push(&self, post_id: Uuid) -> bool {
        let ok = self.tx.send(post_id).await.is_ok();
        if ok {
            self.record_depth();
        }
        ok
    }

    /// Posts currently buffered between the scan loop and the workers.
    pub fn depth(&self) -> i64 {
        (self.tx.max_capacity() - self.tx.capacity()) as i64
    }

    fn record_depth(&self) {
        metrics::set_queue_depth(self.depth());
    }
}

/// Spawn the scan loop and the worker pool onto `tasks`, returning the
/// queue handle. All spawned tasks exit when `shutdown` fires.
pub fn spawn_scheduler(
    tasks: &mut JoinSet<()>,
    pool: PgPool,
    publisher: PublishService,
    config: &SchedulerConfig,
    shutdown: &broadcast::Sender<()>,
) -> PublishQueue {
    let (tx, rx) = mpsc::channel::<Uuid>(config.queue_depth);
    let queue = PublishQueue { tx };

    // Workers share one receiver behind a mutex so each post id is taken by
    // exactly one worker.
    let rx = std::sync::Arc::new(tokio::sync::Mutex::new(rx));
    for worker_id in 0..config.worker_count.max(1) {
        let rx = rx.clone();
        let publisher = publisher.clone();
        let depth = queue.clone();
        let mut shutdown_rx = shutdown.subscribe();
        tasks.spawn(async move {
            tracing::info!(worker_id, "publish worker started");
            loop {
                let next = {
                    let mut rx = rx.lock().await;
                    tokio::select! {
                        post_id = rx.recv() => post_id,
                        _ = shutdown_rx.recv() => None,
                    }
                };
                let Some(post_id) = next else {
                    break;
                };
                depth.record_depth();

                if let Err(err) = publisher.publish_post(post_id).await {
                    tracing::error!(worker_id, %post_id, error = %err, "publish pass failed");
                }
            }
            tracing::info!(worker_id, "publish worker stopped");
        });
    }

    let scan_queue = queue.clone();
    let interval = Duration::from_secs(config.scan_interval_secs.max(1));
    let batch = config.queue_depth.max(1) as i64;
    let mut shutdown_rx = shutdown.subscribe();
    tasks.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        tracing::info!(interval_secs = interval.as_secs(), "publish scan loop started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown_rx.recv() => break,
            }

            match posts::claim_due_posts(&pool, batch).await {
                Ok(claimed) => {
                    if !claimed.is_empty() {
                        tracing::info!(count = claimed.len(), "claimed due posts");
                    }
                    for post_id in claimed {
                        if !scan_queue.push(post_id).await {
                            tracing::warn!("publish queue closed, stopping scan loop");
                            return;
                        }
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "due post scan failed");
                }
            }
        }
        tracing::info!("publish scan loop stopped");
    });

    queue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_queue_depth_tracks_push_and_drain() {
        let (tx, mut rx) = mpsc::channel::<Uuid>(8);
        let queue = PublishQueue { tx };

        assert_eq!(queue.depth(), 0);
        assert!(queue.push(Uuid::new_v4()).await);
        assert!(queue.push(Uuid::new_v4()).await);
        assert_eq!(queue.depth(), 2);

        rx.recv().await.expect("queued post");
        queue.record_depth();
        assert_eq!(queue.depth(), 1);

        rx.recv().await.expect("queued post");
        queue.record_depth();
        assert_eq!(queue.depth(), 0);
    }
}
