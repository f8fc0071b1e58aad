//! End-to-end checks over the pure parts of the publish and CRM pipeline:
//! token handling, stage vocabulary, target planning and aggregation.

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use studio_service::models::{DealStage, Platform, PlatformConnection, PostStatus};
use studio_service::security::TokenIssuer;
use studio_service::services::analytics::{pipeline_value, summarize_revenue};
use studio_service::services::publisher::{plan_target, resolve_aggregate_status, TargetAction};
use uuid::Uuid;

fn connection(user_id: Uuid, platform: Platform) -> PlatformConnection {
    PlatformConnection {
        id: Uuid::new_v4(),
        user_id,
        platform,
        access_token: "token".to_string(),
        refresh_token: None,
        expires_at: None,
        platform_user_id: Some("acct-1".to_string()),
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn bearer_and_oauth_state_tokens_round_trip() {
    let issuer = TokenIssuer::new("integration-secret", 3600);
    let user_id = Uuid::new_v4();

    let token = issuer.issue(user_id).expect("issue bearer");
    assert_eq!(issuer.validate(&token).expect("validate bearer"), user_id);

    let state = issuer
        .issue_oauth_state(user_id, Platform::Linkedin.as_str())
        .expect("issue state");
    let (decoded, platform) = issuer.validate_oauth_state(&state).expect("validate state");
    assert_eq!(decoded, user_id);
    assert_eq!(platform, "linkedin");
}

#[test]
fn mixed_connection_set_splits_targets() {
    let user_id = Uuid::new_v4();
    let mut connected = HashMap::new();
    connected.insert(Platform::Youtube, connection(user_id, Platform::Youtube));
    connected.insert(Platform::Twitter, connection(user_id, Platform::Twitter));

    assert_eq!(plan_target(&connected, Platform::Youtube), TargetAction::Dispatch);
    assert_eq!(plan_target(&connected, Platform::Twitter), TargetAction::Dispatch);
    assert_eq!(
        plan_target(&connected, Platform::Instagram),
        TargetAction::FailNoConnection
    );
    assert_eq!(
        plan_target(&connected, Platform::Linkedin),
        TargetAction::FailNoConnection
    );
}

#[test]
fn post_settles_only_after_every_target_settles() {
    // Three targets: one published, one failed, one still publishing.
    assert_eq!(resolve_aggregate_status(1, 1), None);
    // Last one finishes; any failure makes the whole post failed.
    assert_eq!(resolve_aggregate_status(0, 1), Some(PostStatus::Failed));
    // A clean run publishes.
    assert_eq!(resolve_aggregate_status(0, 0), Some(PostStatus::Published));
}

#[test]
fn stage_vocabulary_is_closed() {
    for raw in [
        "lead",
        "pitched",
        "negotiating",
        "contract_sent",
        "in_progress",
        "completed",
        "cancelled",
    ] {
        assert!(DealStage::from_str(raw).is_some(), "{raw}");
    }
    assert!(DealStage::from_str("won").is_none());
    assert!(DealStage::from_str("").is_none());
}

#[test]
fn dashboard_figures_use_open_deals_and_monthly_buckets() {
    let amounts = vec![
        (DealStage::Lead, 500.0),
        (DealStage::ContractSent, 1_500.0),
        (DealStage::Completed, 10_000.0),
    ];
    assert_eq!(pipeline_value(&amounts), 2_000.0);

    let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
    let summary = summarize_revenue(&[
        (date(3, 1), 250.0),
        (date(3, 15), 250.0),
        (date(4, 1), 100.0),
    ]);
    assert_eq!(summary.total, 600.0);
    assert_eq!(summary.by_month.len(), 2);
    assert_eq!(summary.by_month[0].month, "2025-03");
    assert_eq!(summary.by_month[0].total, 500.0);
}
