/// Dashboard and revenue aggregation
///
/// All figures are computed at request time from the owning user's rows;
/// there is no analytics warehouse behind this.
use crate::db::{deals, deliverables, invoices, posts, revenue};
use crate::error::Result;
use crate::models::{DealStage, PostStatus};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Serialize, PartialEq)]
pub struct MonthTotal {
    /// Calendar month in `YYYY-MM` form
    pub month: String,
    pub total: f64,
}

#[derive(Debug, Serialize)]
pub struct RevenueSummary {
    pub total: f64,
    pub by_month: Vec<MonthTotal>,
}

/// Sum revenue entries overall and per calendar month (ascending).
pub fn summarize_revenue(entries: &[(NaiveDate, f64)]) -> RevenueSummary {
    let mut by_month: BTreeMap<String, f64> = BTreeMap::new();
    let mut total = 0.0;

    for (date, amount) in entries {
        total += amount;
        let key = format!("{:04}-{:02}", date.year(), date.month());
        *by_month.entry(key).or_insert(0.0) += amount;
    }

    RevenueSummary {
        total,
        by_month: by_month
            .into_iter()
            .map(|(month, total)| MonthTotal { month, total })
            .collect(),
    }
}

/// Open pipeline value: deal amounts excluding settled stages.
pub fn pipeline_value(stage_amounts: &[(DealStage, f64)]) -> f64 {
    stage_amounts
        .iter()
        .filter(|(stage, _)| stage.is_open())
        .map(|(_, amount)| amount)
        .sum()
}

#[derive(Debug, Serialize)]
pub struct StageCount {
    pub stage: DealStage,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct PostStatusCount {
    pub status: PostStatus,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub pipeline_value: f64,
    pub deals_by_stage: Vec<StageCount>,
    pub revenue_total: f64,
    pub revenue_this_month: f64,
    pub unpaid_invoice_total: f64,
    /// Deliverables not yet approved, across all of the user's deals
    pub outstanding_deliverables: i64,
    pub posts_by_status: Vec<PostStatusCount>,
}

/// Assemble the dashboard for one user.
pub async fn dashboard(pool: &PgPool, user_id: Uuid) -> Result<DashboardSummary> {
    let stage_amounts = deals::stage_amounts(pool, user_id).await?;

    let mut counts: BTreeMap<&'static str, (DealStage, i64)> = BTreeMap::new();
    for (stage, _) in &stage_amounts {
        counts
            .entry(stage.as_str())
            .and_modify(|(_, n)| *n += 1)
            .or_insert((*stage, 1));
    }

    let entries: Vec<(NaiveDate, f64)> = revenue::list_by_user(pool, user_id)
        .await?
        .into_iter()
        .map(|e| (e.entry_date, e.amount))
        .collect();
    let revenue_summary = summarize_revenue(&entries);

    let now = Utc::now();
    let this_month = format!("{:04}-{:02}", now.year(), now.month());
    let revenue_this_month = revenue_summary
        .by_month
        .iter()
        .find(|m| m.month == this_month)
        .map(|m| m.total)
        .unwrap_or(0.0);

    let unpaid_invoice_total = invoices::unpaid_total(pool, user_id).await?;
    let outstanding_deliverables = deliverables::count_outstanding_for_user(pool, user_id).await?;

    let posts_by_status = posts::counts_by_status(pool, user_id)
        .await?
        .into_iter()
        .map(|(status, count)| PostStatusCount { status, count })
        .collect();

    Ok(DashboardSummary {
        pipeline_value: pipeline_value(&stage_amounts),
        deals_by_stage: counts
            .into_values()
            .map(|(stage, count)| StageCount { stage, count })
            .collect(),
        revenue_total: revenue_summary.total,
        revenue_this_month,
        unpaid_invoice_total,
        outstanding_deliverables,
        posts_by_status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_revenue_summary_by_month() {
        let entries = vec![
            (date(2025, 1, 5), 100.0),
            (date(2025, 1, 20), 200.0),
            (date(2025, 2, 3), 300.0),
        ];

        let summary = summarize_revenue(&entries);
        assert_eq!(summary.total, 600.0);
        assert_eq!(
            summary.by_month,
            vec![
                MonthTotal {
                    month: "2025-01".to_string(),
                    total: 300.0
                },
                MonthTotal {
                    month: "2025-02".to_string(),
                    total: 300.0
                },
            ]
        );
    }

    #[test]
    fn test_revenue_summary_empty() {
        let summary = summarize_revenue(&[]);
        assert_eq!(summary.total, 0.0);
        assert!(summary.by_month.is_empty());
    }

    #[test]
    fn test_pipeline_value_excludes_settled_deals() {
        let amounts = vec![
            (DealStage::Lead, 1_000.0),
            (DealStage::Negotiating, 2_500.0),
            (DealStage::Completed, 9_000.0),
            (DealStage::Cancelled, 400.0),
        ];

        assert_eq!(pipeline_value(&amounts), 3_500.0);
    }
}
