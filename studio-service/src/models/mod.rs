/// Data models for studio-service
///
/// Row types map 1:1 onto the tables in `migrations/`, with enum columns
/// backed by PostgreSQL enum types. Per-platform text fallbacks live on
/// `ContentPost` so publish adapters and handlers share one resolution rule.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Sales pipeline stage matching database deal_stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "deal_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    Lead,
    Pitched,
    Negotiating,
    ContractSent,
    InProgress,
    Completed,
    Cancelled,
}

impl DealStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::Lead => "lead",
            DealStage::Pitched => "pitched",
            DealStage::Negotiating => "negotiating",
            DealStage::ContractSent => "contract_sent",
            DealStage::InProgress => "in_progress",
            DealStage::Completed => "completed",
            DealStage::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lead" => Some(DealStage::Lead),
            "pitched" => Some(DealStage::Pitched),
            "negotiating" => Some(DealStage::Negotiating),
            "contract_sent" => Some(DealStage::ContractSent),
            "in_progress" => Some(DealStage::InProgress),
            "completed" => Some(DealStage::Completed),
            "cancelled" => Some(DealStage::Cancelled),
            _ => None,
        }
    }

    /// Stages counted toward open pipeline value. Completed and cancelled
    /// deals are settled and excluded from the dashboard figure.
    pub fn is_open(&self) -> bool {
        !matches!(self, DealStage::Completed | DealStage::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "deliverable_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliverableStatus {
    Pending,
    InProgress,
    Submitted,
    Approved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(InvoiceStatus::Draft),
            "sent" => Some(InvoiceStatus::Sent),
            "paid" => Some(InvoiceStatus::Paid),
            "overdue" => Some(InvoiceStatus::Overdue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "ticket_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

/// External platform matching database platform_kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "platform_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Youtube,
    Instagram,
    Linkedin,
    Twitter,
    Gmail,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Gmail => "gmail",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "youtube" => Some(Platform::Youtube),
            "instagram" => Some(Platform::Instagram),
            "linkedin" => Some(Platform::Linkedin),
            "twitter" => Some(Platform::Twitter),
            "gmail" => Some(Platform::Gmail),
            _ => None,
        }
    }

    /// Platforms a content post can be published to. Gmail is credential-only.
    pub fn is_publish_target(&self) -> bool {
        !matches!(self, Platform::Gmail)
    }
}

/// Aggregate content post lifecycle matching database post_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "post_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Scheduled,
    Publishing,
    Published,
    Failed,
}

impl PostStatus {
    /// Manual edits are only permitted before the post enters the publish
    /// pipeline.
    pub fn is_editable(&self) -> bool {
        matches!(self, PostStatus::Draft | PostStatus::Scheduled)
    }
}

/// Per-platform publish state matching database platform_post_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "platform_post_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlatformPostStatus {
    Pending,
    Publishing,
    Published,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "post_media_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Text,
    Photo,
    Video,
    Reel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "note_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Note,
    Email,
    Call,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "ai_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AiKind {
    ParseEmail,
    SuggestRate,
    Repurpose,
}

impl AiKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiKind::ParseEmail => "parse_email",
            AiKind::SuggestRate => "suggest_rate",
            AiKind::Repurpose => "repurpose",
        }
    }
}

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Brand {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub brand_id: Uuid,
    pub title: String,
    pub stage: DealStage,
    pub amount: f64,
    pub currency: String,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deliverable {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub title: String,
    pub platform: Option<Platform>,
    pub due_date: Option<NaiveDate>,
    pub status: DeliverableStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RevenueEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub deal_id: Option<Uuid>,
    pub amount: f64,
    pub currency: String,
    pub source: Option<String>,
    pub entry_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub deal_id: Option<Uuid>,
    pub invoice_number: String,
    pub amount: f64,
    pub currency: String,
    pub status: InvoiceStatus,
    pub issued_at: Option<NaiveDate>,
    pub due_at: Option<NaiveDate>,
    pub paid_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NegotiationNote {
    pub id: Uuid,
    pub deal_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub kind: NoteKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub body: Option<String>,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored OAuth credential for one external platform
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlatformConnection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub platform: Platform,
    #[serde(skip_serializing)]
    pub access_token: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub platform_user_id: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A composed piece of content intended for publication
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentPost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub deal_id: Option<Uuid>,
    pub title: String,
    pub body: String,
    pub media_type: MediaType,
    pub media_url: Option<String>,
    pub youtube_title: Option<String>,
    pub youtube_description: Option<String>,
    pub youtube_tags: Option<String>,
    pub instagram_caption: Option<String>,
    pub linkedin_text: Option<String>,
    pub twitter_text: Option<String>,
    pub status: PostStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub youtube_video_id: Option<String>,
    pub instagram_media_id: Option<String>,
    pub linkedin_post_id: Option<String>,
    pub tweet_id: Option<String>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentPost {
    /// YouTube upload title: override, else generic post title.
    pub fn resolved_youtube_title(&self) -> &str {
        non_empty(self.youtube_title.as_deref()).unwrap_or(&self.title)
    }

    /// YouTube upload description: override, else generic body.
    pub fn resolved_youtube_description(&self) -> &str {
        non_empty(self.youtube_description.as_deref()).unwrap_or(&self.body)
    }

    /// Instagram caption: override, else generic body.
    pub fn resolved_instagram_caption(&self) -> &str {
        non_empty(self.instagram_caption.as_deref()).unwrap_or(&self.body)
    }

    /// LinkedIn post text: override, else generic body.
    pub fn resolved_linkedin_text(&self) -> &str {
        non_empty(self.linkedin_text.as_deref()).unwrap_or(&self.body)
    }

    /// Tweet text: override, else generic body.
    pub fn resolved_twitter_text(&self) -> &str {
        non_empty(self.twitter_text.as_deref()).unwrap_or(&self.body)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

/// Publish record for one post on one platform. This is the unit of work
/// the scheduler drives.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostPlatform {
    pub id: Uuid,
    pub post_id: Uuid,
    pub platform: Platform,
    pub status: PlatformPostStatus,
    pub external_id: Option<String>,
    pub error_message: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AiInteraction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: AiKind,
    pub provider: String,
    pub prompt: String,
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_post() -> ContentPost {
        ContentPost {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            deal_id: None,
            title: "Launch video".to_string(),
            body: "Check out the new launch".to_string(),
            media_type: MediaType::Video,
            media_url: None,
            youtube_title: None,
            youtube_description: None,
            youtube_tags: None,
            instagram_caption: None,
            linkedin_text: None,
            twitter_text: None,
            status: PostStatus::Draft,
            scheduled_at: None,
            published_at: None,
            youtube_video_id: None,
            instagram_media_id: None,
            linkedin_post_id: None,
            tweet_id: None,
            last_error: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_platform_text_fallbacks() {
        let mut post = blank_post();
        assert_eq!(post.resolved_youtube_title(), "Launch video");
        assert_eq!(post.resolved_twitter_text(), "Check out the new launch");

        post.youtube_title = Some("YT exclusive".to_string());
        post.twitter_text = Some("Short tweet".to_string());
        assert_eq!(post.resolved_youtube_title(), "YT exclusive");
        assert_eq!(post.resolved_twitter_text(), "Short tweet");

        // Whitespace-only overrides fall back to the generic fields
        post.instagram_caption = Some("   ".to_string());
        assert_eq!(post.resolved_instagram_caption(), "Check out the new launch");
    }

    #[test]
    fn test_deal_stage_round_trip() {
        for stage in [
            DealStage::Lead,
            DealStage::Pitched,
            DealStage::Negotiating,
            DealStage::ContractSent,
            DealStage::InProgress,
            DealStage::Completed,
            DealStage::Cancelled,
        ] {
            assert_eq!(DealStage::from_str(stage.as_str()), Some(stage));
        }
        assert_eq!(DealStage::from_str("archived"), None);
    }

    #[test]
    fn test_open_pipeline_stages() {
        assert!(DealStage::Lead.is_open());
        assert!(DealStage::InProgress.is_open());
        assert!(!DealStage::Completed.is_open());
        assert!(!DealStage::Cancelled.is_open());
    }

    #[test]
    fn test_gmail_is_not_a_publish_target() {
        assert!(!Platform::Gmail.is_publish_target());
        assert!(Platform::Youtube.is_publish_target());
    }

    #[test]
    fn test_post_editability() {
        assert!(PostStatus::Draft.is_editable());
        assert!(PostStatus::Scheduled.is_editable());
        assert!(!PostStatus::Publishing.is_editable());
        assert!(!PostStatus::Published.is_editable());
        assert!(!PostStatus::Failed.is_editable());
    }
}
