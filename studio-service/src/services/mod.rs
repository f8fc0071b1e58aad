/// Business logic layer
pub mod ai;
pub mod analytics;
pub mod oauth;
pub mod publisher;

pub use ai::{AiOutcome, AiService};
pub use analytics::{summarize_revenue, DashboardSummary, RevenueSummary};
pub use oauth::OAuthService;
pub use publisher::PublishService;
