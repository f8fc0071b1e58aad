/// Configuration management for studio-service
///
/// Loads all settings from environment variables with development defaults
/// and production guards.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// JWT / password auth settings
    pub auth: AuthConfig,
    /// OAuth client credentials per external platform
    pub providers: ProviderConfig,
    /// LLM provider settings
    pub ai: AiConfig,
    /// Publish scheduler settings
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub token_ttl_secs: i64,
}

/// OAuth client id/secret pairs. A platform with no configured client id
/// cannot start an authorization flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub instagram_client_id: Option<String>,
    pub instagram_client_secret: Option<String>,
    pub linkedin_client_id: Option<String>,
    pub linkedin_client_secret: Option<String>,
    pub twitter_client_id: Option<String>,
    pub twitter_client_secret: Option<String>,
    /// Base URL this service is reachable at, used to build redirect URIs
    pub redirect_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// "openai" or "anthropic"
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between due-post scans
    pub scan_interval_secs: u64,
    /// Number of publish workers draining the queue
    pub worker_count: usize,
    /// Bounded queue depth between the scan loop and workers
    pub queue_depth: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(value) => value,
            Err(_) if app_env.eq_ignore_ascii_case("production") => {
                return Err("JWT_SECRET must be set in production".to_string())
            }
            Err(_) => "studio-dev-secret".to_string(),
        };

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("STUDIO_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("STUDIO_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/studio".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            auth: AuthConfig {
                jwt_secret,
                token_ttl_secs: std::env::var("JWT_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(24 * 3600),
            },
            providers: ProviderConfig {
                google_client_id: std::env::var("GOOGLE_CLIENT_ID").ok(),
                google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET").ok(),
                instagram_client_id: std::env::var("INSTAGRAM_CLIENT_ID").ok(),
                instagram_client_secret: std::env::var("INSTAGRAM_CLIENT_SECRET").ok(),
                linkedin_client_id: std::env::var("LINKEDIN_CLIENT_ID").ok(),
                linkedin_client_secret: std::env::var("LINKEDIN_CLIENT_SECRET").ok(),
                twitter_client_id: std::env::var("TWITTER_CLIENT_ID").ok(),
                twitter_client_secret: std::env::var("TWITTER_CLIENT_SECRET").ok(),
                redirect_base_url: std::env::var("OAUTH_REDIRECT_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            },
            ai: AiConfig {
                provider: std::env::var("AI_PROVIDER").unwrap_or_else(|_| "openai".to_string()),
                openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
                openai_model: std::env::var("OPENAI_MODEL")
                    .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
                anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
                anthropic_model: std::env::var("ANTHROPIC_MODEL")
                    .unwrap_or_else(|_| "claude-3-5-haiku-latest".to_string()),
                request_timeout_secs: std::env::var("AI_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            },
            scheduler: SchedulerConfig {
                scan_interval_secs: std::env::var("PUBLISH_SCAN_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
                worker_count: std::env::var("PUBLISH_WORKER_COUNT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(4),
                queue_depth: std::env::var("PUBLISH_QUEUE_DEPTH")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(64),
            },
        })
    }
}
