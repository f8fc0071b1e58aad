/// OAuth 2.0 flows for the five supported platforms
///
/// Each platform exposes an authorization URL and a code exchange. The state
/// parameter is a short-lived signed token minted by the caller, so the
/// provider callback can be tied back to the initiating user without server
/// side session storage.
use crate::config::ProviderConfig;
use crate::error::{AppError, Result};
use crate::models::Platform;
use crate::platforms::{expect_json, json_str};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;

const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const FACEBOOK_AUTH_ENDPOINT: &str = "https://www.facebook.com/v19.0/dialog/oauth";
const FACEBOOK_TOKEN_ENDPOINT: &str = "https://graph.facebook.com/v19.0/oauth/access_token";
const LINKEDIN_AUTH_ENDPOINT: &str = "https://www.linkedin.com/oauth/v2/authorization";
const LINKEDIN_TOKEN_ENDPOINT: &str = "https://www.linkedin.com/oauth/v2/accessToken";
const TWITTER_AUTH_ENDPOINT: &str = "https://twitter.com/i/oauth2/authorize";
const TWITTER_TOKEN_ENDPOINT: &str = "https://api.twitter.com/2/oauth2/token";

const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";
const GMAIL_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

/// Token material returned by a provider's code exchange.
#[derive(Debug)]
pub struct ExchangedTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub platform_user_id: Option<String>,
}

#[derive(Clone)]
pub struct OAuthService {
    http: Client,
    providers: ProviderConfig,
}

impl OAuthService {
    pub fn new(providers: ProviderConfig) -> Self {
        Self {
            http: Client::new(),
            providers,
        }
    }

    /// Redirect URI registered with the provider for this platform.
    pub fn redirect_uri(&self, platform: Platform) -> String {
        format!(
            "{}/api/connections/{}/callback",
            self.providers.redirect_base_url.trim_end_matches('/'),
            platform.as_str()
        )
    }

    /// Build the provider authorization URL for a flow carrying `state`.
    pub fn auth_url(&self, platform: Platform, state: &str) -> Result<String> {
        let redirect = self.redirect_uri(platform);
        let redirect = urlencoding::encode(&redirect);

        let url = match platform {
            Platform::Youtube | Platform::Gmail => {
                let client_id = self.client_id(platform)?;
                let scope = if platform == Platform::Youtube {
                    YOUTUBE_SCOPE
                } else {
                    GMAIL_SCOPE
                };
                format!(
                    "{GOOGLE_AUTH_ENDPOINT}?client_id={client_id}&redirect_uri={redirect}\
                     &response_type=code&scope={}&access_type=offline&prompt=consent&state={state}",
                    urlencoding::encode(scope)
                )
            }
            Platform::Instagram => {
                let client_id = self.client_id(platform)?;
                format!(
                    "{FACEBOOK_AUTH_ENDPOINT}?client_id={client_id}&redirect_uri={redirect}\
                     &response_type=code&scope=instagram_basic,instagram_content_publish&state={state}"
                )
            }
            Platform::Linkedin => {
                let client_id = self.client_id(platform)?;
                format!(
                    "{LINKEDIN_AUTH_ENDPOINT}?client_id={client_id}&redirect_uri={redirect}\
                     &response_type=code&scope=w_member_social%20profile&state={state}"
                )
            }
            Platform::Twitter => {
                let client_id = self.client_id(platform)?;
                format!(
                    "{TWITTER_AUTH_ENDPOINT}?client_id={client_id}&redirect_uri={redirect}\
                     &response_type=code&scope=tweet.read%20tweet.write%20users.read%20offline.access\
                     &code_challenge=challenge&code_challenge_method=plain&state={state}"
                )
            }
        };

        Ok(url)
    }

    /// Exchange an authorization code for tokens (plus the provider-side
    /// account id where the publish path needs it).
    pub async fn exchange_code(&self, platform: Platform, code: &str) -> Result<ExchangedTokens> {
        match platform {
            Platform::Youtube | Platform::Gmail => self.exchange_google(platform, code).await,
            Platform::Instagram => self.exchange_facebook(code).await,
            Platform::Linkedin => self.exchange_linkedin(code).await,
            Platform::Twitter => self.exchange_twitter(code).await,
        }
    }

    fn client_id(&self, platform: Platform) -> Result<&str> {
        let id = match platform {
            Platform::Youtube | Platform::Gmail => self.providers.google_client_id.as_deref(),
            Platform::Instagram => self.providers.instagram_client_id.as_deref(),
            Platform::Linkedin => self.providers.linkedin_client_id.as_deref(),
            Platform::Twitter => self.providers.twitter_client_id.as_deref(),
        };
        id.ok_or_else(|| {
            AppError::Validation(format!(
                "{} OAuth client is not configured",
                platform.as_str()
            ))
        })
    }

    fn client_secret(&self, platform: Platform) -> Result<&str> {
        let secret = match platform {
            Platform::Youtube | Platform::Gmail => self.providers.google_client_secret.as_deref(),
            Platform::Instagram => self.providers.instagram_client_secret.as_deref(),
            Platform::Linkedin => self.providers.linkedin_client_secret.as_deref(),
            Platform::Twitter => self.providers.twitter_client_secret.as_deref(),
        };
        secret.ok_or_else(|| {
            AppError::Validation(format!(
                "{} OAuth client is not configured",
                platform.as_str()
            ))
        })
    }

    async fn exchange_google(&self, platform: Platform, code: &str) -> Result<ExchangedTokens> {
        let resp = self
            .http
            .post(GOOGLE_TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.client_id(platform)?),
                ("client_secret", self.client_secret(platform)?),
                ("redirect_uri", &self.redirect_uri(platform)),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        let value = expect_json(resp).await?;

        Ok(ExchangedTokens {
            access_token: json_str(&value, "/access_token")?,
            refresh_token: json_str(&value, "/refresh_token").ok(),
            expires_at: expires_at_from(&value),
            platform_user_id: None,
        })
    }

    async fn exchange_facebook(&self, code: &str) -> Result<ExchangedTokens> {
        let resp = self
            .http
            .get(FACEBOOK_TOKEN_ENDPOINT)
            .query(&[
                ("code", code),
                ("client_id", self.client_id(Platform::Instagram)?),
                ("client_secret", self.client_secret(Platform::Instagram)?),
                ("redirect_uri", &self.redirect_uri(Platform::Instagram)),
            ])
            .send()
            .await?;
        let value = expect_json(resp).await?;
        let access_token = json_str(&value, "/access_token")?;

        // Resolve the Instagram business account id behind this token.
        let resp = self
            .http
            .get("https://graph.facebook.com/v19.0/me")
            .query(&[("fields", "id")])
            .bearer_auth(&access_token)
            .send()
            .await?;
        let me = expect_json(resp).await?;

        Ok(ExchangedTokens {
            access_token,
            refresh_token: None,
            expires_at: expires_at_from(&value),
            platform_user_id: json_str(&me, "/id").ok(),
        })
    }

    async fn exchange_linkedin(&self, code: &str) -> Result<ExchangedTokens> {
        let resp = self
            .http
            .post(LINKEDIN_TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.client_id(Platform::Linkedin)?),
                ("client_secret", self.client_secret(Platform::Linkedin)?),
                ("redirect_uri", &self.redirect_uri(Platform::Linkedin)),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        let value = expect_json(resp).await?;
        let access_token = json_str(&value, "/access_token")?;

        let resp = self
            .http
            .get("https://api.linkedin.com/v2/me")
            .bearer_auth(&access_token)
            .send()
            .await?;
        let me = expect_json(resp).await?;

        Ok(ExchangedTokens {
            access_token,
            refresh_token: json_str(&value, "/refresh_token").ok(),
            expires_at: expires_at_from(&value),
            platform_user_id: json_str(&me, "/id").ok(),
        })
    }

    async fn exchange_twitter(&self, code: &str) -> Result<ExchangedTokens> {
        let resp = self
            .http
            .post(TWITTER_TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.client_id(Platform::Twitter)?),
                ("redirect_uri", &self.redirect_uri(Platform::Twitter)),
                ("grant_type", "authorization_code"),
                ("code_verifier", "challenge"),
            ])
            .send()
            .await?;
        let value = expect_json(resp).await?;
        let access_token = json_str(&value, "/access_token")?;

        let resp = self
            .http
            .get("https://api.twitter.com/2/users/me")
            .bearer_auth(&access_token)
            .send()
            .await?;
        let me = expect_json(resp).await?;

        Ok(ExchangedTokens {
            access_token,
            refresh_token: json_str(&value, "/refresh_token").ok(),
            expires_at: expires_at_from(&value),
            platform_user_id: json_str(&me, "/data/id").ok(),
        })
    }
}

fn expires_at_from(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    value
        .pointer("/expires_in")
        .and_then(|v| v.as_i64())
        .map(|secs| Utc::now() + Duration::seconds(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn providers() -> ProviderConfig {
        ProviderConfig {
            google_client_id: Some("google-id".to_string()),
            google_client_secret: Some("google-secret".to_string()),
            twitter_client_id: Some("twitter-id".to_string()),
            redirect_base_url: "https://studio.example.com".to_string(),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_auth_url_carries_client_and_state() {
        let service = OAuthService::new(providers());
        let url = service.auth_url(Platform::Youtube, "state-token").unwrap();
        assert!(url.contains("client_id=google-id"));
        assert!(url.contains("state=state-token"));
        assert!(url.contains("youtube.upload"));
    }

    #[test]
    fn test_auth_url_without_client_is_rejected() {
        let service = OAuthService::new(providers());
        assert!(matches!(
            service.auth_url(Platform::Linkedin, "s"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_redirect_uri_shape() {
        let service = OAuthService::new(providers());
        assert_eq!(
            service.redirect_uri(Platform::Twitter),
            "https://studio.example.com/api/connections/twitter/callback"
        );
    }
}
