use axum::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

/// Identity asserted by the OAuth provider for a valid access token.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub email: String,
    pub name: Option<String>,
}

/// Verifies a provider access token and resolves it to an identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, provider_token: &str) -> anyhow::Result<ProviderIdentity>;
}

/// OpenID Connect userinfo-based verification.
pub struct OidcIdentity {
    http: reqwest::Client,
    userinfo_url: String,
}

impl OidcIdentity {
    pub fn new(userinfo_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            userinfo_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    name: Option<String>,
}

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex");
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[async_trait]
impl IdentityProvider for OidcIdentity {
    async fn verify(&self, provider_token: &str) -> anyhow::Result<ProviderIdentity> {
        let info: UserInfo = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(provider_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let email = info
            .email
            .map(|e| e.trim().to_lowercase())
            .ok_or_else(|| anyhow::anyhow!("provider returned no email"))?;
        anyhow::ensure!(is_valid_email(&email), "provider returned invalid email");

        Ok(ProviderIdentity {
            email,
            name: info.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("intern@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@example.com"));
    }
}
