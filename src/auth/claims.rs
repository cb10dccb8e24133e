use serde::{Deserialize, Serialize};

/// Authorization tier, derived from the admin email allowlist at login.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Type of JWT: access or refresh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[serde(alias = "Access")]
    Access,
    #[serde(alias = "Refresh")]
    Refresh,
}

/// JWT payload used for authentication. Identity comes from the OAuth
/// provider at login; users are keyed by email throughout the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>, // display name from the provider
    pub role: Role,
    /// Provider access token, kept only for the user-credentialed
    /// materials-upload path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_token: Option<String>,
    pub iat: usize,     // issued at (unix timestamp)
    pub exp: usize,     // expires at (unix timestamp)
    pub iss: String,    // issuer
    pub aud: String,    // audience
    pub kind: TokenKind, // token type
}

/// Authenticated caller as carried through extractors and handlers.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub provider_token: Option<String>,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            name: claims.name,
            role: claims.role,
            provider_token: claims.provider_token,
        }
    }
}
