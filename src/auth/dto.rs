use serde::{Deserialize, Serialize};

use super::claims::Role;

/// Request body for login: the access token issued by the OAuth provider.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub provider_token: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Public part of the session returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

/// Response returned after login or refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_lowercase() {
        let user = PublicUser {
            email: "mentor@example.com".into(),
            name: None,
            role: Role::Admin,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains(r#""role":"admin""#));
    }
}
