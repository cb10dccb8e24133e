use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use super::claims::{Role, SessionUser};
use super::dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest};
use super::extractors::Session;
use super::jwt::JwtKeys;
use crate::{profiles::repo as profiles_repo, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn token_pair(
    keys: &JwtKeys,
    user: &SessionUser,
) -> Result<(String, String), (StatusCode, String)> {
    let access = keys.sign_access(user).map_err(|e| {
        error!(error = %e, "jwt sign access failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let refresh = keys.sign_refresh(user).map_err(|e| {
        error!(error = %e, "jwt sign refresh failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok((access, refresh))
}

/// Exchange a provider access token for a session token pair. The role is
/// computed here, once, from the admin allowlist.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let identity = match state.identity.verify(&payload.provider_token).await {
        Ok(i) => i,
        Err(e) => {
            warn!(error = %e, "provider token rejected");
            return Err((StatusCode::UNAUTHORIZED, "Invalid provider token".into()));
        }
    };

    let role = if state.config.is_admin(&identity.email) {
        Role::Admin
    } else {
        Role::User
    };

    let user = SessionUser {
        email: identity.email,
        name: identity.name,
        role,
        provider_token: Some(payload.provider_token),
    };

    let keys = JwtKeys::from_ref(&state);
    let (access_token, refresh_token) = token_pair(&keys, &user)?;

    info!(email = %user.email, role = ?user.role, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let keys = JwtKeys::from_ref(&state);
    let claims = match keys.verify_refresh(&payload.refresh_token) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "refresh token rejected");
            return Err((StatusCode::UNAUTHORIZED, "Invalid refresh token".into()));
        }
    };

    let user = SessionUser::from(claims);
    let (access_token, refresh_token) = token_pair(&keys, &user)?;

    info!(email = %user.email, "session refreshed");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser {
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        },
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub has_profile: bool,
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    Session(user): Session,
) -> Result<Json<MeResponse>, (StatusCode, String)> {
    let has_profile = profiles_repo::get_by_email(&state.db, &user.email)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, email = %user.email, "profile lookup degraded");
            None
        })
        .is_some();

    Ok(Json(MeResponse {
        email: user.email,
        name: user.name,
        role: user.role,
        has_profile,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn me_response_serialization() {
        let response = MeResponse {
            email: "intern@example.com".to_string(),
            name: Some("Intern One".to_string()),
            role: Role::User,
            has_profile: false,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("intern@example.com"));
        assert!(json.contains(r#""role":"user""#));
        assert!(json.contains(r#""has_profile":false"#));
    }
}
