use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{error, info, instrument};

use crate::{
    auth::extractors::{AdminSession, Session},
    drive::DriveFile,
    fetch::soften,
    state::AppState,
};

pub fn material_routes() -> Router<AppState> {
    Router::new().route("/materials", get(list_materials))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/materials", post(upload_material))
        .route("/admin/materials/user", post(upload_material_as_user))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
}

#[instrument(skip(state))]
pub async fn list_materials(
    State(state): State<AppState>,
    Session(_user): Session,
) -> Result<Json<Vec<DriveFile>>, (StatusCode, String)> {
    let files = soften(state.drive.list_files().await, "materials").into_inner();
    Ok(Json(files))
}

struct UploadFile {
    filename: String,
    mime_type: String,
    body: Bytes,
}

async fn read_file_field(mp: &mut Multipart) -> Result<UploadFile, (StatusCode, String)> {
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        let body = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
        return Ok(UploadFile {
            filename,
            mime_type,
            body,
        });
    }
    Err((StatusCode::BAD_REQUEST, "File is required.".into()))
}

/// Service-credentialed upload into the materials folder.
#[instrument(skip(state, mp))]
pub async fn upload_material(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    mut mp: Multipart,
) -> Result<Json<DriveFile>, (StatusCode, String)> {
    let token = state.config.drive.service_token.clone().ok_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        "Drive credentials are missing.".to_string(),
    ))?;

    let file = read_file_field(&mut mp).await?;
    let uploaded = state
        .drive
        .upload(&token, &file.filename, &file.mime_type, file.body)
        .await
        .map_err(|e| {
            error!(error = %e, filename = %file.filename, "material upload failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!(file_id = %uploaded.id, admin = %admin.email, "material uploaded");
    Ok(Json(uploaded))
}

/// Upload with the admin's own provider token, carried in the session since
/// login.
#[instrument(skip(state, mp))]
pub async fn upload_material_as_user(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    mut mp: Multipart,
) -> Result<Json<DriveFile>, (StatusCode, String)> {
    let token = admin.provider_token.clone().ok_or((
        StatusCode::UNAUTHORIZED,
        "Missing provider access token. Re-auth required.".to_string(),
    ))?;

    let file = read_file_field(&mut mp).await?;
    let uploaded = state
        .drive
        .upload(&token, &file.filename, &file.mime_type, file.body)
        .await
        .map_err(|e| {
            error!(error = %e, filename = %file.filename, "user material upload failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!(file_id = %uploaded.id, admin = %admin.email, "material uploaded with user credential");
    Ok(Json(uploaded))
}
