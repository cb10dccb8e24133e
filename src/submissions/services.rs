use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use super::repo::{self, NewSubmission, Submission};
use crate::auth::SessionUser;
use crate::state::AppState;
use crate::storage::{ext_from_mime, submission_image_key};

pub struct UploadImage {
    pub filename: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Upload the answer image (if any) and insert the submission record.
/// If the insert fails after a successful upload the blob is orphaned;
/// there is no compensation step.
pub async fn create_with_image(
    st: &AppState,
    user: &SessionUser,
    task_id: Option<Uuid>,
    answer_url: Option<String>,
    answer_text: Option<String>,
    image: Option<UploadImage>,
) -> anyhow::Result<Submission> {
    let image_url = match image {
        Some(img) => {
            let filename = if img.filename.contains('.') {
                img.filename.clone()
            } else {
                // Multipart fields without a filename still get a usable key.
                format!("upload.{}", ext_from_mime(&img.content_type).unwrap_or("png"))
            };
            let key = submission_image_key(&user.email, &filename);
            st.storage
                .put_object(&key, img.body, &img.content_type)
                .await
                .with_context(|| format!("put_object {}", key))?;
            Some(st.storage.public_url(&key))
        }
        None => None,
    };

    let submission = repo::create(
        &st.db,
        NewSubmission {
            email: &user.email,
            user_name: user.name.as_deref(),
            task_id,
            answer_url: answer_url.as_deref(),
            answer_text: answer_text.as_deref(),
            answer_image_url: image_url.as_deref(),
        },
    )
    .await
    .context("insert submission")?;

    Ok(submission)
}
