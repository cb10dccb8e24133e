use axum::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::config::DriveConfig;

/// File metadata returned by the document-storage API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    #[serde(rename = "webViewLink")]
    pub web_view_link: Option<String>,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
    #[serde(rename = "modifiedTime")]
    pub modified_time: Option<String>,
    pub size: Option<String>,
}

#[async_trait]
pub trait DriveClient: Send + Sync {
    /// List files in the configured materials folder, newest first.
    /// Returns an empty list when no folder is configured.
    async fn list_files(&self) -> anyhow::Result<Vec<DriveFile>>;

    /// Upload a file with the given bearer token (service or user provider
    /// token) and return its id, name, and view link.
    async fn upload(
        &self,
        token: &str,
        filename: &str,
        mime_type: &str,
        body: Bytes,
    ) -> anyhow::Result<DriveFile>;
}

pub struct Drive {
    http: reqwest::Client,
    config: DriveConfig,
}

impl Drive {
    pub fn new(config: DriveConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Serialize)]
struct UploadMetadata<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parents: Option<Vec<String>>,
}

#[async_trait]
impl DriveClient for Drive {
    async fn list_files(&self) -> anyhow::Result<Vec<DriveFile>> {
        let Some(folder_id) = self.config.folder_id.as_deref() else {
            return Ok(Vec::new());
        };
        let token = self
            .config
            .service_token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("drive service token is missing"))?;

        let query = format!("'{}' in parents and trashed = false", folder_id);
        let response = self
            .http
            .get(format!("{}/files", self.config.api_base))
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id, name, webViewLink, mimeType, modifiedTime, size)"),
                ("orderBy", "modifiedTime desc"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: FileListResponse = response.json().await?;
        Ok(payload.files)
    }

    async fn upload(
        &self,
        token: &str,
        filename: &str,
        mime_type: &str,
        body: Bytes,
    ) -> anyhow::Result<DriveFile> {
        let metadata = UploadMetadata {
            name: filename,
            parents: self.config.folder_id.clone().map(|id| vec![id]),
        };

        let meta_part = reqwest::multipart::Part::text(serde_json::to_string(&metadata)?)
            .mime_str("application/json")?;
        let media_part = reqwest::multipart::Part::bytes(body.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime_type)?;
        let form = reqwest::multipart::Form::new()
            .part("metadata", meta_part)
            .part("media", media_part);

        let response = self
            .http
            .post(format!("{}/files", self.config.upload_base))
            .bearer_auth(token)
            .query(&[
                ("uploadType", "multipart"),
                ("fields", "id, name, webViewLink"),
            ])
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let file: DriveFile = response.json().await?;
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_list_deserializes_api_field_names() {
        let raw = r#"{"files":[{"id":"f1","name":"week1.pdf","webViewLink":"https://docs/f1","mimeType":"application/pdf","modifiedTime":"2026-08-01T00:00:00Z","size":"1024"}]}"#;
        let parsed: FileListResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.files.len(), 1);
        assert_eq!(parsed.files[0].name, "week1.pdf");
        assert_eq!(parsed.files[0].web_view_link.as_deref(), Some("https://docs/f1"));
    }

    #[test]
    fn missing_files_field_is_empty() {
        let parsed: FileListResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.files.is_empty());
    }
}
