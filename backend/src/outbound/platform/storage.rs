//! Object storage adapter (`storage/v1`) for the `avatars` bucket.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;

use super::client::{PlatformClient, status_message};
use crate::domain::ports::{AvatarStore, AvatarStoreError};
use crate::domain::{AvatarUpload, AvatarUrl, UserId};

const BUCKET: &str = "avatars";

/// Avatar store over the platform's object storage API.
#[derive(Clone)]
pub struct PlatformAvatarStore {
    client: PlatformClient,
}

impl PlatformAvatarStore {
    /// Build the adapter over a shared platform client.
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }
}

/// Object path scoped to the identity and an upload timestamp, preserving
/// the original file extension.
fn object_path(user_id: &UserId, upload: &AvatarUpload, timestamp_millis: i64) -> String {
    match upload.extension() {
        Some(ext) => format!("{user_id}/{timestamp_millis}.{ext}"),
        None => format!("{user_id}/{timestamp_millis}"),
    }
}

#[async_trait]
impl AvatarStore for PlatformAvatarStore {
    async fn store(
        &self,
        user_id: &UserId,
        upload: &AvatarUpload,
    ) -> Result<AvatarUrl, AvatarStoreError> {
        let path = object_path(user_id, upload, Utc::now().timestamp_millis());
        let url = self
            .client
            .endpoint(&format!("storage/v1/object/{BUCKET}/{path}"))
            .map_err(AvatarStoreError::store)?;

        let response = self
            .client
            .request(Method::POST, url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(upload.bytes().to_vec())
            .send()
            .await
            .map_err(|error| AvatarStoreError::store(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|error| AvatarStoreError::store(error.to_string()))?;
            return Err(AvatarStoreError::store(status_message(
                status,
                body.as_ref(),
            )));
        }

        let public = self
            .client
            .endpoint(&format!("storage/v1/object/public/{BUCKET}/{path}"))
            .map_err(AvatarStoreError::store)?;
        Ok(AvatarUrl::new(public))
    }
}
