//! Upload adapters.
//!
//! Create and update flows hand an uploaded file to an [`Uploader`] and store
//! the reference it returns on the entity. Two backends exist:
//! - local filesystem, served back under a URL prefix
//! - Azure blob storage, authorised by account key or SAS

mod blob;
mod local;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use blob::BlobStorage;
pub use local::LocalStorage;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blob storage error: {0}")]
    Backend(#[from] opendal::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

#[async_trait]
pub trait Uploader: Send + Sync {
    /// Persists `data` under `file_name`, replacing any previous object of the
    /// same name, and returns the reference clients use to fetch it.
    async fn upload(&self, data: Bytes, file_name: &str) -> StorageResult<String>;
}

/// Reduces a client-supplied file name to its final path component.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name.chars().all(|c| c == '.') {
        return None;
    }
    Some(name.to_string())
}

pub fn from_config(config: &Config) -> anyhow::Result<Arc<dyn Uploader>> {
    match &config.blob_connection_string {
        Some(conn) => {
            let blob = BlobStorage::from_connection_string(conn, &config.blob_container)
                .context("AZURE_STORAGE_CONNECTION_STRING")?;
            tracing::info!(url = %blob.blob_url(""), "using blob uploads");
            Ok(Arc::new(blob))
        },
        None => {
            tracing::info!(dir = %config.upload_dir.display(), "using local uploads");
            Ok(Arc::new(LocalStorage::new(
                config.upload_dir.clone(),
                config.upload_url_prefix.clone(),
            )))
        },
    }
}
