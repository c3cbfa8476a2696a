use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use super::{StorageResult, Uploader};

/// Writes uploads to `{root}/{file_name}` and hands back `{url_prefix}/{file_name}`.
pub struct LocalStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalStorage {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self { root, url_prefix }
    }
}

#[async_trait]
impl Uploader for LocalStorage {
    async fn upload(&self, data: Bytes, file_name: &str) -> StorageResult<String> {
        fs::create_dir_all(&self.root).await?;
        let path = self.root.join(file_name);
        fs::write(&path, &data).await?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "stored upload");
        Ok(format!("{}/{}", self.url_prefix.trim_end_matches('/'), file_name))
    }
}
