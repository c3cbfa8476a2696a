use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use opendal::{Operator, services::Azblob};

use super::{StorageResult, Uploader};

/// Stores uploads as block blobs in one container and hands back their
/// public URL. Authorisation (account key or SAS) comes from the
/// connection string.
pub struct BlobStorage {
    op: Operator,
    base_url: String,
}

impl BlobStorage {
    pub fn new(op: Operator, base_url: String) -> Self {
        Self { op, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn from_connection_string(conn: &str, container: &str) -> anyhow::Result<Self> {
        let container = container.trim();
        anyhow::ensure!(!container.is_empty(), "blob container name is empty");

        let builder = Azblob::from_connection_string(conn)
            .context("invalid blob connection string")?
            .container(container);
        let op = Operator::new(builder)?.finish();

        let endpoint = blob_endpoint(conn).context("connection string names no blob endpoint")?;
        Ok(Self::new(op, format!("{endpoint}/{container}")))
    }

    pub fn blob_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(file_name))
    }
}

/// Public endpoint of the account: `BlobEndpoint` when given, otherwise
/// built from `AccountName` and `EndpointSuffix`.
fn blob_endpoint(conn: &str) -> Option<String> {
    let value = |name: &str| {
        conn.split(';')
            .filter_map(|part| part.trim().split_once('='))
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
    };

    if let Some(endpoint) = value("BlobEndpoint") {
        return Some(endpoint.trim_end_matches('/').to_string());
    }
    let account = value("AccountName")?;
    let protocol = value("DefaultEndpointsProtocol").unwrap_or("https");
    let suffix = value("EndpointSuffix").unwrap_or("core.windows.net");
    Some(format!("{protocol}://{account}.blob.{suffix}"))
}

#[async_trait]
impl Uploader for BlobStorage {
    async fn upload(&self, data: Bytes, file_name: &str) -> StorageResult<String> {
        let bytes = data.len();
        self.op.write(file_name, data).await?;

        let url = self.blob_url(file_name);
        tracing::debug!(url = %url, bytes, "uploaded blob");
        Ok(url)
    }
}
