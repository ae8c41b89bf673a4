use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client as HttpClient;

use crate::model::SvdModel;

/// Source of the serialized model blob.
///
/// The store only hands back raw bytes; deserialization happens in
/// [`load_model`] so every backend shares the same format handling.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelStore: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Vec<u8>>;
}

/// Fetches the model blob from an object-storage container over HTTPS.
///
/// The URL is expected to carry its own access grant (a pre-signed or
/// SAS-style URL), so no separate credential handling is needed here.
pub struct HttpBlobStore {
    http_client: HttpClient,
    url: String,
}

impl HttpBlobStore {
    pub fn new(url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            url,
        }
    }
}

#[async_trait]
impl ModelStore for HttpBlobStore {
    async fn fetch(&self) -> anyhow::Result<Vec<u8>> {
        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .context("blob request failed")?
            .error_for_status()
            .context("blob store returned an error status")?;

        let bytes = response.bytes().await.context("blob download failed")?;
        Ok(bytes.to_vec())
    }
}

/// Reads the model blob from a local file. Used in development and tests.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ModelStore for FileStore {
    async fn fetch(&self) -> anyhow::Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read model blob from {}", self.path.display()))
    }
}

/// Fetches and deserializes the trained model from `model_blob_url`.
///
/// Called exactly once at startup. `http(s)` URLs go through the blob store;
/// anything else is treated as a local path.
pub async fn load_model(model_blob_url: &str) -> anyhow::Result<SvdModel> {
    let store: Box<dyn ModelStore> =
        if model_blob_url.starts_with("http://") || model_blob_url.starts_with("https://") {
            Box::new(HttpBlobStore::new(model_blob_url.to_string()))
        } else {
            Box::new(FileStore::new(model_blob_url))
        };

    load_from_store(store.as_ref()).await
}

async fn load_from_store(store: &dyn ModelStore) -> anyhow::Result<SvdModel> {
    let blob = store.fetch().await?;
    let model: SvdModel =
        serde_json::from_slice(&blob).context("failed to deserialize model blob")?;
    Ok(model)
}
