/*!
# Token Metadata Storage

Token metadata is uploaded as a small JSON document before the mint exists, and
the returned URI is what gets attached to the token. Documents are
content-addressed: the key is the hex SHA-256 of the serialized JSON, so
uploading the same metadata twice yields the same URI.
*/

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::Mutex,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub token_name: String,
    pub token_symbol: String,
    pub token_description: String,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Metadata store poisoned")]
    Poisoned,
}

pub type UploadResult<T> = Result<T, UploadError>;

#[async_trait]
pub trait MetadataUploader: Send + Sync {
    /// Store `metadata` and return a URI that resolves to it
    async fn upload_json(&self, metadata: &TokenMetadata) -> UploadResult<String>;
}

/// Hex SHA-256 of `bytes`
pub fn content_address(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Writes `<sha256>.json` files into a directory
#[derive(Debug, Clone)]
pub struct LocalMetadataStore {
    root: PathBuf,
}

impl LocalMetadataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read back a document previously written by this store
    pub async fn load(&self, key: &str) -> UploadResult<TokenMetadata> {
        let bytes = tokio::fs::read(self.root.join(format!("{key}.json"))).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl MetadataUploader for LocalMetadataStore {
    async fn upload_json(&self, metadata: &TokenMetadata) -> UploadResult<String> {
        let bytes = serde_json::to_vec_pretty(metadata)?;
        let key = content_address(&bytes);

        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(format!("{key}.json"));
        tokio::fs::write(&path, &bytes).await?;

        let path = tokio::fs::canonicalize(&path).await?;
        debug!("Wrote token metadata to {}", path.display());

        Ok(format!("file://{}", path.display()))
    }
}

/// Keeps documents in memory under `memory://<sha256>`
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    documents: Mutex<HashMap<String, TokenMetadata>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uri: &str) -> Option<TokenMetadata> {
        self.documents.lock().ok()?.get(uri).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MetadataUploader for MemoryMetadataStore {
    async fn upload_json(&self, metadata: &TokenMetadata) -> UploadResult<String> {
        let bytes = serde_json::to_vec(metadata)?;
        let uri = format!("memory://{}", content_address(&bytes));

        self.documents
            .lock()
            .map_err(|_| UploadError::Poisoned)?
            .insert(uri.clone(), metadata.clone());

        Ok(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> TokenMetadata {
        TokenMetadata {
            token_name: "Gold".to_string(),
            token_symbol: "GLD".to_string(),
            token_description: "Shiny".to_string(),
        }
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let json = serde_json::to_value(metadata()).unwrap();
        assert_eq!(json["tokenName"], "Gold");
        assert_eq!(json["tokenSymbol"], "GLD");
        assert_eq!(json["tokenDescription"], "Shiny");
    }

    #[tokio::test]
    async fn test_local_store_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMetadataStore::new(dir.path().join("metadata"));

        let first = store.upload_json(&metadata()).await.unwrap();
        let second = store.upload_json(&metadata()).await.unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("file://"));
        assert!(first.ends_with(".json"));

        let key = content_address(&serde_json::to_vec_pretty(&metadata()).unwrap());
        assert_eq!(store.load(&key).await.unwrap(), metadata());
    }

    #[tokio::test]
    async fn test_memory_store_round_trips() {
        let store = MemoryMetadataStore::new();
        let uri = store.upload_json(&metadata()).await.unwrap();

        assert!(uri.starts_with("memory://"));
        assert_eq!(store.get(&uri), Some(metadata()));
        assert_eq!(store.len(), 1);
    }
}
