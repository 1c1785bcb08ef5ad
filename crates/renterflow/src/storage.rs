//! Object storage seam for uploaded lease documents and message attachments.
//!
//! Documents reference blobs by URL only; deletion is keyed by the URL-derived
//! object path, so a store implementation must be able to reverse its own URL
//! minting. `MemoryObjectStore` is the reference backend used by the server,
//! the demo, and the tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Metadata returned after a blob lands in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("malformed object url: {0}")]
    MalformedUrl(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Outbound blob storage. Implementations mint stable URLs for uploads and
/// accept deletes keyed by those URLs.
pub trait ObjectStore: Send + Sync {
    fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &mime::Mime,
    ) -> Result<StoredObject, StorageError>;

    fn delete_by_url(&self, url: &str) -> Result<(), StorageError>;
}

/// Derive the object key from a minted URL by stripping the store's base.
pub fn object_key_from_url(base_url: &str, url: &str) -> Result<String, StorageError> {
    let base = base_url.trim_end_matches('/');
    let rest = url
        .strip_prefix(base)
        .ok_or_else(|| StorageError::MalformedUrl(url.to_string()))?;
    let key = rest.trim_start_matches('/');
    if key.is_empty() {
        return Err(StorageError::MalformedUrl(url.to_string()));
    }
    Ok(key.to_string())
}

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Vec<u8>,
    content_type: String,
}

/// In-memory object store standing in for the hosted storage backend.
#[derive(Clone)]
pub struct MemoryObjectStore {
    base_url: String,
    blobs: Arc<Mutex<HashMap<String, StoredBlob>>>,
}

impl MemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            blobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn contains_url(&self, url: &str) -> bool {
        match object_key_from_url(&self.base_url, url) {
            Ok(key) => self
                .blobs
                .lock()
                .expect("storage mutex poisoned")
                .contains_key(&key),
            Err(_) => false,
        }
    }

    pub fn object_count(&self) -> usize {
        self.blobs.lock().expect("storage mutex poisoned").len()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &mime::Mime,
    ) -> Result<StoredObject, StorageError> {
        let key = key.trim_matches('/').to_string();
        if key.is_empty() {
            return Err(StorageError::MalformedUrl("empty object key".to_string()));
        }

        let size = bytes.len() as u64;
        let content_type = content_type.to_string();
        let mut guard = self.blobs.lock().expect("storage mutex poisoned");
        guard.insert(
            key.clone(),
            StoredBlob {
                bytes,
                content_type: content_type.clone(),
            },
        );

        Ok(StoredObject {
            url: format!("{}/{key}", self.base_url),
            key,
            size,
            content_type,
        })
    }

    fn delete_by_url(&self, url: &str) -> Result<(), StorageError> {
        let key = object_key_from_url(&self.base_url, url)?;
        let mut guard = self.blobs.lock().expect("storage mutex poisoned");
        guard
            .remove(&key)
            .map(|_| ())
            .ok_or(StorageError::NotFound(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_mints_url_under_base() {
        let store = MemoryObjectStore::new("https://storage.local/renterflow/");
        let stored = store
            .put("leases/lease-000001/signed.pdf", vec![1, 2, 3], &mime::APPLICATION_PDF)
            .expect("stored");
        assert_eq!(
            stored.url,
            "https://storage.local/renterflow/leases/lease-000001/signed.pdf"
        );
        assert_eq!(stored.size, 3);
        assert!(store.contains_url(&stored.url));
    }

    #[test]
    fn delete_is_keyed_by_url_derived_path() {
        let store = MemoryObjectStore::new("https://storage.local/renterflow");
        let stored = store
            .put("messages/msg-000001/photo.png", vec![0; 16], &mime::IMAGE_PNG)
            .expect("stored");

        store.delete_by_url(&stored.url).expect("deleted");
        assert!(!store.contains_url(&stored.url));
        assert!(matches!(
            store.delete_by_url(&stored.url),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn foreign_urls_are_rejected() {
        let store = MemoryObjectStore::new("https://storage.local/renterflow");
        assert!(matches!(
            store.delete_by_url("https://elsewhere.example.com/blob.pdf"),
            Err(StorageError::MalformedUrl(_))
        ));
    }

    #[test]
    fn key_derivation_strips_base_and_slashes() {
        let key = object_key_from_url(
            "https://storage.local/renterflow",
            "https://storage.local/renterflow/leases/a.pdf",
        )
        .expect("derives");
        assert_eq!(key, "leases/a.pdf");
    }
}
