use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

const SCHEME_PREFIX: &str = "blob:tts-maker/";

struct Blob {
    mime_type: String,
    bytes: Arc<[u8]>,
}

/// Registry of decoded audio addressable through transient `blob:` URLs.
///
/// Every URL is owned by exactly one [`ObjectUrl`] handle and disappears from
/// the registry when that handle is dropped.
#[derive(Clone, Default)]
pub struct ObjectUrlStore {
    blobs: Arc<Mutex<HashMap<String, Blob>>>,
}

impl ObjectUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, bytes: Vec<u8>, mime_type: impl Into<String>) -> ObjectUrl {
        let url = format!("{}{}", SCHEME_PREFIX, Uuid::new_v4());
        let bytes: Arc<[u8]> = bytes.into();
        self.blobs.lock().insert(
            url.clone(),
            Blob {
                mime_type: mime_type.into(),
                bytes: bytes.clone(),
            },
        );
        tracing::debug!(url = %url, size = bytes.len(), "Object URL created");

        ObjectUrl {
            url,
            bytes,
            store: self.clone(),
        }
    }

    /// Mime type and bytes behind a live URL
    pub fn resolve(&self, url: &str) -> Option<(String, Arc<[u8]>)> {
        self.blobs
            .lock()
            .get(url)
            .map(|blob| (blob.mime_type.clone(), blob.bytes.clone()))
    }

    /// Number of URLs currently alive
    pub fn len(&self) -> usize {
        self.blobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn revoke(&self, url: &str) {
        if self.blobs.lock().remove(url).is_some() {
            tracing::debug!(url = %url, "Object URL revoked");
        }
    }
}

/// Owning handle of a transient URL; revokes it on drop
pub struct ObjectUrl {
    url: String,
    bytes: Arc<[u8]>,
    store: ObjectUrlStore,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }
}

impl fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectUrl")
            .field("url", &self.url)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.store.revoke(&self.url);
    }
}
