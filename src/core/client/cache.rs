//! Response cache for the card data-source client.
//!
//! Two layers, checked in order:
//!
//! ```text
//!   get(endpoint)
//!        |
//!        v
//!   LRU (memory) --miss--> <cache_dir>/<safe endpoint>.json --miss--> None
//! ```
//!
//! The disk layer survives between runs; the catalog response alone is
//! several megabytes, so re-fetching it on every run is wasteful. Disk
//! failures are logged and otherwise ignored: a broken cache only costs a
//! network round trip.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use lru::LruCache;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::Result;

/// Default number of responses kept in memory.
pub const DEFAULT_MEMORY_CAPACITY: usize = 256;

pub struct ResponseCache {
    memory: Mutex<LruCache<String, String>>,
    cache_dir: Option<PathBuf>,
    enabled: bool,
}

impl ResponseCache {
    /// Create a cache. With `cache_dir = None` only the memory layer is used.
    pub fn new(cache_dir: Option<PathBuf>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            memory: Mutex::new(LruCache::new(capacity)),
            cache_dir,
            enabled: true,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            memory: Mutex::new(LruCache::new(NonZeroUsize::MIN)),
            cache_dir: None,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    /// Cached response body for `endpoint`, if any.
    pub async fn get(&self, endpoint: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        if let Some(body) = self.memory.lock().await.get(endpoint) {
            return Some(body.clone());
        }

        let path = self.path_for(endpoint)?;
        match fs::read_to_string(&path).await {
            Ok(body) => {
                debug!(endpoint, path = %path.display(), "Response cache hit (disk)");
                self.memory
                    .lock()
                    .await
                    .put(endpoint.to_string(), body.clone());
                Some(body)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read response cache");
                None
            }
        }
    }

    /// Store a response body for `endpoint`.
    pub async fn put(&self, endpoint: &str, body: &str) {
        if !self.enabled {
            return;
        }

        self.memory
            .lock()
            .await
            .put(endpoint.to_string(), body.to_string());

        let Some(path) = self.path_for(endpoint) else {
            return;
        };
        if let Err(e) = write_file(&path, body).await {
            warn!(path = %path.display(), error = %e, "Failed to write response cache");
        }
    }

    /// Forget the response for `endpoint` in both layers.
    pub async fn remove(&self, endpoint: &str) {
        self.memory.lock().await.pop(endpoint);

        let Some(path) = self.path_for(endpoint) else {
            return;
        };
        match fs::remove_file(&path).await {
            Ok(()) => debug!(endpoint, path = %path.display(), "Removed cached response"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove cached response"),
        }
    }

    /// Drop every cached response, in memory and on disk.
    pub async fn clear(&self) -> Result<usize> {
        self.memory.lock().await.clear();

        let Some(dir) = &self.cache_dir else {
            return Ok(0);
        };
        if !dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        info!(removed, dir = %dir.display(), "Cleared response cache");
        Ok(removed)
    }

    fn path_for(&self, endpoint: &str) -> Option<PathBuf> {
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.json", safe_file_name(endpoint))))
    }
}

/// Write through a temporary file and rename, so an interrupted run never
/// leaves a truncated entry under the final name.
async fn write_file(path: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).await?;
    fs::rename(&tmp, path).await
}

/// Filesystem-safe name for an endpoint path.
pub fn safe_file_name(endpoint: &str) -> String {
    endpoint
        .chars()
        .map(|c| match c {
            '/' | '?' | '=' | '&' | '%' | '\\' | ':' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_file_name() {
        assert_eq!(
            safe_file_name("/cardinfo.php?name=Dark%20Magician"),
            "_cardinfo.php_name_Dark_20Magician"
        );
    }

    #[tokio::test]
    async fn test_memory_only_roundtrip() {
        let cache = ResponseCache::new(None, 4);
        assert!(cache.get("/cardinfo.php").await.is_none());
        cache.put("/cardinfo.php", r#"{"data":[]}"#).await;
        assert_eq!(cache.get("/cardinfo.php").await.as_deref(), Some(r#"{"data":[]}"#));
    }

    #[tokio::test]
    async fn test_disk_layer_survives_new_instance() {
        let dir = TempDir::new().unwrap();
        let first = ResponseCache::new(Some(dir.path().to_path_buf()), 4);
        first.put("/cardinfo.php?fname=Drak", "body").await;

        let second = ResponseCache::new(Some(dir.path().to_path_buf()), 4);
        assert_eq!(second.get("/cardinfo.php?fname=Drak").await.as_deref(), Some("body"));
    }

    #[tokio::test]
    async fn test_clear_removes_json_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        let cache = ResponseCache::new(Some(dir.path().to_path_buf()), 4);
        cache.put("/a", "1").await;
        cache.put("/b", "2").await;

        assert_eq!(cache.clear().await.unwrap(), 2);
        assert!(cache.get("/a").await.is_none());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_remove_drops_both_layers() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(Some(dir.path().to_path_buf()), 4);
        cache.put("/cardinfo.php", "body").await;
        let file = dir.path().join("_cardinfo.php.json");
        assert!(file.exists());

        cache.remove("/cardinfo.php").await;

        assert!(!file.exists());
        assert!(cache.get("/cardinfo.php").await.is_none());
        // Removing a missing entry is a no-op.
        cache.remove("/cardinfo.php").await;
    }

    #[tokio::test]
    async fn test_put_leaves_no_temporary_file() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(Some(dir.path().to_path_buf()), 4);
        cache.put("/cardinfo.php", "body").await;

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["_cardinfo.php.json".to_string()]);
    }

    #[tokio::test]
    async fn test_disabled_never_stores() {
        let cache = ResponseCache::disabled();
        cache.put("/a", "1").await;
        assert!(cache.get("/a").await.is_none());
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_lru_evicts_oldest() {
        let cache = ResponseCache::new(None, 1);
        cache.put("/a", "1").await;
        cache.put("/b", "2").await;
        assert!(cache.get("/a").await.is_none());
        assert_eq!(cache.get("/b").await.as_deref(), Some("2"));
    }
}
