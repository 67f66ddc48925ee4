//! Object storage for converted documents and PDF page images.
//!
//! The pipeline only needs `put(key, bytes)`. [`DirectoryStore`] mirrors the
//! bucket layout on disk; [`MemoryStore`] backs dry runs and tests.

use crate::error::RfcHtmlError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

// ── Keys ─────────────────────────────────────────────────────────────────

/// Bucket key of a converted document.
pub fn rfc_json_key(number: u32) -> String {
    format!("rfc/{number}.json")
}

/// File name of a rasterised PDF page (1-based `page`).
pub fn page_image_file_name(number: u32, page: usize) -> String {
    format!("{number}-page-{page}.png")
}

/// Bucket key of a page image file.
pub fn page_image_key(file_name: &str) -> String {
    format!("rfc/{file_name}")
}

/// Flat file name used by older local exports.
pub fn legacy_bucket_file_name(number: u32) -> String {
    format!("rfc{number}-html.json")
}

/// How converted documents are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyLayout {
    /// `rfc/{N}.json` (default)
    #[default]
    Bucket,
    /// `rfc{N}-html.json`
    Legacy,
}

impl KeyLayout {
    pub fn document_key(self, number: u32) -> String {
        match self {
            KeyLayout::Bucket => rfc_json_key(number),
            KeyLayout::Legacy => legacy_bucket_file_name(number),
        }
    }
}

// ── Stores ───────────────────────────────────────────────────────────────

/// Destination for converted documents and page images.
pub trait DocumentStore: Send + Sync {
    fn put(&self, key: &str, bytes: Vec<u8>) -> impl Future<Output = Result<(), RfcHtmlError>> + Send;
}

/// Writes each object to `root/key`, creating parent directories.
///
/// Writes are atomic: the bytes go to a temporary sibling first and are
/// renamed into place, so readers never see a partial document.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where `key` is written.
    pub fn path_for(&self, key: &str) -> PathBuf {
        key.split('/')
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

impl DocumentStore for DirectoryStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), RfcHtmlError> {
        let path = self.path_for(key);
        let write_failed = |source: std::io::Error| RfcHtmlError::StorageWriteFailed {
            key: key.to_string(),
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
        }

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);
        tokio::fs::write(&tmp_path, &bytes).await.map_err(write_failed)?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(write_failed)?;

        debug!("Stored {} ({} bytes) at {}", key, bytes.len(), path.display());
        Ok(())
    }
}

/// Keeps objects in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // A poisoned map is still a valid map.
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), RfcHtmlError> {
        debug!("Stored {} ({} bytes) in memory", key, bytes.len());
        self.lock().insert(key.to_string(), bytes);
        Ok(())
    }
}
