//! Filesystem Adapter Abstraction
//!
//! The contract an application codes against when it wants a file store
//! without caring which backend holds the bytes. Paths are slash-separated and
//! relative to whatever root the adapter was configured with.
//!
//! Negative results follow one rule: a missing object is `Ok(None)` or
//! `Ok(false)`, never an error. Everything else that goes wrong is an `Err`.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Cursor;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{BridgeError, Result};

/// Readable handle returned by [`FilesystemAdapter::read_stream`].
pub type BoxedReader = Pin<Box<dyn AsyncRead + Send>>;

/// Kind of a listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
}

impl EntryKind {
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Dir)
    }
}

/// One row of a directory listing.
///
/// `properties` is the backend's raw property bag for the object, kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub dirname: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl ListingEntry {
    /// Last path segment
    pub fn basename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// File metadata information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// MIME type; folders have none
    pub mimetype: Option<String>,
    pub size: u64,
    /// Last modification, Unix seconds
    pub timestamp: Option<i64>,
}

/// Object visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// Options accompanying a write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteConfig {
    /// Content type to store the object with
    pub mimetype: Option<String>,
    pub visibility: Option<Visibility>,
}

impl WriteConfig {
    pub fn with_mimetype(mut self, mimetype: impl Into<String>) -> Self {
        self.mimetype = Some(mimetype.into());
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }
}

/// Filesystem adapter trait
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::{FilesystemAdapter, WriteConfig};
///
/// async fn backup(fs: &dyn FilesystemAdapter, data: Bytes) -> Result<bool> {
///     fs.create_dir("backups/2024", &WriteConfig::default()).await?;
///     fs.write("backups/2024/db.dump", data, &WriteConfig::default()).await
/// }
/// ```
#[async_trait]
pub trait FilesystemAdapter: Send + Sync {
    /// Check whether an object exists
    async fn has(&self, path: &str) -> Result<bool>;

    /// List the direct children of a directory
    ///
    /// Adapters that cannot walk a tree return `BridgeError::Unsupported`
    /// when `recursive` is set.
    async fn list_contents(&self, directory: &str, recursive: bool) -> Result<Vec<ListingEntry>>;

    /// Read an entire object into memory
    async fn read(&self, path: &str) -> Result<Option<Bytes>>;

    /// Read an object as a readable handle
    async fn read_stream(&self, path: &str) -> Result<Option<BoxedReader>> {
        Ok(self
            .read(path)
            .await?
            .map(|contents| Box::pin(Cursor::new(contents)) as BoxedReader))
    }

    /// Public URL of an object
    async fn get_url(&self, path: &str) -> Result<Option<String>>;

    async fn get_metadata(&self, path: &str) -> Result<Option<FileMetadata>>;

    async fn get_size(&self, path: &str) -> Result<Option<u64>> {
        Ok(self.get_metadata(path).await?.map(|meta| meta.size))
    }

    async fn get_mimetype(&self, path: &str) -> Result<Option<String>> {
        Ok(self.get_metadata(path).await?.and_then(|meta| meta.mimetype))
    }

    async fn get_timestamp(&self, path: &str) -> Result<Option<i64>> {
        Ok(self.get_metadata(path).await?.and_then(|meta| meta.timestamp))
    }

    /// Move or rename an object
    async fn rename(&self, path: &str, new_path: &str) -> Result<bool>;

    /// Copy an object; `false` when the source does not exist
    async fn copy(&self, path: &str, new_path: &str) -> Result<bool> {
        match self.read(path).await? {
            Some(contents) => self.write(new_path, contents, &WriteConfig::default()).await,
            None => Ok(false),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool>;

    async fn delete_dir(&self, dirname: &str) -> Result<bool> {
        self.delete(dirname).await
    }

    /// Create or replace an object with the given contents
    async fn write(&self, path: &str, contents: Bytes, config: &WriteConfig) -> Result<bool>;

    /// Drain `reader` into memory and write it
    async fn write_stream(
        &self,
        path: &str,
        mut reader: BoxedReader,
        config: &WriteConfig,
    ) -> Result<bool> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer).await?;
        self.write(path, Bytes::from(buffer), config).await
    }

    async fn update(&self, path: &str, contents: Bytes, config: &WriteConfig) -> Result<bool> {
        self.write(path, contents, config).await
    }

    async fn update_stream(
        &self,
        path: &str,
        reader: BoxedReader,
        config: &WriteConfig,
    ) -> Result<bool> {
        self.write_stream(path, reader, config).await
    }

    /// Create a directory and any missing parents
    async fn create_dir(&self, dirname: &str, config: &WriteConfig) -> Result<bool>;

    async fn get_visibility(&self, path: &str) -> Result<Option<Visibility>> {
        let _ = path;
        Err(BridgeError::NotAvailable("visibility".to_string()))
    }

    async fn set_visibility(&self, path: &str, visibility: Visibility) -> Result<bool> {
        let _ = (path, visibility);
        Err(BridgeError::NotAvailable("visibility".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Flat in-memory store exercising the provided trait methods.
    #[derive(Default)]
    struct MemoryAdapter {
        files: Mutex<HashMap<String, (Bytes, Option<String>)>>,
    }

    #[async_trait]
    impl FilesystemAdapter for MemoryAdapter {
        async fn has(&self, path: &str) -> Result<bool> {
            Ok(self.files.lock().unwrap().contains_key(path))
        }

        async fn list_contents(&self, _directory: &str, recursive: bool) -> Result<Vec<ListingEntry>> {
            if recursive {
                return Err(BridgeError::Unsupported("recursive listing".to_string()));
            }
            Ok(Vec::new())
        }

        async fn read(&self, path: &str) -> Result<Option<Bytes>> {
            Ok(self.files.lock().unwrap().get(path).map(|(b, _)| b.clone()))
        }

        async fn get_url(&self, path: &str) -> Result<Option<String>> {
            Ok(self.has(path).await?.then(|| format!("mem://{}", path)))
        }

        async fn get_metadata(&self, path: &str) -> Result<Option<FileMetadata>> {
            Ok(self.files.lock().unwrap().get(path).map(|(b, mime)| FileMetadata {
                mimetype: mime.clone(),
                size: b.len() as u64,
                timestamp: Some(0),
            }))
        }

        async fn rename(&self, path: &str, new_path: &str) -> Result<bool> {
            let mut files = self.files.lock().unwrap();
            match files.remove(path) {
                Some(entry) => {
                    files.insert(new_path.to_string(), entry);
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn delete(&self, path: &str) -> Result<bool> {
            Ok(self.files.lock().unwrap().remove(path).is_some())
        }

        async fn write(&self, path: &str, contents: Bytes, config: &WriteConfig) -> Result<bool> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), (contents, config.mimetype.clone()));
            Ok(true)
        }

        async fn create_dir(&self, _dirname: &str, _config: &WriteConfig) -> Result<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_copy_reads_then_writes() {
        let fs = MemoryAdapter::default();
        fs.write("a.txt", Bytes::from("hello"), &WriteConfig::default())
            .await
            .unwrap();

        assert!(fs.copy("a.txt", "b.txt").await.unwrap());
        assert_eq!(fs.read("b.txt").await.unwrap(), Some(Bytes::from("hello")));
        assert!(!fs.copy("missing.txt", "c.txt").await.unwrap());
        assert!(!fs.has("c.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_stream_helpers_round_trip() {
        let fs = MemoryAdapter::default();
        let reader: BoxedReader = Box::pin(Cursor::new(b"streamed".to_vec()));
        assert!(fs
            .update_stream("s.bin", reader, &WriteConfig::default())
            .await
            .unwrap());

        let mut handle = fs.read_stream("s.bin").await.unwrap().unwrap();
        let mut out = Vec::new();
        handle.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"streamed");

        assert!(fs.read_stream("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_metadata_accessors() {
        let fs = MemoryAdapter::default();
        let config = WriteConfig::default().with_mimetype("text/plain");
        fs.write("n.txt", Bytes::from("1234"), &config).await.unwrap();

        assert_eq!(fs.get_size("n.txt").await.unwrap(), Some(4));
        assert_eq!(
            fs.get_mimetype("n.txt").await.unwrap(),
            Some("text/plain".to_string())
        );
        assert_eq!(fs.get_timestamp("n.txt").await.unwrap(), Some(0));
        assert_eq!(fs.get_size("gone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_visibility_is_not_available() {
        let fs = MemoryAdapter::default();
        assert!(matches!(
            fs.get_visibility("a").await,
            Err(BridgeError::NotAvailable(_))
        ));
        assert!(matches!(
            fs.set_visibility("a", Visibility::Public).await,
            Err(BridgeError::NotAvailable(_))
        ));
    }

    #[test]
    fn test_listing_entry_serializes_flat() {
        let mut properties = Map::new();
        properties.insert("id".to_string(), Value::from("01ABC"));
        let entry = ListingEntry {
            path: "docs/report.pdf".to_string(),
            kind: EntryKind::File,
            dirname: "docs".to_string(),
            properties,
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["id"], "01ABC");
        assert_eq!(entry.basename(), "report.pdf");
    }
}
