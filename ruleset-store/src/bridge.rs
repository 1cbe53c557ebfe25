//! File system and network collaborator of the store

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Default timeout for a single ruleset download
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything the store needs from its host environment
#[async_trait]
pub trait FileBridge: Send + Sync {
    /// Read a whole file; `None` when it does not exist
    async fn read_file(&self, path: &Path) -> StoreResult<Option<Vec<u8>>>;

    /// Create or replace a file
    async fn write_file(&self, path: &Path, contents: &[u8]) -> StoreResult<()>;

    async fn copy_file(&self, src: &Path, dst: &Path) -> StoreResult<()>;

    /// Fetch `url` and store the body at `dst`
    async fn download(&self, url: &str, dst: &Path) -> StoreResult<()>;

    async fn file_exists(&self, path: &Path) -> bool;
}

/// Local file system bridge; relative paths resolve against `base_dir`
pub struct LocalBridge {
    base_dir: PathBuf,
    client: reqwest::Client,
}

impl LocalBridge {
    pub fn new(base_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::with_timeout(base_dir, DEFAULT_DOWNLOAD_TIMEOUT)
    }

    pub fn with_timeout(base_dir: impl Into<PathBuf>, timeout: Duration) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::download("<client>", e))?;

        Ok(Self {
            base_dir: base_dir.into(),
            client,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    async fn ensure_parent(path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::io(parent, e))?;
            }
        }
        Ok(())
    }
}

/// Sibling temp file used for write-then-rename
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl FileBridge for LocalBridge {
    async fn read_file(&self, path: &Path) -> StoreResult<Option<Vec<u8>>> {
        let full = self.resolve(path);
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&full, e)),
        }
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> StoreResult<()> {
        let full = self.resolve(path);
        Self::ensure_parent(&full).await?;

        let tmp = temp_path(&full);
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &full)
            .await
            .map_err(|e| StoreError::io(&full, e))?;

        debug!(path = %full.display(), bytes = contents.len(), "Wrote file");
        Ok(())
    }

    async fn copy_file(&self, src: &Path, dst: &Path) -> StoreResult<()> {
        let from = self.resolve(src);
        let to = self.resolve(dst);
        Self::ensure_parent(&to).await?;

        tokio::fs::copy(&from, &to)
            .await
            .map_err(|e| StoreError::io(&from, e))?;
        debug!(from = %from.display(), to = %to.display(), "Copied file");
        Ok(())
    }

    async fn download(&self, url: &str, dst: &Path) -> StoreResult<()> {
        info!(url = %url, "Downloading ruleset");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| StoreError::download(url, e))?;
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::download(url, e))?;

        self.write_file(dst, &body).await
    }

    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(self.resolve(path))
            .await
            .unwrap_or(false)
    }
}
