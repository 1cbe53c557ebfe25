//! In-memory bridge with failure injection
//!
//! Backs the store in tests and in hosts that keep rulesets off disk.
//! Remote URLs are "served" from a table; writes, downloads and every other
//! call are counted so callers can assert on I/O behaviour.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::bridge::FileBridge;
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct MemoryState {
    files: HashMap<PathBuf, Vec<u8>>,
    remote: HashMap<String, Vec<u8>>,
    failing_paths: HashSet<PathBuf>,
    fail_next_writes: usize,
    hollow_urls: HashSet<String>,
    writes: HashMap<PathBuf, usize>,
    downloads: Vec<String>,
    operations: usize,
}

#[derive(Debug, Default)]
pub struct MemoryBridge {
    state: Mutex<MemoryState>,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_file(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.state().files.insert(path.into(), contents.into());
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.state().files.remove(path.as_ref());
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.state().files.get(path.as_ref()).cloned()
    }

    pub fn file_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.file(path).map(|b| String::from_utf8_lossy(&b).into_owned())
    }

    /// Make `url` downloadable with the given body
    pub fn serve(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.state().remote.insert(url.into(), body.into());
    }

    /// Downloads of `url` report success but leave no file behind
    pub fn serve_hollow(&self, url: impl Into<String>) {
        self.state().hollow_urls.insert(url.into());
    }

    /// Every write to `path` fails until [`MemoryBridge::heal_writes_to`]
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.state().failing_paths.insert(path.into());
    }

    pub fn heal_writes_to(&self, path: impl AsRef<Path>) {
        self.state().failing_paths.remove(path.as_ref());
    }

    /// The next `count` writes fail, whatever their path
    pub fn fail_next_writes(&self, count: usize) {
        self.state().fail_next_writes = count;
    }

    /// Successful writes to `path` so far
    pub fn write_count(&self, path: impl AsRef<Path>) -> usize {
        self.state().writes.get(path.as_ref()).copied().unwrap_or(0)
    }

    /// URLs requested so far, in order
    pub fn downloads(&self) -> Vec<String> {
        self.state().downloads.clone()
    }

    /// Number of bridge calls of any kind
    pub fn operation_count(&self) -> usize {
        self.state().operations
    }
}

#[async_trait]
impl FileBridge for MemoryBridge {
    async fn read_file(&self, path: &Path) -> StoreResult<Option<Vec<u8>>> {
        let mut state = self.state();
        state.operations += 1;
        Ok(state.files.get(path).cloned())
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> StoreResult<()> {
        let mut state = self.state();
        state.operations += 1;

        if state.fail_next_writes > 0 {
            state.fail_next_writes -= 1;
            return Err(StoreError::io(path, "injected write failure"));
        }
        if state.failing_paths.contains(path) {
            return Err(StoreError::io(path, "injected write failure"));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        *state.writes.entry(path.to_path_buf()).or_insert(0) += 1;
        Ok(())
    }

    async fn copy_file(&self, src: &Path, dst: &Path) -> StoreResult<()> {
        let mut state = self.state();
        state.operations += 1;

        let contents = state
            .files
            .get(src)
            .cloned()
            .ok_or_else(|| StoreError::io(src, "No such file or directory"))?;
        state.files.insert(dst.to_path_buf(), contents);
        Ok(())
    }

    async fn download(&self, url: &str, dst: &Path) -> StoreResult<()> {
        let mut state = self.state();
        state.operations += 1;
        state.downloads.push(url.to_string());

        if state.hollow_urls.contains(url) {
            return Ok(());
        }
        let body = state
            .remote
            .get(url)
            .cloned()
            .ok_or_else(|| StoreError::download(url, "HTTP status client error (404 Not Found)"))?;
        state.files.insert(dst.to_path_buf(), body);
        Ok(())
    }

    async fn file_exists(&self, path: &Path) -> bool {
        let mut state = self.state();
        state.operations += 1;
        state.files.contains_key(path)
    }
}
