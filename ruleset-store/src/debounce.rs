//! Debounced snapshot writer
//!
//! Holds at most one pending snapshot. Every submission replaces it and
//! restarts the quiet period; when the quiet period elapses without new
//! submissions the latest snapshot is written once and every caller that
//! contributed to the burst receives that write's result.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, warn};

use crate::bridge::FileBridge;
use crate::error::{StoreError, StoreResult};

/// Default quiet period before a pending snapshot is written
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

type Waiter = oneshot::Sender<StoreResult<()>>;

#[derive(Default)]
struct Pending {
    snapshot: Option<Vec<u8>>,
    waiters: Vec<Waiter>,
    generation: u64,
    timer_armed: bool,
}

struct Shared {
    bridge: Arc<dyn FileBridge>,
    path: PathBuf,
    quiet: Duration,
    pending: Mutex<Pending>,
    /// Serializes writes so an older snapshot never lands after a newer one
    write_lock: Mutex<()>,
}

/// Handle to a queued snapshot
pub struct Submission {
    rx: oneshot::Receiver<StoreResult<()>>,
    path: PathBuf,
}

impl Submission {
    pub async fn wait(self) -> StoreResult<()> {
        self.rx.await.unwrap_or_else(|_| {
            Err(StoreError::persistence(
                &self.path,
                "snapshot writer stopped before writing",
            ))
        })
    }
}

pub struct DebouncedWriter {
    shared: Arc<Shared>,
}

impl DebouncedWriter {
    pub fn new(bridge: Arc<dyn FileBridge>, path: impl Into<PathBuf>, quiet: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                bridge,
                path: path.into(),
                quiet,
                pending: Mutex::new(Pending::default()),
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    pub fn quiet_period(&self) -> Duration {
        self.shared.quiet
    }

    /// Queue `snapshot` and wait for the coalesced write that includes it
    pub async fn submit(&self, snapshot: Vec<u8>) -> StoreResult<()> {
        self.enqueue(snapshot).await.wait().await
    }

    /// Make `snapshot` the pending one and arm the timer.
    ///
    /// The returned handle resolves with the result of the write that
    /// replaces or includes it. A later `enqueue` always supersedes this one.
    pub async fn enqueue(&self, snapshot: Vec<u8>) -> Submission {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.shared.pending.lock().await;
        pending.snapshot = Some(snapshot);
        pending.waiters.push(tx);
        pending.generation = pending.generation.wrapping_add(1);

        if !pending.timer_armed {
            pending.timer_armed = true;
            tokio::spawn(run_timer(Arc::clone(&self.shared)));
        }

        Submission {
            rx,
            path: self.shared.path.clone(),
        }
    }

    /// Write the pending snapshot now, without waiting for the quiet period
    pub async fn flush(&self) -> StoreResult<()> {
        write_pending(&self.shared).await
    }

    pub async fn has_pending(&self) -> bool {
        self.shared.pending.lock().await.snapshot.is_some()
    }
}

async fn run_timer(shared: Arc<Shared>) {
    loop {
        let seen = shared.pending.lock().await.generation;
        tokio::time::sleep(shared.quiet).await;

        let mut pending = shared.pending.lock().await;
        if pending.generation == seen {
            pending.timer_armed = false;
            break;
        }
    }

    if let Err(e) = write_pending(&shared).await {
        warn!(path = %shared.path.display(), error = %e, "Debounced snapshot write failed");
    }
}

async fn write_pending(shared: &Shared) -> StoreResult<()> {
    let _write = shared.write_lock.lock().await;

    let (snapshot, waiters) = {
        let mut pending = shared.pending.lock().await;
        (pending.snapshot.take(), std::mem::take(&mut pending.waiters))
    };
    let Some(bytes) = snapshot else {
        return Ok(());
    };

    let result = shared
        .bridge
        .write_file(&shared.path, &bytes)
        .await
        .map_err(|e| match e {
            StoreError::Io { reason, .. } => StoreError::persistence(&shared.path, reason),
            other => StoreError::persistence(&shared.path, other),
        });

    debug!(
        path = %shared.path.display(),
        bytes = bytes.len(),
        waiters = waiters.len(),
        ok = result.is_ok(),
        "Snapshot written"
    );

    for waiter in waiters {
        let _ = waiter.send(result.clone());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBridge;

    fn writer(bridge: &Arc<MemoryBridge>, quiet: Duration) -> DebouncedWriter {
        let dyn_bridge: Arc<dyn FileBridge> = bridge.clone();
        DebouncedWriter::new(dyn_bridge, "snap.yaml", quiet)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_into_one_write() {
        let bridge = Arc::new(MemoryBridge::new());
        let writer = Arc::new(writer(&bridge, DEFAULT_SAVE_DEBOUNCE));

        let mut handles = Vec::new();
        for i in 0..5u8 {
            let writer = Arc::clone(&writer);
            handles.push(tokio::spawn(async move { writer.submit(vec![i]).await }));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(bridge.write_count("snap.yaml"), 1);
        assert_eq!(bridge.file("snap.yaml"), Some(vec![4]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_write_separately() {
        let bridge = Arc::new(MemoryBridge::new());
        let writer = writer(&bridge, DEFAULT_SAVE_DEBOUNCE);

        writer.submit(b"one".to_vec()).await.unwrap();
        writer.submit(b"two".to_vec()).await.unwrap();

        assert_eq!(bridge.write_count("snap.yaml"), 2);
        assert_eq!(bridge.file_string("snap.yaml").as_deref(), Some("two"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_reaches_every_waiter() {
        let bridge = Arc::new(MemoryBridge::new());
        bridge.fail_writes_to("snap.yaml");
        let writer = Arc::new(writer(&bridge, DEFAULT_SAVE_DEBOUNCE));

        let a = {
            let writer = Arc::clone(&writer);
            tokio::spawn(async move { writer.submit(b"a".to_vec()).await })
        };
        let b = {
            let writer = Arc::clone(&writer);
            tokio::spawn(async move { writer.submit(b"b".to_vec()).await })
        };

        let a = a.await.unwrap().unwrap_err();
        let b = b.await.unwrap().unwrap_err();
        assert_eq!(a.kind(), "persistence");
        assert_eq!(a, b);
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_enqueue_supersedes_earlier() {
        let bridge = Arc::new(MemoryBridge::new());
        let writer = writer(&bridge, DEFAULT_SAVE_DEBOUNCE);

        let older = writer.enqueue(b"older".to_vec()).await;
        let newer = writer.enqueue(b"newer".to_vec()).await;
        older.wait().await.unwrap();
        newer.wait().await.unwrap();

        assert_eq!(bridge.write_count("snap.yaml"), 1);
        assert_eq!(bridge.file_string("snap.yaml").as_deref(), Some("newer"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_immediately() {
        let bridge = Arc::new(MemoryBridge::new());
        let writer = Arc::new(writer(&bridge, Duration::from_secs(60)));

        let pending = {
            let writer = Arc::clone(&writer);
            tokio::spawn(async move { writer.submit(b"late".to_vec()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(writer.has_pending().await);

        writer.flush().await.unwrap();
        assert_eq!(bridge.file_string("snap.yaml").as_deref(), Some("late"));
        pending.await.unwrap().unwrap();

        // nothing pending: flush is a no-op
        writer.flush().await.unwrap();
        assert_eq!(bridge.write_count("snap.yaml"), 1);
    }
}
