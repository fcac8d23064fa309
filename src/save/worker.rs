//! Background save/load
//!
//! Keeps file I/O off the frame loop. Snapshots are captured and applied on
//! the caller's thread; only encoding, decoding and disk access run on worker
//! threads. At most one save and one load are in flight at any time.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::error::SaveError;
use super::snapshot::SnapshotRecord;
use super::store::SnapshotStore;

/// Completion notice delivered through `SaveWorker::poll`
#[derive(Debug)]
pub enum WorkerEvent {
    Saved(Result<PathBuf, SaveError>),
    Loaded {
        index: u32,
        result: Result<SnapshotRecord, SaveError>,
    },
}

/// Clears an in-flight flag when dropped, including while a job unwinds
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs saves and loads on background threads
pub struct SaveWorker {
    store: SnapshotStore,
    saving: Arc<AtomicBool>,
    loading: Arc<AtomicBool>,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
}

impl SaveWorker {
    pub fn new(store: SnapshotStore) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            store,
            saving: Arc::new(AtomicBool::new(false)),
            loading: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Start writing a captured snapshot
    pub fn request_save(&self, record: SnapshotRecord) -> Result<(), SaveError> {
        let store = self.store.clone();
        self.spawn("save", &self.saving, move || WorkerEvent::Saved(store.write(&record)))
    }

    /// Start reading `Save<index>`
    pub fn request_load(&self, index: u32) -> Result<(), SaveError> {
        let store = self.store.clone();
        self.spawn("load", &self.loading, move || WorkerEvent::Loaded {
            index,
            result: store.read(index),
        })
    }

    fn spawn<F>(&self, kind: &'static str, flag: &Arc<AtomicBool>, job: F) -> Result<(), SaveError>
    where
        F: FnOnce() -> WorkerEvent + Send + 'static,
    {
        if flag.swap(true, Ordering::AcqRel) {
            log::debug!("Rejected {} request: one is already running", kind);
            return Err(SaveError::Busy(kind));
        }

        // Dropped with the closure if the thread never starts
        let in_flight = InFlight(Arc::clone(flag));
        let tx = self.tx.clone();
        thread::Builder::new()
            .name(format!("{}-worker", kind))
            .spawn(move || {
                let event = job();
                drop(in_flight);
                // The receiver is gone only when the worker was dropped
                let _ = tx.send(event);
            })
            .map_err(SaveError::Io)?;
        Ok(())
    }

    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Collect finished requests without blocking (call once per frame)
    pub fn poll(&self) -> Vec<WorkerEvent> {
        self.rx.try_iter().collect()
    }

    /// Block until the next request finishes
    pub fn wait(&self, timeout: Duration) -> Result<WorkerEvent, SaveError> {
        self.rx.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => SaveError::Timeout,
            RecvTimeoutError::Disconnected => SaveError::WorkerGone,
        })
    }
}
