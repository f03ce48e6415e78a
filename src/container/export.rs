//! Background export of snapshots to one container.
//!
//! ```text
//! ┌─────────────┐   bounded channel    ┌──────────────────┐
//! │   caller    │ ──── ExportJob ───▶  │ export thread    │
//! │             │                      │ (ContainerWriter)│
//! │ ExportTask  │ ◀── result (1 per) ─ │                  │
//! └─────────────┘                      └──────────────────┘
//! ```
//!
//! A worker owns its container path, and jobs are written in submission
//! order. Two workers (or a worker and a direct writer) must not target the
//! same file at the same time; no file locking is done.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, warn};

use super::address::ContainerAddress;
use super::config::WriterConfig;
use super::error::ContainerError;
use super::writer::ContainerWriter;
use crate::attributes::SettingsSnapshot;
use crate::peak_list::PeakList;

/// Default number of queued jobs before `submit` blocks
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

type ExportResult = Result<ContainerAddress, ContainerError>;

struct ExportJob {
    list: PeakList,
    settings: SettingsSnapshot,
    reply: Sender<ExportResult>,
}

/// Handle to one submitted export.
#[derive(Debug)]
pub struct ExportTask {
    receiver: Receiver<ExportResult>,
}

impl ExportTask {
    /// Block until the snapshot is written.
    pub fn wait(self) -> ExportResult {
        self.receiver.recv().map_err(|_| {
            ContainerError::ExportWorkerError("export worker exited before replying".to_string())
        })?
    }

    /// The result, if the job has finished. Does not block.
    pub fn try_result(&self) -> Option<ExportResult> {
        self.receiver.try_recv().ok()
    }
}

/// Writes snapshots to a container on a dedicated thread.
///
/// # Example
///
/// ```no_run
/// use mzpeaklist::prelude::*;
///
/// let worker = ExportWorker::new("run.mzpl", WriterConfig::default())?;
/// let task = worker.submit(PeakListBuilder::new(0).build(), SettingsSnapshot::default())?;
/// let address = task.wait()?;
/// worker.finish()?;
/// # Ok::<(), mzpeaklist::container::ContainerError>(())
/// ```
pub struct ExportWorker {
    path: PathBuf,
    sender: Option<Sender<ExportJob>>,
    handle: Option<JoinHandle<()>>,
    first_error: Arc<Mutex<Option<String>>>,
}

impl ExportWorker {
    /// Start a worker with the default queue capacity
    pub fn new<P: AsRef<Path>>(path: P, config: WriterConfig) -> Result<Self, ContainerError> {
        Self::with_capacity(path, config, DEFAULT_QUEUE_CAPACITY)
    }

    /// Start a worker whose queue holds at most `capacity` pending jobs.
    ///
    /// The thread is named `mzpeaklist-export`.
    pub fn with_capacity<P: AsRef<Path>>(
        path: P,
        config: WriterConfig,
        capacity: usize,
    ) -> Result<Self, ContainerError> {
        let path = path.as_ref().to_path_buf();
        let writer = ContainerWriter::new(&path, config);
        let (sender, receiver) = bounded::<ExportJob>(capacity.max(1));
        let first_error: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let first_error_clone = Arc::clone(&first_error);

        let handle = thread::Builder::new()
            .name("mzpeaklist-export".to_string())
            .spawn(move || {
                for job in receiver {
                    let result = writer.write(&job.list, &job.settings);
                    if let Err(e) = &result {
                        error!("Export of scan {} failed: {}", job.list.scan_number, e);
                        let mut slot = first_error_clone
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner());
                        slot.get_or_insert_with(|| e.to_string());
                    }
                    if job.reply.send(result).is_err() {
                        debug!("Export task for scan {} was dropped", job.list.scan_number);
                    }
                }
            })
            .map_err(|e| {
                ContainerError::ExportWorkerError(format!("Failed to spawn export thread: {}", e))
            })?;

        Ok(Self {
            path,
            sender: Some(sender),
            handle: Some(handle),
            first_error,
        })
    }

    /// Container path this worker writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue a snapshot for export.
    ///
    /// Blocks while the queue is full.
    pub fn submit(
        &self,
        list: PeakList,
        settings: SettingsSnapshot,
    ) -> Result<ExportTask, ContainerError> {
        let sender = self.sender.as_ref().ok_or_else(|| {
            ContainerError::ExportWorkerError("Worker already finished".to_string())
        })?;
        let (reply, receiver) = bounded(1);
        sender
            .send(ExportJob {
                list,
                settings,
                reply,
            })
            .map_err(|_| {
                ContainerError::ExportWorkerError("Export thread exited unexpectedly".to_string())
            })?;
        Ok(ExportTask { receiver })
    }

    /// First error any job has hit so far.
    pub fn check_error(&self) -> Result<(), ContainerError> {
        let slot = self
            .first_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match slot.as_ref() {
            Some(msg) => Err(ContainerError::ExportWorkerError(msg.clone())),
            None => Ok(()),
        }
    }

    /// Drain the queue and stop the thread.
    ///
    /// Fails if the thread panicked; failures of individual jobs are
    /// reported through their tasks and [`check_error`](Self::check_error).
    pub fn finish(mut self) -> Result<(), ContainerError> {
        self.sender.take();
        let handle = self.handle.take().ok_or_else(|| {
            ContainerError::ExportWorkerError("finish() called twice".to_string())
        })?;
        handle.join().map_err(|_| ContainerError::WorkerPanicked)
    }
}

impl Drop for ExportWorker {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            warn!(
                "ExportWorker for {} dropped without calling finish(), waiting for queued jobs",
                self.path.display()
            );
            let _ = handle.join();
        }
    }
}
