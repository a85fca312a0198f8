//! Debounced, single-flight autosave for an edited program.
//!
//! The [`AutosaveController`] owns the in-memory [`ProgramState`] while it
//! is being edited. Every mutation restarts a debounce window; when the
//! window elapses the latest snapshot is written through a
//! [`ProgramWriter`]. Writes never overlap: debounced saves, explicit saves
//! and the final flush on shutdown all pass through one gate.
//!
//! Status moves `Idle → Dirty → Saving → Idle`, or to `Error` when a write
//! fails. A failed save is retried only by the next mutation or an explicit
//! [`save_now`](AutosaveController::save_now). After a successful
//! [`shutdown`](AutosaveController::shutdown) the status is `Done`.

use std::{future::Future, sync::Arc, time::Duration};

use log::{debug, error};
use parking_lot::Mutex;
use tokio::{
    sync::{Mutex as AsyncMutex, Notify, watch},
    task::JoinHandle,
};

use crate::{
    error::Result,
    models::{ProgramState, SaveState},
};

/// Default quiet period before a mutation is written.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1500);

/// Persists a full program snapshot.
pub trait ProgramWriter: Send + Sync + 'static {
    /// Writes `state` and returns it as stored, with persisted ids filled in.
    fn save(&self, state: ProgramState) -> impl Future<Output = Result<ProgramState>> + Send;
}

impl<T: ProgramWriter> ProgramWriter for Arc<T> {
    fn save(&self, state: ProgramState) -> impl Future<Output = Result<ProgramState>> + Send {
        (**self).save(state)
    }
}

/// Autosave tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    /// Quiet period after the last mutation before a write starts
    pub debounce: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl AutosaveConfig {
    pub fn with_debounce(debounce: Duration) -> Self {
        Self { debounce }
    }
}

struct Snapshots {
    current: ProgramState,
    saved: ProgramState,
    revision: u64,
    last_error: Option<String>,
}

impl Snapshots {
    fn is_dirty(&self) -> bool {
        !self.current.same_content(&self.saved)
    }
}

struct Inner<W> {
    program_id: u64,
    writer: W,
    config: AutosaveConfig,
    snapshots: Mutex<Snapshots>,
    status: watch::Sender<SaveState>,
    mutated: Notify,
    write_gate: AsyncMutex<()>,
    shutdown: watch::Sender<bool>,
}

impl<W: ProgramWriter> Inner<W> {
    fn set_status(&self, next: SaveState) {
        let previous = self.status.send_replace(next);
        if previous != next {
            debug!(
                "Autosave for program {}: {} -> {}",
                self.program_id,
                previous.as_str(),
                next.as_str()
            );
        }
    }

    /// Writes the current snapshot if it differs from the saved one. Only
    /// one flush runs at a time.
    ///
    /// Status changes are published while the snapshot lock is held, so a
    /// concurrent [`update`](AutosaveController::update) always sees the
    /// status that matches the snapshots.
    async fn flush(&self) -> Result<()> {
        let _gate = self.write_gate.lock().await;

        let (snapshot, revision) = {
            let snapshots = self.snapshots.lock();
            if !snapshots.is_dirty() {
                if self.status.borrow().is_pending() {
                    self.set_status(SaveState::Idle);
                }
                return Ok(());
            }
            self.set_status(SaveState::Saving);
            (snapshots.current.clone(), snapshots.revision)
        };

        let outcome = self.writer.save(snapshot).await;

        let mut snapshots = self.snapshots.lock();
        let next = match &outcome {
            Ok(saved) => {
                // The writer may adjust what it stores, such as dates after a
                // shape change; without newer edits that is the state to keep
                // editing.
                if snapshots.revision == revision {
                    snapshots.current = saved.clone();
                } else {
                    snapshots.current.adopt_ids_from(saved);
                }
                snapshots.saved = saved.clone();
                snapshots.last_error = None;
                if snapshots.is_dirty() {
                    SaveState::Dirty
                } else {
                    SaveState::Idle
                }
            }
            Err(e) => {
                error!("Autosave for program {} failed: {e}", self.program_id);
                snapshots.last_error = Some(e.to_string());
                if snapshots.revision != revision {
                    SaveState::Dirty
                } else {
                    SaveState::Error
                }
            }
        };
        self.set_status(next);
        drop(snapshots);
        outcome.map(|_| ())
    }
}

/// Watches a program state for edits and keeps the store in sync.
pub struct AutosaveController<W: ProgramWriter> {
    inner: Arc<Inner<W>>,
    task: Option<JoinHandle<()>>,
}

impl<W: ProgramWriter> AutosaveController<W> {
    /// Starts autosaving `initial`, which is taken to be already persisted.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(initial: ProgramState, writer: W, config: AutosaveConfig) -> Self {
        let (status, _) = watch::channel(SaveState::Idle);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let inner = Arc::new(Inner {
            program_id: initial.program_id,
            writer,
            config,
            snapshots: Mutex::new(Snapshots {
                current: initial.clone(),
                saved: initial,
                revision: 0,
                last_error: None,
            }),
            status,
            mutated: Notify::new(),
            write_gate: AsyncMutex::new(()),
            shutdown,
        });

        let task = tokio::spawn(run_debounce_loop(Arc::clone(&inner), shutdown_rx));
        Self {
            inner,
            task: Some(task),
        }
    }

    /// Applies an edit to the in-memory state and restarts the debounce
    /// window.
    pub fn update<F>(&self, edit: F)
    where
        F: FnOnce(&mut ProgramState),
    {
        {
            let mut snapshots = self.inner.snapshots.lock();
            edit(&mut snapshots.current);
            snapshots.revision += 1;

            let status = *self.inner.status.borrow();
            match (snapshots.is_dirty(), status) {
                (_, SaveState::Saving) => {}
                (true, _) => self.inner.set_status(SaveState::Dirty),
                (false, SaveState::Dirty | SaveState::Error) => {
                    self.inner.set_status(SaveState::Idle)
                }
                (false, _) => {}
            }
        }
        self.inner.mutated.notify_one();
    }

    /// Replaces the whole in-memory state.
    pub fn replace(&self, state: ProgramState) {
        self.update(|current| *current = state);
    }

    /// Copy of the current in-memory state.
    pub fn snapshot(&self) -> ProgramState {
        self.inner.snapshots.lock().current.clone()
    }

    pub fn status(&self) -> SaveState {
        *self.inner.status.borrow()
    }

    /// Receives every status change.
    pub fn subscribe(&self) -> watch::Receiver<SaveState> {
        self.inner.status.subscribe()
    }

    /// Message of the most recent failed write, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.inner.snapshots.lock().last_error.clone()
    }

    /// True while edits exist that are not known to be persisted.
    pub fn has_unsaved_changes(&self) -> bool {
        self.inner.snapshots.lock().is_dirty() || self.status() == SaveState::Saving
    }

    /// Writes now, bypassing the debounce window but not the single-flight
    /// gate.
    pub async fn save_now(&self) -> Result<()> {
        self.inner.flush().await
    }

    /// Stops the debounce loop and makes one final write attempt. Ends in
    /// `Done` when everything is persisted.
    pub async fn shutdown(mut self) -> Result<()> {
        self.inner.shutdown.send_replace(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }

        self.inner.flush().await?;
        self.inner.set_status(SaveState::Done);
        Ok(())
    }
}

impl<W: ProgramWriter> Drop for AutosaveController<W> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_debounce_loop<W: ProgramWriter>(
    inner: Arc<Inner<W>>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            () = inner.mutated.notified() => {}
            _ = shutdown.changed() => break,
        }

        loop {
            tokio::select! {
                () = tokio::time::sleep(inner.config.debounce) => break,
                () = inner.mutated.notified() => {}
                _ = shutdown.changed() => return,
            }
        }

        // Failures are reported through the status channel.
        let _ = inner.flush().await;
    }
}
