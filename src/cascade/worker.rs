//! Deferred cascade execution.
//!
//! The triggering document write and the descendant cascade are
//! deliberately decoupled: the hook only enqueues the origin node id, and a
//! single background thread drains the queue and runs the propagator. The
//! queue is bounded; a full queue rejects the job rather than blocking the
//! save path.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::{Error, Result};
use crate::node::NodeId;

use super::propagator::{CascadeFailure, CascadeReport, CascadeStatus, ChildUrlPropagator};

/// How many finished-run reports the worker retains; older ones are
/// dropped once their outcome has been logged. Keeps memory flat in a
/// long-running host that schedules a cascade per edit.
const MAX_RETAINED_REPORTS: usize = 64;

/// Background worker consuming scheduled cascades.
///
/// Each job moves `Scheduled` (queued) to `Running` (picked up by the
/// thread) to a terminal [`CascadeStatus`] in its report. Jobs cannot be
/// cancelled once queued, and no wall-clock timeout bounds a run; only the
/// propagator's depth ceiling does.
///
/// Reports of finished runs are kept in a bounded buffer holding the most
/// recent `MAX_RETAINED_REPORTS` runs; every outcome is also logged as it
/// completes.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pagetree::cascade::{CascadeWorker, ChildUrlPropagator};
/// use pagetree::resolve::{HierarchyPathResolver, RouteRules};
/// use pagetree::store::{DocumentStore, MemoryStore};
/// use pagetree::{Node, NodeId, Slug};
///
/// let store = Arc::new(MemoryStore::new());
/// let root = Node::builder(NodeId::new("r").unwrap(), Slug::new("home").unwrap()).build();
/// store.insert(&root).unwrap();
///
/// let resolver = Arc::new(HierarchyPathResolver::new(
///     store.clone() as Arc<dyn DocumentStore>,
///     RouteRules::default(),
/// ));
/// let propagator = ChildUrlPropagator::new(store, resolver, 10);
///
/// let worker = CascadeWorker::spawn(propagator, 16);
/// worker.schedule(root.id.clone()).unwrap();
/// let reports = worker.shutdown();
/// assert_eq!(reports.len(), 1);
/// ```
pub struct CascadeWorker {
    sender: Option<SyncSender<NodeId>>,
    handle: Option<JoinHandle<()>>,
    reports: Arc<Mutex<VecDeque<CascadeReport>>>,
    capacity: usize,
}

impl CascadeWorker {
    /// Spawns the worker thread with a queue of the given capacity.
    ///
    /// # Panics
    ///
    /// Panics if the thread cannot be spawned.
    #[must_use]
    pub fn spawn(propagator: ChildUrlPropagator, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::sync_channel::<NodeId>(capacity);
        let reports = Arc::new(Mutex::new(VecDeque::new()));
        let thread_reports = Arc::clone(&reports);

        let handle = thread::Builder::new()
            .name("pagetree-cascade".to_string())
            .spawn(move || Self::run(&propagator, &receiver, &thread_reports))
            .expect("failed to spawn cascade worker thread");

        Self {
            sender: Some(sender),
            handle: Some(handle),
            reports,
            capacity,
        }
    }

    fn run(
        propagator: &ChildUrlPropagator,
        receiver: &Receiver<NodeId>,
        reports: &Mutex<VecDeque<CascadeReport>>,
    ) {
        // Receiving returns Err once every sender is dropped; that is the
        // shutdown signal, after the queue has drained.
        while let Ok(origin) = receiver.recv() {
            log::debug!("cascade job running for {origin}");
            let report = match propagator.propagate(&origin) {
                Ok(report) => report,
                Err(error) => {
                    log::error!("cascade from {origin} failed to start: {error}");
                    CascadeReport {
                        origin: origin.clone(),
                        status: CascadeStatus::PartiallyFailed,
                        updated: 0,
                        failures: vec![CascadeFailure {
                            id: origin.clone(),
                            error,
                        }],
                        depth_limited: false,
                    }
                }
            };
            if let Ok(mut reports) = reports.lock() {
                if reports.len() == MAX_RETAINED_REPORTS {
                    reports.pop_front();
                }
                reports.push_back(report);
            }
        }
    }

    /// Enqueues a cascade for the given origin node.
    ///
    /// Non-blocking: the save path must never wait on URL bookkeeping.
    ///
    /// # Errors
    ///
    /// - [`Error::CascadeQueueFull`] if the bounded queue is at capacity.
    /// - [`Error::Store`] if the worker thread has already terminated.
    pub fn schedule(&self, origin: NodeId) -> Result<()> {
        let Some(sender) = &self.sender else {
            return Err(Error::Store {
                details: "cascade worker already shut down".to_string(),
            });
        };
        match sender.try_send(origin) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(origin)) => {
                log::warn!("cascade queue full, dropping job for {origin}");
                Err(Error::CascadeQueueFull {
                    capacity: self.capacity,
                })
            }
            Err(TrySendError::Disconnected(_)) => Err(Error::Store {
                details: "cascade worker thread terminated".to_string(),
            }),
        }
    }

    /// The configured queue capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drains the queue, stops the worker thread, and returns the retained
    /// reports in execution order (at most the most recent
    /// `MAX_RETAINED_REPORTS` runs).
    #[must_use]
    pub fn shutdown(mut self) -> Vec<CascadeReport> {
        self.stop();
        self.reports
            .lock()
            .map(|mut r| Vec::from(std::mem::take(&mut *r)))
            .unwrap_or_default()
    }

    fn stop(&mut self) {
        // Dropping the sender lets the worker drain remaining jobs and
        // exit its receive loop.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("cascade worker thread panicked");
            }
        }
    }
}

impl Drop for CascadeWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
