use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::application::config::{AttachPolicy, DispatchConfig, OverflowPolicy};
use crate::application::listener::dispatch::RuntimeAttachment;
use crate::domain::managed::service::ManagedRuntime;

/// Deferred work capturing a managed reference and an event snapshot.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

struct DisposeState {
    disposed: bool,
    tx: Option<flume::Sender<Job>>,
    worker_id: Option<ThreadId>,
}

/// Lifecycle core every listener delegates to.
///
/// Work accepted by `dispatch` runs on a single worker thread owned by this base, in the order it
/// was accepted. After `dispose` returns, nothing accepted earlier is still running and nothing
/// dispatched later will ever run.
pub struct EventListenerBase {
    name: &'static str,
    runtime: Arc<dyn ManagedRuntime>,
    config: DispatchConfig,
    state: Mutex<DisposeState>,
    pending: Arc<AtomicUsize>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl EventListenerBase {
    pub fn new(name: &'static str, runtime: Arc<dyn ManagedRuntime>, config: DispatchConfig) -> Self {
        EventListenerBase {
            name,
            runtime,
            config,
            state: Mutex::new(DisposeState {
                disposed: false,
                tx: None,
                worker_id: None,
            }),
            pending: Arc::new(AtomicUsize::new(0)),
            worker: Mutex::new(None),
        }
    }

    /// Schedules `work` on the worker. Returns false when the work was dropped.
    ///
    /// Under `OverflowPolicy::Block` the caller waits for room after releasing the state lock, so a
    /// concurrent `dispose` still completes once the worker drains the queue. A task that dispatches
    /// to its own listener while the queue is full waits on itself and never returns.
    pub fn dispatch<F>(&self, work: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let tx = {
            let mut state = self.state.lock();
            if state.disposed {
                return false;
            }
            if state.tx.is_none() && !self.spawn_worker(&mut state) {
                return false;
            }
            self.pending.fetch_add(1, Ordering::SeqCst);
            match state.tx.as_ref() {
                Some(tx) => tx.clone(),
                None => {
                    self.pending.fetch_sub(1, Ordering::SeqCst);
                    return false;
                }
            }
        };

        let job: Job = Box::new(work);
        let result = match self.config.overflow {
            OverflowPolicy::DropNewest => tx.try_send(job).map_err(|e| match e {
                flume::TrySendError::Full(_) => "queue is full",
                flume::TrySendError::Disconnected(_) => "worker has stopped",
            }),
            OverflowPolicy::Block => tx.send(job).map_err(|_| "worker has stopped"),
        };

        match result {
            Ok(()) => true,
            Err(reason) => {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                warn!(listener = self.name, "dropping event: {}", reason);
                false
            }
        }
    }

    fn spawn_worker(&self, state: &mut DisposeState) -> bool {
        let capacity = self.config.queue_capacity.max(1);
        let (tx, rx) = flume::bounded::<Job>(capacity);
        let worker = Worker {
            name: self.name,
            rx,
            runtime: self.runtime.clone(),
            attach: self.config.attach,
            pending: self.pending.clone(),
        };

        let spawned = thread::Builder::new()
            .name(format!("{}-listener", self.name))
            .spawn(move || worker.run());
        match spawned {
            Ok(handle) => {
                debug!(listener = self.name, "worker started");
                state.worker_id = Some(handle.thread().id());
                state.tx = Some(tx);
                *self.worker.lock() = Some(handle);
                true
            }
            Err(e) => {
                error!(listener = self.name, "failed to spawn worker: {}", e);
                false
            }
        }
    }

    /// Marks the listener disposed and waits for every accepted task to finish.
    ///
    /// Safe to call repeatedly and from several threads; every caller returns only once the worker
    /// has gone quiet. Called from the worker itself, the join is skipped.
    pub fn dispose(&self) {
        let (tx, worker_id) = {
            let mut state = self.state.lock();
            state.disposed = true;
            (state.tx.take(), state.worker_id)
        };
        // the worker exits once the queue is drained and every sender is gone
        drop(tx);

        if worker_id.is_some() && worker_id == Some(thread::current().id()) {
            warn!(listener = self.name, "dispose called on its own worker, skipping join");
            return;
        }

        let mut worker = self.worker.lock();
        if let Some(handle) = worker.take() {
            if handle.join().is_err() {
                error!(listener = self.name, "worker terminated abnormally");
            }
            debug!(listener = self.name, "worker joined");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Accepted tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for EventListenerBase {
    fn drop(&mut self) {
        self.dispose();
    }
}

struct Worker {
    name: &'static str,
    rx: flume::Receiver<Job>,
    runtime: Arc<dyn ManagedRuntime>,
    attach: AttachPolicy,
    pending: Arc<AtomicUsize>,
}

impl Worker {
    fn run(self) {
        match self.attach {
            AttachPolicy::PerWorker => self.run_attached_once(),
            AttachPolicy::PerBatch => self.run_batches(),
        }
        debug!(listener = self.name, "worker stopped");
    }

    fn run_attached_once(&self) {
        let _attachment = match RuntimeAttachment::acquire(self.runtime.as_ref()) {
            Ok(attachment) => attachment,
            Err(e) => {
                error!(listener = self.name, "failed to attach worker: {}", e);
                self.rx.iter().for_each(|job| self.discard(job));
                return;
            }
        };
        self.rx.iter().for_each(|job| self.execute(job));
    }

    fn run_batches(&self) {
        while let Ok(first) = self.rx.recv() {
            let _attachment = match RuntimeAttachment::acquire(self.runtime.as_ref()) {
                Ok(attachment) => attachment,
                Err(e) => {
                    error!(listener = self.name, "failed to attach worker: {}", e);
                    self.discard(first);
                    self.rx.try_iter().for_each(|job| self.discard(job));
                    continue;
                }
            };
            self.execute(first);
            while let Ok(job) = self.rx.try_recv() {
                self.execute(job);
            }
        }
    }

    fn execute(&self, job: Job) {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!(listener = self.name, "event task panicked");
        }
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }

    fn discard(&self, job: Job) {
        drop(job);
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod test_event_listener_base {
    use std::time::{Duration, Instant};

    use tracing_test::traced_test;

    use super::*;
    use crate::domain::managed::service::MockManagedRuntime;
    use crate::error;

    fn runtime() -> Arc<dyn ManagedRuntime> {
        let mut runtime = MockManagedRuntime::default();
        runtime.expect_attach_current_thread().returning(|| Ok(()));
        runtime.expect_detach_current_thread().return_const(());
        Arc::new(runtime)
    }

    fn create_base(config: DispatchConfig) -> Arc<EventListenerBase> {
        Arc::new(EventListenerBase::new("test", runtime(), config))
    }

    #[test]
    fn runs_in_dispatch_order() {
        let base = create_base(DispatchConfig::default());
        let seen = Arc::new(Mutex::new(vec![]));

        for i in 0..50 {
            let seen = seen.clone();
            assert!(base.dispatch(move || seen.lock().push(i)));
        }
        base.dispose();

        assert_eq!(*seen.lock(), (0..50).collect::<Vec<_>>());
        assert_eq!(base.pending(), 0);
    }

    #[test]
    fn no_dispatch_after_dispose() {
        let base = create_base(DispatchConfig::default());
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        base.dispatch(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        base.dispose();

        let c = counter.clone();
        let accepted = base.dispatch(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        thread::sleep(Duration::from_millis(50));

        assert!(!accepted);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(base.is_disposed());
    }

    #[test]
    fn dispose_before_any_event() {
        // no worker has been spawned yet
        let base = create_base(DispatchConfig::default());
        base.dispose();
        assert!(base.is_disposed());
        assert!(!base.dispatch(|| {}));
    }

    #[test]
    fn dispose_is_idempotent() {
        let base = create_base(DispatchConfig::default());
        base.dispatch(|| thread::sleep(Duration::from_millis(20)));

        base.dispose();
        base.dispose();
        assert!(base.is_disposed());
        assert_eq!(base.pending(), 0);
    }

    #[test]
    fn concurrent_dispose_waits_for_quiescence() {
        let base = create_base(DispatchConfig::default());
        let finished = Arc::new(AtomicUsize::new(0));
        let f = finished.clone();
        base.dispatch(move || {
            thread::sleep(Duration::from_millis(100));
            f.fetch_add(1, Ordering::SeqCst);
        });

        let callers: Vec<_> = (0..4)
            .map(|_| {
                let base = base.clone();
                let finished = finished.clone();
                thread::spawn(move || {
                    base.dispose();
                    finished.load(Ordering::SeqCst)
                })
            })
            .collect();

        for caller in callers {
            assert_eq!(caller.join().unwrap(), 1);
        }
    }

    #[test]
    fn dispose_blocks_until_every_task_completes() {
        let base = create_base(DispatchConfig::default());
        let finished = Arc::new(AtomicUsize::new(0));
        let delays = [50u64, 150, 100];

        let start = Instant::now();
        for delay in delays.iter().copied() {
            let finished = finished.clone();
            base.dispatch(move || {
                thread::sleep(Duration::from_millis(delay));
                finished.fetch_add(1, Ordering::SeqCst);
            });
        }
        base.dispose();

        assert!(start.elapsed() >= Duration::from_millis(150));
        assert_eq!(finished.load(Ordering::SeqCst), delays.len());
    }

    #[traced_test]
    #[test]
    fn dispose_from_worker_does_not_deadlock() {
        let base = create_base(DispatchConfig::default());
        let (done_tx, done_rx) = flume::bounded::<()>(1);

        let inner = base.clone();
        base.dispatch(move || {
            inner.dispose();
            let _ = done_tx.send(());
        });

        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
        base.dispose();
        assert!(base.is_disposed());
        assert!(logs_contain("dispose called on its own worker"));
    }

    #[traced_test]
    #[test]
    fn panicking_task_does_not_stop_worker() {
        let base = create_base(DispatchConfig::default());
        let counter = Arc::new(AtomicUsize::new(0));

        base.dispatch(|| panic!("boom"));
        let c = counter.clone();
        base.dispatch(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        base.dispose();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(logs_contain("event task panicked"));
    }

    #[traced_test]
    #[test]
    fn full_queue_drops_newest() {
        let base = create_base(DispatchConfig {
            queue_capacity: 1,
            overflow: OverflowPolicy::DropNewest,
            attach: AttachPolicy::PerBatch,
        });
        let (release_tx, release_rx) = flume::bounded::<()>(1);
        let (started_tx, started_rx) = flume::bounded::<()>(1);
        let counter = Arc::new(AtomicUsize::new(0));

        // the first task occupies the worker, the second fills the queue
        let c = counter.clone();
        assert!(base.dispatch(move || {
            let _ = started_tx.send(());
            let _ = release_rx.recv();
            c.fetch_add(1, Ordering::SeqCst);
        }));
        started_rx.recv().unwrap();
        let c = counter.clone();
        assert!(base.dispatch(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        let c = counter.clone();
        assert!(!base.dispatch(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        release_tx.send(()).unwrap();
        base.dispose();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(logs_contain("dropping event: queue is full"));
    }

    #[test]
    fn blocked_dispatch_survives_concurrent_dispose() {
        let base = create_base(DispatchConfig {
            queue_capacity: 1,
            overflow: OverflowPolicy::Block,
            attach: AttachPolicy::PerBatch,
        });
        let (release_tx, release_rx) = flume::bounded::<()>(1);
        let (started_tx, started_rx) = flume::bounded::<()>(1);
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        assert!(base.dispatch(move || {
            let _ = started_tx.send(());
            let _ = release_rx.recv();
            c.fetch_add(1, Ordering::SeqCst);
        }));
        started_rx.recv().unwrap();
        let c = counter.clone();
        assert!(base.dispatch(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        // the queue is full, this sender waits for room
        let blocked = {
            let base = base.clone();
            let c = counter.clone();
            thread::spawn(move || {
                base.dispatch(move || {
                    c.fetch_add(1, Ordering::SeqCst);
                })
            })
        };
        while base.pending() < 3 {
            thread::sleep(Duration::from_millis(1));
        }

        let disposed = Arc::new(AtomicUsize::new(0));
        let disposer = {
            let base = base.clone();
            let disposed = disposed.clone();
            thread::spawn(move || {
                base.dispose();
                disposed.store(1, Ordering::SeqCst);
            })
        };
        thread::sleep(Duration::from_millis(50));
        assert!(base.is_disposed());
        assert_eq!(disposed.load(Ordering::SeqCst), 0);

        release_tx.send(()).unwrap();
        assert!(blocked.join().unwrap());
        disposer.join().unwrap();

        assert_eq!(disposed.load(Ordering::SeqCst), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(base.pending(), 0);
    }

    #[test]
    fn attach_once_per_worker() {
        let mut runtime = MockManagedRuntime::default();
        runtime.expect_attach_current_thread().times(1).returning(|| Ok(()));
        runtime.expect_detach_current_thread().times(1).return_const(());
        let base = EventListenerBase::new(
            "test",
            Arc::new(runtime),
            DispatchConfig {
                attach: AttachPolicy::PerWorker,
                ..DispatchConfig::default()
            },
        );

        for _ in 0..10 {
            base.dispatch(|| {});
        }
        base.dispose();
    }

    #[traced_test]
    #[test]
    fn attach_failure_drops_batch() {
        let mut runtime = MockManagedRuntime::default();
        runtime
            .expect_attach_current_thread()
            .returning(|| Err(error::Error::create_runtime_error("vm is gone")));
        runtime.expect_detach_current_thread().never();
        let base = EventListenerBase::new("test", Arc::new(runtime), DispatchConfig::default());
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        base.dispatch(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        base.dispose();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(base.pending(), 0);
        assert!(logs_contain("failed to attach worker"));
    }
}
