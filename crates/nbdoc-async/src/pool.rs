//! Bounded worker pool for running blocking document work off the
//! async scheduler.
//!
//! Parse, serialize, and validate are CPU-bound blocking calls; every one
//! of them crosses this bridge rather than running on the scheduler
//! thread. The pool is an explicit bound (a semaphore over
//! `spawn_blocking`), not an unbounded thread-per-call, and its size and
//! queueing policy are plain configuration.
//!
//! Cancellation: dropping the future returned by [`WorkerPool::run`]
//! unblocks the awaiting task immediately. A blocking call that already
//! started is never killed; it runs to completion, its result is
//! discarded, and its slot frees when it finishes.

use std::sync::{Arc, OnceLock};

use tokio::runtime::Handle;
use tokio::sync::Semaphore;

use crate::error::{Error, Result};

/// What happens when all worker slots are busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueuePolicy {
    /// Wait for a slot. The awaiting task suspends; nothing blocks.
    #[default]
    Block,
    /// Fail immediately with [`Error::PoolSaturated`].
    Reject,
}

/// Worker pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub workers: usize,
    pub policy: QueuePolicy,
}

impl PoolConfig {
    pub fn new(workers: usize) -> Self {
        PoolConfig {
            workers: workers.max(1),
            policy: QueuePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: QueuePolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        PoolConfig::new(workers)
    }
}

/// A bounded set of execution slots for blocking calls.
#[derive(Debug)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    policy: QueuePolicy,
    workers: usize,
}

static SHARED: OnceLock<WorkerPool> = OnceLock::new();

impl WorkerPool {
    pub fn new(config: PoolConfig) -> Self {
        WorkerPool {
            slots: Arc::new(Semaphore::new(config.workers)),
            policy: config.policy,
            workers: config.workers,
        }
    }

    /// The process-wide pool used by the module-level operations, created
    /// lazily on first use with the default configuration.
    pub fn shared() -> &'static WorkerPool {
        SHARED.get_or_init(|| WorkerPool::new(PoolConfig::default()))
    }

    /// Install a configuration for the shared pool before its first use.
    /// Returns false if the shared pool already exists.
    pub fn init_shared(config: PoolConfig) -> bool {
        SHARED.set(WorkerPool::new(config)).is_ok()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run a blocking function on the pool and await its result.
    ///
    /// A panic inside `f` resumes on the awaiting task.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let slot = match self.policy {
            QueuePolicy::Block => self
                .slots
                .clone()
                .acquire_owned()
                .await
                .expect("pool semaphore is never closed"),
            QueuePolicy::Reject => self
                .slots
                .clone()
                .try_acquire_owned()
                .map_err(|_| Error::PoolSaturated)?,
        };

        let task = scheduler()?.spawn_blocking(move || {
            let _slot = slot;
            f()
        });
        match task.await {
            Ok(value) => Ok(value),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            // The runtime is shutting down; the task never ran.
            Err(_) => Err(Error::NoSchedulerAvailable),
        }
    }

    /// Like [`run`](WorkerPool::run) for fallible functions: the
    /// function's own error crosses the bridge with kind and message
    /// intact.
    pub async fn run_result<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<Error> + Send + 'static,
    {
        self.run(f).await?.map_err(Into::into)
    }
}

/// Handle to the current cooperative scheduler.
///
/// Re-entrant-safe and side-effect free: never creates a runtime, only
/// observes whether one is driving the calling thread.
pub(crate) fn scheduler() -> Result<Handle> {
    Handle::try_current().map_err(|_| Error::NoSchedulerAvailable)
}
