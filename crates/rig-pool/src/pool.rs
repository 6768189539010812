//! The driver pool: a bounded FIFO buffer, one replenishment task, and
//! tracked asynchronous close.
//!
//! # Concurrency Model
//!
//! Exactly one replenishment task inserts drivers; only callers of
//! `acquire` remove them. The buffer is a bounded `tokio::sync::mpsc`
//! channel, which gives FIFO hand-off, backpressure on the replenisher
//! (it reserves a slot before creating, so the pool never over-provisions),
//! and loss-free cancellation for blocked acquirers. The outstanding-close
//! counter and the shutdown flag are the only other shared state, both
//! atomics.

use crate::config::PoolConfig;
use crate::error::{PoolError, Result};
use crate::factory::DriverFactory;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Backoff between driver creation attempts after a failure.
pub const CREATE_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Interval at which shutdown polls the outstanding-close counter.
const CLOSE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Number of shutdown poll iterations before giving up (~10 seconds).
const MAX_CLOSE_WAIT_ITERATIONS: u32 = 20;

/// The receive side of the pool buffer, shared by acquirers.
///
/// Acquirers queue on the mutex; tokio's mutex is fair, so FIFO service
/// order extends from the buffer to the waiters.
struct Slots<D> {
    rx: Mutex<mpsc::Receiver<D>>,
}

/// A bounded pool of ready-to-use drivers.
///
/// Construct once at suite start with [`DriverPool::start`], share by
/// reference, and tear down once with [`DriverPool::shutdown`]. There is
/// no hidden global; the pool is an ordinary owned value.
///
/// When the [`PoolConfig`] policy disables pooling, the pool degenerates
/// gracefully: `acquire` creates on demand and no background task runs.
pub struct DriverPool<F: DriverFactory> {
    factory: Arc<F>,

    /// `None` when pooling is disabled.
    slots: Option<Slots<F::Driver>>,

    /// Drivers whose asynchronous close has been requested but has not
    /// yet completed. Incremented synchronously at release time.
    closing: Arc<AtomicUsize>,

    /// Once set, the replenishment task retires instead of inserting.
    shutdown: Arc<AtomicBool>,
}

impl<F: DriverFactory> DriverPool<F> {
    /// Starts the pool.
    ///
    /// If the config's pooling predicate holds, this launches exactly one
    /// replenishment task that keeps the buffer topped up to capacity.
    /// Otherwise every `acquire` creates a fresh driver on demand.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(factory: F, config: PoolConfig) -> Self {
        let factory = Arc::new(factory);
        let closing = Arc::new(AtomicUsize::new(0));
        let shutdown = Arc::new(AtomicBool::new(false));

        let slots = if config.pooling_enabled() {
            let (tx, rx) = mpsc::channel(config.capacity.max(1));
            info!(capacity = config.capacity, "starting pooled driver factory");
            tokio::spawn(replenish(
                Arc::clone(&factory),
                tx,
                Arc::clone(&shutdown),
                Arc::clone(&closing),
            ));
            Some(Slots { rx: Mutex::new(rx) })
        } else {
            info!("driver pooling disabled; drivers will be created on demand");
            None
        };

        Self {
            factory,
            slots,
            closing,
            shutdown,
        }
    }

    /// Takes a ready driver, blocking until one is available.
    ///
    /// FIFO: the first driver replenished is the first served. Dropping
    /// the returned future while it waits removes nothing from the pool,
    /// so cancellation never leaks a driver or a pool slot.
    ///
    /// With pooling disabled, creates and returns a fresh driver instead.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Closed`] if the pool shuts down while
    /// waiting, or [`PoolError::Creation`] when an on-demand creation
    /// fails (pooling disabled only).
    pub async fn acquire(&self) -> Result<F::Driver> {
        match &self.slots {
            Some(slots) => {
                let mut rx = slots.rx.lock().await;
                rx.recv().await.ok_or(PoolError::Closed)
            }
            None => Ok(self.factory.create().await?),
        }
    }

    /// Retires a driver, closing it off the caller's execution path.
    ///
    /// The outstanding-close counter is incremented before this returns;
    /// the close itself runs on a detached task. Close failures are
    /// logged, never propagated - there is nothing useful a caller can do
    /// about a driver that failed to die.
    pub fn release(&self, driver: F::Driver) {
        spawn_close(
            Arc::clone(&self.factory),
            driver,
            Arc::clone(&self.closing),
        );
    }

    /// Shuts the pool down and waits (bounded) for full drain.
    ///
    /// Sets the shutdown flag, retires every ready driver, then polls the
    /// outstanding-close counter for up to ~10 seconds, logging progress.
    /// Drivers the replenishment task was still handing over when the
    /// flag flipped are caught by re-draining between polls.
    ///
    /// Best-effort: returns once drained or the bound is reached. A close
    /// that hangs past the bound is logged and abandoned.
    pub async fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);

        if let Some(slots) = &self.slots {
            let mut rx = slots.rx.lock().await;
            info!(pooled = rx.len(), "pool shutdown: retiring pooled drivers");
            self.drain(&mut rx);
            self.wait_for_closes(Some(&mut rx)).await;
        } else {
            self.wait_for_closes(None).await;
        }
    }

    /// Retires every driver currently sitting in the buffer.
    fn drain(&self, rx: &mut mpsc::Receiver<F::Driver>) {
        while let Ok(driver) = rx.try_recv() {
            debug!("retiring pooled driver");
            self.release(driver);
        }
    }

    /// Polls until all requested closes complete or the bound is reached.
    async fn wait_for_closes(&self, mut rx: Option<&mut mpsc::Receiver<F::Driver>>) {
        for _ in 0..MAX_CLOSE_WAIT_ITERATIONS {
            if let Some(rx) = rx.as_deref_mut() {
                // Catch drivers that slipped in after the first drain.
                self.drain(rx);
            }
            let in_flight = self.closing.load(Ordering::SeqCst);
            if in_flight == 0 {
                return;
            }
            info!(in_flight, "waiting for drivers to close");
            sleep(CLOSE_POLL_INTERVAL).await;
        }

        let in_flight = self.closing.load(Ordering::SeqCst);
        if in_flight > 0 {
            warn!(
                in_flight,
                "shutdown wait bound reached; abandoning unfinished driver closes"
            );
        }
    }

    /// Number of closes requested but not yet completed.
    #[must_use]
    pub fn outstanding_closes(&self) -> usize {
        self.closing.load(Ordering::SeqCst)
    }

    /// True when the replenishment task is (or was) running.
    #[must_use]
    pub fn is_pooling(&self) -> bool {
        self.slots.is_some()
    }

    /// True once shutdown has been initiated.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

/// The replenishment loop: reserve a slot, create, hand off.
///
/// Reserving before creating means a driver only ever exists for a slot
/// that is already ours, so the number of live drivers never exceeds
/// capacity plus whatever callers currently hold. Creation failures are
/// retried after a fixed backoff; even failures not recognized as
/// transient are retried, on the expectation that whatever is wrong with
/// the host clears up eventually.
async fn replenish<F: DriverFactory>(
    factory: Arc<F>,
    slots: mpsc::Sender<F::Driver>,
    shutdown: Arc<AtomicBool>,
    closing: Arc<AtomicUsize>,
) {
    while !shutdown.load(Ordering::Acquire) {
        // Backpressure: blocks while the pool is full, throttling
        // creation to the rate tests consume drivers.
        let Ok(permit) = slots.reserve().await else {
            // Pool dropped out from under us.
            break;
        };

        match factory.create().await {
            Ok(driver) => {
                if shutdown.load(Ordering::Acquire) {
                    // Shutdown raced with creation; retire the fresh
                    // driver instead of parking it in a dead pool.
                    info!("retiring driver created during shutdown");
                    drop(permit);
                    spawn_close(Arc::clone(&factory), driver, Arc::clone(&closing));
                    break;
                }
                permit.send(driver);
            }
            Err(e) if e.is_retryable() => {
                drop(permit);
                warn!("transient driver creation failure: {e}");
                sleep(CREATE_RETRY_BACKOFF).await;
                debug!("retrying driver creation");
            }
            Err(e) => {
                drop(permit);
                error!("driver creation failure: {e}");
                sleep(CREATE_RETRY_BACKOFF).await;
                debug!("retrying driver creation");
            }
        }
    }
}

/// Requests an asynchronous close, tracking it in `closing`.
///
/// The counter increment happens before the task is spawned so shutdown
/// can never observe a released driver as already drained.
fn spawn_close<F: DriverFactory>(factory: Arc<F>, driver: F::Driver, closing: Arc<AtomicUsize>) {
    closing.fetch_add(1, Ordering::SeqCst);
    tokio::spawn(async move {
        if let Err(e) = factory.close(driver).await {
            warn!("driver close failed: {e}");
        }
        closing.fetch_sub(1, Ordering::SeqCst);
    });
}
