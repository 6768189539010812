//! Lifecycle tests for the driver pool.
//!
//! These use a stub factory with atomic counters so every property is
//! observable: how many drivers were created, closed, and live at peak.

use rig_pool::{CloseError, CreateError, DriverFactory, DriverPool, PoolConfig, PoolError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::{sleep, timeout};

#[derive(Default)]
struct Counters {
    created: AtomicUsize,
    closed: AtomicUsize,
    live: AtomicUsize,
    peak_live: AtomicUsize,
    failures_remaining: AtomicUsize,
    create_delay_ms: AtomicU64,
}

/// Factory handing out sequentially numbered drivers. Cloneable so tests
/// keep a handle to the counters after the pool takes ownership.
#[derive(Clone, Default)]
struct StubFactory {
    counters: Arc<Counters>,
}

impl StubFactory {
    fn failing_first(failures: usize) -> Self {
        let factory = Self::default();
        factory
            .counters
            .failures_remaining
            .store(failures, Ordering::SeqCst);
        factory
    }

    fn with_create_delay(delay: Duration) -> Self {
        let factory = Self::default();
        factory
            .counters
            .create_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
        factory
    }

    fn created(&self) -> usize {
        self.counters.created.load(Ordering::SeqCst)
    }

    fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    fn live(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    fn peak_live(&self) -> usize {
        self.counters.peak_live.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DriverFactory for StubFactory {
    type Driver = usize;

    async fn create(&self) -> Result<usize, CreateError> {
        let counters = &self.counters;

        let delay = counters.create_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            sleep(Duration::from_millis(delay)).await;
        }

        // Claim one pending injected failure, if any.
        let mut failures = counters.failures_remaining.load(Ordering::SeqCst);
        while failures > 0 {
            match counters.failures_remaining.compare_exchange(
                failures,
                failures - 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Err(CreateError::transient("injected creation failure")),
                Err(observed) => failures = observed,
            }
        }

        let id = counters.created.fetch_add(1, Ordering::SeqCst) + 1;
        let live = counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak_live.fetch_max(live, Ordering::SeqCst);
        Ok(id)
    }

    async fn close(&self, _driver: usize) -> Result<(), CloseError> {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn pooled_config(capacity: usize) -> PoolConfig {
    PoolConfig::new().with_capacity(capacity).with_pooling(true)
}

async fn acquire_within(
    pool: &DriverPool<StubFactory>,
    bound: Duration,
) -> Result<usize, PoolError> {
    timeout(bound, pool.acquire())
        .await
        .expect("acquire did not complete within bound")
}

#[tokio::test]
async fn pooled_acquire_serves_fifo_distinct_drivers() {
    let factory = StubFactory::default();
    let pool = DriverPool::start(factory.clone(), pooled_config(2));

    let first = acquire_within(&pool, Duration::from_secs(5)).await.unwrap();
    let second = acquire_within(&pool, Duration::from_secs(5)).await.unwrap();

    // First driver replenished is first served, ties broken by creation
    // order; the stub numbers drivers in creation order.
    assert_eq!(first, 1);
    assert_eq!(second, 2);

    pool.release(first);
    pool.release(second);
    pool.shutdown().await;
}

#[tokio::test]
async fn acquire_release_shutdown_terminates_within_bound() {
    let factory = StubFactory::default();
    let pool = DriverPool::start(factory.clone(), pooled_config(2));

    let run = async {
        let a = pool.acquire().await.unwrap();
        let b = pool.acquire().await.unwrap();
        pool.release(a);
        pool.release(b);
        pool.shutdown().await;
    };

    timeout(Duration::from_secs(15), run)
        .await
        .expect("acquire/release/shutdown did not terminate");
}

#[tokio::test]
async fn shutdown_drains_pool_and_zeroes_close_counter() {
    let factory = StubFactory::default();
    let pool = DriverPool::start(factory.clone(), pooled_config(2));

    let a = acquire_within(&pool, Duration::from_secs(5)).await.unwrap();
    let b = acquire_within(&pool, Duration::from_secs(5)).await.unwrap();
    pool.release(a);
    pool.release(b);

    pool.shutdown().await;

    assert_eq!(pool.outstanding_closes(), 0);

    // A driver created in the shutdown race is retired asynchronously;
    // poll briefly instead of racing the close task.
    let fully_closed = async {
        while factory.live() > 0 || factory.closed() < factory.created() {
            sleep(Duration::from_millis(50)).await;
        }
    };
    timeout(Duration::from_secs(5), fully_closed)
        .await
        .expect("not every created driver was closed");
}

#[tokio::test]
async fn disabled_pooling_always_creates_fresh() {
    let factory = StubFactory::default();
    let pool = DriverPool::start(factory.clone(), PoolConfig::new().with_pooling(false));

    assert!(!pool.is_pooling());

    let mut ids = Vec::new();
    for _ in 0..3 {
        let driver = pool.acquire().await.unwrap();
        ids.push(driver);
        pool.release(driver);
    }

    // Every acquire hit the factory; nothing was pooled ahead of use.
    assert_eq!(factory.created(), 3);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    pool.shutdown().await;
    assert_eq!(pool.outstanding_closes(), 0);
}

#[tokio::test]
async fn disabled_pooling_surfaces_creation_errors() {
    let factory = StubFactory::failing_first(1);
    let pool = DriverPool::start(factory.clone(), PoolConfig::new().with_pooling(false));

    let err = pool.acquire().await.unwrap_err();
    assert!(matches!(err, PoolError::Creation(_)));

    // The failure was one-shot; the next acquire succeeds.
    let driver = pool.acquire().await.unwrap();
    pool.release(driver);
    pool.shutdown().await;
}

#[tokio::test]
async fn creation_failure_does_not_kill_replenisher() {
    let factory = StubFactory::failing_first(1);
    let pool = DriverPool::start(factory.clone(), pooled_config(2));

    // One injected failure, then the replenisher should retry after its
    // backoff and still fill the pool to capacity.
    let filled = async {
        while factory.live() < 2 {
            sleep(Duration::from_millis(50)).await;
        }
    };
    timeout(Duration::from_secs(10), filled)
        .await
        .expect("pool did not reach capacity after a creation failure");

    pool.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_acquires_never_share_a_driver() {
    let factory = StubFactory::default();
    let pool = Arc::new(DriverPool::start(factory.clone(), pooled_config(2)));

    let mut workers = Vec::new();
    for _ in 0..4 {
        let pool = Arc::clone(&pool);
        workers.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            for _ in 0..5 {
                let driver = timeout(Duration::from_secs(10), pool.acquire())
                    .await
                    .expect("acquire timed out")
                    .expect("pool closed");
                seen.push(driver);
                pool.release(driver);
            }
            seen
        }));
    }

    let mut all = Vec::new();
    for worker in workers {
        all.extend(worker.await.expect("worker panicked"));
    }

    // Released drivers are closed, never reissued, so a double-hand-out
    // would show up as a duplicate id.
    let handed_out = all.len();
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), handed_out, "a driver was delivered twice");

    pool.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pool_never_overprovisions() {
    const CAPACITY: usize = 2;
    const WORKERS: usize = 4;

    let factory = StubFactory::default();
    let pool = Arc::new(DriverPool::start(factory.clone(), pooled_config(CAPACITY)));

    let mut workers = Vec::new();
    for _ in 0..WORKERS {
        let pool = Arc::clone(&pool);
        workers.push(tokio::spawn(async move {
            for _ in 0..5 {
                let driver = timeout(Duration::from_secs(10), pool.acquire())
                    .await
                    .expect("acquire timed out")
                    .expect("pool closed");
                sleep(Duration::from_millis(5)).await;
                pool.release(driver);
            }
        }));
    }

    for worker in workers {
        worker.await.expect("worker panicked");
    }
    pool.shutdown().await;

    // Live drivers never exceed pool capacity plus the drivers callers
    // hold at any instant.
    assert!(
        factory.peak_live() <= CAPACITY + WORKERS,
        "peak live {} exceeded capacity {} + workers {}",
        factory.peak_live(),
        CAPACITY,
        WORKERS
    );
}

#[tokio::test]
async fn cancelled_acquire_leaks_nothing() {
    let factory = StubFactory::with_create_delay(Duration::from_millis(300));
    let pool = DriverPool::start(factory.clone(), pooled_config(1));

    let held = acquire_within(&pool, Duration::from_secs(5)).await.unwrap();

    // The pool is empty and the replenisher is mid-create; this acquire
    // gives up and is dropped while waiting.
    let cancelled = timeout(Duration::from_millis(50), pool.acquire()).await;
    assert!(cancelled.is_err(), "acquire should still be waiting");

    // The driver the cancelled acquire was waiting for is not lost; the
    // next caller gets it.
    let next = acquire_within(&pool, Duration::from_secs(5)).await.unwrap();
    assert_ne!(held, next);

    pool.release(held);
    pool.release(next);
    pool.shutdown().await;

    // A driver the replenisher was still creating when shutdown hit is
    // retired asynchronously; give it a moment rather than racing it.
    let fully_drained = async {
        while factory.live() > 0 {
            sleep(Duration::from_millis(50)).await;
        }
    };
    timeout(Duration::from_secs(5), fully_drained)
        .await
        .expect("drivers leaked past shutdown");
}

#[tokio::test]
async fn acquire_after_shutdown_reports_closed() {
    let factory = StubFactory::default();
    let pool = DriverPool::start(factory.clone(), pooled_config(1));

    // Make sure the pool is live before tearing it down.
    let driver = acquire_within(&pool, Duration::from_secs(5)).await.unwrap();
    pool.release(driver);
    pool.shutdown().await;

    let result = acquire_within(&pool, Duration::from_secs(5)).await;
    assert!(matches!(result, Err(PoolError::Closed)));
}
