//! Rate gate serializing outbound remote calls.
//!
//! A single-permit async mutex with a pacing delay on both sides of the
//! guarded call. Consecutive calls through one gate never overlap and are
//! spaced by at least twice the pacing delay. The gate has no timeout and no
//! cancellation hook; waiters queue in tokio's FIFO mutex order.

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::Mutex;

/// Pacing used by the process-wide gate unless configured otherwise.
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

static GLOBAL: OnceLock<Arc<RateGate>> = OnceLock::new();

/// Mutual-exclusion gate with pre/post pacing.
#[derive(Debug)]
pub struct RateGate {
    lock: Mutex<()>,
    pacing: Duration,
}

impl RateGate {
    pub fn new(pacing: Duration) -> Self {
        Self { lock: Mutex::new(()), pacing }
    }

    /// Gate that serializes without delaying. Intended for tests.
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO)
    }

    /// The process-wide gate, created with [`DEFAULT_PACING`] on first use.
    pub fn global() -> Arc<Self> {
        Self::init_global(DEFAULT_PACING)
    }

    /// The process-wide gate, created with `pacing` if it does not exist yet.
    ///
    /// Once created, the global gate keeps its original pacing.
    pub fn init_global(pacing: Duration) -> Arc<Self> {
        let gate = GLOBAL.get_or_init(|| Arc::new(Self::new(pacing)));
        if gate.pacing != pacing {
            tracing::warn!(
                requested_ms = pacing.as_millis() as u64,
                active_ms = gate.pacing.as_millis() as u64,
                "global rate gate already initialized; keeping existing pacing"
            );
        }
        Arc::clone(gate)
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    /// Run `call` while holding the gate.
    ///
    /// Waits for the gate, sleeps the pacing delay, runs the call, sleeps the
    /// pacing delay again, then lets the next waiter in.
    pub async fn run<F, T>(&self, call: F) -> T
    where
        F: Future<Output = T>,
    {
        let _permit = self.lock.lock().await;
        self.pause().await;
        let output = call.await;
        self.pause().await;
        output
    }

    async fn pause(&self) {
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[tokio::test]
    async fn test_run_returns_call_output() {
        let gate = RateGate::unpaced();
        assert_eq!(gate.run(async { 42 }).await, 42);
    }

    #[tokio::test]
    async fn test_pacing_applied_before_and_after() {
        let pacing = Duration::from_millis(20);
        let gate = RateGate::new(pacing);

        let start = Instant::now();
        let entered = gate.run(async { Instant::now() }).await;
        let finished = Instant::now();

        assert!(entered - start >= pacing);
        assert!(finished - entered >= pacing);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_calls_never_overlap() {
        let gate = Arc::new(RateGate::new(Duration::from_millis(5)));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..6)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let in_flight = Arc::clone(&in_flight);
                let max_seen = Arc::clone(&max_seen);
                tokio::spawn(async move {
                    gate.run(async {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(3)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_global_is_shared() {
        let a = RateGate::global();
        let b = RateGate::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
