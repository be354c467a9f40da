//! Cancellable fixed-interval poll loops.
//!
//! A loop fetches immediately, then once per `interval` measured from the
//! start of the loop. The next fetch is never issued while the previous one
//! is still outstanding; ticks missed during a slow fetch are skipped.
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use progress_logging::progress_trace;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::FetchError;

type ResultSink<T> = Box<dyn FnMut(Result<T, FetchError>) + Send>;

/// Holds the result callback; emptied by `PollHandle::cancel`.
struct Gate<T> {
    sink: Mutex<Option<ResultSink<T>>>,
}

impl<T> Gate<T> {
    fn new(sink: ResultSink<T>) -> Self {
        Self {
            sink: Mutex::new(Some(sink)),
        }
    }

    /// Hands the result to the callback. Returns false once closed.
    fn deliver(&self, result: Result<T, FetchError>) -> bool {
        let mut guard = match self.sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match guard.as_mut() {
            Some(sink) => {
                sink(result);
                true
            }
            None => false,
        }
    }
}

trait Close: Send + Sync {
    fn close(&self);
}

impl<T: Send> Close for Gate<T> {
    fn close(&self) {
        let mut guard = match self.sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.take();
    }
}

/// Handle of a running poll loop. Dropping it cancels the loop.
pub struct PollHandle {
    token: CancellationToken,
    wake: Arc<Notify>,
    gate: Arc<dyn Close>,
}

impl PollHandle {
    /// Stops the loop. Once this returns the result callback is never invoked
    /// again, even for a fetch that was already in flight.
    ///
    /// Must not be called from inside the result callback of the same loop.
    pub fn cancel(&self) {
        self.token.cancel();
        self.gate.close();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Requests a fetch now. While a fetch is in flight, requests coalesce
    /// into one fetch right after it settles.
    pub fn refresh_now(&self) {
        self.wake.notify_one();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Starts a poll loop on `runtime` that calls `fetcher` and hands every
/// result, success or failure, to `on_result`.
pub fn start_polling<T, F, Fut, S>(
    runtime: &Handle,
    interval: Duration,
    fetcher: F,
    on_result: S,
) -> PollHandle
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    S: FnMut(Result<T, FetchError>) + Send + 'static,
{
    let token = CancellationToken::new();
    let wake = Arc::new(Notify::new());
    let gate = Arc::new(Gate::new(Box::new(on_result)));

    runtime.spawn(run_loop(
        interval,
        fetcher,
        gate.clone(),
        token.clone(),
        wake.clone(),
    ));

    PollHandle { token, wake, gate }
}

async fn run_loop<T, F, Fut>(
    interval: Duration,
    fetcher: F,
    gate: Arc<Gate<T>>,
    token: CancellationToken,
    wake: Arc<Notify>,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    // tokio rejects a zero period.
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
            _ = wake.notified() => {}
        }

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = fetcher() => result,
        };

        progress_trace!("poll cycle settled (ok={})", result.is_ok());
        if !gate.deliver(result) {
            break;
        }
    }
}
