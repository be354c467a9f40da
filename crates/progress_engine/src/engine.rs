use std::sync::{mpsc, Arc};
use std::time::Duration;

use progress_core::{DetailKey, ProgressRecord};
use progress_logging::{progress_debug, progress_info, progress_warn};

use crate::poll::{start_polling, PollHandle};
use crate::{EngineError, EngineEvent, FetchError, ProgressSource};

/// Produces the "received at" stamp attached to each poll result.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// Owns the async runtime and the (at most two) poll loops of the UI.
///
/// The collection loop and the detail loop are independent: each has its own
/// timer, cancellation and generation, and they share nothing but the source.
pub struct EngineHandle {
    runtime: tokio::runtime::Runtime,
    source: Arc<dyn ProgressSource>,
    clock: Clock,
    event_tx: mpsc::Sender<EngineEvent>,
    event_rx: mpsc::Receiver<EngineEvent>,
    list: Option<PollHandle>,
    detail: Option<PollHandle>,
}

impl EngineHandle {
    pub fn new(source: Arc<dyn ProgressSource>, clock: Clock) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("progress-engine")
            .enable_all()
            .build()?;
        let (event_tx, event_rx) = mpsc::channel();

        Ok(Self {
            runtime,
            source,
            clock,
            event_tx,
            event_rx,
            list: None,
            detail: None,
        })
    }

    /// Starts (or restarts) polling the collection of `client_key`.
    pub fn watch_list(&mut self, generation: u64, client_key: String, interval: Duration) {
        self.stop_list();
        progress_info!(
            "Watching collection {} every {:?} (generation {})",
            client_key,
            interval,
            generation
        );

        let source = self.source.clone();
        let fetch_key = client_key.clone();
        let fetcher = move || {
            let source = source.clone();
            let client_key = fetch_key.clone();
            async move { source.list(&client_key).await }
        };

        let event_tx = self.event_tx.clone();
        let clock = self.clock.clone();
        let on_result = move |result: Result<Vec<ProgressRecord>, FetchError>| {
            if let Err(err) = &result {
                progress_warn!("Collection fetch for {} failed: {}", client_key, err);
            }
            let _ = event_tx.send(EngineEvent::ListFetched {
                generation,
                result,
                received_at: clock(),
            });
        };

        self.list = Some(start_polling(
            self.runtime.handle(),
            interval,
            fetcher,
            on_result,
        ));
    }

    /// Starts (or restarts) polling one record.
    pub fn watch_detail(&mut self, generation: u64, key: DetailKey, interval: Duration) {
        self.stop_detail();
        progress_info!(
            "Watching record {} every {:?} (generation {})",
            key,
            interval,
            generation
        );

        let source = self.source.clone();
        let fetch_key = key.clone();
        let fetcher = move || {
            let source = source.clone();
            let key = fetch_key.clone();
            async move { source.detail(&key).await }
        };

        let event_tx = self.event_tx.clone();
        let clock = self.clock.clone();
        let on_result = move |result: Result<ProgressRecord, FetchError>| {
            match &result {
                Err(err) if err.is_not_found() => {
                    progress_debug!("Record {} not found", key);
                }
                Err(err) => progress_warn!("Detail fetch for {} failed: {}", key, err),
                Ok(_) => {}
            }
            let _ = event_tx.send(EngineEvent::DetailFetched {
                generation,
                key: key.clone(),
                result,
                received_at: clock(),
            });
        };

        self.detail = Some(start_polling(
            self.runtime.handle(),
            interval,
            fetcher,
            on_result,
        ));
    }

    pub fn stop_list(&mut self) {
        if let Some(handle) = self.list.take() {
            handle.cancel();
            progress_info!("Stopped collection polling");
        }
    }

    pub fn stop_detail(&mut self) {
        if let Some(handle) = self.detail.take() {
            handle.cancel();
            progress_info!("Stopped detail polling");
        }
    }

    pub fn refresh_list(&self) {
        if let Some(handle) = &self.list {
            handle.refresh_now();
        }
    }

    pub fn refresh_detail(&self) {
        if let Some(handle) = &self.detail {
            handle.refresh_now();
        }
    }

    pub fn is_watching_list(&self) -> bool {
        self.list.is_some()
    }

    pub fn is_watching_detail(&self) -> bool {
        self.detail.is_some()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop_list();
        self.stop_detail();
    }
}
