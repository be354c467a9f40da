use std::time::Duration;

use progress_core::{DetailKey, DetailMsg, Effect, ListMsg, LoadError, LoadErrorKind};
use progress_engine::{EngineEvent, EngineHandle, FailureKind, FetchError};
use progress_logging::{progress_debug, progress_info, progress_warn};

use crate::render;

/// An engine event translated into the message of the state it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    List(ListMsg),
    Detail(DetailMsg),
}

/// Effects the runner cannot carry out alone because they switch screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    OpenDetail(DetailKey),
    CloseDetail,
}

pub struct EffectRunner {
    engine: EngineHandle,
    detail_interval: Duration,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, detail_interval: Duration) -> Self {
        Self {
            engine,
            detail_interval,
        }
    }

    pub fn apply(&mut self, effects: Vec<Effect>) -> Vec<Navigation> {
        let mut navigation = Vec::new();
        for effect in effects {
            match effect {
                Effect::Notify { title, message } => {
                    progress_warn!("{}: {}", title, message);
                    println!("{}", render::notification(&title, &message));
                }
                Effect::RefreshList => {
                    progress_debug!("Manual refresh of the collection");
                    self.engine.refresh_list();
                }
                Effect::RefreshDetail => {
                    progress_debug!("Manual refresh of the record");
                    self.engine.refresh_detail();
                }
                Effect::WatchDetail { generation, key } => {
                    self.engine
                        .watch_detail(generation, key, self.detail_interval);
                }
                Effect::OpenDetail(key) => {
                    progress_info!("Opening {}", key);
                    navigation.push(Navigation::OpenDetail(key));
                }
                Effect::CloseDetail => navigation.push(Navigation::CloseDetail),
            }
        }
        navigation
    }

    pub fn watch_list(&mut self, generation: u64, client_key: &str, interval: Duration) {
        self.engine
            .watch_list(generation, client_key.to_string(), interval);
    }

    pub fn stop_list(&mut self) {
        self.engine.stop_list();
    }

    pub fn stop_detail(&mut self) {
        self.engine.stop_detail();
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_event(&self, timeout: Duration) -> Option<Inbound> {
        self.engine.recv_timeout(timeout).map(inbound)
    }

    pub fn try_next_event(&self) -> Option<Inbound> {
        self.engine.try_recv().map(inbound)
    }
}

pub fn inbound(event: EngineEvent) -> Inbound {
    match event {
        EngineEvent::ListFetched {
            generation,
            result,
            received_at,
        } => Inbound::List(match result {
            Ok(records) => ListMsg::Loaded {
                generation,
                records,
                received_at,
            },
            Err(err) => ListMsg::LoadFailed {
                generation,
                error: map_failure(err),
            },
        }),
        EngineEvent::DetailFetched {
            generation,
            result,
            received_at,
            ..
        } => Inbound::Detail(match result {
            Ok(record) => DetailMsg::Loaded {
                generation,
                record,
                received_at,
            },
            Err(err) => DetailMsg::LoadFailed {
                generation,
                error: map_failure(err),
            },
        }),
    }
}

fn map_failure(err: FetchError) -> LoadError {
    let kind = match err.kind {
        FailureKind::Transport { .. } => LoadErrorKind::Transport,
        FailureKind::NotFound => LoadErrorKind::NotFound,
        FailureKind::Decode => LoadErrorKind::Decode,
    };
    LoadError::new(kind, err.to_string())
}
