use std::fmt;

use progress_core::{DetailKey, ProgressRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network error, timeout, oversized body or non-2xx status.
    Transport { status: Option<u16> },
    /// Detail lookup answered 404.
    NotFound,
    /// Body was not the expected JSON.
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport { status: Some(code) } => write!(f, "http status {code}"),
            FailureKind::Transport { status: None } => write!(f, "transport failure"),
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Decode => write!(f, "decode failure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport { status: None }, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == FailureKind::NotFound
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("invalid base url `{url}`: {message}")]
    BaseUrl { url: String, message: String },
    #[error("failed to build http client: {0}")]
    Client(String),
}

/// Poll results forwarded to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ListFetched {
        generation: u64,
        result: Result<Vec<ProgressRecord>, FetchError>,
        received_at: String,
    },
    DetailFetched {
        generation: u64,
        key: DetailKey,
        result: Result<ProgressRecord, FetchError>,
        received_at: String,
    },
}
