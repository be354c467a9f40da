//! Progress engine: HTTP progress source and cancellable poll loops.
mod engine;
mod poll;
mod session;
mod source;
mod types;

pub use engine::{Clock, EngineHandle};
pub use poll::{start_polling, PollHandle};
pub use session::SessionContext;
pub use source::{ProgressSource, ReqwestProgressSource, SourceSettings};
pub use types::{EngineError, EngineEvent, FailureKind, FetchError};
