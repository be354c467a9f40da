use crate::{DetailKey, GroupKind, LoadError, ProgressRecord, StatusFilter};

/// Messages of the collection views (list and dashboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMsg {
    /// Poll loop delivered a fresh collection.
    Loaded {
        generation: u64,
        records: Vec<ProgressRecord>,
        received_at: String,
    },
    /// Poll loop failed this cycle.
    LoadFailed { generation: u64, error: LoadError },
    /// The list loop was (re)started under a new generation.
    WatchStarted { generation: u64 },
    /// User edited the search box.
    SearchChanged(String),
    /// User picked a status filter.
    FilterChanged(StatusFilter),
    /// User picked a page (1-based).
    PageChanged(usize),
    /// User closed the error banner.
    ErrorDismissed,
    /// User clicked Refresh.
    RefreshClicked,
    /// User opened a record from the table.
    RecordOpened { filename: String },
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Messages of the single-record detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailMsg {
    Loaded {
        generation: u64,
        record: ProgressRecord,
        received_at: String,
    },
    LoadFailed { generation: u64, error: LoadError },
    /// The view now shows a different record.
    IdentityChanged { generation: u64, key: DetailKey },
    /// User clicked an expandable group or its collapse row.
    GroupToggled { kind: GroupKind, index: usize },
    ErrorDismissed,
    RefreshClicked,
    BackClicked,
    NoOp,
}
