//! Progress core: record model, pure derivations and the view state machines.
mod compose;
mod derive;
mod effect;
mod expansion;
mod msg;
mod record;
mod state;
mod update;
mod view_model;

pub use compose::{
    compose, matches_search, page_count, Composed, StatusFilter, UnknownFilter, ViewQuery,
    PAGE_SIZE,
};
pub use derive::{
    aggregate, percentage, processed, recent, status_of, Completion, Stats, Status,
    CLAMP_PERCENTAGE, RECENT_LIMIT,
};
pub use effect::Effect;
pub use expansion::{
    is_expandable, ExpansionState, GroupKind, OccurrenceRow, PatternRow, RowHeading, SummaryRow,
    SummaryValues,
};
pub use msg::{DetailMsg, ListMsg};
pub use record::{
    dedupe_by_id, Counts, Deduped, DetailKey, LineOccurrence, LineRef, PatternGroup,
    ProgressRecord, RecordId,
};
pub use state::{DetailState, ErrorBanner, ListState, LoadError, LoadErrorKind};
pub use update::{update_detail, update_list};
pub use view_model::{
    DashboardViewModel, DetailRecordView, DetailViewModel, ListViewModel, PaginationView,
    RecordRowView,
};
