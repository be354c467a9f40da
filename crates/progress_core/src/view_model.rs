use crate::{
    percentage, processed, status_of, Completion, Counts, DetailKey, PatternRow, ProgressRecord,
    RecordId, Stats, Status, StatusFilter,
};

/// One record as shown in the list and dashboard tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRowView {
    pub id: RecordId,
    pub client_key: String,
    pub filename: String,
    pub email: String,
    pub percent: u64,
    pub status: Status,
    pub processed: u64,
    pub total: Option<u64>,
    pub counts: Counts,
    pub completion: Completion,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub page: usize,
    pub page_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListViewModel {
    pub loading: bool,
    pub error: Option<String>,
    pub error_reason: Option<String>,
    pub search: String,
    pub filter: StatusFilter,
    pub rows: Vec<RecordRowView>,
    /// Rows on the current page.
    pub showing: usize,
    pub total_matched: usize,
    /// Only present when the matches do not fit on one page.
    pub pagination: Option<PaginationView>,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardViewModel {
    pub loading: bool,
    pub error: Option<String>,
    pub error_reason: Option<String>,
    pub stats: Stats,
    pub recent: Vec<RecordRowView>,
    pub last_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecordView {
    pub row: RecordRowView,
    pub error_groups: usize,
    pub warning_groups: usize,
    pub errors: Vec<PatternRow>,
    pub warnings: Vec<PatternRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailViewModel {
    pub loading: bool,
    pub key: DetailKey,
    pub error: Option<String>,
    pub error_reason: Option<String>,
    pub not_found: bool,
    /// Back affordance on the error page; only offered for not-found.
    pub show_back: bool,
    pub record: Option<DetailRecordView>,
    pub last_update: Option<String>,
}

pub(crate) fn row_view(record: &ProgressRecord) -> RecordRowView {
    RecordRowView {
        id: record.id.clone(),
        client_key: record.client_key.clone(),
        filename: record.filename.clone(),
        email: record.email.clone(),
        percent: percentage(record),
        status: status_of(record),
        processed: processed(record),
        total: record.total.filter(|total| *total > 0),
        counts: record.counts,
        completion: Completion::of(record),
        created_at: record.created_at.clone(),
        updated_at: record.updated_at.clone(),
    }
}
