use crate::view_model::{
    row_view, DashboardViewModel, DetailRecordView, DetailViewModel, ListViewModel,
    PaginationView,
};
use crate::{
    aggregate, compose, page_count, recent, Composed, DetailKey, ExpansionState, GroupKind,
    ProgressRecord, ViewQuery, RECENT_LIMIT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadErrorKind {
    /// Network failure, timeout or non-2xx status.
    Transport,
    /// The detail record does not exist (HTTP 404).
    NotFound,
    /// The response body did not have the expected shape.
    Decode,
}

/// Failure of one poll cycle, as seen by the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub detail: String,
}

impl LoadError {
    pub fn new(kind: LoadErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// The error slot shown above the data until dismissed or superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub kind: LoadErrorKind,
    pub message: String,
    /// What actually went wrong, e.g. the HTTP status.
    pub reason: String,
}

impl ErrorBanner {
    fn new(error: &LoadError, message: String) -> Self {
        Self {
            kind: error.kind,
            message,
            reason: error.detail.clone(),
        }
    }
}

/// Tracks consecutive failures so a streak is only notified once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct FailureStreak {
    last: Option<LoadErrorKind>,
}

impl FailureStreak {
    /// Returns true when this failure starts a streak or is of another kind
    /// than the previous one.
    pub(crate) fn observe(&mut self, error: &LoadError) -> bool {
        let is_new = self.last != Some(error.kind);
        self.last = Some(error.kind);
        is_new
    }

    pub(crate) fn clear(&mut self) {
        self.last = None;
    }
}

/// State of the collection views: snapshot, error slot and list inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListState {
    generation: u64,
    client_key: String,
    records: Vec<ProgressRecord>,
    loaded: bool,
    error: Option<ErrorBanner>,
    streak: FailureStreak,
    query: ViewQuery,
    last_update: Option<String>,
    dirty: bool,
}

impl ListState {
    pub fn new(generation: u64, client_key: impl Into<String>) -> Self {
        Self {
            generation,
            client_key: client_key.into(),
            ..Self::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    pub fn records(&self) -> &[ProgressRecord] {
        &self.records
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        self.error.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn composed(&self) -> Composed<'_> {
        compose(&self.records, &self.query)
    }

    pub fn page_count(&self) -> usize {
        page_count(self.composed().total_matched, self.query.page_size)
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn replace_records(&mut self, records: Vec<ProgressRecord>, received_at: String) {
        self.records = records;
        self.loaded = true;
        self.error = None;
        self.streak.clear();
        self.last_update = Some(received_at);
        self.clamp_page();
        self.mark_dirty();
    }

    /// Records a failed cycle; the snapshot is kept. Returns true when the
    /// failure should be notified.
    pub(crate) fn record_failure(&mut self, error: &LoadError, message: String) -> bool {
        self.loaded = true;
        self.error = Some(ErrorBanner::new(error, message));
        self.mark_dirty();
        self.streak.observe(error)
    }

    pub(crate) fn dismiss_error(&mut self) -> bool {
        let had_error = self.error.take().is_some();
        if had_error {
            self.mark_dirty();
        }
        had_error
    }

    /// Results tagged with an older generation are dropped from now on.
    pub(crate) fn begin_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    pub(crate) fn set_search(&mut self, search: String) {
        if self.query.search != search {
            self.query.search = search;
            self.query.page = 1;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_filter(&mut self, filter: crate::StatusFilter) {
        if self.query.filter != filter {
            self.query.filter = filter;
            self.query.page = 1;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_page(&mut self, page: usize) {
        let page = page.clamp(1, self.page_count());
        if self.query.page != page {
            self.query.page = page;
            self.mark_dirty();
        }
    }

    fn clamp_page(&mut self) {
        let last = self.page_count();
        if self.query.page > last {
            self.query.page = last;
        }
    }

    pub fn view(&self) -> ListViewModel {
        let composed = self.composed();
        let page_count = page_count(composed.total_matched, self.query.page_size);
        let rows: Vec<_> = composed.visible.iter().map(|record| row_view(record)).collect();
        let pagination = (composed.total_matched > self.query.page_size).then_some(PaginationView {
            page: self.query.page,
            page_count,
        });

        ListViewModel {
            loading: !self.loaded && self.records.is_empty(),
            error: self.error.as_ref().map(|banner| banner.message.clone()),
            error_reason: self.error.as_ref().map(|banner| banner.reason.clone()),
            search: self.query.search.clone(),
            filter: self.query.filter,
            showing: rows.len(),
            total_matched: composed.total_matched,
            rows,
            pagination,
            last_update: self.last_update.clone(),
        }
    }

    pub fn dashboard(&self) -> DashboardViewModel {
        DashboardViewModel {
            loading: !self.loaded && self.records.is_empty(),
            error: self.error.as_ref().map(|banner| banner.message.clone()),
            error_reason: self.error.as_ref().map(|banner| banner.reason.clone()),
            stats: aggregate(&self.records),
            recent: recent(&self.records, RECENT_LIMIT)
                .iter()
                .map(row_view)
                .collect(),
            last_update: self.last_update.clone(),
        }
    }
}

/// State of the single-record detail view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailState {
    generation: u64,
    key: DetailKey,
    record: Option<ProgressRecord>,
    loaded: bool,
    error: Option<ErrorBanner>,
    /// Set by a 404 for the current key; only a successful load or a new
    /// key clears it.
    not_found: bool,
    streak: FailureStreak,
    expansion: ExpansionState,
    last_update: Option<String>,
    dirty: bool,
}

impl DetailState {
    pub fn new(generation: u64, key: DetailKey) -> Self {
        Self {
            generation,
            key,
            ..Self::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> &DetailKey {
        &self.key
    }

    pub fn record(&self) -> Option<&ProgressRecord> {
        self.record.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        self.error.as_ref()
    }

    pub fn is_not_found(&self) -> bool {
        self.not_found
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Switches to another record: everything but the dirty flag starts over.
    pub(crate) fn reset_identity(&mut self, generation: u64, key: DetailKey) {
        *self = Self::new(generation, key);
        self.mark_dirty();
    }

    pub(crate) fn replace_record(&mut self, record: ProgressRecord, received_at: String) {
        self.record = Some(record);
        self.not_found = false;
        self.loaded = true;
        self.error = None;
        self.streak.clear();
        self.last_update = Some(received_at);
        self.mark_dirty();
    }

    /// Not-found drops the stale record; other failures keep it.
    pub(crate) fn record_failure(&mut self, error: &LoadError, message: String) -> bool {
        if error.kind == LoadErrorKind::NotFound {
            self.record = None;
            self.not_found = true;
        }
        self.loaded = true;
        self.error = Some(ErrorBanner::new(error, message));
        self.mark_dirty();
        self.streak.observe(error)
    }

    pub(crate) fn dismiss_error(&mut self) -> bool {
        let had_error = self.error.take().is_some();
        if had_error {
            self.mark_dirty();
        }
        had_error
    }

    pub(crate) fn toggle_group(&mut self, kind: GroupKind, index: usize) -> bool {
        let Some(record) = self.record.as_ref() else {
            return false;
        };
        let groups = match kind {
            GroupKind::Errors => &record.errors,
            GroupKind::Warnings => &record.warnings,
        };
        let Some(group) = groups.get(index) else {
            return false;
        };
        let changed = self.expansion.toggle(kind, index, group);
        if changed {
            self.mark_dirty();
        }
        changed
    }

    pub fn view(&self) -> DetailViewModel {
        let not_found = self.not_found;
        let record = self.record.as_ref().map(|record| DetailRecordView {
            row: row_view(record),
            error_groups: record.errors.len(),
            warning_groups: record.warnings.len(),
            errors: self.expansion.table(GroupKind::Errors, &record.errors),
            warnings: self.expansion.table(GroupKind::Warnings, &record.warnings),
        });

        DetailViewModel {
            loading: !self.loaded && self.record.is_none(),
            key: self.key.clone(),
            error: self.error.as_ref().map(|banner| banner.message.clone()),
            error_reason: self.error.as_ref().map(|banner| banner.reason.clone()),
            not_found,
            show_back: not_found && record.is_none(),
            record,
            last_update: self.last_update.clone(),
        }
    }
}
