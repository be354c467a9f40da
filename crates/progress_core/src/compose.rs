use std::fmt;
use std::str::FromStr;

use crate::ProgressRecord;

pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    InProgress,
    WithErrors,
    WithWarnings,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::Completed,
        StatusFilter::InProgress,
        StatusFilter::WithErrors,
        StatusFilter::WithWarnings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Completed => "completed",
            StatusFilter::InProgress => "in-progress",
            StatusFilter::WithErrors => "with-errors",
            StatusFilter::WithWarnings => "with-warnings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All Status",
            StatusFilter::Completed => "Completed",
            StatusFilter::InProgress => "In Progress",
            StatusFilter::WithErrors => "With Errors",
            StatusFilter::WithWarnings => "With Warnings",
        }
    }

    pub fn matches(self, record: &ProgressRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => record.is_completed,
            StatusFilter::InProgress => !record.is_completed,
            StatusFilter::WithErrors => record.counts.failed > 0,
            StatusFilter::WithWarnings => record.counts.warn > 0,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status filter `{0}` (expected all, completed, in-progress, with-errors or with-warnings)")]
pub struct UnknownFilter(pub String);

impl FromStr for StatusFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        StatusFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownFilter(needle.to_string()))
    }
}

/// Inputs of the list view. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub filter: StatusFilter,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: StatusFilter::All,
            page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed<'a> {
    pub visible: Vec<&'a ProgressRecord>,
    pub total_matched: usize,
}

/// Search, then filter, then slice out the requested page.
pub fn compose<'a>(records: &'a [ProgressRecord], query: &ViewQuery) -> Composed<'a> {
    let needle = query.search.to_lowercase();
    let matched: Vec<&ProgressRecord> = records
        .iter()
        .filter(|record| matches_search(record, &needle))
        .filter(|record| query.filter.matches(record))
        .collect();

    let page_size = query.page_size.max(1);
    let start = query.page.max(1).saturating_sub(1).saturating_mul(page_size);
    let total_matched = matched.len();
    let visible = matched.into_iter().skip(start).take(page_size).collect();

    Composed {
        visible,
        total_matched,
    }
}

/// Case-insensitive substring match on filename or email. `needle` must
/// already be lowercased; an empty needle matches everything.
pub fn matches_search(record: &ProgressRecord, needle: &str) -> bool {
    needle.is_empty()
        || record.filename.to_lowercase().contains(needle)
        || record.email.to_lowercase().contains(needle)
}

/// Number of pages for `total_matched` rows; never less than one.
pub fn page_count(total_matched: usize, page_size: usize) -> usize {
    total_matched.div_ceil(page_size.max(1)).max(1)
}
