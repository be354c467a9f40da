//! Pure derivations over one or many progress records.
use crate::ProgressRecord;

/// Percentages above 100 (counts exceeding `total`) are reported as computed.
pub const CLAMP_PERCENTAGE: bool = false;

/// Number of records shown in the dashboard's recent activity table.
pub const RECENT_LIMIT: usize = 10;

/// Display status of a record. Precedence: failed, warn, completed, pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Error,
    Warning,
    Success,
    Pending,
}

impl Status {
    pub fn color(self) -> &'static str {
        match self {
            Status::Error => "red",
            Status::Warning => "yellow",
            Status::Success => "green",
            Status::Pending => "blue",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Error => "errors",
            Status::Warning => "warnings",
            Status::Success => "ok",
            Status::Pending => "pending",
        }
    }
}

/// Completion badge, driven only by the authoritative `isCompleted` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completion {
    Completed,
    InProgress,
}

impl Completion {
    pub fn of(record: &ProgressRecord) -> Self {
        if record.is_completed {
            Completion::Completed
        } else {
            Completion::InProgress
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Completion::Completed => "Completed",
            Completion::InProgress => "In Progress",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Completion::Completed => "green",
            Completion::InProgress => "orange",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total_files: u64,
    pub completed: u64,
    pub in_progress: u64,
    pub total_processed: u64,
    pub total_warnings: u64,
    pub total_errors: u64,
}

/// Items handled so far: `done + warn + failed`.
pub fn processed(record: &ProgressRecord) -> u64 {
    let counts = record.counts;
    counts
        .done
        .saturating_add(counts.warn)
        .saturating_add(counts.failed)
}

/// `round(100 * processed / total)`, or 0 when the total is unknown.
pub fn percentage(record: &ProgressRecord) -> u64 {
    let total = match record.total {
        Some(total) if total > 0 => u128::from(total),
        _ => return 0,
    };
    let processed = u128::from(processed(record));
    // Round half up, matching the usual display rounding.
    let rounded = (processed * 200 + total) / (total * 2);
    let percent = u64::try_from(rounded).unwrap_or(u64::MAX);
    if CLAMP_PERCENTAGE {
        percent.min(100)
    } else {
        percent
    }
}

pub fn status_of(record: &ProgressRecord) -> Status {
    let counts = record.counts;
    if counts.failed > 0 {
        Status::Error
    } else if counts.warn > 0 {
        Status::Warning
    } else if record.is_completed {
        Status::Success
    } else {
        Status::Pending
    }
}

pub fn aggregate(records: &[ProgressRecord]) -> Stats {
    records.iter().fold(Stats::default(), |mut acc, record| {
        acc.total_files += 1;
        if record.is_completed {
            acc.completed += 1;
        } else {
            acc.in_progress += 1;
        }
        acc.total_processed = acc.total_processed.saturating_add(record.counts.done);
        acc.total_warnings = acc.total_warnings.saturating_add(record.counts.warn);
        acc.total_errors = acc.total_errors.saturating_add(record.counts.failed);
        acc
    })
}

/// The first `limit` records in server order.
pub fn recent(records: &[ProgressRecord], limit: usize) -> &[ProgressRecord] {
    &records[..records.len().min(limit)]
}
