//! Plain-text rendering of the view models.
use chrono::{DateTime, Local};
use progress_core::{
    DashboardViewModel, DetailRecordView, DetailViewModel, GroupKind, ListViewModel, PatternRow,
    RecordRowView, RowHeading, SummaryValues,
};

const NA: &str = "N/A";
const BAR_WIDTH: usize = 20;

/// Local date and time of an RFC 3339 stamp. Unparsable input is shown as is.
pub fn format_timestamp(raw: &str) -> String {
    format_with(raw, "%Y-%m-%d %H:%M:%S")
}

pub fn format_date(raw: &str) -> String {
    format_with(raw, "%Y-%m-%d")
}

pub fn format_time(raw: &str) -> String {
    format_with(raw, "%H:%M:%S")
}

fn format_with(raw: &str, pattern: &str) -> String {
    if raw.trim().is_empty() {
        return NA.to_string();
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(stamp) => stamp.with_timezone(&Local).format(pattern).to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn notification(title: &str, message: &str) -> String {
    format!("[{title}] {message}")
}

pub fn dashboard(view: &DashboardViewModel) -> String {
    let mut lines = vec!["== Progress Dashboard ==".to_string()];
    push_banner(&mut lines, view.error.as_deref(), view.error_reason.as_deref());
    if view.loading {
        lines.push("Loading progress data...".to_string());
        return lines.join("\n");
    }

    let stats = &view.stats;
    lines.push(format!(
        "Total Files: {}   Completed: {}   In Progress: {}   Total Errors: {}",
        stats.total_files, stats.completed, stats.in_progress, stats.total_errors
    ));
    lines.push(format!(
        "Items Processed: {}   Warnings: {}",
        stats.total_processed, stats.total_warnings
    ));
    lines.push(String::new());
    lines.push("Recent Activity".to_string());
    if view.recent.is_empty() {
        lines.push("  No progress data available yet.".to_string());
    } else {
        lines.push(format!(
            "  {:<32} {:<28} {:<8} {:<12} {}",
            "Filename", "User", "Progress", "Status", "Last Updated"
        ));
        for row in &view.recent {
            lines.push(format!(
                "  {:<32} {:<28} {:<8} {:<12} {}",
                clip(&row.filename, 32),
                clip(or_na(&row.email), 28),
                format!("{}%", row.percent),
                row.completion.label(),
                format_timestamp(&row.updated_at)
            ));
        }
    }
    push_last_update(&mut lines, view.last_update.as_deref());
    lines.join("\n")
}

pub fn list(view: &ListViewModel) -> String {
    let mut lines = vec!["== Progress List ==".to_string()];
    push_banner(&mut lines, view.error.as_deref(), view.error_reason.as_deref());
    if view.loading {
        lines.push("Loading progress data...".to_string());
        return lines.join("\n");
    }

    lines.push(format!(
        "Search: {}   Filter: {}",
        if view.search.is_empty() { "-" } else { view.search.as_str() },
        view.filter.label()
    ));
    lines.push(format!(
        "Showing {} of {} items",
        view.showing, view.total_matched
    ));
    if view.rows.is_empty() {
        lines.push("  No progress data found matching your criteria.".to_string());
    } else {
        lines.push(format!(
            "  {:<32} {:<28} {:<20} {:<22} {:<12} {:<10} {}",
            "Filename", "User", "Progress", "Counts", "Status", "Created", "Last Updated"
        ));
        for row in &view.rows {
            lines.push(format!(
                "  {:<32} {:<28} {:<20} {:<22} {:<12} {:<10} {}",
                clip(&row.filename, 32),
                clip(or_na(&row.email), 28),
                progress_cell(row),
                format!(
                    "ok {} / warn {} / err {}",
                    row.counts.done, row.counts.warn, row.counts.failed
                ),
                row.completion.label(),
                format_date(&row.created_at),
                format_date(&row.updated_at)
            ));
        }
    }
    if let Some(pagination) = view.pagination {
        lines.push(format!(
            "Page {} of {}",
            pagination.page, pagination.page_count
        ));
    }
    push_last_update(&mut lines, view.last_update.as_deref());
    lines.join("\n")
}

pub fn detail(view: &DetailViewModel) -> String {
    let mut lines = vec![format!(
        "Dashboard > Progress List > {}",
        view.key.filename
    )];

    let Some(record) = &view.record else {
        if view.loading {
            lines.push("Loading progress details...".to_string());
        } else {
            push_banner(&mut lines, view.error.as_deref(), view.error_reason.as_deref());
            if view.not_found && view.error.is_none() {
                lines.push("No progress data for this file.".to_string());
            }
            if view.show_back {
                lines.push("Back to Progress List (type `back`)".to_string());
            }
        }
        return lines.join("\n");
    };

    push_banner(&mut lines, view.error.as_deref(), view.error_reason.as_deref());
    let row = &record.row;
    lines.push(format!("== {} ==", row.filename));
    if let Some(stamp) = &view.last_update {
        lines.push(format!("Last updated: {}", format_time(stamp)));
    }

    lines.push(String::new());
    lines.push("Overall Progress".to_string());
    lines.push(format!("  {} {}% Complete", bar(row.percent), row.percent));
    lines.push(format!(
        "  {} of {} items   [{}]",
        row.processed,
        row.total
            .map(|total| total.to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
        row.completion.label()
    ));

    lines.push(String::new());
    lines.push("Details".to_string());
    lines.push(format!("  File: {}", row.filename));
    lines.push(format!("  User: {}", or_na(&row.email)));
    lines.push(format!("  Started: {}", format_timestamp(&row.created_at)));
    lines.push(format!("  Last Update: {}", format_timestamp(&row.updated_at)));

    lines.push(String::new());
    lines.push("Processing Statistics".to_string());
    lines.push(format!(
        "  Successful: {}   Warnings: {}   Errors: {}",
        row.counts.done, row.counts.warn, row.counts.failed
    ));

    push_table(&mut lines, record, GroupKind::Errors);
    push_table(&mut lines, record, GroupKind::Warnings);
    lines.join("\n")
}

fn push_table(lines: &mut Vec<String>, record: &DetailRecordView, kind: GroupKind) {
    let (title, groups, rows) = match kind {
        GroupKind::Errors => ("Errors", record.error_groups, &record.errors),
        GroupKind::Warnings => ("Warnings", record.warning_groups, &record.warnings),
    };
    lines.push(String::new());
    lines.push(format!("{title} ({groups})"));
    if rows.is_empty() {
        lines.push(format!("  No {}", kind.as_str()));
        return;
    }
    lines.push("  #   Message | Pattern | Occurrences | Lines | Values".to_string());
    lines.extend(rows.iter().map(|row| pattern_row(row, kind)));
}

/// One table row; group numbers are shown 1-based to match the commands.
pub fn pattern_row(row: &PatternRow, kind: GroupKind) -> String {
    match row {
        PatternRow::Summary(summary) => {
            let mut line_cell = summary
                .first_line
                .as_ref()
                .map(|line| line.to_string())
                .unwrap_or_else(|| NA.to_string());
            if summary.expandable() {
                line_cell.push_str(&format!(
                    " + {} more lines (expand {} {})",
                    summary.more_lines,
                    kind.as_str(),
                    summary.group + 1
                ));
            }
            let values = match &summary.values {
                SummaryValues::List(values) => join_values(values),
                SummaryValues::Multiple => "Multiple".to_string(),
            };
            format!(
                "  {:<3} {} | {} | {}",
                summary.group + 1,
                heading_cells(&summary.heading),
                line_cell,
                values
            )
        }
        PatternRow::Occurrence(occurrence) => {
            let line_cell = occurrence
                .line
                .as_ref()
                .map(|line| line.to_string())
                .unwrap_or_else(|| NA.to_string());
            let values = join_values(&occurrence.values);
            match &occurrence.heading {
                Some(heading) => format!(
                    "  {:<3} {} | {} | {}",
                    occurrence.group + 1,
                    heading_cells(heading),
                    line_cell,
                    values
                ),
                None => format!("      {line_cell} | {values}"),
            }
        }
        PatternRow::Collapse { group } => {
            format!("      (collapse {} {})", kind.as_str(), group + 1)
        }
    }
}

fn heading_cells(heading: &RowHeading) -> String {
    format!(
        "{} | {} | {}",
        heading.message.as_deref().unwrap_or(NA),
        heading.pattern.as_deref().unwrap_or(NA),
        heading.occurrences
    )
}

fn join_values(values: &[String]) -> String {
    if values.is_empty() {
        NA.to_string()
    } else {
        values.join(", ")
    }
}

fn progress_cell(row: &RecordRowView) -> String {
    match row.total {
        Some(total) => format!("{}% ({} / {})", row.percent, row.processed, total),
        None => format!("{}%", row.percent),
    }
}

fn bar(percent: u64) -> String {
    let filled = (percent.min(100) as usize * BAR_WIDTH) / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn push_banner(lines: &mut Vec<String>, error: Option<&str>, reason: Option<&str>) {
    if let Some(message) = error {
        lines.push(format!("! {message} (type `dismiss` to hide)"));
        if let Some(reason) = reason.filter(|reason| !reason.is_empty()) {
            lines.push(format!("  {reason}"));
        }
    }
}

fn push_last_update(lines: &mut Vec<String>, stamp: Option<&str>) {
    if let Some(stamp) = stamp {
        lines.push(format!("Last updated: {}", format_time(stamp)));
    }
}

fn or_na(text: &str) -> &str {
    if text.is_empty() {
        NA
    } else {
        text
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use progress_core::{LineRef, OccurrenceRow, SummaryRow};

    fn heading() -> RowHeading {
        RowHeading {
            message: Some("Invalid email format".to_string()),
            pattern: None,
            occurrences: 3,
        }
    }

    #[test]
    fn timestamps_fall_back_gracefully() {
        assert_eq!(format_timestamp(""), "N/A");
        assert_eq!(format_timestamp("yesterday"), "yesterday");

        let expected = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert_eq!(format_timestamp("2024-01-15T10:30:00Z"), expected);
    }

    #[test]
    fn collapsed_summary_shows_more_lines_hint() {
        let row = PatternRow::Summary(SummaryRow {
            group: 0,
            heading: heading(),
            first_line: Some(LineRef::Text("12".to_string())),
            values: SummaryValues::Multiple,
            more_lines: 2,
        });
        assert_eq!(
            pattern_row(&row, GroupKind::Errors),
            "  1   Invalid email format | N/A | 3 | 12 + 2 more lines (expand errors 1) | Multiple"
        );
    }

    #[test]
    fn single_summary_lists_values_or_na() {
        let row = PatternRow::Summary(SummaryRow {
            group: 1,
            heading: RowHeading {
                occurrences: 1,
                ..heading()
            },
            first_line: None,
            values: SummaryValues::List(Vec::new()),
            more_lines: 0,
        });
        assert_eq!(
            pattern_row(&row, GroupKind::Warnings),
            "  2   Invalid email format | N/A | 1 | N/A | N/A"
        );
    }

    #[test]
    fn expanded_rows_indent_follow_up_lines() {
        let first = PatternRow::Occurrence(OccurrenceRow {
            group: 0,
            line_index: 0,
            heading: Some(heading()),
            line: Some(LineRef::Text("12".to_string())),
            values: vec!["a@".to_string()],
        });
        let second = PatternRow::Occurrence(OccurrenceRow {
            group: 0,
            line_index: 1,
            heading: None,
            line: Some(LineRef::Text("40".to_string())),
            values: vec!["b@".to_string(), "c@".to_string()],
        });
        let collapse = PatternRow::Collapse { group: 0 };

        assert_eq!(
            pattern_row(&first, GroupKind::Errors),
            "  1   Invalid email format | N/A | 3 | 12 | a@"
        );
        assert_eq!(pattern_row(&second, GroupKind::Errors), "      40 | b@, c@");
        assert_eq!(
            pattern_row(&collapse, GroupKind::Errors),
            "      (collapse errors 1)"
        );
    }

    #[test]
    fn empty_list_explains_itself() {
        let view = ListViewModel::default();
        let text = list(&view);
        assert!(text.contains("Showing 0 of 0 items"));
        assert!(text.contains("No progress data found matching your criteria."));
        assert!(!text.contains("Page "));
    }

    #[test]
    fn loading_dashboard_shows_only_the_spinner_text() {
        let view = DashboardViewModel {
            loading: true,
            ..DashboardViewModel::default()
        };
        assert_eq!(
            dashboard(&view),
            "== Progress Dashboard ==\nLoading progress data..."
        );
    }

    #[test]
    fn not_found_detail_offers_back() {
        let view = DetailViewModel {
            error: Some("Progress data not found for this file".to_string()),
            not_found: true,
            show_back: true,
            ..DetailViewModel::default()
        };
        let text = detail(&view);
        assert!(text.contains("Progress data not found for this file"));
        assert!(text.contains("Back to Progress List"));
    }

    #[test]
    fn dismissed_not_found_still_offers_back() {
        let view = DetailViewModel {
            not_found: true,
            show_back: true,
            ..DetailViewModel::default()
        };
        let text = detail(&view);
        assert!(!text.contains("dismiss"));
        assert!(text.contains("No progress data for this file."));
        assert!(text.contains("Back to Progress List"));
    }

    #[test]
    fn banner_carries_the_failure_reason() {
        let view = DashboardViewModel {
            error: Some("Failed to fetch progress data".to_string()),
            error_reason: Some("http status 503: Service Unavailable".to_string()),
            ..DashboardViewModel::default()
        };
        let text = dashboard(&view);
        assert!(text.contains(
            "! Failed to fetch progress data (type `dismiss` to hide)\n  http status 503: Service Unavailable"
        ));
    }

    #[test]
    fn bar_caps_at_full_width() {
        assert_eq!(bar(0), format!("[{}]", ".".repeat(BAR_WIDTH)));
        assert_eq!(bar(110), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(bar(50).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn long_filenames_are_clipped() {
        assert_eq!(clip("abcdef", 4), "abc~");
        assert_eq!(clip("abc", 4), "abc");
    }
}
