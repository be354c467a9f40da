//! Collapse/expand state of the error and warning tables in the detail view.
use std::collections::BTreeSet;

use crate::{LineRef, PatternGroup};

/// Errors and warnings keep independent index namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Errors,
    Warnings,
}

impl GroupKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupKind::Errors => "errors",
            GroupKind::Warnings => "warnings",
        }
    }
}

/// Only groups with more than one occurrence can be expanded.
pub fn is_expandable(group: &PatternGroup) -> bool {
    group.lines.len() > 1
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpansionState {
    errors: BTreeSet<usize>,
    warnings: BTreeSet<usize>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, kind: GroupKind) -> &BTreeSet<usize> {
        match kind {
            GroupKind::Errors => &self.errors,
            GroupKind::Warnings => &self.warnings,
        }
    }

    fn set_mut(&mut self, kind: GroupKind) -> &mut BTreeSet<usize> {
        match kind {
            GroupKind::Errors => &mut self.errors,
            GroupKind::Warnings => &mut self.warnings,
        }
    }

    /// True when the group at `index` should render expanded.
    ///
    /// A stored flag for a group that has since shrunk to a single line is
    /// ignored rather than cleared, so it comes back if the lines do.
    pub fn is_expanded(&self, kind: GroupKind, index: usize, group: &PatternGroup) -> bool {
        is_expandable(group) && self.set(kind).contains(&index)
    }

    /// Returns whether anything changed.
    pub fn expand(&mut self, kind: GroupKind, index: usize, group: &PatternGroup) -> bool {
        if !is_expandable(group) {
            return false;
        }
        self.set_mut(kind).insert(index)
    }

    /// Returns whether anything changed.
    pub fn collapse(&mut self, kind: GroupKind, index: usize) -> bool {
        self.set_mut(kind).remove(&index)
    }

    pub fn toggle(&mut self, kind: GroupKind, index: usize, group: &PatternGroup) -> bool {
        if self.is_expanded(kind, index, group) {
            self.collapse(kind, index)
        } else {
            let cleared_stale = self.collapse(kind, index);
            self.expand(kind, index, group) || cleared_stale
        }
    }

    pub fn reset(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }

    pub fn is_all_collapsed(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Table rows for one group in its current state.
    pub fn rows(&self, kind: GroupKind, index: usize, group: &PatternGroup) -> Vec<PatternRow> {
        if self.is_expanded(kind, index, group) {
            expanded_rows(index, group)
        } else {
            vec![PatternRow::Summary(summary_row(index, group))]
        }
    }

    /// Rows for a whole error or warning table.
    pub fn table(&self, kind: GroupKind, groups: &[PatternGroup]) -> Vec<PatternRow> {
        groups
            .iter()
            .enumerate()
            .flat_map(|(index, group)| self.rows(kind, index, group))
            .collect()
    }
}

/// Message, pattern and occurrence badge of a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowHeading {
    pub message: Option<String>,
    pub pattern: Option<String>,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryValues {
    List(Vec<String>),
    /// Several occurrences with their own values; shown on expand.
    Multiple,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub group: usize,
    pub heading: RowHeading,
    pub first_line: Option<LineRef>,
    pub values: SummaryValues,
    /// Occurrences beyond the first one.
    pub more_lines: usize,
}

impl SummaryRow {
    pub fn expandable(&self) -> bool {
        self.more_lines > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceRow {
    pub group: usize,
    pub line_index: usize,
    /// Only present on the first occurrence of the group.
    pub heading: Option<RowHeading>,
    pub line: Option<LineRef>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternRow {
    Summary(SummaryRow),
    Occurrence(OccurrenceRow),
    Collapse { group: usize },
}

fn heading(group: &PatternGroup) -> RowHeading {
    RowHeading {
        message: group.message.clone(),
        pattern: group.pattern.clone(),
        occurrences: group.lines.len(),
    }
}

fn summary_row(index: usize, group: &PatternGroup) -> SummaryRow {
    let first = group.lines.first();
    let values = if is_expandable(group) {
        SummaryValues::Multiple
    } else {
        SummaryValues::List(first.map(|line| line.values.clone()).unwrap_or_default())
    };
    SummaryRow {
        group: index,
        heading: heading(group),
        first_line: first.and_then(|line| line.line.clone()),
        values,
        more_lines: group.lines.len().saturating_sub(1),
    }
}

fn expanded_rows(index: usize, group: &PatternGroup) -> Vec<PatternRow> {
    let mut rows: Vec<PatternRow> = group
        .lines
        .iter()
        .enumerate()
        .map(|(line_index, occurrence)| {
            PatternRow::Occurrence(OccurrenceRow {
                group: index,
                line_index,
                heading: (line_index == 0).then(|| heading(group)),
                line: occurrence.line.clone(),
                values: occurrence.values.clone(),
            })
        })
        .collect();
    rows.push(PatternRow::Collapse { group: index });
    rows
}
