//! Focus, hover and issue selection.
//!
//! At most one item is focused; it decides which issues the keyboard walks
//! through. The selected issue is always `None` or owned by the focused item.
//! Navigation recomputes the focused item's issue list from the registry on
//! every call, so it stays correct when issues arrive between key presses.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use serde::Serialize;

use crate::doc::ItemId;
use crate::issues::{IssueId, IssueStore};

/// Keyboard navigation command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    /// Select the following issue, wrapping to the first.
    Next,
    /// Select the preceding issue, wrapping to the last.
    Previous,
    /// Drop the issue selection.
    Clear,
}

/// Which item is focused and which issue is hovered / selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    focused_item: Option<ItemId>,
    hovered_issue: Option<IssueId>,
    selected_issue: Option<IssueId>,
}

impl SelectionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn focused_item(&self) -> Option<ItemId> {
        self.focused_item
    }

    #[must_use]
    pub fn hovered_issue(&self) -> Option<IssueId> {
        self.hovered_issue
    }

    #[must_use]
    pub fn selected_issue(&self) -> Option<IssueId> {
        self.selected_issue
    }

    /// Focus an item (or nothing). Returns `true` if focus changed.
    ///
    /// Moving focus to a different item drops the issue selection.
    pub fn focus(&mut self, item: Option<ItemId>) -> bool {
        if self.focused_item == item {
            return false;
        }
        self.focused_item = item;
        self.selected_issue = None;
        true
    }

    /// Set the hovered issue. Returns `true` if it changed.
    pub fn hover(&mut self, issue: Option<IssueId>) -> bool {
        if self.hovered_issue == issue {
            return false;
        }
        self.hovered_issue = issue;
        true
    }

    /// Select an issue (or nothing). Returns `true` if anything changed.
    ///
    /// Selecting an issue of another item moves focus to that item first.
    /// Unknown issue ids leave the state untouched.
    pub fn select_issue(&mut self, issue: Option<IssueId>, issues: &IssueStore) -> bool {
        let Some(id) = issue else {
            return self.selected_issue.take().is_some();
        };
        let Some(owner) = issues.get(&id).map(|found| found.item_id) else {
            return false;
        };
        let focus_changed = self.focus(Some(owner));
        let selection_changed = self.selected_issue != Some(id);
        self.selected_issue = Some(id);
        focus_changed || selection_changed
    }

    /// Apply a navigation command. Returns `true` if the selection changed.
    ///
    /// A no-op when nothing is focused or the focused item has no issues.
    pub fn navigate(&mut self, direction: NavDirection, issues: &IssueStore) -> bool {
        let Some(item) = self.focused_item else {
            return false;
        };
        let ordered = issues.for_item(&item);
        let count = ordered.len();
        if count == 0 {
            return false;
        }

        let current = self
            .selected_issue
            .and_then(|selected| ordered.iter().position(|issue| issue.id == selected));
        let next = match (direction, current) {
            (NavDirection::Clear, _) => None,
            (NavDirection::Next, None) => Some(0),
            (NavDirection::Next, Some(i)) => Some((i + 1) % count),
            (NavDirection::Previous, None) => Some(count - 1),
            (NavDirection::Previous, Some(i)) => Some((i + count - 1) % count),
        };

        let next_id = next.map(|i| ordered[i].id);
        if next_id == self.selected_issue {
            return false;
        }
        self.selected_issue = next_id;
        true
    }

    /// Drop references to a removed item and its issues.
    pub fn prune(&mut self, item: &ItemId, removed_issues: &[IssueId]) {
        if self.focused_item == Some(*item) {
            self.focused_item = None;
            self.selected_issue = None;
        }
        if self.selected_issue.is_some_and(|id| removed_issues.contains(&id)) {
            self.selected_issue = None;
        }
        if self.hovered_issue.is_some_and(|id| removed_issues.contains(&id)) {
            self.hovered_issue = None;
        }
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
