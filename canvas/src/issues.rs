//! Issue registry: design issues reported by the annotation pass.
//!
//! Issues are scoped to their owning item and positioned in percent of that
//! item's extent, so they stay valid under pan, zoom and item moves without
//! recomputation. Insertion order is the display order and therefore also the
//! keyboard navigation order.

#[cfg(test)]
#[path = "issues_test.rs"]
mod issues_test;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::consts::PERCENT_MAX;
use crate::doc::ItemId;

/// Unique identifier for a design issue.
pub type IssueId = Uuid;

/// What kind of design rule an issue violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Spacing,
    Contrast,
    Brand,
    Alignment,
}

impl IssueCategory {
    /// Short heading shown on the issue card.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Spacing => "Padding Inconsistency",
            Self::Contrast => "Accessibility Risk",
            Self::Brand => "Brand Violation",
            Self::Alignment => "Alignment Issue",
        }
    }
}

/// Two-level severity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    High,
}

/// Issue bounds in percent (0–100) of the owning item's rendered extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IssueBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl IssueBox {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Clamp the box so it lies within the item (0–100 on both axes).
    #[must_use]
    pub fn clamped(self) -> Self {
        let x = clamp_percent(self.x);
        let y = clamp_percent(self.y);
        let w = clamp_percent(self.w).min(PERCENT_MAX - x);
        let h = clamp_percent(self.h).min(PERCENT_MAX - y);
        Self { x, y, w, h }
    }
}

fn clamp_percent(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, PERCENT_MAX) } else { 0.0 }
}

/// A positioned design issue. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignIssue {
    pub id: IssueId,
    /// The item this issue was reported for.
    pub item_id: ItemId,
    pub category: IssueCategory,
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    pub bounds: IssueBox,
}

/// Issue counts for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IssueSummary {
    pub total: usize,
    pub high: usize,
}

/// In-memory registry of design issues, in insertion order.
#[derive(Debug, Default)]
pub struct IssueStore {
    issues: Vec<DesignIssue>,
}

impl IssueStore {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Append one annotation batch for `owner`. Returns the number stored.
    ///
    /// The batch lands in a single extend, so no reader ever sees part of it.
    /// Records reported for a different item are dropped.
    pub fn append_batch(&mut self, owner: &ItemId, issues: Vec<DesignIssue>) -> usize {
        let before = self.issues.len();
        let batch: Vec<DesignIssue> = issues
            .into_iter()
            .filter(|issue| {
                if issue.item_id == *owner {
                    return true;
                }
                warn!(issue_id = %issue.id, owner = %owner, item_id = %issue.item_id, "dropping issue reported for another item");
                false
            })
            .map(|issue| DesignIssue { bounds: issue.bounds.clamped(), ..issue })
            .collect();
        self.issues.extend(batch);
        self.issues.len() - before
    }

    /// Issues owned by `item`, in insertion order.
    #[must_use]
    pub fn for_item(&self, item: &ItemId) -> Vec<&DesignIssue> {
        self.issues.iter().filter(|issue| issue.item_id == *item).collect()
    }

    /// Return a reference to an issue by id.
    #[must_use]
    pub fn get(&self, id: &IssueId) -> Option<&DesignIssue> {
        self.issues.iter().find(|issue| issue.id == *id)
    }

    /// Remove every issue owned by `item`, returning the removed ids.
    pub fn remove_for_item(&mut self, item: &ItemId) -> Vec<IssueId> {
        let mut removed = Vec::new();
        self.issues.retain(|issue| {
            if issue.item_id == *item {
                removed.push(issue.id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Remove every issue.
    pub fn clear(&mut self) {
        self.issues.clear();
    }

    /// Total and high-severity counts for `item`.
    #[must_use]
    pub fn summary(&self, item: &ItemId) -> IssueSummary {
        self.issues
            .iter()
            .filter(|issue| issue.item_id == *item)
            .fold(IssueSummary::default(), |mut acc, issue| {
                acc.total += 1;
                if issue.severity == Severity::High {
                    acc.high += 1;
                }
                acc
            })
    }

    /// Number of issues across all items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if no issues are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
