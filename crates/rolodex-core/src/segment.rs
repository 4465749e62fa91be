//! Segment model: named, reusable predicates over records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CohortConfig;
use crate::facet::FacetFilterState;
use crate::ids::SegmentId;

/// Persisted definition of a user-defined segment.
///
/// Only the query and filter state are stored; the predicate is
/// reconstructed from them at load time, so changes to matching semantics
/// apply retroactively to saved segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDefinition {
    /// Free-text query at save time.
    #[serde(default)]
    pub query: String,
    /// Facet filter state at save time.
    #[serde(default)]
    pub filters: FacetFilterState,
}

/// The durable form of a custom segment, as written to the storage slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSegment {
    /// Generated segment identifier.
    pub id: SegmentId,
    /// User-chosen label.
    pub label: String,
    /// Saved query + filter definition.
    pub definition: SegmentDefinition,
}

/// Evaluation context for segment predicates.
///
/// Carrying the wall clock here keeps every predicate a pure function of
/// `(record, context)`.
#[derive(Debug, Clone, Copy)]
pub struct SegmentContext {
    /// Wall-clock instant the evaluation is relative to.
    pub now: DateTime<Utc>,
    /// Cohort thresholds in effect.
    pub cohorts: CohortConfig,
}

impl SegmentContext {
    /// Creates a context for the given instant with the given thresholds.
    #[must_use]
    pub fn new(now: DateTime<Utc>, cohorts: CohortConfig) -> Self {
        Self { now, cohorts }
    }
}

/// Predicate evaluated against a single record.
pub type SegmentPredicate<R> = Box<dyn Fn(&R, &SegmentContext) -> bool + Send + Sync>;

/// A named, reusable predicate over records, built-in or user-defined.
pub struct Segment<R> {
    /// Stable segment key. Built-ins use fixed keys; custom segments use
    /// `custom-<uuid>`.
    pub id: String,
    /// Display label.
    pub label: String,
    /// True for user-defined segments.
    pub is_custom: bool,
    /// Persisted definition, present only on custom segments.
    pub definition: Option<SegmentDefinition>,
    predicate: SegmentPredicate<R>,
}

impl<R> Segment<R> {
    /// Creates a built-in segment with a fixed key.
    #[must_use]
    pub fn builtin(
        id: impl Into<String>,
        label: impl Into<String>,
        predicate: SegmentPredicate<R>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            is_custom: false,
            definition: None,
            predicate,
        }
    }

    /// Creates a custom segment from its stored form and a reconstructed
    /// predicate.
    #[must_use]
    pub fn custom(stored: &StoredSegment, predicate: SegmentPredicate<R>) -> Self {
        Self {
            id: format!("custom-{}", stored.id),
            label: stored.label.clone(),
            is_custom: true,
            definition: Some(stored.definition.clone()),
            predicate,
        }
    }

    /// Evaluates the predicate against one record.
    #[must_use]
    pub fn matches(&self, record: &R, ctx: &SegmentContext) -> bool {
        (self.predicate)(record, ctx)
    }
}

impl<R> fmt::Debug for Segment<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("is_custom", &self.is_custom)
            .finish_non_exhaustive()
    }
}

/// Segment with its membership count, for UI badges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSummary {
    /// Segment key.
    pub id: String,
    /// Display label.
    pub label: String,
    /// True for user-defined segments.
    pub is_custom: bool,
    /// Number of candidates the predicate currently matches.
    pub count: usize,
}
