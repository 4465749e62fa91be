//! Segment registry: built-in cohort predicates and custom-segment
//! predicate reconstruction.

use chrono::Duration;

use rolodex_core::{
    Connection, Invitation, Record, Segment, SegmentContext, SegmentSummary, StoredSegment,
};

use crate::pipeline::{record_matches_facets, record_matches_query};

/// Segment key of the default connection segment.
pub const EVERYONE: &str = "everyone";
/// Segment key of the default invitation segment.
pub const ALL_INVITATIONS: &str = "all-invitations";

/// True when the record was connected within the trailing new period.
///
/// Timezone-naive date comparison: `now.date − new_period_days`. Records
/// with no connection timestamp are never "new".
#[must_use]
pub fn is_new_this_period<R: Record>(record: &R, ctx: &SegmentContext) -> bool {
    let cutoff = ctx.now.date_naive() - Duration::days(ctx.cohorts.new_period_days);
    record
        .connected_at()
        .is_some_and(|at| at.date_naive() >= cutoff)
}

/// True when the record has no usable last-contact timestamp or it is
/// older than the dormant threshold.
#[must_use]
pub fn needs_attention<R: Record>(record: &R, ctx: &SegmentContext) -> bool {
    let cutoff = ctx.now.date_naive() - Duration::days(ctx.cohorts.dormant_days);
    match record.last_contacted_at() {
        None => true,
        Some(at) => at.date_naive() < cutoff,
    }
}

/// True when strength clears the champion threshold or the record carries
/// an explicit champion flag or tag.
#[must_use]
pub fn is_champion<R: Record>(record: &R, ctx: &SegmentContext) -> bool {
    record
        .strength()
        .is_some_and(|s| s >= ctx.cohorts.champion_strength)
        || record.is_champion_flagged()
}

/// True when the invitation is explicitly warm or has enough mutual
/// connections to count as a warm introduction.
#[must_use]
pub fn is_warm<R: Record>(record: &R, ctx: &SegmentContext) -> bool {
    record.is_warm_flagged()
        || record
            .mutual_connections()
            .is_some_and(|m| m >= ctx.cohorts.warm_mutual_threshold)
}

/// Built-in segments for the connections surface.
#[must_use]
pub fn connection_builtins() -> Vec<Segment<Connection>> {
    vec![
        Segment::builtin(EVERYONE, "Everyone", Box::new(|_, _| true)),
        Segment::builtin(
            "new-this-period",
            "New this period",
            Box::new(|record, ctx| is_new_this_period(record, ctx)),
        ),
        Segment::builtin(
            "needs-attention",
            "Needs attention",
            Box::new(|record, ctx| needs_attention(record, ctx)),
        ),
        Segment::builtin(
            "champions",
            "Champions",
            Box::new(|record, ctx| is_champion(record, ctx)),
        ),
    ]
}

/// Built-in segments for the invitations surface.
#[must_use]
pub fn invitation_builtins() -> Vec<Segment<Invitation>> {
    vec![
        Segment::builtin(ALL_INVITATIONS, "All invitations", Box::new(|_, _| true)),
        Segment::builtin(
            "high-priority",
            "High priority",
            Box::new(|record: &Invitation, _| record.is_executive()),
        ),
        Segment::builtin(
            "warm-intros",
            "Warm introductions",
            Box::new(|record, ctx| is_warm(record, ctx)),
        ),
    ]
}

/// Rebuilds a custom segment's predicate from its persisted definition.
///
/// Matching reuses the pipeline's query and facet semantics, so a saved
/// segment always selects exactly what the live query + filters would.
#[must_use]
pub fn reconstruct<R: Record + 'static>(stored: &StoredSegment) -> Segment<R> {
    let definition = stored.definition.clone();
    Segment::custom(
        stored,
        Box::new(move |record, _ctx| {
            record_matches_query(record, &definition.query)
                && record_matches_facets(record, &definition.filters)
        }),
    )
}

/// Evaluates membership counts for every segment against the candidate
/// set. Counts feed UI badges only; candidates are never mutated.
#[must_use]
pub fn list_segments<R: Record>(
    segments: &[Segment<R>],
    candidates: &[R],
    ctx: &SegmentContext,
) -> Vec<SegmentSummary> {
    segments
        .iter()
        .map(|segment| SegmentSummary {
            id: segment.id.clone(),
            label: segment.label.clone(),
            is_custom: segment.is_custom,
            count: candidates
                .iter()
                .filter(|record| segment.matches(record, ctx))
                .count(),
        })
        .collect()
}
