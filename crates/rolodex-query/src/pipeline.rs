//! Filter pipeline: (records, segment, query, facets) → ordered positions.
//!
//! Each stage evaluates independently and yields a `RoaringBitmap` over
//! record positions; the pipeline intersects the stage bitmaps and applies
//! the sort comparator last. Bitmap iteration is ascending by position, so
//! the pre-sort order is always the input order — that is what makes the
//! stable-sort guarantee meaningful.

use roaring::RoaringBitmap;
use tracing::debug;

use rolodex_core::{FacetFilterState, Record, Segment, SegmentContext};

use crate::sort::{self, SortKey};

/// Positions of records matching the active segment predicate.
///
/// With no segment active, every record matches.
pub fn segment_stage<R: Record>(
    records: &[R],
    segment: Option<&Segment<R>>,
    ctx: &SegmentContext,
) -> RoaringBitmap {
    match segment {
        Some(segment) => collect(records, |record| segment.matches(record, ctx)),
        None => all(records.len()),
    }
}

/// Positions of records whose haystack contains the query.
///
/// A blank query matches everything.
pub fn query_stage<R: Record>(records: &[R], query: &str) -> RoaringBitmap {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return all(records.len());
    }
    collect(records, |record| record.search_haystack().contains(&needle))
}

/// Positions of records matching every non-empty facet group.
///
/// Groups combine with AND; values within a group with OR. Groups with no
/// active values never exclude a record.
pub fn facet_stage<R: Record>(records: &[R], filters: &FacetFilterState) -> RoaringBitmap {
    if filters.is_unconstrained() {
        return all(records.len());
    }
    collect(records, |record| record_matches_facets(record, filters))
}

/// Single-record form of the query stage, shared with custom-segment
/// predicate reconstruction so both match identically.
#[must_use]
pub fn record_matches_query<R: Record>(record: &R, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    needle.is_empty() || record.search_haystack().contains(&needle)
}

/// Single-record form of the facet stage.
#[must_use]
pub fn record_matches_facets<R: Record>(record: &R, filters: &FacetFilterState) -> bool {
    filters.active_groups().all(|(group, active)| {
        record
            .facet_values(group)
            .iter()
            .any(|value| active.contains(*value))
    })
}

/// Runs the full pipeline and returns ordered record positions.
///
/// Pure and idempotent: identical inputs produce identical output.
pub fn apply<R: Record>(
    records: &[R],
    segment: Option<&Segment<R>>,
    query: &str,
    filters: &FacetFilterState,
    sort: SortKey,
    ctx: &SegmentContext,
) -> Vec<usize> {
    let mut matched = segment_stage(records, segment, ctx);
    matched &= query_stage(records, query);
    matched &= facet_stage(records, filters);

    let mut positions: Vec<usize> = matched.iter().map(|i| i as usize).collect();
    sort::order(records, &mut positions, sort);

    debug!(
        total = records.len(),
        matched = positions.len(),
        sort = sort.as_str(),
        "filter pipeline applied"
    );

    positions
}

fn collect<R, F>(records: &[R], mut predicate: F) -> RoaringBitmap
where
    F: FnMut(&R) -> bool,
{
    records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| predicate(record).then_some(i as u32))
        .collect()
}

fn all(len: usize) -> RoaringBitmap {
    (0..len as u32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rolodex_core::{CohortConfig, Connection, FacetGroup};

    fn ctx() -> SegmentContext {
        SegmentContext::new(Utc::now(), CohortConfig::default())
    }

    fn fixtures() -> Vec<Connection> {
        vec![
            Connection::new("1")
                .with_name("Avery")
                .with_organisation("Acme")
                .with_tags(["Design"]),
            Connection::new("2")
                .with_name("Sam")
                .with_tags(["Design", "Founder"]),
            Connection::new("3").with_name("Noor").with_organisation("Zephyr"),
        ]
    }

    #[test]
    fn test_query_stage_is_case_insensitive() {
        let records = fixtures();
        let matched = query_stage(&records, "aCmE");
        assert_eq!(matched.iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let records = fixtures();
        assert_eq!(query_stage(&records, "   ").len(), 3);
    }

    #[test]
    fn test_facet_stage_or_within_group() {
        let records = fixtures();
        let mut filters = FacetFilterState::new();
        filters.toggle(FacetGroup::Organisations, "Acme");
        filters.toggle(FacetGroup::Organisations, "Zephyr");

        let matched = facet_stage(&records, &filters);
        assert_eq!(matched.iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_facet_stage_and_across_groups() {
        let records = fixtures();
        let mut filters = FacetFilterState::new();
        filters.toggle(FacetGroup::Organisations, "Acme");
        filters.toggle(FacetGroup::Tags, "Design");

        let matched = facet_stage(&records, &filters);
        assert_eq!(matched.iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_empty_filter_groups_exclude_nothing() {
        let records = fixtures();
        let mut filters = FacetFilterState::new();
        filters.set(FacetGroup::Tags, Vec::new());

        assert_eq!(facet_stage(&records, &filters).len(), records.len() as u64);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let records = fixtures();
        let mut filters = FacetFilterState::new();
        filters.toggle(FacetGroup::Tags, "Design");

        let ctx = ctx();
        let first = apply(&records, None, "design", &filters, SortKey::Recency, &ctx);
        let second = apply(&records, None, "design", &filters, SortKey::Recency, &ctx);
        assert_eq!(first, second);
        assert_eq!(first, vec![0, 1]);
    }

    #[test]
    fn test_stages_compose_with_and() {
        let records = fixtures();
        let mut filters = FacetFilterState::new();
        filters.toggle(FacetGroup::Tags, "Founder");

        let ctx = ctx();
        let positions = apply(&records, None, "sam", &filters, SortKey::Recency, &ctx);
        assert_eq!(positions, vec![1]);

        let none = apply(&records, None, "avery", &filters, SortKey::Recency, &ctx);
        assert!(none.is_empty());
    }
}
