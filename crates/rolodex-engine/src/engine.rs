//! The engine object: explicit state, synchronous recomputation, immutable
//! snapshots.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use rolodex_core::{
    Connection, CoreError, CoreResult, EngineConfig, EventSink, FacetFilterState, FacetGroup,
    Invitation, Record, RecordId, Segment, SegmentContext, SegmentDefinition, SegmentId,
    SegmentStore, SegmentSummary, StoredSegment,
};
use rolodex_query::{
    catalog::FacetCatalog, metrics::DashboardMetrics, pipeline, segments, sort, SortKey,
};

use crate::disclosure::DisclosureWindow;
use crate::events;
use crate::export::{self, CsvExport};
use crate::selection::Selection;

/// External export handler: receives the selected ids and the full
/// filtered result.
pub type ExportHandler<R> = Box<dyn Fn(&[RecordId], &[R]) + Send + Sync>;

/// Client-held faceted search, segmentation, and bulk-action engine.
///
/// All pipeline stages run synchronously on the mutating call; every
/// mutation that changes the filtered result recomputes it before
/// returning, so a following [`snapshot`](Self::snapshot) is always
/// consistent. Records are read-only snapshots owned by the upstream data
/// layer and replaced wholesale via [`reload_records`](Self::reload_records).
pub struct RelationshipEngine<R: Record + Clone + 'static> {
    records: Vec<R>,
    segments: Vec<Segment<R>>,
    builtin_count: usize,
    custom_segments: Vec<StoredSegment>,
    active_segment: String,
    query: String,
    filters: FacetFilterState,
    sort: SortKey,
    results: Vec<usize>,
    selection: Selection,
    window: DisclosureWindow,
    config: EngineConfig,
    export_filename: String,
    store: Option<Arc<dyn SegmentStore>>,
    events: Option<Arc<dyn EventSink>>,
    export_handler: Option<ExportHandler<R>>,
    recompute_count: u64,
}

/// Immutable render input produced by [`RelationshipEngine::snapshot`].
#[derive(Debug, Clone)]
pub struct EngineSnapshot<R> {
    /// Visible prefix of the filtered, sorted result.
    pub visible: Vec<R>,
    /// Size of the whole filtered result.
    pub total_filtered: usize,
    /// Size of the unfiltered candidate set.
    pub total_candidates: usize,
    /// True while more filtered records exist past the visible prefix.
    pub has_more: bool,
    /// Top-line metrics over the unfiltered candidate set.
    pub metrics: DashboardMetrics,
    /// Facet values available for the filter UI.
    pub facets: FacetCatalog,
    /// Segments with membership counts for UI badges.
    pub segments: Vec<SegmentSummary>,
    /// Key of the active segment.
    pub active_segment: String,
    /// Current free-text query.
    pub query: String,
    /// Current facet filter state.
    pub filters: FacetFilterState,
    /// Current sort key.
    pub sort: SortKey,
    /// Selected ids among the filtered result, in result order.
    pub selected: Vec<RecordId>,
    /// Number of pipeline recomputes so far (cosmetic, for "syncing"
    /// indicators only).
    pub recompute_count: u64,
}

impl<R> EngineSnapshot<R> {
    /// True when there are no candidate records at all, i.e. the host
    /// should render the explicit empty-state marker.
    #[must_use]
    pub fn is_empty_state(&self) -> bool {
        self.total_candidates == 0
    }
}

impl RelationshipEngine<Connection> {
    /// Creates an engine for the connections surface.
    #[must_use]
    pub fn for_connections(records: Vec<Connection>, config: EngineConfig) -> Self {
        Self::with_builtins(
            records,
            config,
            segments::connection_builtins(),
            "connections.csv",
        )
    }
}

impl RelationshipEngine<Invitation> {
    /// Creates an engine for the invitations surface.
    #[must_use]
    pub fn for_invitations(records: Vec<Invitation>, config: EngineConfig) -> Self {
        Self::with_builtins(
            records,
            config,
            segments::invitation_builtins(),
            "invitations.csv",
        )
    }
}

impl<R: Record + Clone + 'static> RelationshipEngine<R> {
    fn with_builtins(
        records: Vec<R>,
        config: EngineConfig,
        builtins: Vec<Segment<R>>,
        export_filename: &str,
    ) -> Self {
        let active_segment = builtins
            .first()
            .map(|segment| segment.id.clone())
            .unwrap_or_default();
        let builtin_count = builtins.len();

        let mut engine = Self {
            records,
            segments: builtins,
            builtin_count,
            custom_segments: Vec::new(),
            active_segment,
            query: String::new(),
            filters: FacetFilterState::new(),
            sort: SortKey::default(),
            results: Vec::new(),
            selection: Selection::new(),
            window: DisclosureWindow::new(config.window),
            config,
            export_filename: export_filename.to_string(),
            store: None,
            events: None,
            export_handler: None,
            recompute_count: 0,
        };
        engine.recompute();
        engine
    }

    /// Attaches a durable segment store and loads any persisted custom
    /// segments. Load failures degrade to an empty custom list.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn SegmentStore>) -> Self {
        match store.load() {
            Ok(stored) => {
                self.custom_segments = stored;
                self.rebuild_custom_segments();
            }
            Err(err) => {
                warn!(error = %err, "failed to load custom segments; starting empty");
            }
        }
        self.store = Some(store);
        self
    }

    /// Attaches an analytics sink.
    #[must_use]
    pub fn with_events(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Replaces the built-in CSV fallback with an external export handler.
    #[must_use]
    pub fn with_export_handler(mut self, handler: ExportHandler<R>) -> Self {
        self.export_handler = Some(handler);
        self
    }

    /// Replaces the candidate set wholesale with a fresh snapshot from the
    /// data layer. Selection survives; hidden selected records are simply
    /// excluded from bulk actions.
    pub fn reload_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.window.reset();
        self.recompute();
    }

    /// Sets the free-text query. Resets the disclosure window.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.query == query {
            return;
        }
        self.query = query;
        self.window.reset();
        self.recompute();
    }

    /// Sets the query from a voice transcript and tracks the event.
    pub fn set_query_from_voice(&mut self, transcript: &str) {
        self.set_query(transcript);
        self.track(
            events::VOICE_SEARCH_USED,
            json!({ "transcript_chars": transcript.chars().count() }),
        );
    }

    /// Switches the active segment. Unknown keys are ignored so the UI can
    /// never wedge the engine into an unrenderable state.
    pub fn set_segment(&mut self, id: &str) {
        if self.active_segment == id {
            return;
        }
        if !self.segments.iter().any(|segment| segment.id == id) {
            warn!(segment = id, "ignoring switch to unknown segment");
            return;
        }
        self.active_segment = id.to_string();
        self.window.reset();
        self.recompute();
        self.track(events::SEGMENT_CHANGED, json!({ "segment": id }));
    }

    /// Flips one facet value. Resets the disclosure window.
    pub fn toggle_facet(&mut self, group: FacetGroup, value: impl Into<String>) {
        self.filters.toggle(group, value);
        self.window.reset();
        self.recompute();
    }

    /// Replaces the facet filter state wholesale. Resets the window.
    pub fn set_filters(&mut self, filters: FacetFilterState) {
        if self.filters == filters {
            return;
        }
        self.filters = filters;
        self.window.reset();
        self.recompute();
    }

    /// Changes the sort order. Re-sorts the existing result without
    /// resetting the disclosure window.
    pub fn set_sort(&mut self, key: SortKey) {
        if self.sort == key {
            return;
        }
        self.sort = key;
        sort::order(&self.records, &mut self.results, key);
    }

    /// Expands the disclosure window by one step.
    pub fn advance_window(&mut self) {
        self.window.advance(self.results.len());
    }

    /// Flips selection membership for one record.
    pub fn toggle_select(&mut self, id: impl Into<RecordId>) {
        self.selection.toggle(id.into());
    }

    /// Clears the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Saves the current query + filters as a custom segment.
    ///
    /// Persistence is best-effort; a failed write is logged and swallowed.
    /// Returns the new segment key.
    pub fn save_segment(&mut self, label: &str) -> CoreResult<String> {
        let label = label.trim();
        if label.is_empty() {
            return Err(CoreError::validation("segment label must not be blank"));
        }

        let stored = StoredSegment {
            id: SegmentId::new(),
            label: label.to_string(),
            definition: SegmentDefinition {
                query: self.query.clone(),
                filters: self.filters.clone(),
            },
        };
        let segment = segments::reconstruct::<R>(&stored);
        let key = segment.id.clone();

        self.custom_segments.push(stored);
        self.segments.push(segment);
        self.persist_custom();

        info!(segment = %key, label, "custom segment saved");
        self.track(
            events::SEGMENT_SAVED,
            json!({ "segment": key, "label": label }),
        );
        Ok(key)
    }

    /// Removes a custom segment by key. Built-ins cannot be removed.
    pub fn remove_segment(&mut self, key: &str) -> CoreResult<()> {
        let position = self
            .custom_segments
            .iter()
            .position(|stored| format!("custom-{}", stored.id) == key)
            .ok_or_else(|| CoreError::not_found("segment", key))?;

        self.custom_segments.remove(position);
        self.segments.remove(self.builtin_count + position);
        self.persist_custom();

        if self.active_segment == key {
            self.active_segment = self
                .segments
                .first()
                .map(|segment| segment.id.clone())
                .unwrap_or_default();
            self.window.reset();
            self.recompute();
        }

        info!(segment = key, "custom segment removed");
        self.track(events::SEGMENT_REMOVED, json!({ "segment": key }));
        Ok(())
    }

    /// Invokes `handler` once per selected-and-visible record, in result
    /// order, then clears the selection. Returns how many records were
    /// handled.
    pub fn bulk_message<F: FnMut(&R)>(&mut self, handler: F) -> usize {
        self.bulk_action("message", handler)
    }

    /// Same contract as [`bulk_message`](Self::bulk_message) for
    /// introductions.
    pub fn bulk_introduce<F: FnMut(&R)>(&mut self, handler: F) -> usize {
        self.bulk_action("introduce", handler)
    }

    fn bulk_action<F: FnMut(&R)>(&mut self, action: &str, mut handler: F) -> usize {
        let targets = self.selection.intersect_ordered(&self.records, &self.results);
        for record in targets.iter().copied() {
            handler(record);
        }

        let count = targets.len();
        self.selection.clear();
        self.track(
            events::BULK_ACTION_INVOKED,
            json!({ "action": action, "count": count }),
        );
        count
    }

    /// Exports the current view.
    ///
    /// With an external handler installed, delegates `(selected ids,
    /// filtered result)` and returns `None`. Otherwise synthesizes the CSV
    /// fallback over the selected-and-visible records, or the whole
    /// filtered result when nothing is selected.
    pub fn export(&self) -> Option<CsvExport> {
        let ordered: Vec<&R> = self.results.iter().map(|&i| &self.records[i]).collect();
        let selected = self.selection.intersect_ordered(&self.records, &self.results);

        if let Some(handler) = &self.export_handler {
            let ids: Vec<RecordId> = selected.iter().map(|record| record.id().clone()).collect();
            let rows: Vec<R> = ordered.into_iter().cloned().collect();
            handler(&ids, &rows);
            self.track(
                events::BULK_ACTION_INVOKED,
                json!({ "action": "export", "count": ids.len() }),
            );
            return None;
        }

        let rows = if selected.is_empty() { &ordered } else { &selected };
        match export::build_csv(rows, &self.export_filename) {
            Ok(csv) => {
                self.track(
                    events::BULK_ACTION_INVOKED,
                    json!({ "action": "export", "count": rows.len() }),
                );
                Some(csv)
            }
            Err(err) => {
                warn!(error = %err, "csv export failed");
                None
            }
        }
    }

    /// Produces the immutable render input for the current state.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot<R> {
        let ctx = self.context();
        let total_filtered = self.results.len();
        let visible_count = self.window.take(total_filtered);

        let visible: Vec<R> = self.results[..visible_count]
            .iter()
            .map(|&i| self.records[i].clone())
            .collect();

        let selected: Vec<RecordId> = self
            .selection
            .intersect_ordered(&self.records, &self.results)
            .into_iter()
            .map(|record| record.id().clone())
            .collect();

        EngineSnapshot {
            visible,
            total_filtered,
            total_candidates: self.records.len(),
            has_more: self.window.has_more(total_filtered),
            metrics: DashboardMetrics::compute(&self.records, &ctx),
            facets: FacetCatalog::build(&self.records, self.config.facets.catalog_cap),
            segments: segments::list_segments(&self.segments, &self.records, &ctx),
            active_segment: self.active_segment.clone(),
            query: self.query.clone(),
            filters: self.filters.clone(),
            sort: self.sort,
            selected,
            recompute_count: self.recompute_count,
        }
    }

    fn context(&self) -> SegmentContext {
        SegmentContext::new(Utc::now(), self.config.cohorts)
    }

    fn recompute(&mut self) {
        let ctx = self.context();
        let active = self
            .segments
            .iter()
            .find(|segment| segment.id == self.active_segment);

        self.results = pipeline::apply(
            &self.records,
            active,
            &self.query,
            &self.filters,
            self.sort,
            &ctx,
        );
        self.recompute_count += 1;
        debug!(
            matched = self.results.len(),
            recompute = self.recompute_count,
            "engine recomputed"
        );
    }

    fn rebuild_custom_segments(&mut self) {
        self.segments.truncate(self.builtin_count);
        for stored in &self.custom_segments {
            self.segments.push(segments::reconstruct(stored));
        }
    }

    fn persist_custom(&self) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.custom_segments) {
                warn!(error = %err, "failed to persist custom segments");
            }
        }
    }

    fn track(&self, name: &str, payload: serde_json::Value) {
        if let Some(sink) = &self.events {
            sink.track(name, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolodex_core::FollowStatus;

    fn engine_with(records: Vec<Connection>) -> RelationshipEngine<Connection> {
        RelationshipEngine::for_connections(records, EngineConfig::default())
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
            Connection::new("3")
                .with_name("Noor")
                .with_organisation("Zephyr")
                .with_status(FollowStatus::Archived),
        ]
    }

    #[test]
    fn test_query_filters_and_resets_window() {
        let mut engine = engine_with(fixtures());
        engine.advance_window();

        engine.set_query("avery");
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.total_filtered, 1);
        assert_eq!(snapshot.visible[0].id.as_str(), "1");
    }

    #[test]
    fn test_sort_change_keeps_window() {
        let records: Vec<Connection> = (0..40)
            .map(|i| Connection::new(format!("c{i}")).with_strength((i % 100) as u8))
            .collect();
        let mut engine = engine_with(records);

        engine.advance_window();
        assert_eq!(engine.snapshot().visible.len(), 30);

        engine.set_sort(SortKey::Strength);
        assert_eq!(engine.snapshot().visible.len(), 30);
    }

    #[test]
    fn test_unknown_segment_is_ignored() {
        let mut engine = engine_with(fixtures());
        engine.set_segment("no-such-segment");
        assert_eq!(engine.snapshot().active_segment, "everyone");
    }

    #[test]
    fn test_bulk_message_hits_only_visible_selection_in_order() {
        let mut engine = engine_with(fixtures());
        engine.toggle_select("3");
        engine.toggle_select("1");

        // Hide record 3 behind a tag filter; it stays selected but must
        // not receive the bulk action.
        engine.toggle_facet(FacetGroup::Tags, "Design");

        let mut messaged = Vec::new();
        let count = engine.bulk_message(|record| messaged.push(record.id.as_str().to_string()));

        assert_eq!(count, 1);
        assert_eq!(messaged, vec!["1"]);
        assert!(engine.snapshot().selected.is_empty());
    }

    #[test]
    fn test_save_segment_rejects_blank_label() {
        let mut engine = engine_with(fixtures());
        assert!(engine.save_segment("   ").is_err());
    }

    #[test]
    fn test_removing_active_segment_falls_back_to_default() {
        let mut engine = engine_with(fixtures());
        engine.set_query("avery");
        let key = engine.save_segment("Averys").unwrap();

        engine.set_query("");
        engine.set_segment(&key);
        assert_eq!(engine.snapshot().total_filtered, 1);

        engine.remove_segment(&key).unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.active_segment, "everyone");
        assert_eq!(snapshot.total_filtered, 3);
    }

    #[test]
    fn test_export_fallback_uses_selection_when_present() {
        let mut engine = engine_with(fixtures());
        engine.toggle_select("2");

        let export = engine.export().unwrap();
        assert_eq!(export.filename, "connections.csv");
        assert_eq!(export.line_count(), 2);

        engine.clear_selection();
        let export = engine.export().unwrap();
        assert_eq!(export.line_count(), 4);
    }
}
