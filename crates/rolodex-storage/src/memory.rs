//! In-memory segment store for testing.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use rolodex_core::{SegmentStore, StoredSegment};

use crate::error::Result;
use crate::SEGMENTS_NAMESPACE;

/// In-memory key-value slot (for testing).
///
/// Values are kept as serialized JSON strings so the store exercises the
/// same (de)serialization path as the durable backends.
#[derive(Clone, Default)]
pub struct MemorySegmentStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySegmentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the raw slot contents, bypassing serialization.
    ///
    /// Test helper for simulating corrupt persisted state.
    pub fn put_raw(&self, value: impl Into<String>) {
        self.entries
            .write()
            .insert(SEGMENTS_NAMESPACE.to_string(), value.into());
    }
}

impl SegmentStore for MemorySegmentStore {
    fn load(&self) -> Result<Vec<StoredSegment>> {
        let entries = self.entries.read();
        match entries.get(SEGMENTS_NAMESPACE) {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, segments: &[StoredSegment]) -> Result<()> {
        let raw = serde_json::to_string(segments)?;
        self.entries
            .write()
            .insert(SEGMENTS_NAMESPACE.to_string(), raw);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolodex_core::{SegmentDefinition, SegmentId};

    fn sample() -> StoredSegment {
        StoredSegment {
            id: SegmentId::new(),
            label: "Design leads".to_string(),
            definition: SegmentDefinition::default(),
        }
    }

    #[test]
    fn test_empty_store_loads_empty_list() {
        let store = MemorySegmentStore::new();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = MemorySegmentStore::new();
        let segment = sample();

        store.save(std::slice::from_ref(&segment)).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, vec![segment]);
    }

    #[test]
    fn test_corrupt_slot_is_an_error() {
        let store = MemorySegmentStore::new();
        store.put_raw("{not json");
        assert!(store.load().is_err());
    }
}
