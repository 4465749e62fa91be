//! File-backed segment store: one JSON document per namespace key.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use rolodex_core::{SegmentStore, StoredSegment};

use crate::error::Result;
use crate::SEGMENTS_NAMESPACE;

/// Durable key-value slot backed by a JSON file.
///
/// The slot lives at `<dir>/<namespace>.json`. Reads of a missing file
/// yield an empty list; any other failure surfaces as an error for the
/// engine to degrade on.
pub struct FileSegmentStore {
    path: PathBuf,
}

impl FileSegmentStore {
    /// Creates a store rooted at the given directory.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SEGMENTS_NAMESPACE}.json")),
        }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SegmentStore for FileSegmentStore {
    fn load(&self) -> Result<Vec<StoredSegment>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, segments: &[StoredSegment]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_vec(segments)?;
        fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), count = segments.len(), "segments persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rolodex_core::{SegmentDefinition, SegmentId};
    use tempfile::TempDir;

    fn sample(label: &str) -> StoredSegment {
        StoredSegment {
            id: SegmentId::new(),
            label: label.to_string(),
            definition: SegmentDefinition::default(),
        }
    }

    #[test]
    fn test_missing_file_loads_empty_list() {
        let dir = TempDir::new().unwrap();
        let store = FileSegmentStore::new(dir.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileSegmentStore::new(dir.path());

        let segments = vec![sample("Design leads"), sample("Founders")];
        store.save(&segments).unwrap();

        assert_eq!(store.load().unwrap(), segments);
    }

    #[test]
    fn test_save_overwrites_previous_slot() {
        let dir = TempDir::new().unwrap();
        let store = FileSegmentStore::new(dir.path());

        store.save(&[sample("First")]).unwrap();
        store.save(&[sample("Second")]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].label, "Second");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FileSegmentStore::new(dir.path());
        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_err());
    }
}
