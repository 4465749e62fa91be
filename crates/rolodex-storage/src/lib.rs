//! Segment persistence adapters for the Rolodex engine.
//!
//! Implementations of the [`SegmentStore`] slot: an in-memory backend for
//! tests and a file-backed backend for durable local persistence. The
//! engine treats every store as best-effort; failures degrade rather than
//! propagate into the UI.

pub mod error;
pub mod file;
pub mod memory;

pub use error::{Error, Result};
pub use file::FileSegmentStore;
pub use memory::MemorySegmentStore;

pub use rolodex_core::traits::SegmentStore;

/// Fixed namespace key under which the custom-segment list is stored.
pub const SEGMENTS_NAMESPACE: &str = "rolodex.segments.v1";
