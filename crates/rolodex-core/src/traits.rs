use serde_json::Value as JsonValue;

use crate::error::CoreResult;
use crate::segment::StoredSegment;

/// Durable key-value slot for user-defined segments.
///
/// Implementations are synchronous: the engine runs on the UI event loop
/// and treats persistence as fire-and-forget, so there is no I/O to await.
/// Callers degrade on error — a failed load yields an empty custom-segment
/// list and a failed save is logged and swallowed.
pub trait SegmentStore: Send + Sync {
    /// Reads the stored custom segments under the fixed namespace key.
    fn load(&self) -> CoreResult<Vec<StoredSegment>>;

    /// Replaces the stored custom segments wholesale.
    fn save(&self, segments: &[StoredSegment]) -> CoreResult<()>;
}

/// Optional analytics sink invoked at defined interaction points.
///
/// Implementations must be cheap and infallible; the engine never inspects
/// a result and is fully functional when no sink is installed.
pub trait EventSink: Send + Sync {
    /// Records one named event with a JSON payload.
    fn track(&self, name: &str, payload: JsonValue);
}
