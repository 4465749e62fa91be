//! Event names emitted through the optional analytics sink.

/// Active segment switched.
pub const SEGMENT_CHANGED: &str = "segment_changed";
/// Current view saved as a custom segment.
pub const SEGMENT_SAVED: &str = "segment_saved";
/// Custom segment removed.
pub const SEGMENT_REMOVED: &str = "segment_removed";
/// A bulk action ran over the selection.
pub const BULK_ACTION_INVOKED: &str = "bulk_action_invoked";
/// Query populated from a voice transcript.
pub const VOICE_SEARCH_USED: &str = "voice_search_used";
