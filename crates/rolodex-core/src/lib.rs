//! Core domain types and traits for the Rolodex relationship engine.

pub mod config;
pub mod connection;
pub mod error;
pub mod facet;
pub mod ids;
pub mod invitation;
pub mod record;
pub mod segment;
pub mod traits;

pub use config::{CohortConfig, EngineConfig, FacetConfig, WindowConfig};
pub use connection::{Connection, ContactCard, FollowStatus};
pub use error::{CoreError, CoreResult};
pub use facet::{FacetFilterState, FacetGroup, FacetValue};
pub use ids::{RecordId, SegmentId};
pub use invitation::{Direction, Invitation, InvitationStatus};
pub use record::{Record, SessionRef};
pub use segment::{Segment, SegmentContext, SegmentDefinition, SegmentSummary, StoredSegment};
pub use traits::{EventSink, SegmentStore};
