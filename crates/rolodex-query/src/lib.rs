//! Pure query layer for the Rolodex engine: filter pipeline, sort
//! comparators, facet catalogs, segment registry, and metrics.

pub mod catalog;
pub mod metrics;
pub mod pipeline;
pub mod segments;
pub mod sort;

pub use catalog::FacetCatalog;
pub use metrics::DashboardMetrics;
pub use pipeline::{apply, facet_stage, query_stage, segment_stage};
pub use segments::{connection_builtins, invitation_builtins, list_segments, reconstruct};
pub use sort::SortKey;
