//! Stateful Rolodex engine: explicit mutation methods over an immutable
//! snapshot, replacing the implicit UI state of the original dashboard.
//!
//! The engine owns the filter/segment/selection/window state, recomputes
//! the filtered result synchronously on every relevant mutation, and hands
//! hosts an [`EngineSnapshot`] to render from. All side effects (messaging,
//! introductions, export, analytics) delegate to external collaborators.

pub mod disclosure;
pub mod engine;
pub mod events;
pub mod export;
pub mod selection;

pub use disclosure::DisclosureWindow;
pub use engine::{EngineSnapshot, ExportHandler, RelationshipEngine};
pub use export::CsvExport;
pub use selection::Selection;
