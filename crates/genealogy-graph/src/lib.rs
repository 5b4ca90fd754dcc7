//! Supervision graph discovery — traversal engine, graph store, snapshot export.

pub mod pacing;
pub mod snapshot;
pub mod store;
pub mod traversal;

pub use pacing::{FixedDelay, Pacer};
pub use snapshot::{GraphSnapshot, PersonMap, SnapshotMetadata};
pub use store::{GraphStore, GraphSummary};
pub use traversal::Traversal;
