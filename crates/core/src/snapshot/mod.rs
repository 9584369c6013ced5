//! Snapshot document: the JSON file the pipeline reads and rewrites.

mod model;
mod store;

pub use model::{Snapshot, SnapshotItem};
pub use store::SnapshotStore;
