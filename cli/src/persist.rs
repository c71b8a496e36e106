//! Snapshot file persistence.
//!
//! The whole in-memory state is written as one JSON snapshot and restored
//! wholesale at startup. A crash between operations loses everything since
//! the last save; that is the accepted durability model.

use crate::error::Result;
use biblio_engine::{LendingEngine, LibrarySnapshot, SnapshotMetadata};
use std::fs;
use std::path::Path;

/// Save the engine's full state to `path` as pretty-printed JSON.
pub fn save(engine: &LendingEngine, path: &Path) -> Result<SnapshotMetadata> {
    let snapshot = engine.export_snapshot();
    let metadata = SnapshotMetadata::from(&snapshot);
    fs::write(path, snapshot.to_json_pretty()?)?;
    tracing::info!(
        path = %path.display(),
        books = metadata.book_count,
        members = metadata.member_count,
        transactions = metadata.transaction_count,
        "state saved"
    );
    Ok(metadata)
}

/// Load a snapshot from `path` and restore it into the engine, replacing
/// all current state.
pub fn load(engine: &mut LendingEngine, path: &Path) -> Result<SnapshotMetadata> {
    let json = fs::read_to_string(path)?;
    let snapshot = LibrarySnapshot::from_json(&json)?;
    let metadata = SnapshotMetadata::from(&snapshot);
    engine.import_snapshot(snapshot)?;
    tracing::info!(
        path = %path.display(),
        books = metadata.book_count,
        members = metadata.member_count,
        transactions = metadata.transaction_count,
        "state loaded"
    );
    Ok(metadata)
}
