//! The restore pipeline: reconcile first, then check compatibility.

use crate::compat::{CollectionEntry, is_compatible};
use crate::error::{PersistenceError, Result};
use crate::reconcile::reconcile;
use crate::types::Snapshot;

/// Bring a freshly loaded collection into the snapshot's order and verify it
/// is the collection the snapshot was taken against.
///
/// Reconciliation always runs before the compatibility check, so a
/// reordered reload of the same bundle is accepted. On mismatch the error
/// names the bundle the snapshot expects; nothing is written.
pub fn prepare_restore<T: CollectionEntry>(snapshot: &Snapshot, images: Vec<T>) -> Result<Vec<T>> {
    let reconciled = reconcile(images, &snapshot.image_order);
    if is_compatible(&snapshot.image_metadata, &reconciled) {
        Ok(reconciled)
    } else {
        let expected = snapshot
            .collection_name()
            .unwrap_or("the previously loaded bundle")
            .to_string();
        tracing::warn!(%expected, "Loaded collection does not match stored progress");
        Err(PersistenceError::CollectionMismatch { expected })
    }
}
