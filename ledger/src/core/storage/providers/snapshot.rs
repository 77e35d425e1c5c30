use log::{debug, trace};

use crate::core::{
    error::LedgerError,
    storage::{KeyValueStore, LedgerStorage, Snapshot},
};

pub trait SnapshotProvider {
    // Check if we have a snapshot already set
    fn has_snapshot(&self) -> bool;

    // Start a snapshot
    // Every write until `end_snapshot` stays in memory
    fn start_snapshot(&mut self) -> Result<(), LedgerError>;

    // Apply the batch to the storage, or drop it
    // Guarded writes are read back from the store after the batch is applied
    fn end_snapshot(&mut self, apply: bool) -> Result<(), LedgerError>;
}

impl<S: KeyValueStore> SnapshotProvider for LedgerStorage<S> {
    fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    fn start_snapshot(&mut self) -> Result<(), LedgerError> {
        trace!("starting snapshot");
        if self.snapshot.is_some() {
            return Err(LedgerError::SnapshotAlreadyStarted);
        }

        self.snapshot = Some(Snapshot::new());
        Ok(())
    }

    fn end_snapshot(&mut self, apply: bool) -> Result<(), LedgerError> {
        trace!("end snapshot");
        let snapshot = self
            .snapshot
            .take()
            .ok_or(LedgerError::SnapshotNotStarted)?;

        if apply {
            debug!("applying snapshot with {} writes", snapshot.len());
            let verified = snapshot.verified_writes();
            self.store.apply_batch(snapshot.into_changes())?;
            for (key, value) in verified {
                self.verify_stored(&key, &value)?;
            }
        } else {
            debug!("discarding snapshot with {} writes", snapshot.len());
        }

        Ok(())
    }
}
