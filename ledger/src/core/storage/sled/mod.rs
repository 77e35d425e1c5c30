use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use log::{debug, info, trace};

use super::{Changes, KeyValueStore};
use crate::core::error::LedgerError;

/// Durable store backed by an embedded sled database.
pub struct SledStore {
    db: ::sled::Db,
}

impl SledStore {
    pub fn open<P: AsRef<Path>>(dir_path: P) -> Result<Self, LedgerError> {
        let path = dir_path.as_ref();
        info!("Opening ledger database at {}", path.display());
        let db = ::sled::open(path)
            .with_context(|| format!("Error while opening sled database at {}", path.display()))?;

        Ok(Self { db })
    }

    /// Temporary database removed when dropped.
    pub fn temporary() -> Result<Self, LedgerError> {
        let db = ::sled::Config::new()
            .temporary(true)
            .open()
            .context("Error while opening temporary sled database")?;

        Ok(Self { db })
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("sled get {}", hex::encode(key));
        }

        let value = self
            .db
            .get(key)
            .context("Internal error while reading sled tree")?;
        Ok(value.map(|v| Bytes::copy_from_slice(&v)))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("sled put {}", hex::encode(key));
        }

        self.db
            .insert(key, value)
            .context("Error while inserting into sled tree")?;
        Ok(())
    }

    fn apply_batch(&mut self, changes: Changes) -> Result<(), LedgerError> {
        debug!("applying batch of {} writes to sled", changes.len());
        let mut batch = ::sled::Batch::default();
        for (key, value) in changes {
            batch.insert(key.as_ref(), value.as_ref());
        }

        self.db
            .apply_batch(batch)
            .context("Error while applying batch to sled tree")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LedgerError> {
        self.db.flush().context("Error while flushing sled database")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::Snapshot;

    #[test]
    fn test_batch_is_applied() {
        let mut store = SledStore::temporary().unwrap();
        let mut snapshot = Snapshot::new();
        snapshot.put(b"_____own".to_vec(), 5u64.to_be_bytes().to_vec());
        store.apply_batch(snapshot.into_changes()).unwrap();

        let value = store.get(b"_____own").unwrap().unwrap();
        assert_eq!(value.as_ref(), &5u64.to_be_bytes());
    }
}
