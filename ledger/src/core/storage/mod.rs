mod memory;
mod providers;

pub mod sled;
pub mod snapshot;

pub use self::{
    memory::MemoryStore,
    providers::*,
    sled::SledStore,
    snapshot::{Changes, Snapshot},
};

use crate::core::error::LedgerError;
use bytes::Bytes;
use log::trace;
use spkz_common::serializer::Serializer;

/// Durable key-value store backing the ledger.
///
/// Implementations only provide raw byte access; typed access and the
/// per-call transactional overlay live in [`LedgerStorage`].
pub trait KeyValueStore {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, LedgerError>;

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), LedgerError>;

    // Apply every write of the batch or none of them
    fn apply_batch(&mut self, changes: Changes) -> Result<(), LedgerError>;

    fn flush(&mut self) -> Result<(), LedgerError>;
}

/// Typed storage over a [`KeyValueStore`] with an optional pending snapshot.
pub struct LedgerStorage<S: KeyValueStore> {
    store: S,
    snapshot: Option<Snapshot>,
}

impl<S: KeyValueStore> LedgerStorage<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            snapshot: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn flush(&mut self) -> Result<(), LedgerError> {
        self.store.flush()
    }

    // Pending snapshot writes win over the store, every read goes through here
    fn load_raw(&self, key: &[u8]) -> Result<Option<Bytes>, LedgerError> {
        if let Some(value) = self.snapshot.as_ref().and_then(|s| s.get(key)) {
            return Ok(Some(value.clone()));
        }

        self.store.get(key)
    }

    pub fn load_optional_from_disk<V: Serializer>(
        &self,
        key: &[u8],
    ) -> Result<Option<V>, LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("load optional {} from disk", hex::encode(key));
        }

        match self.load_raw(key)? {
            Some(bytes) => Ok(Some(V::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn insert_into_disk<V: Serializer>(
        &mut self,
        key: &[u8],
        value: &V,
    ) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("insert into disk {}", hex::encode(key));
        }

        match self.snapshot.as_mut() {
            Some(snapshot) => {
                snapshot.put(key.to_vec(), value.to_bytes());
            }
            None => self.store.put(key, &value.to_bytes())?,
        };

        Ok(())
    }

    /// Write then read back from the store, failing if it does not return what was written.
    ///
    /// Inside a snapshot the read-back happens when the snapshot is applied.
    pub fn safe_put<V: Serializer>(&mut self, key: &[u8], value: &V) -> Result<(), LedgerError> {
        if log::log_enabled!(log::Level::Trace) {
            trace!("safe put {}", hex::encode(key));
        }

        let bytes = value.to_bytes();
        match self.snapshot.as_mut() {
            Some(snapshot) => {
                snapshot.put_verified(key.to_vec(), bytes);
                Ok(())
            }
            None => {
                self.store.put(key, &bytes)?;
                self.verify_stored(key, &bytes)
            }
        }
    }

    // Compare the store content against the expected bytes
    fn verify_stored(&self, key: &[u8], expected: &[u8]) -> Result<(), LedgerError> {
        match self.store.get(key)? {
            Some(stored) if stored.as_ref() == expected => Ok(()),
            _ => Err(LedgerError::StorageWriteVerificationFailed {
                key: hex::encode(key),
            }),
        }
    }
}
