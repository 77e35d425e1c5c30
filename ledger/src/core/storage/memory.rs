use std::collections::BTreeMap;

use bytes::Bytes;

use super::{Changes, KeyValueStore};
use crate::core::error::LedgerError;

/// Ephemeral in-process store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<Bytes, Bytes>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, LedgerError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), LedgerError> {
        self.entries
            .insert(Bytes::copy_from_slice(key), Bytes::copy_from_slice(value));
        Ok(())
    }

    fn apply_batch(&mut self, changes: Changes) -> Result<(), LedgerError> {
        self.entries.extend(changes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LedgerError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::Snapshot;

    #[test]
    fn test_apply_batch_overwrites_and_inserts() {
        let mut store = MemoryStore::default();
        store.put(b"stale", &[1]).unwrap();

        let mut snapshot = Snapshot::new();
        snapshot.put(b"fresh".to_vec(), vec![2u8]);
        snapshot.put(b"stale".to_vec(), vec![3u8]);
        store.apply_batch(snapshot.into_changes()).unwrap();

        assert_eq!(store.get(b"stale").unwrap().map(|v| v.to_vec()), Some(vec![3]));
        assert_eq!(store.get(b"fresh").unwrap().map(|v| v.to_vec()), Some(vec![2]));
        assert_eq!(store.len(), 2);
    }
}
