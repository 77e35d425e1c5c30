mod changes;

use std::collections::BTreeSet;

use bytes::Bytes;

pub use changes::Changes;

/// Snapshot is a transactional batch of changes that can be committed or rolled back.
///
/// One snapshot spans exactly one ledger call: reads made during the call see
/// its own pending writes first, and nothing reaches the store until the
/// snapshot is applied. Keys written with [`Snapshot::put_verified`] are read
/// back from the store once the batch is applied.
#[derive(Debug, Default)]
pub struct Snapshot {
    changes: Changes,
    verified: BTreeSet<Bytes>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key-value pair into our snapshot.
    /// Returns the previous pending value.
    pub fn put<K: Into<Bytes>, V: Into<Bytes>>(&mut self, key: K, value: V) -> Option<Bytes> {
        self.changes.insert(key, value)
    }

    /// Same as [`Snapshot::put`], and the committed value must be read back.
    pub fn put_verified<K: Into<Bytes>, V: Into<Bytes>>(
        &mut self,
        key: K,
        value: V,
    ) -> Option<Bytes> {
        let key = key.into();
        self.verified.insert(key.clone());
        self.changes.insert(key, value)
    }

    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&Bytes> {
        self.changes.get(key)
    }

    // Number of keys touched by this snapshot
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Final pending value of every key that needs a read-back after commit.
    pub fn verified_writes(&self) -> Vec<(Bytes, Bytes)> {
        self.verified
            .iter()
            .filter_map(|key| self.changes.get(key).map(|v| (key.clone(), v.clone())))
            .collect()
    }

    pub fn into_changes(self) -> Changes {
        self.changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let mut snapshot = Snapshot::new();
        assert!(snapshot.get(b"key").is_none());

        assert_eq!(snapshot.put(b"key".to_vec(), vec![1u8]), None);
        assert_eq!(
            snapshot.put(b"key".to_vec(), vec![2u8]),
            Some(Bytes::from_static(&[1]))
        );
        assert_eq!(snapshot.get(b"key").map(|v| v.to_vec()), Some(vec![2]));
    }

    #[test]
    fn test_verified_writes_track_last_value() {
        let mut snapshot = Snapshot::new();
        snapshot.put(b"plain".to_vec(), vec![0u8]);
        snapshot.put_verified(b"checked".to_vec(), vec![1u8]);
        snapshot.put(b"checked".to_vec(), vec![3u8]);

        let writes = snapshot.verified_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0.as_ref(), b"checked");
        assert_eq!(writes[0].1.as_ref(), &[3u8]);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_changes_are_key_ordered() {
        let mut snapshot = Snapshot::new();
        snapshot.put(b"b".to_vec(), vec![2u8]);
        snapshot.put(b"a".to_vec(), vec![1u8]);
        let keys: Vec<_> = snapshot
            .into_changes()
            .into_iter()
            .map(|(k, _)| k.to_vec())
            .collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec()]);
    }
}
