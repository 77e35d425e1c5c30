use std::collections::{btree_map::IntoIter, BTreeMap};

use bytes::Bytes;

/// Write set of one snapshot, ordered by key.
#[derive(Clone, Debug, Default)]
pub struct Changes {
    pub writes: BTreeMap<Bytes, Bytes>,
}

impl Changes {
    /// Set a key to a new value, returning the value it replaces.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Bytes>
    where
        K: Into<Bytes>,
        V: Into<Bytes>,
    {
        self.writes.insert(key.into(), value.into())
    }

    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Option<&Bytes> {
        self.writes.get(key.as_ref())
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl IntoIterator for Changes {
    type Item = (Bytes, Bytes);
    type IntoIter = IntoIter<Bytes, Bytes>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}
