use std::collections::HashSet;

use spkz_common::crypto::Address;

/// Proof that the current call was authorized by a given account.
pub trait Witness {
    fn check_witness(&self, account: &Address) -> bool;
}

/// Authenticates nobody, for read-only callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWitness;

impl Witness for NoWitness {
    fn check_witness(&self, _: &Address) -> bool {
        false
    }
}

/// Accounts whose authorization has already been established by the embedder.
#[derive(Debug, Default, Clone)]
pub struct SignerSet {
    signers: HashSet<Address>,
}

impl SignerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(account: Address) -> Self {
        let mut set = Self::new();
        set.insert(account);
        set
    }

    pub fn insert(&mut self, account: Address) -> bool {
        self.signers.insert(account)
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

impl FromIterator<Address> for SignerSet {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self {
            signers: iter.into_iter().collect(),
        }
    }
}

impl Witness for SignerSet {
    fn check_witness(&self, account: &Address) -> bool {
        self.signers.contains(account)
    }
}
