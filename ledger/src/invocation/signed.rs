use anyhow::Context;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use spkz_common::crypto::{Address, PublicKey, SecretKey, Signature};

use super::Invocation;
use crate::core::{error::LedgerError, witness::SignerSet};

// Prepended to every signed payload so a signature is only valid for ledger invocations.
// There is no nonce: the same signed invocation verifies again each time it is submitted.
const SIGNING_DOMAIN: &[u8] = b"SPKZ-INVOCATION-V1";

/// An invocation authenticated by an ed25519 signature.
///
/// The signature covers SHA3-256(domain ∥ canonical JSON of the invocation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedInvocation {
    invocation: Invocation,
    public_key: PublicKey,
    signature: Signature,
}

impl SignedInvocation {
    pub fn sign(invocation: Invocation, secret: &SecretKey) -> Result<Self, LedgerError> {
        let digest = signing_digest(&invocation)?;
        Ok(Self {
            signature: secret.sign(&digest),
            public_key: secret.public_key(),
            invocation,
        })
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    pub fn signer(&self) -> Address {
        self.public_key.address()
    }

    /// Witness for the signer's address when the signature is valid.
    pub fn verify(&self) -> Result<SignerSet, LedgerError> {
        let digest = signing_digest(&self.invocation)?;
        self.public_key
            .verify(&digest, &self.signature)
            .map_err(|_| LedgerError::Unauthorized(self.signer()))?;

        Ok(SignerSet::single(self.signer()))
    }
}

fn signing_digest(invocation: &Invocation) -> Result<[u8; 32], LedgerError> {
    let payload = serde_json::to_vec(invocation).context("Error while serializing invocation")?;
    let mut hasher = Sha3_256::new();
    hasher.update(SIGNING_DOMAIN);
    hasher.update(&payload);
    Ok(hasher.finalize().into())
}
