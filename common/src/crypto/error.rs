use thiserror::Error;

/// Errors that can occur while parsing account identifiers and keys
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Invalid hexadecimal string format
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    /// Invalid base58 string format
    #[error("Invalid base58 string: {0}")]
    InvalidBase58(String),

    /// Address has invalid length
    #[error("Invalid address length: {len} bytes, expected: {expected} bytes")]
    InvalidAddressLength { len: usize, expected: usize },

    /// Address was encoded with an unexpected version byte
    #[error("Invalid address version: {0:#04x}")]
    InvalidAddressVersion(u8),

    /// Invalid checksum in address
    #[error("Invalid checksum")]
    InvalidChecksum,

    #[error("Invalid secret key length: expected {expected}, got {len}")]
    InvalidSecretKeyLength { len: usize, expected: usize },

    #[error("Failed to parse public key")]
    InvalidPublicKey,

    #[error("Invalid signature length: expected {expected}, got {len}")]
    InvalidSignatureLength { len: usize, expected: usize },

    /// Signature verification failed
    #[error("Signature verification failed")]
    VerificationFailed,
}
