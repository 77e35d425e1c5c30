use spkz_common::{
    arithmetic::ArithmeticError,
    crypto::{Address, CryptoError},
    serializer::ReaderError,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Unauthorized: no witness for {0}")]
    Unauthorized(Address),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Arithmetic underflow")]
    Underflow,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Token is already deployed")]
    AlreadyDeployed,

    #[error("Malformed batch entry at index {index}: {reason}")]
    MalformedBatchEntry { index: usize, reason: String },

    #[error("Storage write verification failed for key {key}")]
    StorageWriteVerificationFailed { key: String },

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Approval of {amount} exceeds owner balance {balance}")]
    ApprovalExceedsBalance { balance: u64, amount: u64 },

    #[error("Burn of {amount} must be strictly below total supply {supply}")]
    BurnExceedsSupply { supply: u64, amount: u64 },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid arguments for {operation}: {reason}")]
    InvalidArguments { operation: String, reason: String },

    #[error("Snapshot already started")]
    SnapshotAlreadyStarted,

    #[error("Snapshot not started")]
    SnapshotNotStarted,

    #[error("Corrupted value in storage: {0}")]
    Serialization(#[from] ReaderError),

    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl From<ArithmeticError> for LedgerError {
    fn from(err: ArithmeticError) -> Self {
        match err {
            ArithmeticError::Overflow => LedgerError::Overflow,
            ArithmeticError::Underflow => LedgerError::Underflow,
        }
    }
}

impl From<CryptoError> for LedgerError {
    fn from(err: CryptoError) -> Self {
        LedgerError::InvalidAddress(err.to_string())
    }
}
