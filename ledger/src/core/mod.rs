pub mod error;
pub mod events;
pub mod genesis;
pub mod ledger;
pub mod storage;
pub mod witness;

pub use ledger::{Ledger, TransferRequest};
