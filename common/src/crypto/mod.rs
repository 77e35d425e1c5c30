mod address;
mod keys;

pub mod error;

pub use address::*;
pub use error::CryptoError;
pub use keys::*;
