mod ledger;
mod snapshot;

pub use ledger::*;
pub use snapshot::*;
