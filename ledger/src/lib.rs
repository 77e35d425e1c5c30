// Spokkz token ledger library
// State machine, storage and dispatch shared by the CLI and the integration tests

pub mod config;
pub mod core;
pub mod invocation;
