use spkz_common::crypto::Address;
use thiserror::Error;

use crate::config::Network;

/// Errors that can occur while building genesis parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenesisError {
    #[error("Deployer override is not allowed on {0}")]
    DeployerOverrideNotAllowed(Network),

    #[error("Invalid deployer address: {0}")]
    InvalidDeployer(Address),
}
